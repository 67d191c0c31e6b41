use std::fs::File;
use std::path::Path;

use tracing::info;

use super::Observation;
use crate::error::{io_error, Result};

/// Reads `id,distance,bearing` records (no header row, whitespace ignored)
/// and validates them against `landmark_count` landmarks.
pub fn read_observations<R: std::io::Read>(
    reader: R,
    landmark_count: usize,
) -> Result<Vec<Observation>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (index, record) in csv.deserialize::<Observation>().enumerate() {
        observations.push(record?.validated(index, landmark_count)?);
    }
    Ok(observations)
}

/// Loads an observation file. An unreadable file is an error, as is any
/// record that fails [`read_observations`].
pub fn load_observations(
    path: impl AsRef<Path>,
    landmark_count: usize,
) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let observations = read_observations(file, landmark_count)?;
    info!(
        path = %path.display(),
        count = observations.len(),
        "loaded observations"
    );
    Ok(observations)
}

/// Writes records in the format [`read_observations`] accepts.
pub fn write_observations<W: std::io::Write>(
    writer: W,
    observations: &[Observation],
) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for obs in observations {
        csv.serialize(obs)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_observations(path: impl AsRef<Path>, observations: &[Observation]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    write_observations(file, observations)?;
    info!(path = %path.display(), count = observations.len(), "saved observations");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizationError;

    #[test]
    fn test_read_trims_whitespace() {
        let data = "0, 1204.5, 0.25\n1,1300.0,-0.5\n 2 ,\t900 , 1.0\n";
        let obs = read_observations(data.as_bytes(), 3).unwrap();
        assert_eq!(
            obs,
            vec![
                Observation::new(0, 1204.5, 0.25),
                Observation::new(1, 1300.0, -0.5),
                Observation::new(2, 900.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_read_rejects_unknown_landmark() {
        let data = "0,1.0,0.0\n3,1.0,0.0\n";
        let err = read_observations(data.as_bytes(), 3).unwrap_err();
        assert!(matches!(
            err,
            LocalizationError::UnknownLandmark { index: 1, id: 3, .. }
        ));
    }

    #[test]
    fn test_read_rejects_garbage() {
        let err = read_observations("0,abc,0.0\n".as_bytes(), 3).unwrap_err();
        assert!(matches!(err, LocalizationError::Csv(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_observations("/nonexistent/obs.csv", 3).unwrap_err();
        assert!(matches!(err, LocalizationError::Io { .. }));
    }

    #[test]
    fn test_written_records_read_back() {
        let obs = vec![
            Observation::new(2, 1500.25, -1.0),
            Observation::new(0, 42.0, 3.0),
        ];
        let mut buffer = Vec::new();
        write_observations(&mut buffer, &obs).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(read_observations(buffer.as_slice(), 3).unwrap(), obs);
    }
}
