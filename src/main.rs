use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use simdloc::config::FilterConfig;
use simdloc::filter::{EvaluationMode, ParticleFilter, SimilarityView, PARTICLE_WEIGHT_THRESHOLD};
use simdloc::harness::Kernel;
use simdloc::observation::{
    load_observations, save_observations, synthesize, ObservationWindow,
};
use simdloc::simd::{backend_name, env};

#[derive(Parser)]
#[command(name = "simdloc")]
#[command(
    about = "Particle filter localization with scalar and SIMD evaluation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "YAML configuration file")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the filter over an observation file and print the estimate")]
    Run {
        #[arg(long, short, default_value = "sim_obs.csv", help = "Observation CSV file")]
        observations: PathBuf,

        #[arg(long, help = "Evaluation mode: scalar or simd (overrides the config)")]
        mode: Option<EvaluationMode>,

        #[arg(long, help = "Particle placement seed (overrides the config)")]
        seed: Option<u64>,

        #[arg(long, help = "Observation window size, default all observations")]
        window: Option<usize>,

        #[arg(long, help = "Print one estimate per window size from 1 up to the window")]
        sweep: bool,
    },

    #[command(about = "Evaluate both modes on the same population and compare them")]
    Compare {
        #[arg(long, short, default_value = "sim_obs.csv", help = "Observation CSV file")]
        observations: PathBuf,
    },

    #[command(about = "Measure accuracy and speed of the SIMD kernels")]
    Accuracy {
        #[arg(long, help = "Kernel to audit (abs, exp, sin, cos, atan, atan2), default all")]
        kernel: Option<Kernel>,

        #[arg(long, default_value_t = 64, help = "Visit every n-th float of the domain")]
        stride: u32,
    },

    #[command(about = "Write synthetic observations of the configured robot pose")]
    Simulate {
        #[arg(long, short, default_value = "sim_obs.csv", help = "Output CSV file")]
        output: PathBuf,

        #[arg(long, default_value_t = 9, help = "Number of observations")]
        count: usize,

        #[arg(long, help = "Add Gaussian noise with the configured sigmas")]
        noise: bool,

        #[arg(long, default_value_t = 1, help = "Noise seed")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    env::verify().context("numeric environment check failed")?;
    let config = load_config(cli.config.as_deref())?;
    info!(backend = backend_name(), "simdloc starting");

    match cli.command {
        Commands::Run {
            observations,
            mode,
            seed,
            window,
            sweep,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.runtime.mode = mode;
            }
            if let Some(seed) = seed {
                config.particles.seed = seed;
            }
            run(&config, &observations, window, sweep)
        }
        Commands::Compare { observations } => compare(&config, &observations),
        Commands::Accuracy { kernel, stride } => {
            let kernels = match kernel {
                Some(kernel) => vec![kernel],
                None => Kernel::ALL.to_vec(),
            };
            for kernel in kernels {
                info!(%kernel, stride, "auditing kernel");
                println!("{}\n", kernel.audit(stride));
            }
            Ok(())
        }
        Commands::Simulate {
            output,
            count,
            noise,
            seed,
        } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let observations = synthesize(
                &config.world.robot(),
                &config.world.landmark_points(),
                count,
                noise.then_some(&config.noise),
                &mut rng,
            );
            save_observations(&output, &observations)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("wrote {} observations to {}", observations.len(), output.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FilterConfig> {
    match path {
        Some(path) => FilterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(FilterConfig::default()),
    }
}

fn run(config: &FilterConfig, path: &Path, window: Option<usize>, sweep: bool) -> Result<()> {
    let observations = load_observations(path, config.world.landmarks.len())
        .with_context(|| format!("failed to load observations from {}", path.display()))?;
    let mut filter = ParticleFilter::new(config, &observations)?;

    let total = observations.len();
    let size = window.unwrap_or(total);
    let first = if sweep { 1 } else { size };
    let actual = filter.actual_pose();

    for s in first..=size.max(first) {
        *filter.window_mut() = ObservationWindow::new(0, s, total);
        let pose = filter.run();
        println!(
            "window {} ({} mode, {:.1} fps)",
            filter.window(),
            filter.mode(),
            filter.last_fps()
        );
        println!("{pose}");
        println!("error vs actual:\n{}\n", pose - actual);
    }

    let visible = filter
        .weighted_particles(SimilarityView::DistanceAndBearing)
        .iter()
        .filter(|(_, w)| *w >= PARTICLE_WEIGHT_THRESHOLD)
        .count();
    println!(
        "{visible} of {} particles above weight {PARTICLE_WEIGHT_THRESHOLD}",
        filter.particles().len()
    );
    Ok(())
}

fn compare(config: &FilterConfig, path: &Path) -> Result<()> {
    let observations = load_observations(path, config.world.landmarks.len())
        .with_context(|| format!("failed to load observations from {}", path.display()))?;
    let mut filter = ParticleFilter::new(config, &observations)?;

    let total = observations.len();
    let size = config.runtime.comparison_window.min(total / 2);
    *filter.window_mut() = ObservationWindow::new(0, size, total);

    let report = filter.compare_modes();
    println!("{report}");
    if report.nan_count != 0 {
        anyhow::bail!("{} particles produced NaN differences", report.nan_count);
    }
    Ok(())
}
