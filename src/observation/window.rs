use std::fmt;
use std::ops::Range;

use tracing::debug;

/// A contiguous slice `[base, base + size)` of a fixed observation sequence.
///
/// Every navigation call re-clamps the window so it never reaches past the
/// sequence. A window over a non-empty sequence always holds at least one
/// observation; over an empty sequence it is `(0, 0, 0)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObservationWindow {
    base: usize,
    size: usize,
    total: usize,
}

impl ObservationWindow {
    /// Creates a window, clamping `size` to `[1, total]` and `base` so the
    /// window fits.
    pub fn new(base: usize, size: usize, total: usize) -> Self {
        let mut window = Self { base, size, total };
        window.clamp();
        window
    }

    /// The window the filter starts with: the first observation only.
    pub fn initial(total: usize) -> Self {
        Self::new(0, 1, total)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Index range of the active observations.
    pub fn range(&self) -> Range<usize> {
        self.base..self.base + self.size
    }

    /// Moves the window start forward by one.
    pub fn next(&mut self) {
        self.base += 1;
        self.clamp();
        debug!(window = %self, "observation window advanced");
    }

    /// Moves the window start back by one.
    pub fn prev(&mut self) {
        self.base = self.base.saturating_sub(1);
        self.clamp();
        debug!(window = %self, "observation window retreated");
    }

    /// Adds one observation to the window, shifting it back if it would
    /// run past the end.
    pub fn grow(&mut self) {
        self.size += 1;
        self.clamp();
        debug!(window = %self, "observation window grown");
    }

    /// Drops the last observation from the window, keeping at least one.
    pub fn shrink(&mut self) {
        self.size = self.size.saturating_sub(1);
        self.clamp();
        debug!(window = %self, "observation window shrunk");
    }

    fn clamp(&mut self) {
        self.size = self.size.clamp(self.total.min(1), self.total);
        self.base = self.base.min(self.total - self.size);
    }
}

impl fmt::Display for ObservationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) of {}", self.base, self.base + self.size, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window() {
        let w = ObservationWindow::initial(9);
        assert_eq!((w.base(), w.size(), w.total()), (0, 1, 9));
        assert_eq!(w.range(), 0..1);
    }

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut w = ObservationWindow::initial(4);
        w.prev();
        assert_eq!(w.base(), 0);
    }

    #[test]
    fn test_next_stops_at_end() {
        let mut w = ObservationWindow::new(0, 2, 4);
        for _ in 0..10 {
            w.next();
        }
        assert_eq!(w.range(), 2..4);
    }

    #[test]
    fn test_grow_past_total_shifts_base() {
        let mut w = ObservationWindow::new(3, 1, 4);
        w.grow();
        assert_eq!(w.range(), 2..4);
        for _ in 0..10 {
            w.grow();
        }
        assert_eq!(w.range(), 0..4);
    }

    #[test]
    fn test_shrink_keeps_one() {
        let mut w = ObservationWindow::new(1, 3, 4);
        for _ in 0..10 {
            w.shrink();
        }
        assert_eq!(w.range(), 1..2);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(ObservationWindow::new(10, 0, 4).range(), 3..4);
        assert_eq!(ObservationWindow::new(0, 99, 4).range(), 0..4);
    }

    #[test]
    fn test_empty_sequence() {
        let mut w = ObservationWindow::initial(0);
        w.grow();
        w.next();
        w.shrink();
        w.prev();
        assert_eq!((w.base(), w.size(), w.total()), (0, 0, 0));
        assert!(w.range().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(ObservationWindow::new(1, 2, 5).to_string(), "[1, 3) of 5");
    }
}
