// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tick-driven autosave timer.

/// Counts host ticks and fires once every `interval_ticks` while enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSave {
    enabled: bool,
    interval_ticks: u32,
    ticks: u32,
}

impl AutoSave {
    /// Create a timer; an interval of zero is treated as one
    pub fn new(enabled: bool, interval_ticks: u32) -> Self {
        Self {
            enabled,
            interval_ticks: interval_ticks.max(1),
            ticks: 0,
        }
    }

    /// Whether the timer is running
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start or stop the timer; stopping also resets it
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.ticks = 0;
        }
    }

    /// Ticks between firings
    pub fn interval_ticks(&self) -> u32 {
        self.interval_ticks
    }

    /// Ticks counted since the last firing
    pub fn elapsed_ticks(&self) -> u32 {
        self.ticks
    }

    /// Restart the count
    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Count one tick; true when the interval has elapsed
    pub fn tick(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.ticks += 1;
        if self.ticks >= self.interval_ticks {
            self.ticks = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_every_interval() {
        let mut timer = AutoSave::new(true, 3);
        let fired: Vec<bool> = (0..7).map(|_| timer.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
        assert_eq!(timer.elapsed_ticks(), 1);
    }

    #[test]
    fn test_disabled_never_fires() {
        let mut timer = AutoSave::new(false, 1);
        assert!((0..10).all(|_| !timer.tick()));

        timer.set_enabled(true);
        assert!(timer.tick());
    }

    #[test]
    fn test_zero_interval() {
        let mut timer = AutoSave::new(true, 0);
        assert_eq!(timer.interval_ticks(), 1);
        assert!(timer.tick());
    }
}
