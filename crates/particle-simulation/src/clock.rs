//! Scaled frame timing

use std::time::Instant;

/// Converts host timestamps into simulation-seconds.
///
/// The baseline is the mount instant, so the first frame sees the (small,
/// non-zero) time elapsed since mount rather than zero. Deltas are taken
/// between instants, never between accumulated float times, so precision does
/// not degrade over a long session.
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,
    scale: f32,
    last: Instant,
}

impl FrameClock {
    pub fn new(mounted_at: Instant, scale: f32) -> Self {
        Self {
            epoch: mounted_at,
            scale,
            last: mounted_at,
        }
    }

    /// Simulation time at `now`, relative to mount.
    pub fn sim_time(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64() * self.scale as f64
    }

    /// Simulation-seconds since the previous tick.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32() * self.scale;
        if now > self.last {
            self.last = now;
        }
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_measures_from_mount() {
        let mount = Instant::now();
        let mut clock = FrameClock::new(mount, 0.4);

        let dt = clock.tick(mount + Duration::from_millis(16));
        assert!((dt - 0.0064).abs() < 1e-6);
    }

    #[test]
    fn test_ticks_are_incremental() {
        let mount = Instant::now();
        let mut clock = FrameClock::new(mount, 0.4);

        clock.tick(mount + Duration::from_millis(100));
        let dt = clock.tick(mount + Duration::from_millis(350));
        assert!((dt - 0.1).abs() < 1e-5);
        assert!((clock.sim_time(mount + Duration::from_secs(1)) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_timestamp_before_mount_saturates() {
        let mount = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new(mount, 0.4);
        assert_eq!(clock.tick(Instant::now()), 0.0);
    }

    #[test]
    fn test_dt_stays_precise_in_long_sessions() {
        let mount = Instant::now();
        let mut clock = FrameClock::new(mount, 0.4);

        for hours in [1u64, 10, 28, 100] {
            let late = mount + Duration::from_secs(hours * 3600);
            clock.tick(late);
            let dt = clock.tick(late + Duration::from_millis(16));
            assert!((dt - 0.0064).abs() < 1e-5, "{hours}h: dt = {dt}");
        }
    }
}
