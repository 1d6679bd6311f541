use std::time::Duration;

/// One simulated time unit. Every default below is expressed in ticks.
pub const TICK: Duration = Duration::from_millis(100);

/// Delay granted to a step whose burst is zero or negative.
const MIN_STEP_DELAY: Duration = Duration::from_micros(1);

/// Clock and policy constants shared by every loop of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Wall-clock cost of one burst unit.
    pub burst_unit: Duration,
    /// Round-robin time slice, in burst units.
    pub quantum: u32,
    pub aging_interval: Duration,
    pub aging_step: i8,
    pub poll_interval: Duration,
    pub idle_backoff: Duration,
    /// Donors at or below this backlog are left alone.
    pub balance_threshold: usize,
}

impl Default for Timing {
    fn default() -> Timing {
        Timing {
            burst_unit: TICK / 10,
            quantum: 20,
            aging_interval: TICK * 20,
            aging_step: 1,
            poll_interval: TICK * 2,
            idle_backoff: TICK,
            balance_threshold: 5,
        }
    }
}

impl Timing {
    /// Elapsed time simulated for consuming `burst` units.
    pub fn execution_delay(&self, burst: i32) -> Duration {
        let units = burst.max(1) as u32;
        (self.burst_unit * units).max(MIN_STEP_DELAY)
    }

    /// Microsecond clocks for exercising whole runs in tests.
    #[cfg(test)]
    pub fn fast() -> Timing {
        Timing {
            burst_unit: Duration::from_micros(20),
            aging_interval: Duration::from_micros(500),
            poll_interval: Duration::from_micros(200),
            idle_backoff: Duration::from_micros(100),
            ..Timing::default()
        }
    }
}
