use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use log::{debug, info, trace};

use super::processor::{Backlog, Processor};
use super::run_state::{CompletedJob, RunState};
use super::suspend_gate::GateParticipant;
use super::{Job, Timing};

use crate::error::ConfigError;

/// Scheduling discipline named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Sjf,
    RoundRobin,
    Priority,
    Fcfs,
}

impl PolicyKind {
    pub fn tag(&self) -> &'static str {
        match self {
            PolicyKind::Sjf => "sjf",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::Priority => "pr",
            PolicyKind::Fcfs => "fcfs",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<PolicyKind, ConfigError> {
        match tag {
            "sjf" => Ok(PolicyKind::Sjf),
            "rr" => Ok(PolicyKind::RoundRobin),
            "pr" => Ok(PolicyKind::Priority),
            "fcfs" => Ok(PolicyKind::Fcfs),
            _ => Err(ConfigError::UnknownPolicy(tag.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

/// A processor's discipline, carrying only the state it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchedulingPolicy {
    ShortestJobFirst,
    RoundRobin { quantum: u32 },
    Priority,
    FirstComeFirstServed,
}

/// What a worker does with a job after one simulated step.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Requeue,
    Retire,
}

impl SchedulingPolicy {
    pub fn new(kind: PolicyKind, timing: &Timing) -> SchedulingPolicy {
        match kind {
            PolicyKind::Sjf => SchedulingPolicy::ShortestJobFirst,
            PolicyKind::RoundRobin => SchedulingPolicy::RoundRobin {
                quantum: timing.quantum,
            },
            PolicyKind::Priority => SchedulingPolicy::Priority,
            PolicyKind::Fcfs => SchedulingPolicy::FirstComeFirstServed,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            SchedulingPolicy::ShortestJobFirst => PolicyKind::Sjf,
            SchedulingPolicy::RoundRobin { .. } => PolicyKind::RoundRobin,
            SchedulingPolicy::Priority => PolicyKind::Priority,
            SchedulingPolicy::FirstComeFirstServed => PolicyKind::Fcfs,
        }
    }

    /// One-time ordering applied before the first dispatch. Jobs that arrive
    /// later through load balancing are not re-sorted.
    fn prepare(&self, backlog: &mut Backlog) {
        match self {
            SchedulingPolicy::ShortestJobFirst => backlog.queue.sort_by_burst(),
            SchedulingPolicy::Priority => backlog.queue.sort_by_priority(),
            SchedulingPolicy::RoundRobin { .. } | SchedulingPolicy::FirstComeFirstServed => {}
        }
    }

    /// Consumes work from `job` and returns the time that work takes.
    fn step(&self, job: &mut Job, timing: &Timing) -> (Duration, Step) {
        let burst = job.pcb.burst_time;

        if let SchedulingPolicy::RoundRobin { quantum } = *self {
            let quantum = quantum as i32;
            if burst > quantum {
                job.pcb.burst_time -= quantum;
                return (timing.execution_delay(quantum), Step::Requeue);
            }
        }

        job.pcb.burst_time = 0;
        (timing.execution_delay(burst), Step::Retire)
    }

    /// Drains `processor` until the run is declared complete.
    pub fn run(
        &self,
        processor: &Processor,
        run_state: &RunState,
        participant: &GateParticipant,
        timing: &Timing,
    ) {
        let index = processor.get_index();
        self.prepare(&mut processor.lock());
        debug!("cpu {}: running {}", index, self.kind());

        while !run_state.is_complete() {
            participant.observe();

            let Some(mut job) = processor.dispatch() else {
                trace!("cpu {}: queue empty, backing off", index);
                thread::sleep(timing.idle_backoff);
                continue;
            };

            let (delay, step) = self.step(&mut job, timing);
            thread::sleep(delay);

            match step {
                Step::Requeue => {
                    trace!(
                        "cpu {}: pid {} preempted, {} burst left",
                        index,
                        job.get_id(),
                        job.pcb.burst_time
                    );
                    processor.requeue(job);
                }
                Step::Retire => {
                    let completed = CompletedJob {
                        process_id: job.get_id(),
                        processor: index,
                        policy: self.kind(),
                        priority: job.pcb.priority,
                        burst_consumed: job.get_original_burst().max(0) as i64,
                        dispatches: job.get_dispatches(),
                        memory_footprint: job.pcb.get_memory_footprint(),
                    };
                    info!(
                        "cpu {} [{}]: pid {} finished, burst {} over {} dispatch(es)",
                        index,
                        completed.policy,
                        completed.process_id,
                        completed.burst_consumed,
                        completed.dispatches
                    );
                    run_state.record_completion(completed);
                    processor.retire();
                }
            }
        }

        debug!("cpu {}: completion observed, exiting", index);
    }
}
