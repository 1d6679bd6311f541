use std::sync::Arc;

use log::{debug, info};

use super::processor::Processor;
use super::suspend_gate::SuspendGate;
use super::Job;

/// Outcome of looking at one processor during a poll.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Rebalance {
    /// Still has queued or in-flight work.
    Busy,
    /// Received `moved` jobs from `donor`.
    Transferred { donor: usize, moved: usize },
    /// Idle, and no other processor has enough backlog to share.
    Finished,
}

pub(crate) struct LoadBalancer {
    processors: Vec<Arc<Processor>>,
    gate: Arc<SuspendGate>,
    threshold: usize,
}

impl LoadBalancer {
    pub fn new(processors: Vec<Arc<Processor>>, gate: Arc<SuspendGate>, threshold: usize) -> LoadBalancer {
        LoadBalancer {
            processors,
            gate,
            threshold,
        }
    }

    /// Visits every processor once. Returns how many are finished.
    pub fn poll(&self) -> usize {
        (0..self.processors.len())
            .map(|index| self.rebalance(index))
            .filter(|outcome| *outcome == Rebalance::Finished)
            .count()
    }

    pub fn rebalance(&self, recipient: usize) -> Rebalance {
        if !self.processors[recipient].lock().queue.is_empty() {
            return Rebalance::Busy;
        }

        match self.pick_donor(recipient) {
            Some((donor, backlog)) if backlog > self.threshold => {
                info!("balance: suspending for cpu {} to take from cpu {} ({} queued)", recipient, donor, backlog);
                self.gate.suspend();
                let moved = self.transfer_locked(donor, recipient);
                self.gate.resume();
                info!("balance: resumed after moving {} job(s)", moved);

                match moved {
                    0 => Rebalance::Busy,
                    moved => Rebalance::Transferred { donor, moved },
                }
            }
            _ if self.processors[recipient].lock().is_idle() => Rebalance::Finished,
            _ => Rebalance::Busy,
        }
    }

    /// Most-loaded processor other than `recipient`, with its backlog size.
    /// Ties go to the last one scanned.
    pub fn pick_donor(&self, recipient: usize) -> Option<(usize, usize)> {
        let mut donor = None;
        let mut max = 0;

        for processor in &self.processors {
            let index = processor.get_index();
            if index == recipient {
                continue;
            }

            let backlog = processor.queue_len();
            if backlog >= max {
                max = backlog;
                donor = Some((index, backlog));
            }
        }

        donor
    }

    /// Must only run while the gate is suspended. Sizes are re-read since
    /// workers may have moved on between the donor pick and the suspend.
    fn transfer_locked(&self, donor: usize, recipient: usize) -> usize {
        debug_assert!(self.gate.is_suspended());

        if !self.processors[recipient].lock().queue.is_empty() {
            debug!("balance: cpu {} picked up work before transfer, skipping", recipient);
            return 0;
        }

        let moving: Vec<Job> = {
            let mut backlog = self.processors[donor].lock();
            let size = backlog.queue.len();
            if size <= self.threshold {
                return 0;
            }

            // Donor keeps floor(size / 2).
            let count = size - size / 2;
            (0..count).filter_map(|_| backlog.queue.pop()).collect()
        };

        let moved = moving.len();
        let mut backlog = self.processors[recipient].lock();
        for job in moving {
            backlog.queue.push(job);
        }

        info!("balance: moved {} job(s) from cpu {} to cpu {}", moved, donor, recipient);
        moved
    }
}
