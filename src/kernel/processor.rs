use std::sync::{Mutex, MutexGuard};

use super::{Job, PcbQueue, PolicyKind, ProcessControlBlock};

/// One virtual processor: its policy and its lock-guarded backlog.
///
/// The backlog mutex is the processor's dedicated lock. The worker, the
/// aging loop (priority processors only) and the supervisor all go through it.
pub(crate) struct Processor {
    index: usize,
    policy: PolicyKind,
    backlog: Mutex<Backlog>,
}

pub(crate) struct Backlog {
    pub queue: PcbQueue,
    /// Pid of the job popped and not yet retired or requeued.
    pub running: Option<i32>,
}

impl Backlog {
    /// Nothing queued and nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.running.is_none()
    }
}

impl Processor {
    pub fn new(index: usize, policy: PolicyKind, queue: PcbQueue) -> Processor {
        Processor {
            index,
            policy,
            backlog: Mutex::new(Backlog {
                queue,
                running: None,
            }),
        }
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn lock(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap()
    }

    pub fn queue_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Pops the front job and marks it in flight under the same lock, so
    /// the supervisor never sees it as neither queued nor running.
    pub fn dispatch(&self) -> Option<Job> {
        let mut backlog = self.lock();
        let mut job = backlog.queue.pop()?;
        job.mark_dispatched();
        backlog.running = Some(job.get_id());
        Some(job)
    }

    /// Copies of the queued PCBs in pid order, for display.
    pub fn snapshot_by_pid(&self) -> Vec<ProcessControlBlock> {
        let mut snapshot: PcbQueue = self
            .lock()
            .queue
            .iter()
            .map(|job| Job::new(job.pcb.clone()))
            .collect();
        snapshot.sort_by_pid();
        snapshot.into_iter().map(|job| job.pcb).collect()
    }

    pub fn requeue(&self, job: Job) {
        let mut backlog = self.lock();
        backlog.running = None;
        backlog.queue.push(job);
    }

    pub fn retire(&self) {
        self.lock().running = None;
    }
}
