use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::suspend_gate::SuspendGate;
use super::PolicyKind;

/// One retired job, as reported at shutdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    pub process_id: i32,
    pub processor: usize,
    pub policy: PolicyKind,
    pub priority: i8,
    pub burst_consumed: i64,
    pub dispatches: u32,
    pub memory_footprint: i64,
}

/// Cross-thread state of a single run, shared by the supervisor, the
/// workers and the aging loops.
pub(crate) struct RunState {
    num_processors: usize,
    num_jobs: usize,
    memory_used: AtomicI64,
    complete: AtomicBool,
    gate: Arc<SuspendGate>,
    completed: Mutex<Vec<CompletedJob>>,
}

impl RunState {
    pub fn new(num_processors: usize, num_jobs: usize) -> RunState {
        RunState {
            num_processors,
            num_jobs,
            memory_used: AtomicI64::new(0),
            complete: AtomicBool::new(false),
            gate: Arc::new(SuspendGate::new()),
            completed: Mutex::new(Vec::with_capacity(num_jobs)),
        }
    }

    pub fn get_num_processors(&self) -> usize {
        self.num_processors
    }

    pub fn get_num_jobs(&self) -> usize {
        self.num_jobs
    }

    pub fn gate(&self) -> &Arc<SuspendGate> {
        &self.gate
    }

    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Returns false if completion had already been declared.
    pub fn declare_complete(&self) -> bool {
        !self.complete.swap(true, Ordering::AcqRel)
    }

    pub fn record_completion(&self, job: CompletedJob) {
        self.memory_used.fetch_add(job.memory_footprint, Ordering::AcqRel);
        self.completed.lock().unwrap().push(job);
    }

    pub fn get_memory_used(&self) -> i64 {
        self.memory_used.load(Ordering::Acquire)
    }

    pub fn take_completed(&self) -> Vec<CompletedJob> {
        std::mem::take(&mut *self.completed.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(process_id: i32, memory_footprint: i64) -> CompletedJob {
        CompletedJob {
            process_id,
            processor: 0,
            policy: PolicyKind::Fcfs,
            priority: 0,
            burst_consumed: 10,
            dispatches: 1,
            memory_footprint,
        }
    }

    #[test]
    fn test_run_state_completion_is_declared_once() {
        let run_state = RunState::new(2, 0);
        assert!(!run_state.is_complete());
        assert!(run_state.declare_complete());
        assert!(!run_state.declare_complete());
        assert!(run_state.is_complete());
    }

    #[test]
    fn test_run_state_accumulates_memory() {
        let run_state = RunState::new(1, 2);
        run_state.record_completion(completed(1, 64));
        run_state.record_completion(completed(2, 36));

        assert_eq!(run_state.get_memory_used(), 100);
        assert_eq!(run_state.take_completed().len(), 2);
        assert!(run_state.take_completed().is_empty());
    }
}
