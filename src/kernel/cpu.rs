use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::processor::Processor;
use super::run_state::RunState;
use super::short_term_scheduler::SchedulingPolicy;
use super::{aging, Timing};

use crate::error::SimulationError;

/// A running thread of the simulation: either a processor's scheduling
/// worker or a priority processor's aging loop.
pub(crate) struct CpuThread {
    label: String,
    handle: JoinHandle<()>,
}

impl CpuThread {
    pub fn spawn_worker(
        processor: Arc<Processor>,
        run_state: Arc<RunState>,
        timing: Timing,
    ) -> Result<CpuThread, SimulationError> {
        let label = format!("cpu-{}", processor.get_index());
        let policy = SchedulingPolicy::new(processor.get_policy(), &timing);

        // Registered before the thread starts so a suspend issued right
        // after spawning already waits for this worker.
        let participant = run_state.gate().register();

        Self::spawn(label, move || {
            policy.run(&processor, &run_state, &participant, &timing);
        })
    }

    pub fn spawn_aging(
        processor: Arc<Processor>,
        run_state: Arc<RunState>,
        timing: Timing,
    ) -> Result<CpuThread, SimulationError> {
        let label = format!("aging-{}", processor.get_index());
        let participant = run_state.gate().register();

        Self::spawn(label, move || {
            aging::run(&processor, &run_state, &participant, &timing);
        })
    }

    fn spawn<F>(label: String, body: F) -> Result<CpuThread, SimulationError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(label.clone())
            .spawn(body)
            .map_err(|source| SimulationError::Spawn {
                label: label.clone(),
                source,
            })?;

        Ok(CpuThread { label, handle })
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    /// True once the thread has returned or unwound.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<(), SimulationError> {
        self.handle
            .join()
            .map_err(|_| SimulationError::ThreadPanicked(self.label))
    }
}
