use std::thread;

use log::{debug, trace};

use super::processor::{Backlog, Processor};
use super::run_state::RunState;
use super::suspend_gate::GateParticipant;
use super::Timing;

/// Raises the priority value of every queued job by `step`, then re-sorts
/// the queue by priority. Caller holds the processor lock.
pub(crate) fn age_backlog(backlog: &mut Backlog, step: i8) {
    for index in 0..backlog.queue.len() {
        let job = backlog
            .queue
            .at_mut(index)
            .unwrap_or_else(|| panic!("aging index {} past end of queue", index));
        job.pcb.priority = job.pcb.priority.saturating_add(step);
    }

    backlog.queue.sort_by_priority();
}

/// Background aging loop bound to one priority-scheduled processor.
pub(crate) fn run(
    processor: &Processor,
    run_state: &RunState,
    participant: &GateParticipant,
    timing: &Timing,
) {
    let index = processor.get_index();
    let mut cycles = 0u64;

    // Every path through an iteration passes the gate exactly once.
    while !run_state.is_complete() {
        if processor.lock().queue.is_empty() {
            participant.observe();
            thread::sleep(timing.idle_backoff);
            continue;
        }

        thread::sleep(timing.aging_interval);
        participant.observe();

        // May have drained while we slept.
        let mut backlog = processor.lock();
        if backlog.queue.is_empty() {
            continue;
        }
        age_backlog(&mut backlog, timing.aging_step);
        cycles += 1;
        trace!(
            "aging {}: cycle {} aged {} job(s)",
            index,
            cycles,
            backlog.queue.len()
        );
    }

    debug!("aging {}: exiting after {} cycle(s)", index, cycles);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::process_control_block::test_pcb;
    use crate::kernel::{Job, PcbQueue, PolicyKind};

    fn priority_processor(jobs: &[(i32, i8)]) -> Processor {
        let queue: PcbQueue = jobs
            .iter()
            .map(|&(id, priority)| Job::new(test_pcb(id, priority, 10)))
            .collect();
        Processor::new(0, PolicyKind::Priority, queue)
    }

    fn snapshot(processor: &Processor) -> Vec<(i32, i8)> {
        processor
            .lock()
            .queue
            .iter()
            .map(|job| (job.get_id(), job.pcb.priority))
            .collect()
    }

    #[test]
    fn test_aging_raises_every_priority_by_step_per_cycle() {
        let processor = priority_processor(&[(1, 4), (2, 0), (3, 2)]);

        for _ in 0..3 {
            age_backlog(&mut processor.lock(), 2);
        }

        assert_eq!(snapshot(&processor), vec![(2, 6), (3, 8), (1, 10)]);
    }

    #[test]
    fn test_aging_sort_is_stable() {
        let processor = priority_processor(&[(1, 1), (2, 0), (3, 1), (4, 0)]);
        age_backlog(&mut processor.lock(), 1);
        assert_eq!(snapshot(&processor), vec![(2, 1), (4, 1), (1, 2), (3, 2)]);
    }

    #[test]
    fn test_aging_saturates_at_max_priority() {
        let processor = priority_processor(&[(1, i8::MAX - 1)]);
        age_backlog(&mut processor.lock(), 5);
        assert_eq!(snapshot(&processor), vec![(1, i8::MAX)]);
    }

    #[test]
    fn test_aging_loop_exits_on_completion() {
        let processor = priority_processor(&[(1, 3)]);
        let run_state = RunState::new(1, 1);
        let participant = run_state.gate().register();
        let timing = Timing::fast();

        thread::scope(|scope| {
            let handle = scope.spawn(|| run(&processor, &run_state, &participant, &timing));
            thread::sleep(timing.aging_interval * 40);
            run_state.declare_complete();
            handle.join().unwrap();
        });

        let aged = snapshot(&processor);
        assert_eq!(aged.len(), 1);
        assert!(aged[0].1 > 3);
    }
}
