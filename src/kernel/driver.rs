use std::sync::Arc;
use std::thread;

use log::{error, info};

use super::cpu::CpuThread;
use super::load_balancer::LoadBalancer;
use super::long_term_scheduler::LongTermScheduler;
use super::processor::Processor;
use super::run_state::{CompletedJob, RunState};
use super::{PolicyKind, ProcessControlBlock, Timing};

use crate::error::SimulationError;

/// Holds the virtual processors and supervises them: spawns one worker per
/// processor plus an aging loop per priority processor, balances load
/// until every processor is done, then shuts everything down.
pub struct Driver {
    processors: Vec<Arc<Processor>>,
    run_state: Arc<RunState>,
    timing: Timing,
}

/// What a finished run hands back to the caller.
#[derive(Debug)]
pub struct RunReport {
    pub num_jobs: usize,
    pub memory_used: i64,
    pub completed: Vec<CompletedJob>,
}

impl Driver {
    /// `policies` and `weights` must have one entry per processor.
    pub fn new(
        policies: &[PolicyKind],
        weights: Vec<f64>,
        pcbs: Vec<ProcessControlBlock>,
        timing: Timing,
    ) -> Driver {
        let num_jobs = pcbs.len();
        let queues = LongTermScheduler::new(weights).distribute(pcbs);

        let processors = queues
            .into_iter()
            .zip(policies)
            .enumerate()
            .map(|(index, (queue, &policy))| Arc::new(Processor::new(index, policy, queue)))
            .collect::<Vec<_>>();

        Driver {
            run_state: Arc::new(RunState::new(processors.len(), num_jobs)),
            processors,
            timing,
        }
    }

    /// Each processor's policy and initial load, in pid order.
    pub fn get_loads(&self) -> Vec<(PolicyKind, Vec<ProcessControlBlock>)> {
        self.processors
            .iter()
            .map(|processor| (processor.get_policy(), processor.snapshot_by_pid()))
            .collect()
    }

    pub fn start(self) -> Result<RunReport, SimulationError> {
        info!(
            "starting {} processor(s) with {} job(s)",
            self.run_state.get_num_processors(),
            self.run_state.get_num_jobs()
        );

        let mut threads = Vec::new();
        let spawned = self.spawn_threads(&mut threads);

        let outcome = match spawned {
            Ok(()) => self.supervise(&threads),
            Err(err) => Err(err),
        };

        // Releases every loop, whether or not supervision succeeded.
        self.run_state.declare_complete();

        let mut first_error = outcome.err();
        for thread in threads {
            if let Err(err) = thread.join() {
                error!("{}", err);
                first_error.get_or_insert(err);
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let report = RunReport {
            num_jobs: self.run_state.get_num_jobs(),
            memory_used: self.run_state.get_memory_used(),
            completed: self.run_state.take_completed(),
        };
        info!(
            "all threads joined, {} job(s) retired, memory used {}",
            report.completed.len(),
            report.memory_used
        );

        Ok(report)
    }

    fn spawn_threads(&self, threads: &mut Vec<CpuThread>) -> Result<(), SimulationError> {
        for processor in &self.processors {
            threads.push(CpuThread::spawn_worker(
                processor.clone(),
                self.run_state.clone(),
                self.timing,
            )?);

            if processor.get_policy() == PolicyKind::Priority {
                threads.push(CpuThread::spawn_aging(
                    processor.clone(),
                    self.run_state.clone(),
                    self.timing,
                )?);
            }
        }

        Ok(())
    }

    /// Polls until every processor is idle with no eligible donor.
    fn supervise(&self, threads: &[CpuThread]) -> Result<(), SimulationError> {
        let balancer = LoadBalancer::new(
            self.processors.clone(),
            self.run_state.gate().clone(),
            self.timing.balance_threshold,
        );
        let num_processors = self.run_state.get_num_processors();

        loop {
            thread::sleep(self.timing.poll_interval);

            // Loops only return after completion, so an early exit is a panic.
            if let Some(dead) = threads.iter().find(|thread| thread.is_finished()) {
                return Err(SimulationError::ThreadPanicked(dead.get_label().to_string()));
            }

            if balancer.poll() == num_processors {
                if self.run_state.declare_complete() {
                    info!("all {} processor(s) finished", num_processors);
                }
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::kernel::process_control_block::test_pcb;

    fn run(policies: &[PolicyKind], weights: Vec<f64>, pcbs: Vec<ProcessControlBlock>) -> RunReport {
        Driver::new(policies, weights, pcbs, Timing::fast()).start().unwrap()
    }

    fn expected_memory(pcbs: &[ProcessControlBlock]) -> i64 {
        pcbs.iter().map(ProcessControlBlock::get_memory_footprint).sum()
    }

    fn assert_each_job_retired_once(report: &RunReport, pcbs: &[ProcessControlBlock]) {
        let mut pids: Vec<i32> = report.completed.iter().map(|job| job.process_id).collect();
        pids.sort();
        let mut expected: Vec<i32> = pcbs.iter().map(|pcb| pcb.process_id).collect();
        expected.sort();
        assert_eq!(pids, expected);
    }

    #[test]
    fn test_driver_two_fcfs_processors() {
        let pcbs: Vec<_> = [10, 20, 30, 40]
            .iter()
            .zip(1..)
            .map(|(&burst, id)| test_pcb(id, 0, burst))
            .collect();
        let driver = Driver::new(
            &[PolicyKind::Fcfs, PolicyKind::Fcfs],
            vec![0.5, 0.5],
            pcbs.clone(),
            Timing::fast(),
        );

        let loads: Vec<Vec<i32>> = driver
            .get_loads()
            .into_iter()
            .map(|(_, pcbs)| pcbs.iter().map(|pcb| pcb.process_id).collect())
            .collect();
        assert_eq!(loads, vec![vec![1, 2], vec![3, 4]]);

        let report = driver.start().unwrap();

        assert_eq!(report.num_jobs, 4);
        assert_eq!(report.memory_used, expected_memory(&pcbs));
        assert_each_job_retired_once(&report, &pcbs);
        for job in &report.completed {
            let processor = if job.process_id <= 2 { 0 } else { 1 };
            assert_eq!(job.processor, processor);
            assert_eq!(job.dispatches, 1);
        }
    }

    #[test]
    fn test_driver_single_round_robin_job() {
        let pcbs = vec![test_pcb(1, 0, 45)];
        let report = run(&[PolicyKind::RoundRobin], vec![1.0], pcbs.clone());

        assert_eq!(report.completed.len(), 1);
        let job = &report.completed[0];
        assert_eq!(job.dispatches, 3);
        assert_eq!(job.burst_consumed, 45);
        assert_eq!(report.memory_used, expected_memory(&pcbs));
    }

    #[test]
    fn test_driver_balances_onto_idle_processor() {
        // Everything lands on cpu 1, which must share with the empty cpu 0.
        let pcbs: Vec<_> = (1..=20).map(|id| test_pcb(id, 0, 200)).collect();
        let report = run(
            &[PolicyKind::Fcfs, PolicyKind::Fcfs],
            vec![0.01, 0.99],
            pcbs.clone(),
        );

        assert_each_job_retired_once(&report, &pcbs);
        assert_eq!(report.memory_used, expected_memory(&pcbs));
        assert!(report.completed.iter().any(|job| job.processor == 0));
    }

    #[test]
    fn test_driver_mixed_policies_retire_everything() {
        let pcbs: Vec<_> = (1..=40)
            .map(|id| test_pcb(id, (id % 9) as i8, (id * 7) % 50))
            .collect();
        let report = run(
            &[PolicyKind::Sjf, PolicyKind::RoundRobin, PolicyKind::Priority, PolicyKind::Fcfs],
            vec![0.1, 0.2, 0.3, 0.4],
            pcbs.clone(),
        );

        assert_each_job_retired_once(&report, &pcbs);
        assert_eq!(report.memory_used, expected_memory(&pcbs));

        let by_pid: HashMap<i32, &CompletedJob> =
            report.completed.iter().map(|job| (job.process_id, job)).collect();
        for pcb in &pcbs {
            assert_eq!(by_pid[&pcb.process_id].burst_consumed, pcb.burst_time.max(0) as i64);
        }
    }

    #[test]
    fn test_driver_extreme_registers_do_not_abort_run() {
        let mut pcb = test_pcb(1, 0, 5);
        pcb.base_register = 1;
        pcb.limit_register = i64::MIN;

        let report = run(&[PolicyKind::Fcfs], vec![1.0], vec![pcb]);

        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.completed[0].memory_footprint, i64::MIN);
        assert_eq!(report.memory_used, i64::MIN);
    }

    #[test]
    fn test_driver_no_jobs_terminates() {
        let report = run(&[PolicyKind::Priority, PolicyKind::Sjf], vec![0.5, 0.5], Vec::new());
        assert_eq!(report.num_jobs, 0);
        assert!(report.completed.is_empty());
        assert_eq!(report.memory_used, 0);
    }
}
