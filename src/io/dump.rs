use std::fmt;

use crate::kernel::{PolicyKind, ProcessControlBlock, RunReport};

/// Human-readable block for one PCB.
pub struct PcbDump<'a>(pub &'a ProcessControlBlock);

impl fmt::Display for PcbDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pcb = self.0;
        writeln!(f, "Priority:        {}", pcb.priority)?;
        writeln!(f, "Process Name:    {}", pcb.get_name())?;
        writeln!(f, "Process ID:      {}", pcb.process_id)?;
        writeln!(f, "Activity Status: {}", pcb.activity_status)?;
        writeln!(f, "Base Register:   {}", pcb.base_register)?;
        writeln!(f, "Limit Register:  {}", pcb.limit_register)?;
        writeln!(f, "CPU Burst Time:  {}", pcb.burst_time)
    }
}

pub fn print_loads(loads: &[(PolicyKind, Vec<ProcessControlBlock>)]) {
    for (index, (policy, pcbs)) in loads.iter().enumerate() {
        println!("Processor {} ({}), {} job(s):", index, policy, pcbs.len());
        for pcb in pcbs {
            println!("{}", PcbDump(pcb));
        }
        println!("----------------------------------");
    }
}

/// Final stats table, one row per retired job in pid order.
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut completed: Vec<_> = self.completed.iter().collect();
        completed.sort_by_key(|job| job.process_id);

        writeln!(
            f,
            "Stats for {} of {} executed job(s):",
            completed.len(),
            self.num_jobs
        )?;
        writeln!(f, "...  PID | CPU | Policy | Priority | Burst | Dispatches | Memory")?;
        writeln!(f, "...------|-----|--------|----------|-------|------------|-------")?;
        for job in completed {
            writeln!(
                f,
                "... {:>4} | {:>3} | {:<6} | {:>8} | {:>5} | {:>10} | {}",
                job.process_id,
                job.processor,
                job.policy,
                job.priority,
                job.burst_consumed,
                job.dispatches,
                job.memory_footprint
            )?;
        }
        writeln!(f, "Total memory used: {}", self.memory_used)
    }
}
