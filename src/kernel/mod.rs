mod aging;
mod cpu;
mod load_balancer;
mod long_term_scheduler;
mod pcb_queue;
mod process_control_block;
mod processor;
mod run_state;
mod short_term_scheduler;
mod suspend_gate;
mod timing;

use pcb_queue::PcbQueue;
use process_control_block::Job;

pub mod driver;

pub use driver::{Driver, RunReport};
pub use process_control_block::{ProcessControlBlock, PCB_SIZE};
pub use run_state::CompletedJob;
pub use short_term_scheduler::PolicyKind;
pub use timing::Timing;
