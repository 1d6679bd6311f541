use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::kernel::{PolicyKind, Timing};

/// Allowed drift of the load fractions' sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Minimum positionals: one processor needs a count, a weight, a policy and a file.
const MIN_POSITIONALS: usize = 4;

/// Simulates N processors draining a PCB file with per-processor
/// scheduling policies and periodic load balancing.
#[derive(Debug, Parser)]
#[command(
    name = "pcb-scheduler",
    override_usage = "pcb-scheduler <N> <proc 1 %> ... <proc N %> <proc 1 type> ... <proc N type> <pcbFile.bin>"
)]
pub struct Cli {
    /// Processor count, N load fractions, N scheduler types (sjf, rr, pr, fcfs), then the PCB file.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub positionals: Vec<String>,

    /// Wall-clock milliseconds per unit of burst time.
    #[arg(long, default_value_t = 10)]
    pub burst_unit_ms: u64,

    /// Round-robin time slice, in burst units.
    #[arg(long, default_value_t = 20)]
    pub quantum: u32,

    /// Delay between aging passes on priority processors.
    #[arg(long, default_value_t = 2000)]
    pub aging_interval_ms: u64,

    /// Priority increment applied per aging pass.
    #[arg(long, default_value_t = 1)]
    pub aging_step: i8,

    /// Load balancer poll period.
    #[arg(long, default_value_t = 200)]
    pub poll_interval_ms: u64,

    /// Donors at or below this many queued jobs are never split.
    #[arg(long, default_value_t = 5)]
    pub balance_threshold: usize,

    /// Copy the PCB file here first and read the copy instead.
    #[arg(long)]
    pub working_copy: Option<PathBuf>,

    /// Print every processor's initial load before starting.
    #[arg(long)]
    pub dump_loads: bool,
}

/// A validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub weights: Vec<f64>,
    pub policies: Vec<PolicyKind>,
    pub pcb_file: PathBuf,
    pub working_copy: Option<PathBuf>,
    pub dump_loads: bool,
    pub timing: Timing,
}

impl SimulationConfig {
    pub fn num_processors(&self) -> usize {
        self.policies.len()
    }
}

impl Cli {
    /// Validates in the same order the checks are listed in the usage:
    /// count, weights, policies, file. The tuning flags come last.
    pub fn into_config(self) -> Result<SimulationConfig, ConfigError> {
        let args = &self.positionals;
        if args.len() < MIN_POSITIONALS {
            return Err(ConfigError::TooFewArguments {
                minimum: MIN_POSITIONALS,
                actual: args.len(),
            });
        }

        let num_processors = match args[0].parse::<i64>() {
            Ok(n) if n >= 1 => n as usize,
            _ => return Err(ConfigError::NoProcessors),
        };

        let expected = num_processors * 2 + 1;
        if args.len() - 1 != expected {
            return Err(ConfigError::ArgumentCount {
                processors: num_processors,
                expected,
                actual: args.len() - 1,
            });
        }

        let weights = parse_weights(&args[1..=num_processors])?;

        let policies = args[num_processors + 1..=num_processors * 2]
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                tag.parse::<PolicyKind>()
                    .map_err(|source| ConfigError::InvalidPolicy {
                        position: num_processors + i + 2,
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pcb_file = PathBuf::from(&args[num_processors * 2 + 1]);
        if !pcb_file.is_file() {
            return Err(ConfigError::MissingFile(pcb_file));
        }
        if pcb_file.extension().and_then(|ext| ext.to_str()) != Some("bin") {
            return Err(ConfigError::WrongExtension(pcb_file));
        }

        if self.quantum == 0 || self.quantum > i32::MAX as u32 {
            return Err(ConfigError::InvalidQuantum(self.quantum));
        }
        if self.aging_step < 1 {
            return Err(ConfigError::InvalidAgingStep(self.aging_step));
        }

        let timing = Timing {
            burst_unit: Duration::from_millis(self.burst_unit_ms),
            quantum: self.quantum,
            aging_interval: Duration::from_millis(self.aging_interval_ms),
            aging_step: self.aging_step,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            balance_threshold: self.balance_threshold,
            ..Timing::default()
        };

        Ok(SimulationConfig {
            weights,
            policies,
            pcb_file,
            working_copy: self.working_copy,
            dump_loads: self.dump_loads,
            timing,
        })
    }
}

/// Every fraction must lie in (0, 1] and together they must make 1.0.
fn parse_weights(args: &[String]) -> Result<Vec<f64>, ConfigError> {
    let weights = args
        .iter()
        .enumerate()
        .map(|(i, arg)| match arg.parse::<f64>() {
            Ok(weight) if weight > 0.0 && weight <= 1.0 => Ok(weight),
            _ => Err(ConfigError::InvalidWeight {
                position: i + 2,
                value: arg.clone(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::WeightSum(total));
    }

    Ok(weights)
}
