use super::{Job, PcbQueue, ProcessControlBlock};

/// Absorbs float error when a weighted share lands just below an integer.
const SHARE_EPSILON: f64 = 1e-9;

/// Splits the loaded job stream into per-processor backlogs according to
/// each processor's load fraction.
pub(crate) struct LongTermScheduler {
    weights: Vec<f64>,
}

impl LongTermScheduler {
    pub fn new(weights: Vec<f64>) -> LongTermScheduler {
        LongTermScheduler { weights }
    }

    /// Exclusive end index of each processor's slice of `num_jobs` jobs.
    /// Cuts are cumulative and monotonic; the last one is always `num_jobs`.
    pub fn boundaries(&self, num_jobs: usize) -> Vec<usize> {
        let mut cuts = Vec::with_capacity(self.weights.len());
        let mut cumulative = 0.0;
        let mut previous = 0;

        for weight in &self.weights {
            cumulative += weight;
            let cut = ((cumulative * num_jobs as f64) + SHARE_EPSILON).floor() as usize;
            let cut = cut.clamp(previous, num_jobs);
            cuts.push(cut);
            previous = cut;
        }

        if let Some(last) = cuts.last_mut() {
            *last = num_jobs;
        }

        cuts
    }

    /// Hands jobs out in stream order: processor 0 gets the first slice,
    /// processor 1 the next, and so on.
    pub fn distribute(&self, pcbs: Vec<ProcessControlBlock>) -> Vec<PcbQueue> {
        let cuts = self.boundaries(pcbs.len());
        let mut pcbs = pcbs.into_iter();
        let mut start = 0;

        cuts.into_iter()
            .map(|end| {
                let queue: PcbQueue = pcbs.by_ref().take(end - start).map(Job::new).collect();
                start = end;
                queue
            })
            .collect()
    }
}
