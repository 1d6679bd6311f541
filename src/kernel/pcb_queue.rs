use std::collections::VecDeque;

use super::Job;

/// Ordered backlog of jobs owned by one processor.
///
/// No internal locking; the owning `Processor` guards it.
#[derive(Debug, Default)]
pub struct PcbQueue {
    jobs: VecDeque<Job>,
}

impl PcbQueue {
    pub fn new() -> PcbQueue {
        PcbQueue {
            jobs: VecDeque::new(),
        }
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn peek(&self) -> Option<&Job> {
        self.jobs.front()
    }

    pub fn at(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    // All three sorts are stable: equal keys keep their queue order.

    pub fn sort_by_burst(&mut self) {
        self.jobs.make_contiguous().sort_by_key(|job| job.pcb.burst_time);
    }

    pub fn sort_by_priority(&mut self) {
        self.jobs.make_contiguous().sort_by_key(|job| job.pcb.priority);
    }

    pub fn sort_by_pid(&mut self) {
        self.jobs.make_contiguous().sort_by_key(|job| job.pcb.process_id);
    }
}

impl FromIterator<Job> for PcbQueue {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> PcbQueue {
        PcbQueue {
            jobs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PcbQueue {
    type Item = Job;
    type IntoIter = std::collections::vec_deque::IntoIter<Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}
