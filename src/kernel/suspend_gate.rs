use std::sync::{Arc, Condvar, Mutex};

/// Global pause barrier between the supervisor and every worker/aging loop.
///
/// `suspend` does not return until every registered participant is parked
/// in `observe`, so the caller owns all queues until `resume`.
pub(crate) struct SuspendGate {
    state: Mutex<GateState>,
    opened: Condvar,
    parked: Condvar,
}

struct GateState {
    closed: bool,
    participants: usize,
    parked: usize,
}

impl SuspendGate {
    pub fn new() -> SuspendGate {
        SuspendGate {
            state: Mutex::new(GateState {
                closed: false,
                participants: 0,
                parked: 0,
            }),
            opened: Condvar::new(),
            parked: Condvar::new(),
        }
    }

    /// Counts the caller in the rendezvous until the guard is dropped.
    pub fn register(self: &Arc<Self>) -> GateParticipant {
        self.state.lock().unwrap().participants += 1;
        GateParticipant { gate: self.clone() }
    }

    pub fn suspend(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;

        while state.parked < state.participants {
            state = self.parked.wait(state).unwrap();
        }
    }

    pub fn resume(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = false;
        self.opened.notify_all();
    }

    /// Parks while the gate is closed; returns at once when it is open.
    pub fn observe(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.closed {
            return;
        }

        state.parked += 1;
        self.parked.notify_all();

        while state.closed {
            state = self.opened.wait(state).unwrap();
        }

        state.parked -= 1;
    }

    pub fn is_suspended(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn deregister(&self) {
        // Runs during unwinding too, so never panic on a poisoned lock here.
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.participants -= 1;
        self.parked.notify_all();
    }
}

pub(crate) struct GateParticipant {
    gate: Arc<SuspendGate>,
}

impl GateParticipant {
    pub fn observe(&self) {
        self.gate.observe();
    }
}

impl Drop for GateParticipant {
    fn drop(&mut self) {
        self.gate.deregister();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_suspend_gate_open_observe_returns() {
        let gate = Arc::new(SuspendGate::new());
        let participant = gate.register();
        participant.observe();
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_suspend_gate_without_participants_does_not_block() {
        let gate = SuspendGate::new();
        gate.suspend();
        assert!(gate.is_suspended());
        gate.resume();
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_suspend_gate_waits_for_every_worker_to_park() {
        let gate = Arc::new(SuspendGate::new());
        let progress = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(std::sync::atomic::AtomicBool::new(true));

        let workers: Vec<_> = (0..3)
            .map(|_| {
                let participant = gate.register();
                let progress = progress.clone();
                let running = running.clone();
                thread::spawn(move || {
                    while running.load(Ordering::Acquire) {
                        participant.observe();
                        progress.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_micros(200));
                    }
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(5));
        gate.suspend();

        // Everyone is parked: no iteration can advance the counter.
        let frozen = progress.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        assert_eq!(progress.load(Ordering::SeqCst), frozen);

        running.store(false, Ordering::Release);
        gate.resume();

        for worker in workers {
            worker.join().unwrap();
        }
        assert!(progress.load(Ordering::SeqCst) > frozen);
    }

    #[test]
    fn test_suspend_gate_dropped_participant_is_not_awaited() {
        let gate = Arc::new(SuspendGate::new());
        let participant = gate.register();

        let handle = thread::spawn(move || {
            let _participant = participant;
            panic!("worker died");
        });
        assert!(handle.join().is_err());

        gate.suspend();
        gate.resume();
    }
}
