// Reuse of execution states across searches on one regex.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::regex_vm::program::Program;
use crate::regex_vm::runner::Runner;

/// Bounded set of idle runners. Neither side ever waits on the lock: a
/// caller that loses the race allocates a fresh runner, and a runner that
/// cannot be returned is dropped.
pub struct RunnerPool {
    idle: Mutex<Vec<Runner>>,
    capacity: usize,
}

impl RunnerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn acquire(&self, prog: &Arc<Program>) -> Runner {
        if let Some(mut idle) = self.idle.try_lock()
            && let Some(runner) = idle.pop()
        {
            return runner;
        }
        debug!("allocating runner for {:?}", prog.pattern);
        Runner::new(Arc::clone(prog))
    }

    pub fn release(&self, runner: Runner) {
        if let Some(mut idle) = self.idle.try_lock()
            && idle.len() < self.capacity
        {
            idle.push(runner);
        }
    }

    /// Runners currently parked in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
