//! A submitted unit of work and its completion slot.
//!
//! Mirrors `original_source/state_machine.c`'s `sm_job` (an instruction
//! chain plus a `next` pointer for the FIFO) and the completion value
//! `sm_wait` blocks on, translated into owned, thread-safe Rust types
//! instead of a hand-rolled linked list and a bare struct field toggled
//! under a lock.

use std::sync::{Arc, Condvar, Mutex};

use crate::interpreter::ReportSink;
use crate::opcode::Instruction;

/// A recipe ready to run, plus the sink that should receive its `REPORT`
/// events while it's running.
pub struct Job {
    pub program: Vec<Instruction>,
    pub report_sink: Option<ReportSink>,
}

struct Inner {
    value: Mutex<Option<i64>>,
    cond: Condvar,
}

/// A per-job completion slot: a place that holds the terminal return value
/// and is signalled exactly once, per spec.md §3.
#[derive(Clone)]
pub struct CompletionSlot {
    inner: Arc<Inner>,
}

impl CompletionSlot {
    pub fn new() -> Self {
        CompletionSlot {
            inner: Arc::new(Inner {
                value: Mutex::new(None),
                cond: Condvar::new(),
            }),
        }
    }

    /// Signal completion with the job's terminal return value. Called
    /// exactly once, by the worker, after the job finishes executing.
    pub fn signal(&self, value: i64) {
        let mut slot = self.inner.value.lock().unwrap();
        *slot = Some(value);
        self.inner.cond.notify_all();
    }

    /// Block until the job completes, then return its return value.
    pub fn wait(&self) -> i64 {
        let mut slot = self.inner.value.lock().unwrap();
        while slot.is_none() {
            slot = self.inner.cond.wait(slot).unwrap();
        }
        slot.expect("just checked Some")
    }
}

impl Default for CompletionSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_blocks_until_signalled() {
        let slot = CompletionSlot::new();
        let signaller = slot.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signaller.signal(42);
        });
        assert_eq!(slot.wait(), 42);
        handle.join().unwrap();
    }
}
