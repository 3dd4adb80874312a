//! The single persistent worker thread and its FIFO submission queue.
//!
//! Mirrors `original_source/state_machine.c`'s `sm_ctx`/`sm_worker`/
//! `sm_thread_start`/`sm_thread_stop`/`sm_submit`: one OS thread owns the
//! register file and runs jobs to completion one at a time, woken by a
//! condition variable on submission or shutdown.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use tracing::{debug, info};

use crate::interpreter::{Interpreter, ReportSink};
use crate::job::{CompletionSlot, Job};
use crate::opcode::Instruction;

struct Queue {
    jobs: VecDeque<(Job, CompletionSlot)>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    not_empty: Condvar,
}

/// A handle to the running worker thread and its submission queue.
pub struct Executor {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

/// A job that has been handed to the worker; call [`SubmittedJob::wait`] to
/// block for its completion value.
pub struct SubmittedJob {
    completion: CompletionSlot,
}

impl SubmittedJob {
    /// Block until the job's completion slot is signalled, per spec.md
    /// §4.4.
    pub fn wait(self) -> i64 {
        self.completion.wait()
    }
}

impl Executor {
    /// Spawn the worker thread and start accepting submissions.
    pub fn start() -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("taskd-worker".into())
            .spawn(move || worker_loop(worker_shared))
            .expect("failed to spawn worker thread");

        Executor {
            shared,
            worker: Some(worker),
        }
    }

    /// Enqueue a job. O(1); returns immediately with a handle the caller
    /// can [`SubmittedJob::wait`] on.
    pub fn submit(&self, program: Vec<Instruction>, report_sink: Option<ReportSink>) -> SubmittedJob {
        let completion = CompletionSlot::new();
        let job = Job { program, report_sink };

        let mut queue = self.shared.queue.lock().unwrap();
        queue.jobs.push_back((job, completion.clone()));
        self.shared.not_empty.notify_one();
        drop(queue);

        SubmittedJob { completion }
    }

    /// Signal the worker to stop after the currently running (and any
    /// already-queued) job finishes, and join it.
    pub fn stop(mut self) {
        let mut queue = self.shared.queue.lock().unwrap();
        queue.shutdown = true;
        self.shared.not_empty.notify_one();
        drop(queue);

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut vm = Interpreter::new();
    info!("worker thread started");

    loop {
        let (job, completion) = {
            let mut queue = shared.queue.lock().unwrap();
            loop {
                if let Some(next) = queue.jobs.pop_front() {
                    break next;
                }
                if queue.shutdown {
                    info!("worker thread shutting down");
                    return;
                }
                queue = shared.not_empty.wait(queue).unwrap();
            }
        };

        vm.set_report_sink(job.report_sink);
        let outcome = vm.run(&job.program);
        vm.set_report_sink(None);
        debug!(?outcome, "job finished");
        completion.signal(outcome.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{Instruction, Literal};
    use std::sync::Mutex as StdMutex;

    #[test]
    fn return_value_reaches_the_waiter() {
        let executor = Executor::start();
        let job = executor.submit(vec![Instruction::Return { value: 7 }], None);
        assert_eq!(job.wait(), 7);
        executor.stop();
    }

    #[test]
    fn falls_off_end_completes_with_zero() {
        let executor = Executor::start();
        let job = executor.submit(
            vec![Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(1),
            }],
            None,
        );
        assert_eq!(job.wait(), 0);
        executor.stop();
    }

    #[test]
    fn jobs_run_in_fifo_order() {
        let executor = Executor::start();
        let order = Arc::new(StdMutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5 {
            let order = Arc::clone(&order);
            let sink: ReportSink = Box::new(move |_event| {
                order.lock().unwrap().push(i);
            });
            handles.push(executor.submit(
                vec![
                    Instruction::Report { regs: vec![0] },
                    Instruction::Return { value: i },
                ],
                Some(sink),
            ));
        }
        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(h.wait(), i as i64);
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        executor.stop();
    }

    #[test]
    fn registers_persist_across_jobs_on_the_same_executor() {
        let executor = Executor::start();
        executor
            .submit(
                vec![Instruction::LoadConst {
                    dest: 0,
                    value: Literal::Int(11),
                }],
                None,
            )
            .wait();

        let seen = Arc::new(StdMutex::new(None));
        let seen2 = Arc::clone(&seen);
        let sink: ReportSink = Box::new(move |event| {
            *seen2.lock().unwrap() = Some(event.to_json());
        });
        executor
            .submit(vec![Instruction::Report { regs: vec![0] }], Some(sink))
            .wait();

        assert_eq!(seen.lock().unwrap().take().unwrap()["0"], 11);
        executor.stop();
    }
}
