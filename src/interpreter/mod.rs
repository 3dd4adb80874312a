//! The register machine.
//!
//! Mirrors the shape of `fuel-vm::interpreter::Interpreter`: a struct owning
//! the machine state (here, a small fixed register file and a PRNG instead
//! of a byte-addressable memory and balances), with opcode semantics split
//! across submodules rather than one large `match`.

mod dispatch;
mod report;

pub use report::{ReportEvent, ReportSink};

use std::ops::ControlFlow;

use tracing::trace;

use crate::consts::REGISTER_COUNT;
use crate::opcode::Instruction;
use crate::rng::Rng;
use crate::value::Value;

/// How a job's instruction list ended, per spec.md §4.1's job state
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// `RETURN` executed.
    ReturnedExplicitly(i64),
    /// The instruction list ran out without a `RETURN`.
    FellOffEnd,
}

impl Completion {
    /// The integer value a waiter on the job's completion slot observes.
    pub fn value(self) -> i64 {
        match self {
            Completion::ReturnedExplicitly(v) => v,
            Completion::FellOffEnd => 0,
        }
    }
}

/// The interpreter: a fixed-width register file plus the mutable state a
/// few opcodes need (the PRNG) and a report sink installed by the
/// submitter.
///
/// Registers are **not** reset between jobs (spec.md §9 open question 1,
/// resolved in DESIGN.md): the same `Interpreter` runs every job the
/// worker thread dequeues for the lifetime of the daemon.
pub struct Interpreter {
    registers: [Value; REGISTER_COUNT],
    rng: Rng,
    report_sink: Option<ReportSink>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter {
            registers: std::array::from_fn(|_| Value::Empty),
            rng: Rng::default(),
            report_sink: None,
        }
    }
}

impl Interpreter {
    /// A fresh interpreter with all registers empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current register contents, for inspection (e.g. `sm_get_reg` in
    /// `original_source`).
    pub fn registers(&self) -> &[Value] {
        &self.registers
    }

    /// Install (or clear, with `None`) the sink that receives `REPORT`
    /// events. The caller must not mutate this while a job submitted
    /// through [`crate::executor::Executor`] is running.
    pub fn set_report_sink(&mut self, sink: Option<ReportSink>) {
        self.report_sink = sink;
    }

    /// Run an instruction list to completion, per spec.md §4.1/§4.3: every
    /// instruction executes in order; a failing operand check or failing
    /// filesystem primitive is a no-op for that instruction, never an
    /// abort; `RETURN` halts immediately.
    pub fn run(&mut self, program: &[Instruction]) -> Completion {
        for instr in program {
            trace!(?instr, "executing instruction");
            if let ControlFlow::Break(value) = self.exec_one(instr) {
                return Completion::ReturnedExplicitly(value);
            }
        }
        Completion::FellOffEnd
    }
}
