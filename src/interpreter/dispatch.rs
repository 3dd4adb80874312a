//! Per-opcode semantics.
//!
//! The only structural validation the interpreter performs is "are all of
//! this instruction's register indices addressable" — exactly what
//! `original_source/state_machine.c`'s `reg_valid` guards before touching
//! `vm->regs[]`. An addressable register holding the "wrong" value for an
//! operand (an integer where a path string was wanted, or simply `Empty`)
//! is not a second validation layer; it's the "invalid or null input"
//! case spec.md §4.1 says yields a `false`/empty result without aborting,
//! handled by [`Value`]'s own lenient `as_str`/`as_int`/`is_truthy`
//! conversions.

use std::ops::ControlFlow;

use crate::fs_ops;
use crate::opcode::{reg_valid, Instruction, Literal, RegisterId};
use crate::value::Value;

use super::report::ReportEvent;
use super::Interpreter;

/// The empty string, used wherever spec.md says a string-producing opcode
/// yields "empty" on failure.
const EMPTY_STR: &str = "";

impl Interpreter {
    fn get(&self, reg: RegisterId) -> &Value {
        &self.registers[reg]
    }

    fn set(&mut self, reg: RegisterId, value: Value) {
        self.registers[reg] = value;
    }

    fn str_at(&self, reg: RegisterId) -> String {
        self.get(reg).as_str().unwrap_or(EMPTY_STR).to_string()
    }

    fn int_at(&self, reg: RegisterId) -> i64 {
        self.get(reg).as_int()
    }

    /// Execute one instruction. `Break(v)` means `RETURN v` fired;
    /// `Continue(())` means keep going.
    pub(super) fn exec_one(&mut self, instr: &Instruction) -> ControlFlow<i64> {
        use Instruction::*;

        match *instr {
            LoadConst { dest, ref value } => {
                if reg_valid(dest) {
                    self.set(
                        dest,
                        match value {
                            Literal::Int(v) => Value::Int(*v),
                            Literal::Str(s) => Value::Str(s.clone()),
                        },
                    );
                }
            }

            FsCreate { dest, path, ty } => {
                if all_valid(&[dest, path, ty]) {
                    let ok = fs_ops::create(&self.str_at(path), &self.str_at(ty));
                    self.set(dest, Value::bool(ok));
                }
            }
            FsDelete { dest, path } => {
                if all_valid(&[dest, path]) {
                    let ok = fs_ops::delete(&self.str_at(path));
                    self.set(dest, Value::bool(ok));
                }
            }
            FsCopy { dest, src, dst } => {
                if all_valid(&[dest, src, dst]) {
                    let ok = fs_ops::copy(&self.str_at(src), &self.str_at(dst));
                    self.set(dest, Value::bool(ok));
                }
            }
            FsMove { dest, src, dst } => {
                if all_valid(&[dest, src, dst]) {
                    let ok = fs_ops::mv(&self.str_at(src), &self.str_at(dst));
                    self.set(dest, Value::bool(ok));
                }
            }
            FsWrite {
                dest,
                path,
                content,
                mode,
            } => {
                if all_valid(&[dest, path, content, mode]) {
                    let ok = fs_ops::write(&self.str_at(path), &self.str_at(content), &self.str_at(mode));
                    self.set(dest, Value::bool(ok));
                }
            }
            FsRead { dest, path } => {
                if all_valid(&[dest, path]) {
                    let contents = fs_ops::read(&self.str_at(path)).unwrap_or_default();
                    self.set(dest, Value::Str(contents));
                }
            }
            FsUnpack { dest, tar_path } => {
                if all_valid(&[dest, tar_path]) {
                    fs_ops::unpack(&self.str_at(tar_path), &self.str_at(dest));
                }
            }
            FsHash { dest, path } => {
                if all_valid(&[dest, path]) {
                    let digest = fs_ops::hash(&self.str_at(path)).unwrap_or_default();
                    self.set(dest, Value::Str(digest));
                }
            }
            FsList { dest, path } => {
                if all_valid(&[dest, path]) {
                    let listing = fs_ops::list(&self.str_at(path)).unwrap_or_default();
                    self.set(dest, Value::Str(listing));
                }
            }

            Eq { dest, lhs, rhs } => {
                if all_valid(&[dest, lhs, rhs]) {
                    let eq = self.get(lhs) == self.get(rhs);
                    self.set(dest, Value::bool(eq));
                }
            }
            Not { dest, src } => {
                if all_valid(&[dest, src]) {
                    let negated = !self.get(src).is_truthy();
                    self.set(dest, Value::bool(negated));
                }
            }
            And { dest, lhs, rhs } => {
                if all_valid(&[dest, lhs, rhs]) {
                    let v = self.get(lhs).is_truthy() && self.get(rhs).is_truthy();
                    self.set(dest, Value::bool(v));
                }
            }
            Or { dest, lhs, rhs } => {
                if all_valid(&[dest, lhs, rhs]) {
                    let v = self.get(lhs).is_truthy() || self.get(rhs).is_truthy();
                    self.set(dest, Value::bool(v));
                }
            }

            IndexSelect { dest, list, index } => {
                if all_valid(&[dest, list, index]) {
                    let list = self.str_at(list);
                    let idx = self.int_at(index);
                    let selected = usize::try_from(idx)
                        .ok()
                        .and_then(|idx| list.lines().nth(idx))
                        .unwrap_or(EMPTY_STR);
                    self.set(dest, Value::Str(selected.to_string()));
                }
            }
            RandomRange { dest, min, max } => {
                if all_valid(&[dest, min, max]) {
                    let (lo, hi) = {
                        let a = self.int_at(min);
                        let b = self.int_at(max);
                        if a <= b {
                            (a, b)
                        } else {
                            (b, a)
                        }
                    };
                    let sampled = if lo == hi {
                        lo
                    } else {
                        use rand::Rng as _;
                        self.rng.gen_range(lo..=hi)
                    };
                    self.set(dest, Value::Int(sampled));
                }
            }
            PathJoin { dest, base, name } => {
                if all_valid(&[dest, base, name]) {
                    let joined = fs_ops::path_join(&self.str_at(base), &self.str_at(name));
                    self.set(dest, Value::Str(joined));
                }
            }
            RandomWalk { dest, root, depth } => {
                if all_valid(&[dest, root, depth]) {
                    let root = self.str_at(root);
                    let depth = self.int_at(depth);
                    let end = fs_ops::random_walk(&root, depth, &mut self.rng);
                    self.set(dest, Value::Str(end));
                }
            }
            DirContains { dest, a, b } => {
                if all_valid(&[dest, a, b]) {
                    let ok = fs_ops::dir_contains(&self.str_at(a), &self.str_at(b));
                    self.set(dest, Value::bool(ok));
                }
            }
            RandSeed { seed } => {
                self.rng.reseed(seed);
            }

            Report { ref regs } => {
                let event = ReportEvent::build(regs, &self.registers);
                if let Some(sink) = self.report_sink.as_mut() {
                    sink(event);
                }
            }
            Return { value } => return ControlFlow::Break(value),
        }

        ControlFlow::Continue(())
    }
}

fn all_valid(regs: &[RegisterId]) -> bool {
    regs.iter().copied().all(reg_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{Completion, Interpreter};
    use crate::opcode::Instruction;

    fn run(program: Vec<Instruction>) -> Interpreter {
        let mut vm = Interpreter::new();
        vm.run(&program);
        vm
    }

    #[test]
    fn out_of_range_operand_is_a_true_no_op() {
        let with_bad_op = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(1),
            },
            Instruction::Not { dest: 99, src: 0 },
        ]);
        let without_bad_op = run(vec![Instruction::LoadConst {
            dest: 0,
            value: Literal::Int(1),
        }]);
        assert_eq!(with_bad_op.registers(), without_bad_op.registers());
    }

    #[test]
    fn eq_is_reflexive() {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Str("x".into()),
            },
            Instruction::Eq {
                dest: 1,
                lhs: 0,
                rhs: 0,
            },
        ]);
        assert_eq!(vm.registers()[1], Value::Int(1));
    }

    #[test]
    fn not_twice_is_truthiness_of_source() {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(5),
            },
            Instruction::Not { dest: 1, src: 0 },
            Instruction::Not { dest: 1, src: 1 },
        ]);
        assert_eq!(vm.registers()[1].as_int(), 1);
    }

    #[test]
    fn index_select_out_of_range_is_empty() {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Str("a\nb".into()),
            },
            Instruction::LoadConst {
                dest: 1,
                value: Literal::Int(5),
            },
            Instruction::IndexSelect {
                dest: 2,
                list: 0,
                index: 1,
            },
        ]);
        assert_eq!(vm.registers()[2], Value::Str(String::new()));
    }

    #[test]
    fn random_range_swaps_inverted_bounds() {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(10),
            },
            Instruction::LoadConst {
                dest: 1,
                value: Literal::Int(1),
            },
            Instruction::RandSeed { seed: 42 },
            Instruction::RandomRange {
                dest: 2,
                min: 0,
                max: 1,
            },
        ]);
        let sampled = vm.registers()[2].as_int();
        assert!((1..=10).contains(&sampled));
    }

    #[test]
    fn random_range_deterministic_given_seed() {
        let program = |out: RegisterId| {
            vec![
                Instruction::LoadConst {
                    dest: 0,
                    value: Literal::Int(0),
                },
                Instruction::LoadConst {
                    dest: 1,
                    value: Literal::Int(1_000_000),
                },
                Instruction::RandSeed { seed: 7 },
                Instruction::RandomRange {
                    dest: out,
                    min: 0,
                    max: 1,
                },
            ]
        };
        let a = run(program(2));
        let b = run(program(2));
        assert_eq!(a.registers()[2], b.registers()[2]);
    }
}

// Universally-quantified invariants from spec.md §8, in the style of
// `fuel-vm`'s own `#[quickcheck]` properties in `checked_transaction.rs`
// (one property per function, `TestResult::discard()` to skip
// inapplicable inputs rather than filtering in the generator).
#[cfg(test)]
mod properties {
    use super::*;
    use crate::interpreter::{Completion, Interpreter};
    use crate::opcode::{Instruction, Literal};
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn run(program: Vec<Instruction>) -> Interpreter {
        let mut vm = Interpreter::new();
        vm.run(&program);
        vm
    }

    #[quickcheck]
    fn return_always_completes_with_its_value(value: i64) -> bool {
        let mut vm = Interpreter::new();
        vm.run(&[Instruction::Return { value }]) == Completion::ReturnedExplicitly(value)
    }

    #[quickcheck]
    fn falling_off_the_end_always_completes_with_zero(a: i64, b: i64) -> bool {
        let mut vm = Interpreter::new();
        let completion = vm.run(&[
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(a),
            },
            Instruction::LoadConst {
                dest: 1,
                value: Literal::Int(b),
            },
        ]);
        completion.value() == 0
    }

    #[quickcheck]
    fn out_of_range_operand_never_changes_observable_state(seed: i64, bad_reg: usize) -> TestResult {
        if reg_valid(bad_reg) {
            return TestResult::discard();
        }
        let setup = vec![Instruction::LoadConst {
            dest: 0,
            value: Literal::Int(seed),
        }];
        let baseline = run(setup.clone());
        let mut with_bad_op = setup;
        with_bad_op.push(Instruction::Not { dest: bad_reg, src: 0 });
        let perturbed = run(with_bad_op);
        TestResult::from_bool(baseline.registers() == perturbed.registers())
    }

    #[quickcheck]
    fn eq_is_reflexive_for_any_int(value: i64) -> bool {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(value),
            },
            Instruction::Eq {
                dest: 1,
                lhs: 0,
                rhs: 0,
            },
        ]);
        vm.registers()[1] == Value::Int(1)
    }

    #[quickcheck]
    fn not_twice_restores_truthiness(value: i64) -> bool {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(value),
            },
            Instruction::Not { dest: 1, src: 0 },
            Instruction::Not { dest: 1, src: 1 },
        ]);
        vm.registers()[1].is_truthy() == (value != 0)
    }

    #[quickcheck]
    fn random_range_is_always_within_its_bounds(a: i64, b: i64, seed: u64) -> bool {
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Int(a),
            },
            Instruction::LoadConst {
                dest: 1,
                value: Literal::Int(b),
            },
            Instruction::RandSeed { seed: seed as i64 },
            Instruction::RandomRange {
                dest: 2,
                min: 0,
                max: 1,
            },
        ]);
        let sampled = vm.registers()[2].as_int();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        sampled >= lo && sampled <= hi
    }

    #[quickcheck]
    fn path_join_always_inserts_exactly_one_separator(base: String, extra_slashes: u8, name: String) -> TestResult {
        if base.is_empty() || base.contains('/') || name.is_empty() || name.contains('/') {
            return TestResult::discard();
        }
        let padded_base = format!("{base}{}", "/".repeat((extra_slashes % 4) as usize));
        let joined = crate::fs_ops::path_join(&padded_base, &name);
        TestResult::from_bool(joined == format!("{base}/{name}"))
    }

    #[quickcheck]
    fn index_select_returns_the_nth_line_when_in_range(lines: Vec<String>, idx: usize) -> TestResult {
        if lines.is_empty() || lines.iter().any(|l| l.contains('\n')) {
            return TestResult::discard();
        }
        let idx = idx % lines.len();
        let vm = run(vec![
            Instruction::LoadConst {
                dest: 0,
                value: Literal::Str(lines.join("\n")),
            },
            Instruction::LoadConst {
                dest: 1,
                value: Literal::Int(idx as i64),
            },
            Instruction::IndexSelect {
                dest: 2,
                list: 0,
                index: 1,
            },
        ]);
        TestResult::from_bool(vm.registers()[2] == Value::Str(lines[idx].clone()))
    }
}
