//! Instruction representation for the recipe interpreter.

use crate::consts::REGISTER_COUNT;

/// A register index. Valid range is `[0, REGISTER_COUNT)`; operands outside
/// that range are rejected at parse time (see [`crate::wire::recipe`]).
pub type RegisterId = usize;

/// Returns `true` if `idx` names an addressable register.
pub const fn reg_valid(idx: RegisterId) -> bool {
    idx < REGISTER_COUNT
}

/// An inline literal carried by `LOAD_CONST`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// String literal, duplicated into register ownership on load.
    Str(String),
}

/// One parsed recipe instruction.
///
/// Operand fields are register indices unless documented otherwise. The
/// instruction list is an ordered, finite sequence (spec.md models it as a
/// linked list); we store it as a `Vec` since that's an equivalent
/// representation and is what every consumer (the interpreter, the wire
/// codec) wants to index and iterate over.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Store a literal into `dest`.
    LoadConst { dest: RegisterId, value: Literal },

    /// Create a file (`type` register holds `"file"`) or directory
    /// (`"dir"`) at `path`.
    FsCreate {
        dest: RegisterId,
        path: RegisterId,
        ty: RegisterId,
    },
    /// Delete a file, or recursively delete a directory.
    FsDelete { dest: RegisterId, path: RegisterId },
    /// Copy a file, or recursively copy a directory.
    FsCopy {
        dest: RegisterId,
        src: RegisterId,
        dst: RegisterId,
    },
    /// Rename; falls back to copy-then-delete on a cross-device failure.
    FsMove {
        dest: RegisterId,
        src: RegisterId,
        dst: RegisterId,
    },
    /// Write `content` to `path` using the open-mode string in `mode`
    /// (e.g. `"w"`, `"a"`).
    FsWrite {
        dest: RegisterId,
        path: RegisterId,
        content: RegisterId,
        mode: RegisterId,
    },
    /// Read a file's contents into `dest` as a UTF-8 string.
    FsRead { dest: RegisterId, path: RegisterId },
    /// Extract a tar archive at `tar_path` into the directory named by
    /// `dest`.
    FsUnpack {
        dest: RegisterId,
        tar_path: RegisterId,
    },
    /// Hash a file's contents into a 16-hex-digit digest string.
    FsHash { dest: RegisterId, path: RegisterId },
    /// List a directory's entries (excluding `.`/`..`) as a
    /// newline-separated string.
    FsList { dest: RegisterId, path: RegisterId },

    /// Integer/string equality of two register values.
    Eq {
        dest: RegisterId,
        lhs: RegisterId,
        rhs: RegisterId,
    },
    /// Boolean negation.
    Not { dest: RegisterId, src: RegisterId },
    /// Boolean conjunction.
    And {
        dest: RegisterId,
        lhs: RegisterId,
        rhs: RegisterId,
    },
    /// Boolean disjunction.
    Or {
        dest: RegisterId,
        lhs: RegisterId,
        rhs: RegisterId,
    },

    /// Select the `index`-th newline-delimited segment of `list`.
    IndexSelect {
        dest: RegisterId,
        list: RegisterId,
        index: RegisterId,
    },
    /// Sample an integer uniformly from `[min, max]` (swapped if
    /// `max < min`).
    RandomRange {
        dest: RegisterId,
        min: RegisterId,
        max: RegisterId,
    },
    /// Join `base` and `name` with exactly one `/`.
    PathJoin {
        dest: RegisterId,
        base: RegisterId,
        name: RegisterId,
    },
    /// Starting at `root`, descend into a uniformly chosen subdirectory up
    /// to `depth` times, stopping early when a directory has none.
    RandomWalk {
        dest: RegisterId,
        root: RegisterId,
        depth: RegisterId,
    },
    /// Recursively verify every path under `a` also exists under `b`.
    DirContains {
        dest: RegisterId,
        a: RegisterId,
        b: RegisterId,
    },
    /// Reseed the interpreter's PRNG. Inline operand, not a register.
    RandSeed { seed: i64 },

    /// Emit a report event with the current integer values of `regs`.
    Report { regs: Vec<RegisterId> },
    /// Terminate the job immediately with the given return value. Inline
    /// operand, not a register.
    Return { value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_validity_is_half_open() {
        assert!(reg_valid(0));
        assert!(reg_valid(REGISTER_COUNT - 1));
        assert!(!reg_valid(REGISTER_COUNT));
    }
}
