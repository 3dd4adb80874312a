//! Recipe decoding: a JSON array of `{"op": ..., "data": ...}` objects into
//! an [`Instruction`] list.
//!
//! Per spec.md §4.2, an unknown `op` or an ill-typed `data` field drops
//! *that* instruction without failing the whole recipe. `serde`'s derived
//! enum deserialization can't express "skip the bad variant, keep the
//! array" — it fails the whole sequence on one bad tag — so this module
//! decodes to an intermediate `Vec<serde_json::Value>` first and converts
//! permissively, per the resolution recorded in DESIGN.md.

use serde_json::Value as Json;

use crate::opcode::{reg_valid, Instruction, Literal, RegisterId};

/// Parse a recipe message. Returns `None` if the top-level value isn't a
/// JSON array (spec.md: "connection closed without reply"); otherwise
/// returns the instructions that parsed, in order, silently dropping ones
/// that didn't.
pub fn parse_recipe(json: &Json) -> Option<Vec<Instruction>> {
    let raw = json.as_array()?;
    Some(
        raw.iter()
            .filter_map(|entry| parse_instruction(entry))
            .collect(),
    )
}

fn parse_instruction(entry: &Json) -> Option<Instruction> {
    let op = entry.get("op")?.as_str()?;
    let data = entry.get("data")?;
    build(op, data)
}

fn reg(data: &Json, field: &str) -> Option<RegisterId> {
    let idx = data.get(field)?.as_i64()?;
    let idx = usize::try_from(idx).ok()?;
    reg_valid(idx).then_some(idx)
}

fn inline_int(data: &Json, field: &str) -> Option<i64> {
    data.get(field)?.as_i64()
}

fn reg_list(data: &Json, field: &str) -> Option<Vec<RegisterId>> {
    let raw = data.get(field)?.as_array()?;
    if raw.is_empty() {
        return None;
    }
    raw.iter()
        .map(|v| {
            let idx = v.as_i64()?;
            let idx = usize::try_from(idx).ok()?;
            reg_valid(idx).then_some(idx)
        })
        .collect()
}

fn literal(data: &Json, field: &str) -> Option<Literal> {
    match data.get(field)? {
        Json::Number(n) => n.as_i64().map(Literal::Int),
        Json::String(s) => Some(Literal::Str(s.clone())),
        _ => None,
    }
}

fn build(op: &str, data: &Json) -> Option<Instruction> {
    use Instruction::*;

    Some(match op {
        "SM_OP_LOAD_CONST" => LoadConst {
            dest: reg(data, "dest")?,
            value: literal(data, "value")?,
        },
        "SM_OP_FS_CREATE" => FsCreate {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
            ty: reg(data, "type")?,
        },
        "SM_OP_FS_DELETE" => FsDelete {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
        },
        "SM_OP_FS_COPY" => FsCopy {
            dest: reg(data, "dest")?,
            src: reg(data, "src")?,
            dst: reg(data, "dst")?,
        },
        "SM_OP_FS_MOVE" => FsMove {
            dest: reg(data, "dest")?,
            src: reg(data, "src")?,
            dst: reg(data, "dst")?,
        },
        "SM_OP_FS_WRITE" => FsWrite {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
            content: reg(data, "content")?,
            mode: reg(data, "mode")?,
        },
        "SM_OP_FS_READ" => FsRead {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
        },
        "SM_OP_FS_UNPACK" => FsUnpack {
            dest: reg(data, "dest")?,
            tar_path: reg(data, "tar_path")?,
        },
        "SM_OP_FS_HASH" => FsHash {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
        },
        "SM_OP_FS_LIST" => FsList {
            dest: reg(data, "dest")?,
            path: reg(data, "path")?,
        },
        "SM_OP_EQ" => Eq {
            dest: reg(data, "dest")?,
            lhs: reg(data, "lhs")?,
            rhs: reg(data, "rhs")?,
        },
        "SM_OP_AND" => And {
            dest: reg(data, "dest")?,
            lhs: reg(data, "lhs")?,
            rhs: reg(data, "rhs")?,
        },
        "SM_OP_OR" => Or {
            dest: reg(data, "dest")?,
            lhs: reg(data, "lhs")?,
            rhs: reg(data, "rhs")?,
        },
        "SM_OP_NOT" => Not {
            dest: reg(data, "dest")?,
            src: reg(data, "src")?,
        },
        "SM_OP_INDEX_SELECT" => IndexSelect {
            dest: reg(data, "dest")?,
            list: reg(data, "list")?,
            index: reg(data, "index")?,
        },
        "SM_OP_RANDOM_RANGE" => RandomRange {
            dest: reg(data, "dest")?,
            min: reg(data, "min")?,
            max: reg(data, "max")?,
        },
        "SM_OP_PATH_JOIN" => PathJoin {
            dest: reg(data, "dest")?,
            base: reg(data, "base")?,
            name: reg(data, "name")?,
        },
        "SM_OP_RANDOM_WALK" => RandomWalk {
            dest: reg(data, "dest")?,
            root: reg(data, "root")?,
            depth: reg(data, "depth")?,
        },
        "SM_OP_DIR_CONTAINS" => DirContains {
            dest: reg(data, "dest")?,
            a: reg(data, "a")?,
            b: reg(data, "b")?,
        },
        "SM_OP_RAND_SEED" => RandSeed {
            seed: inline_int(data, "seed")?,
        },
        "SM_OP_REPORT" => Report {
            regs: reg_list(data, "regs")?,
        },
        "SM_OP_RETURN" => Return {
            value: inline_int(data, "value")?,
        },
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_opcode_is_dropped_not_fatal() {
        let recipe = json!([
            {"op": "SM_OP_NOPE", "data": {}},
            {"op": "SM_OP_RETURN", "data": {"value": 3}},
        ]);
        let parsed = parse_recipe(&recipe).unwrap();
        assert_eq!(parsed, vec![Instruction::Return { value: 3 }]);
    }

    #[test]
    fn ill_typed_instruction_is_dropped() {
        let recipe = json!([
            {"op": "SM_OP_LOAD_CONST", "data": {"dest": "not-an-int", "value": 1}},
            {"op": "SM_OP_RETURN", "data": {"value": 5}},
        ]);
        let parsed = parse_recipe(&recipe).unwrap();
        assert_eq!(parsed, vec![Instruction::Return { value: 5 }]);
    }

    #[test]
    fn out_of_range_register_operand_is_dropped() {
        let recipe = json!([
            {"op": "SM_OP_NOT", "data": {"dest": 0, "src": 99}},
        ]);
        assert_eq!(parse_recipe(&recipe).unwrap(), Vec::new());
    }

    #[test]
    fn non_array_top_level_is_rejected() {
        assert!(parse_recipe(&json!({"op": "SM_OP_RETURN"})).is_none());
    }

    #[test]
    fn load_const_accepts_string_or_int_literal() {
        let recipe = json!([
            {"op": "SM_OP_LOAD_CONST", "data": {"dest": 0, "value": "hi"}},
            {"op": "SM_OP_LOAD_CONST", "data": {"dest": 1, "value": 7}},
        ]);
        let parsed = parse_recipe(&recipe).unwrap();
        assert_eq!(
            parsed,
            vec![
                Instruction::LoadConst {
                    dest: 0,
                    value: Literal::Str("hi".into())
                },
                Instruction::LoadConst {
                    dest: 1,
                    value: Literal::Int(7)
                },
            ]
        );
    }

    #[test]
    fn report_requires_at_least_one_register() {
        let recipe = json!([{"op": "SM_OP_REPORT", "data": {"regs": []}}]);
        assert_eq!(parse_recipe(&recipe).unwrap(), Vec::new());
    }
}
