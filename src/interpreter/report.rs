//! The `REPORT` side channel.
//!
//! Modeled the way `fuel-vm::interpreter::log` accumulates [`LogEvent`]s
//! mid-execution, except a report is delivered synchronously to an
//! installed sink rather than appended to an in-VM log: the sink is the
//! capability a submitter installs before handing a job to the worker (see
//! [`crate::executor`]), and the connection handler is the one that turns
//! these into the response array spec.md §4.2 describes.
//!
//! [`LogEvent`]: https://docs.rs/fuel-vm (teacher's analogous accumulator)

use serde_json::{Map, Value as Json};

use crate::opcode::RegisterId;
use crate::value::Value;

/// A single `REPORT` event: the chosen registers' integer values at the
/// moment the opcode executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    entries: Vec<(RegisterId, i64)>,
}

impl ReportEvent {
    pub fn build(regs: &[RegisterId], registers: &[Value]) -> Self {
        let entries = regs
            .iter()
            .filter_map(|&r| registers.get(r).map(|v| (r, v.as_int())))
            .collect();
        ReportEvent { entries }
    }

    /// Render as the JSON object spec.md §3 describes: register index
    /// (stringified, since JSON object keys are strings) mapped to its
    /// integer value.
    pub fn to_json(&self) -> Json {
        let mut map = Map::with_capacity(self.entries.len());
        for (reg, value) in &self.entries {
            map.insert(reg.to_string(), Json::from(*value));
        }
        Json::Object(map)
    }
}

/// A sink installed on the interpreter to receive report events as they're
/// emitted. `None` is a valid, no-op sink.
pub type ReportSink = Box<dyn FnMut(ReportEvent) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_keys_current_integer_values() {
        let registers = vec![Value::Int(42), Value::Str("x".into()), Value::Empty];
        let event = ReportEvent::build(&[0, 1, 2], &registers);
        let json = event.to_json();
        assert_eq!(json["0"], 42);
        assert_eq!(json["1"], 0);
        assert_eq!(json["2"], 0);
    }

    #[test]
    fn out_of_range_register_is_dropped_not_erroring() {
        let registers = vec![Value::Int(1)];
        let event = ReportEvent::build(&[0, 7], &registers);
        assert_eq!(event.entries.len(), 1);
    }
}
