//! The response message: report events in execution order, followed by a
//! terminal `{"status": 0}`.

use serde_json::Value as Json;

use crate::interpreter::ReportEvent;
use crate::wire::status::Status;

/// Accumulates report events for one job and renders the final response
/// array. Owned by the connection handler, per spec.md §3's ownership
/// rule for report events.
#[derive(Default)]
pub struct ResponseBuilder {
    events: Vec<Json>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ReportEvent) {
        self.events.push(event.to_json());
    }

    /// Finalize: append the terminal status and render as a JSON array.
    pub fn finish(mut self) -> Json {
        self.events.push(Status::OK.to_json());
        Json::Array(self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn terminal_status_is_appended_last() {
        let mut builder = ResponseBuilder::new();
        builder.push(ReportEvent::build(&[0], &[Value::Int(42)]));
        let response = builder.finish();
        let array = response.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["0"], 42);
        assert_eq!(array[1], serde_json::json!({"status": 0}));
    }
}
