//! The status message: `{"status": <integer>}`.

use serde::Serialize;
use serde_json::Value as Json;

/// `0` means accepted/done; `-1` means rejected.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Status {
    pub status: i32,
}

impl Status {
    pub const OK: Status = Status { status: 0 };
    pub const REJECTED: Status = Status { status: -1 };

    pub fn to_json(self) -> Json {
        serde_json::to_value(self).expect("Status always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_serializes_to_zero() {
        assert_eq!(Status::OK.to_json(), serde_json::json!({"status": 0}));
    }

    #[test]
    fn rejected_serializes_to_minus_one() {
        assert_eq!(Status::REJECTED.to_json(), serde_json::json!({"status": -1}));
    }
}
