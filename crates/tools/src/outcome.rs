//! Tool execution outcomes as the model sees them

use serde_json::{json, Map, Value};

/// Result of one dispatched tool call. Both successes and failures are
/// ordinary outcomes; the model receives the JSON form as its tool result.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub success: bool,
    /// Human-readable summary ("Appointment successfully scheduled") on
    /// success, the error text on failure
    pub message: String,
    /// Extra result fields, e.g. appointment_id
    pub detail: Map<String, Value>,
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            detail: Map::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: error.into(),
            detail: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.detail.insert(key.to_string(), value.into());
        self
    }

    /// Wire form appended to the model context.
    /// Success: `{"success":true,"message":...,<detail fields>}`.
    /// Failure: `{"success":false,"error":...}`.
    pub fn as_result_json(&self) -> Value {
        if self.success {
            let mut obj = Map::new();
            obj.insert("success".to_string(), json!(true));
            obj.insert("message".to_string(), json!(self.message));
            for (k, v) in &self.detail {
                obj.insert(k.clone(), v.clone());
            }
            Value::Object(obj)
        } else {
            json!({"success": false, "error": self.message})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json_shape() {
        let outcome = ToolOutcome::ok("Appointment successfully scheduled")
            .with_field("appointment_id", "APT-1700000000000")
            .with_field("scheduled_time", "tomorrow 2pm");
        let json = outcome.as_result_json();
        assert_eq!(json["success"], true);
        assert_eq!(json["appointment_id"], "APT-1700000000000");
        assert_eq!(json["message"], "Appointment successfully scheduled");
    }

    #[test]
    fn test_failure_json_shape() {
        let outcome = ToolOutcome::fail("Unknown tool");
        let json = outcome.as_result_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Unknown tool");
        assert!(json.get("message").is_none());
    }
}
