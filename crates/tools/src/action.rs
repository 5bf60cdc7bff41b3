//! Closed set of tool actions the model may invoke

use serde::{Deserialize, Serialize};

use sms_agent_core::UpdateFields;

use crate::ToolError;

/// Callback urgency as declared by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

/// Input for scheduleAppointment
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub phone: String,
    #[serde(rename = "phoneModel")]
    pub phone_model: String,
    pub issue: String,
    #[serde(rename = "preferredTime")]
    pub preferred_time: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Input for stopConvo
#[derive(Debug, Clone, Deserialize)]
pub struct StopRequest {
    pub phone: String,
    pub reason: String,
}

/// Input for requestHumanCallback
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRequest {
    pub phone: String,
    pub urgency: Urgency,
    pub reason: String,
}

/// Input for updateInfo
#[derive(Debug, Clone, Deserialize)]
pub struct InfoUpdate {
    pub phone: String,
    pub updates: UpdateFields,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Input for updateAppointment
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub phone: String,
    #[serde(rename = "newTime")]
    pub new_time: String,
    #[serde(rename = "appointmentId", default)]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Every tool the model can call. Parsing is the only way in, so the
/// dispatcher match is exhaustive by construction.
#[derive(Debug, Clone)]
pub enum ToolAction {
    ScheduleAppointment(ScheduleRequest),
    StopConversation(StopRequest),
    RequestHumanCallback(CallbackRequest),
    UpdateInfo(InfoUpdate),
    UpdateAppointment(UpdateAppointmentRequest),
}

impl ToolAction {
    /// Parse a wire-level tool call into a typed action
    pub fn parse(name: &str, input: serde_json::Value) -> Result<Self, ToolError> {
        let invalid = |message: serde_json::Error| ToolError::InvalidInput {
            tool: name.to_string(),
            message: message.to_string(),
        };
        match name {
            "scheduleAppointment" => Ok(ToolAction::ScheduleAppointment(
                serde_json::from_value(input).map_err(invalid)?,
            )),
            "stopConvo" => Ok(ToolAction::StopConversation(
                serde_json::from_value(input).map_err(invalid)?,
            )),
            "requestHumanCallback" => Ok(ToolAction::RequestHumanCallback(
                serde_json::from_value(input).map_err(invalid)?,
            )),
            "updateInfo" => Ok(ToolAction::UpdateInfo(
                serde_json::from_value(input).map_err(invalid)?,
            )),
            "updateAppointment" => Ok(ToolAction::UpdateAppointment(
                serde_json::from_value(input).map_err(invalid)?,
            )),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// Wire name of this action
    pub fn name(&self) -> &'static str {
        match self {
            ToolAction::ScheduleAppointment(_) => "scheduleAppointment",
            ToolAction::StopConversation(_) => "stopConvo",
            ToolAction::RequestHumanCallback(_) => "requestHumanCallback",
            ToolAction::UpdateInfo(_) => "updateInfo",
            ToolAction::UpdateAppointment(_) => "updateAppointment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedule_appointment() {
        let action = ToolAction::parse(
            "scheduleAppointment",
            serde_json::json!({
                "phone": "5145550000",
                "phoneModel": "Iphone 13",
                "issue": "screen repair",
                "preferredTime": "tomorrow 2pm"
            }),
        )
        .unwrap();
        match action {
            ToolAction::ScheduleAppointment(req) => {
                assert_eq!(req.phone_model, "Iphone 13");
                assert_eq!(req.preferred_time, "tomorrow 2pm");
                assert!(req.location.is_none());
            }
            other => panic!("wrong action: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        let result = ToolAction::parse("deleteEverything", serde_json::json!({}));
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "deleteEverything"));
    }

    #[test]
    fn test_parse_missing_required_field() {
        let result = ToolAction::parse(
            "requestHumanCallback",
            serde_json::json!({"phone": "5145550000", "urgency": "high"}),
        );
        assert!(matches!(result, Err(ToolError::InvalidInput { .. })));
    }

    #[test]
    fn test_parse_urgency_values() {
        for (raw, expected) in [
            ("low", Urgency::Low),
            ("medium", Urgency::Medium),
            ("high", Urgency::High),
        ] {
            let action = ToolAction::parse(
                "requestHumanCallback",
                serde_json::json!({"phone": "5145550000", "urgency": raw, "reason": "complex"}),
            )
            .unwrap();
            match action {
                ToolAction::RequestHumanCallback(req) => assert_eq!(req.urgency, expected),
                other => panic!("wrong action: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_update_info_partial_fields() {
        let action = ToolAction::parse(
            "updateInfo",
            serde_json::json!({
                "phone": "5145550000",
                "updates": {"phoneModel": "Iphone 14"}
            }),
        )
        .unwrap();
        match action {
            ToolAction::UpdateInfo(req) => {
                assert_eq!(req.updates.phone_model.as_deref(), Some("Iphone 14"));
                assert!(req.updates.name.is_none());
            }
            other => panic!("wrong action: {:?}", other),
        }
    }
}
