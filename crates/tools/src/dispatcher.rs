//! Tool dispatcher
//!
//! Executes parsed tool actions against the store. Failures never escape as
//! errors; every call produces a [`ToolOutcome`] the model can read back,
//! including for tool names outside the closed set.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{info, warn};

use sms_agent_core::{Appointment, AppointmentStatus};
use sms_agent_persistence::{normalize_phone, MessageStore};

use crate::action::{
    CallbackRequest, InfoUpdate, ScheduleRequest, StopRequest, ToolAction, UpdateAppointmentRequest,
};
use crate::outcome::ToolOutcome;

const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(5);

fn appointment_id() -> String {
    format!("APT-{}", Utc::now().timestamp_millis())
}

fn callback_id() -> String {
    format!("CB-{}", Utc::now().timestamp_millis())
}

/// Dispatches tool calls against the message store
pub struct ToolDispatcher {
    store: Arc<dyn MessageStore>,
    /// Idempotency ledger: (phone, preferred time) to the appointment id
    /// already booked for that slot. A retried scheduleAppointment returns
    /// the existing booking instead of creating a second one.
    booked: DashMap<(String, String), String>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            booked: DashMap::new(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dispatch a wire-level tool call. Unknown names and malformed inputs
    /// come back as failed outcomes, not errors.
    pub async fn dispatch(&self, name: &str, input: serde_json::Value) -> ToolOutcome {
        let action = match ToolAction::parse(name, input) {
            Ok(action) => action,
            Err(crate::ToolError::UnknownTool(_)) => {
                warn!(tool = name, "Model requested a tool outside the set");
                return ToolOutcome::fail("Unknown tool");
            }
            Err(err) => {
                warn!(tool = name, error = %err, "Rejected tool input");
                return ToolOutcome::fail(err.to_string());
            }
        };

        match tokio::time::timeout(self.timeout, self.execute(action)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(tool = name, "Tool execution timed out");
                ToolOutcome::fail("Tool execution timed out")
            }
        }
    }

    async fn execute(&self, action: ToolAction) -> ToolOutcome {
        let name = action.name();
        let outcome = match action {
            ToolAction::ScheduleAppointment(req) => self.schedule_appointment(req).await,
            ToolAction::StopConversation(req) => self.stop_conversation(req).await,
            ToolAction::RequestHumanCallback(req) => self.request_callback(req).await,
            ToolAction::UpdateInfo(req) => self.update_info(req).await,
            ToolAction::UpdateAppointment(req) => self.update_appointment(req).await,
        };
        info!(tool = name, success = outcome.success, "Tool dispatched");
        outcome
    }

    async fn schedule_appointment(&self, req: ScheduleRequest) -> ToolOutcome {
        let key = (normalize_phone(&req.phone), req.preferred_time.clone());

        // Retried call for the same slot returns the existing booking
        if let Some(existing) = self.booked.get(&key) {
            let mut outcome = ToolOutcome::ok("Appointment successfully scheduled")
                .with_field("appointment_id", existing.value().clone())
                .with_field("scheduled_time", req.preferred_time);
            if let Some(location) = req.location {
                outcome = outcome.with_field("location", location);
            }
            return outcome;
        }

        let id = appointment_id();
        let appointment = Appointment::confirmed(&id, &req.preferred_time);
        if let Err(err) = self.store.set_appointment(&req.phone, appointment).await {
            return ToolOutcome::fail(err.to_string());
        }
        self.booked.insert(key, id.clone());

        let mut outcome = ToolOutcome::ok("Appointment successfully scheduled")
            .with_field("appointment_id", id)
            .with_field("scheduled_time", req.preferred_time);
        if let Some(location) = req.location {
            outcome = outcome.with_field("location", location);
        }
        outcome
    }

    async fn stop_conversation(&self, req: StopRequest) -> ToolOutcome {
        info!(
            phone = %normalize_phone(&req.phone),
            reason = %req.reason,
            "Conversation stop requested"
        );
        ToolOutcome::ok("Conversation marked as completed").with_field("reason", req.reason)
    }

    async fn request_callback(&self, req: CallbackRequest) -> ToolOutcome {
        info!(
            phone = %normalize_phone(&req.phone),
            urgency = req.urgency.as_str(),
            reason = %req.reason,
            "Human callback requested"
        );
        ToolOutcome::ok("Callback request registered")
            .with_field("callback_id", callback_id())
            .with_field("urgency", req.urgency.as_str())
    }

    async fn update_info(&self, req: InfoUpdate) -> ToolOutcome {
        if req.updates.is_empty() {
            return ToolOutcome::fail("No fields to update");
        }
        if let Err(err) = self.store.update_profile(&req.phone, &req.updates).await {
            return ToolOutcome::fail(err.to_string());
        }
        let fields: Vec<serde_json::Value> = req
            .updates
            .field_names()
            .into_iter()
            .map(|f| serde_json::Value::String(f.to_string()))
            .collect();
        ToolOutcome::ok("Customer information updated successfully")
            .with_field("updated_fields", fields)
            .with_field("customer_phone", normalize_phone(&req.phone))
    }

    async fn update_appointment(&self, req: UpdateAppointmentRequest) -> ToolOutcome {
        let id = req.appointment_id.unwrap_or_else(appointment_id);
        let appointment = Appointment {
            id: id.clone(),
            scheduled_time: req.new_time.clone(),
            status: AppointmentStatus::Rescheduled,
            booked_at: Utc::now(),
        };
        if let Err(err) = self.store.set_appointment(&req.phone, appointment).await {
            return ToolOutcome::fail(err.to_string());
        }
        ToolOutcome::ok("Appointment successfully updated")
            .with_field("new_time", req.new_time)
            .with_field("customer_phone", normalize_phone(&req.phone))
            .with_field("appointment_id", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_agent_persistence::InMemoryStore;

    fn dispatcher() -> (Arc<InMemoryStore>, ToolDispatcher) {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = ToolDispatcher::new(store.clone());
        (store, dispatcher)
    }

    #[tokio::test]
    async fn test_schedule_appointment_outcome() {
        let (store, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch(
                "scheduleAppointment",
                serde_json::json!({
                    "phone": "5145550000",
                    "phoneModel": "Iphone 13",
                    "issue": "screen repair",
                    "preferredTime": "tomorrow 2pm"
                }),
            )
            .await;

        assert!(outcome.success);
        let json = outcome.as_result_json();
        let id = json["appointment_id"].as_str().unwrap();
        assert!(id.starts_with("APT-"));
        assert!(id["APT-".len()..].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(json["scheduled_time"], "tomorrow 2pm");

        let profile = store.profile("5145550000").await.unwrap().unwrap();
        assert_eq!(profile.appointment.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_schedule_echoes_requested_location() {
        let (_, dispatcher) = dispatcher();
        let input = serde_json::json!({
            "phone": "5145550000",
            "phoneModel": "Iphone 13",
            "issue": "screen repair",
            "preferredTime": "tomorrow 2pm",
            "location": "downtown branch"
        });
        let first = dispatcher
            .dispatch("scheduleAppointment", input.clone())
            .await;
        let retry = dispatcher.dispatch("scheduleAppointment", input).await;

        assert!(first.success);
        assert_eq!(first.as_result_json()["location"], "downtown branch");
        // Replayed booking carries the location too
        assert_eq!(retry.as_result_json()["location"], "downtown branch");
    }

    #[tokio::test]
    async fn test_schedule_retry_does_not_double_book() {
        let (_, dispatcher) = dispatcher();
        let input = serde_json::json!({
            "phone": "5145550000",
            "phoneModel": "Iphone 13",
            "issue": "screen repair",
            "preferredTime": "tomorrow 2pm"
        });
        let first = dispatcher
            .dispatch("scheduleAppointment", input.clone())
            .await;
        let second = dispatcher.dispatch("scheduleAppointment", input).await;

        assert!(first.success && second.success);
        assert_eq!(
            first.as_result_json()["appointment_id"],
            second.as_result_json()["appointment_id"]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_failed_outcome() {
        let (_, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch("formatHardDrive", serde_json::json!({}))
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.as_result_json()["error"], "Unknown tool");
    }

    #[tokio::test]
    async fn test_update_info_patches_profile() {
        let (store, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch(
                "updateInfo",
                serde_json::json!({
                    "phone": "5145550000",
                    "updates": {"phoneModel": "Iphone 14", "issue": "battery replacement"}
                }),
            )
            .await;

        assert!(outcome.success);
        let json = outcome.as_result_json();
        let fields = json["updated_fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);

        let profile = store.profile("5145550000").await.unwrap().unwrap();
        assert_eq!(profile.phone_model.as_deref(), Some("Iphone 14"));
        assert_eq!(profile.issue.as_deref(), Some("battery replacement"));
    }

    #[tokio::test]
    async fn test_stop_convo_echoes_reason() {
        let (_, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch(
                "stopConvo",
                serde_json::json!({"phone": "5145550000", "reason": "not interested"}),
            )
            .await;

        assert!(outcome.success);
        let json = outcome.as_result_json();
        assert_eq!(json["reason"], "not interested");
        assert_eq!(json["message"], "Conversation marked as completed");
    }

    #[tokio::test]
    async fn test_callback_request_has_id_and_urgency() {
        let (_, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch(
                "requestHumanCallback",
                serde_json::json!({
                    "phone": "5145550000",
                    "urgency": "high",
                    "reason": "insurance question"
                }),
            )
            .await;

        assert!(outcome.success);
        let json = outcome.as_result_json();
        assert!(json["callback_id"].as_str().unwrap().starts_with("CB-"));
        assert_eq!(json["urgency"], "high");
    }

    #[tokio::test]
    async fn test_update_appointment_without_id_creates_one() {
        let (store, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch(
                "updateAppointment",
                serde_json::json!({"phone": "5145550000", "newTime": "friday 4pm"}),
            )
            .await;

        assert!(outcome.success);
        let json = outcome.as_result_json();
        assert!(json["appointment_id"].as_str().unwrap().starts_with("APT-"));
        assert_eq!(json["new_time"], "friday 4pm");

        let profile = store.profile("5145550000").await.unwrap().unwrap();
        let appointment = profile.appointment.unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Rescheduled);
        assert_eq!(appointment.scheduled_time, "friday 4pm");
    }

    #[tokio::test]
    async fn test_malformed_input_fails_without_panicking() {
        let (_, dispatcher) = dispatcher();
        let outcome = dispatcher
            .dispatch("stopConvo", serde_json::json!({"phone": "5145550000"}))
            .await;
        assert!(!outcome.success);
    }
}
