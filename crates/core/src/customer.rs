//! Customer profile and appointment records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the store knows about a lead before and during the conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
}

impl CustomerProfile {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phone_model(mut self, model: impl Into<String>) -> Self {
        self.phone_model = Some(model.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    /// Display name for prompts, "there" if unknown
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("there")
    }

    pub fn display_model(&self) -> &str {
        self.phone_model.as_deref().unwrap_or("phone")
    }

    pub fn display_issue(&self) -> &str {
        self.issue.as_deref().unwrap_or("repair")
    }

    /// Apply a partial update, overwriting only the fields present
    pub fn apply(&mut self, updates: &UpdateFields) {
        if let Some(name) = &updates.name {
            self.name = Some(name.clone());
        }
        if let Some(model) = &updates.phone_model {
            self.phone_model = Some(model.clone());
        }
        if let Some(issue) = &updates.issue {
            self.issue = Some(issue.clone());
        }
    }
}

/// Partial profile update as carried by the updateInfo tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "phoneModel", skip_serializing_if = "Option::is_none")]
    pub phone_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

impl UpdateFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_model.is_none() && self.issue.is_none()
    }

    /// Names of the fields present, in tool-payload spelling
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.name.is_some() {
            names.push("name");
        }
        if self.phone_model.is_some() {
            names.push("phoneModel");
        }
        if self.issue.is_some() {
            names.push("issue");
        }
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Rescheduled,
    Cancelled,
}

/// A booked repair appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub scheduled_time: String,
    pub status: AppointmentStatus,
    pub booked_at: DateTime<Utc>,
}

impl Appointment {
    pub fn confirmed(id: impl Into<String>, scheduled_time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheduled_time: scheduled_time.into(),
            status: AppointmentStatus::Confirmed,
            booked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_builder() {
        let profile = CustomerProfile::new("+15145550000")
            .with_name("John")
            .with_phone_model("Iphone 13")
            .with_issue("screen repair");
        assert_eq!(profile.display_name(), "John");
        assert_eq!(profile.display_model(), "Iphone 13");
        assert_eq!(profile.display_issue(), "screen repair");
    }

    #[test]
    fn test_display_defaults() {
        let profile = CustomerProfile::new("+15145550000");
        assert_eq!(profile.display_name(), "there");
        assert_eq!(profile.display_model(), "phone");
    }

    #[test]
    fn test_apply_partial_update() {
        let mut profile = CustomerProfile::new("+15145550000")
            .with_name("John")
            .with_phone_model("Iphone 12");
        let updates = UpdateFields {
            phone_model: Some("Iphone 13".to_string()),
            ..Default::default()
        };
        profile.apply(&updates);
        assert_eq!(profile.phone_model.as_deref(), Some("Iphone 13"));
        assert_eq!(profile.name.as_deref(), Some("John"));
        assert_eq!(updates.field_names(), vec!["phoneModel"]);
    }
}
