//! Repair price table and deterministic quote lookup

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// One (service, model) price point in CAD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub service: String,
    pub model: String,
    pub price: u32,
}

impl PriceEntry {
    fn new(service: &str, model: &str, price: u32) -> Self {
        Self {
            service: service.to_string(),
            model: model.to_string(),
            price,
        }
    }
}

/// The full price table. Lookup is deterministic: no model call is ever
/// involved in producing a quote figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceList {
    pub entries: Vec<PriceEntry>,
}

pub const SERVICE_SCREEN: &str = "screen repair";
pub const SERVICE_BATTERY: &str = "battery replacement";
pub const SERVICE_CHARGER_PORT: &str = "charger port repair";

impl Default for PriceList {
    fn default() -> Self {
        let mut entries = Vec::new();
        for (model, price) in [
            ("iphone 8", 119),
            ("iphone 11", 139),
            ("iphone 12", 149),
            ("iphone 13", 159),
            ("iphone 14", 199),
            ("s20", 249),
            ("s21", 249),
            ("s22", 249),
            ("s23", 289),
            ("a51", 199),
            ("a52", 219),
        ] {
            entries.push(PriceEntry::new(SERVICE_SCREEN, model, price));
        }
        for (model, price) in [
            ("iphone 8", 59),
            ("iphone 11", 99),
            ("iphone 12", 99),
            ("iphone 13", 129),
            ("iphone 14", 149),
            ("s20", 149),
            ("s21", 149),
            ("s22", 149),
            ("s23", 199),
            ("a51", 129),
            ("a52", 149),
        ] {
            entries.push(PriceEntry::new(SERVICE_BATTERY, model, price));
        }
        // iPhone charger ports are not serviced, so only Samsung entries exist
        for model in ["s20", "s21", "s22", "s23", "a51", "a52"] {
            entries.push(PriceEntry::new(SERVICE_CHARGER_PORT, model, 139));
        }
        Self { entries }
    }
}

impl PriceList {
    /// Load overrides from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Map a free-text issue description onto a canonical service
    pub fn service_for_issue(issue: &str) -> Option<&'static str> {
        let issue = issue.to_lowercase();
        if issue.contains("screen") {
            Some(SERVICE_SCREEN)
        } else if issue.contains("battery") {
            Some(SERVICE_BATTERY)
        } else if issue.contains("charg") {
            Some(SERVICE_CHARGER_PORT)
        } else {
            None
        }
    }

    /// Price for a given model/issue pair, if the table covers it
    pub fn lookup(&self, model: &str, issue: &str) -> Option<u32> {
        let service = Self::service_for_issue(issue)?;
        let model = normalize_model(model);
        self.entries
            .iter()
            .find(|e| e.service == service && (model == e.model || model.ends_with(&e.model)))
            .map(|e| e.price)
    }

    /// Quote text for prompts: "$159" or "Price not available"
    pub fn quote_line(&self, model: &str, issue: &str) -> String {
        match self.lookup(model, issue) {
            Some(price) => format!("${price}"),
            None => "Price not available".to_string(),
        }
    }
}

fn normalize_model(model: &str) -> String {
    model
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iphone_13_screen_price() {
        let prices = PriceList::default();
        assert_eq!(prices.lookup("Iphone 13", "screen repair"), Some(159));
        assert_eq!(prices.quote_line("Iphone 13", "screen repair"), "$159");
    }

    #[test]
    fn test_samsung_prefix_tolerated() {
        let prices = PriceList::default();
        assert_eq!(prices.lookup("Samsung Galaxy S21", "cracked screen"), Some(249));
        assert_eq!(prices.lookup("galaxy a52", "battery dying"), Some(149));
    }

    #[test]
    fn test_uncovered_combinations() {
        let prices = PriceList::default();
        // iPhone charger ports are not serviced
        assert_eq!(prices.lookup("Iphone 12", "charging port broken"), None);
        assert_eq!(
            prices.quote_line("Iphone 12", "water damage"),
            "Price not available"
        );
        assert_eq!(prices.lookup("Pixel 7", "screen repair"), None);
    }

    #[test]
    fn test_service_for_issue_mapping() {
        assert_eq!(
            PriceList::service_for_issue("Screen is cracked"),
            Some(SERVICE_SCREEN)
        );
        assert_eq!(
            PriceList::service_for_issue("won't charge"),
            Some(SERVICE_CHARGER_PORT)
        );
        assert_eq!(PriceList::service_for_issue("speaker buzzing"), None);
    }
}
