//! Store identity and knowledge base injected into every prompt

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Static facts about the repair shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub hours: String,
    /// Services the shop does not take on
    #[serde(default)]
    pub not_covered: Vec<String>,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: "Mobile klinik".to_string(),
            address: "1100 Boul maloney Ouest".to_string(),
            phone: "(555) 123-4567".to_string(),
            website: "www.mobileklinik.com".to_string(),
            hours: "Mon-wed 10AM-6PM, Thu 10AM-9PM, Fri 10AM-9PM, Sat 10AM-6PM, Sun 10AM-5PM"
                .to_string(),
            not_covered: vec![
                "Water damage repair".to_string(),
                "iPhone charger port repair".to_string(),
            ],
        }
    }
}

impl StoreInfo {
    /// Load overrides from a YAML file, falling back to the built-in data
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Render the store block for system prompts
    pub fn knowledge_block(&self) -> String {
        let mut block = format!(
            "STORE INFORMATION:\n\
             - Name: {}\n\
             - Address: {}\n\
             - Phone: {}\n\
             - Website: {}\n\
             - Hours: {}\n",
            self.name, self.address, self.phone, self.website, self.hours
        );
        if !self.not_covered.is_empty() {
            block.push_str("- Not covered: ");
            block.push_str(&self.not_covered.join(", "));
            block.push('\n');
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_info() {
        let info = StoreInfo::default();
        assert_eq!(info.name, "Mobile klinik");
        assert!(info.hours.contains("Sun 10AM-5PM"));
    }

    #[test]
    fn test_knowledge_block_mentions_exclusions() {
        let block = StoreInfo::default().knowledge_block();
        assert!(block.contains("1100 Boul maloney Ouest"));
        assert!(block.contains("Water damage repair"));
    }

    #[test]
    fn test_missing_yaml_file_errors() {
        let result = StoreInfo::from_yaml_file("/nonexistent/store.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
