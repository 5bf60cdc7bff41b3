//! Objection-handling guidance injected into prompts when customers push back

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// One objection pattern and the suggested counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectionEntry {
    /// What the objection sounds like
    pub trigger: String,
    /// How to respond
    pub guidance: String,
}

/// Guide the analyzer and composer draw on when a customer hesitates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectionGuide {
    pub entries: Vec<ObjectionEntry>,
}

impl Default for ObjectionGuide {
    fn default() -> Self {
        Self {
            entries: vec![
                ObjectionEntry {
                    trigger: "Price is too high".to_string(),
                    guidance: "Mention the current promotion: new Telus or Koodo customers get \
                               $200 off any repair, and plans start at $30/month."
                        .to_string(),
                },
                ObjectionEntry {
                    trigger: "Thinking about buying a new phone instead".to_string(),
                    guidance: "A repair is far cheaper than a new device and is done the same \
                               day. Offer the quote again and the promotion if eligible."
                        .to_string(),
                },
                ObjectionEntry {
                    trigger: "Not sure about the repair quality".to_string(),
                    guidance: "All repairs are done in-store by certified technicians and come \
                               with a warranty."
                        .to_string(),
                },
            ],
        }
    }
}

impl ObjectionGuide {
    /// Load overrides from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Render the guide block for prompts
    pub fn prompt_block(&self) -> String {
        let mut block = String::from("OBJECTION HANDLING:\n");
        for entry in &self.entries {
            block.push_str(&format!("- If \"{}\": {}\n", entry.trigger, entry.guidance));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_guide_has_promotion() {
        let guide = ObjectionGuide::default();
        let block = guide.prompt_block();
        assert!(block.contains("$200 off"));
        assert!(block.contains("$30/month"));
    }
}
