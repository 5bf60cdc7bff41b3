//! Conversation analyzer
//!
//! One model call per turn that reads the whole conversation against the
//! sales flow and produces a single steering instruction for the composer.
//! The instruction shapes phrasing only; stage decisions stay with the
//! deterministic classifier.

use std::sync::Arc;

use tracing::debug;

use sms_agent_core::{ConversationTurn, CustomerProfile, Direction};
use sms_agent_llm::{LlmBackend, LlmError, Message};

const ANALYZER_MAX_TOKENS: u32 = 100;

/// Produces one instruction sentence per turn
pub struct ConversationAnalyzer {
    llm: Arc<dyn LlmBackend>,
}

impl ConversationAnalyzer {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self { llm }
    }

    /// Analyze the conversation and return one steering instruction
    pub async fn analyze(
        &self,
        profile: &CustomerProfile,
        history: &[ConversationTurn],
        latest: &str,
    ) -> Result<String, LlmError> {
        let prompt = build_analysis_prompt(profile, history, latest);
        let messages = [Message::system(prompt), Message::user(latest.to_string())];
        let response = self.llm.complete(&messages, &[], ANALYZER_MAX_TOKENS).await?;

        let instruction = strip_instruction_tags(&response.text);
        if instruction.is_empty() {
            return Err(LlmError::InvalidResponse(
                "analyzer returned no instruction".to_string(),
            ));
        }
        debug!(instruction = %instruction, "Analyzer instruction");
        Ok(instruction)
    }
}

fn build_analysis_prompt(
    profile: &CustomerProfile,
    history: &[ConversationTurn],
    latest: &str,
) -> String {
    let mut prompt = String::from(
        "You supervise an SMS sales conversation for a phone repair store. Read the whole \
         conversation and output ONE short instruction for the assistant's next reply.\n\n\
         SALES FLOW:\n\
         1. Greet the customer and confirm their name, phone model, and issue first\n\
         2. Only give a price quote after the details are confirmed\n\
         3. If any detail is incorrect, re-confirm the customer's information\n\
         4. If the request is out of scope or the customer is not interested, end the conversation\n\
         5. If the customer objects to price, use the objection guidance\n\
         6. After a confirmed quote, move to scheduling an appointment\n\
         7. Always get a yes/no confirmation of the time before creating an appointment\n\n",
    );

    prompt.push_str(&format!(
        "CUSTOMER: {} / {} / {}\n\n",
        profile.display_name(),
        profile.display_model(),
        profile.display_issue(),
    ));

    prompt.push_str("CONVERSATION:\n");
    if history.is_empty() {
        prompt.push_str("No previous messages\n");
    } else {
        for turn in history {
            let speaker = match turn.direction {
                Direction::Inbound => "Customer",
                Direction::Outbound => "Store",
            };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content));
        }
    }
    prompt.push_str(&format!("Customer (latest): {latest}\n\n"));

    prompt.push_str(
        "Example instructions:\n\
         - \"Customer's information seems incorrect, confirm the customer's details\"\n\
         - \"Details are confirmed, give the repair quote and ask about booking\"\n\
         - \"Customer agreed to the time, confirm it once more before booking\"\n\n\
         Output exactly one instruction inside <instructions></instructions> tags.",
    );

    prompt
}

/// Pull the instruction out of its tags; tolerate missing tags
fn strip_instruction_tags(raw: &str) -> String {
    let text = raw.trim();
    let inner = match (text.find("<instructions>"), text.find("</instructions>")) {
        (Some(start), Some(end)) if end > start => &text[start + "<instructions>".len()..end],
        _ => text,
    };
    inner
        .replace("<instructions>", "")
        .replace("</instructions>", "")
        .trim()
        .to_string()
}
