//! Stage-aware prompt composition
//!
//! Builds the system prompt for the main generation round: store knowledge,
//! customer profile, the deterministic quote figure, stage guidance, recent
//! history, and the analyzer's steering instruction. Also builds the first
//! contact prompt sent before any inbound message exists.

use sms_agent_config::{ObjectionGuide, PriceList, StoreInfo};
use sms_agent_core::{ConversationStage, ConversationTurn, CustomerProfile, Direction};

/// Composes prompts from the store knowledge base
#[derive(Debug, Clone)]
pub struct PromptComposer {
    store: StoreInfo,
    prices: PriceList,
    objections: ObjectionGuide,
    history_window: usize,
}

impl PromptComposer {
    pub fn new(store: StoreInfo, prices: PriceList, objections: ObjectionGuide) -> Self {
        Self {
            store,
            prices,
            objections,
            history_window: sms_agent_config::constants::prompt::HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Quote line for a profile: "$159" or "Price not available"
    pub fn quote_for(&self, profile: &CustomerProfile) -> String {
        match (&profile.phone_model, &profile.issue) {
            (Some(model), Some(issue)) => self.prices.quote_line(model, issue),
            _ => "Price not available".to_string(),
        }
    }

    /// System prompt for the main generation round
    pub fn system_prompt(
        &self,
        stage: ConversationStage,
        profile: &CustomerProfile,
        history: &[ConversationTurn],
        latest: &str,
        instruction: Option<&str>,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You are an SMS assistant for {}, a phone repair store. You are texting a customer \
             about their repair request.\n\n",
            self.store.name
        ));
        prompt.push_str(&self.store.knowledge_block());
        prompt.push('\n');

        prompt.push_str("CURRENT CUSTOMER INFO:\n");
        prompt.push_str(&format!("- Name: {}\n", profile.display_name()));
        prompt.push_str(&format!("- Phone model: {}\n", profile.display_model()));
        prompt.push_str(&format!("- Issue: {}\n", profile.display_issue()));
        if let Some(appointment) = &profile.appointment {
            prompt.push_str(&format!(
                "- Appointment: {} at {}\n",
                appointment.id, appointment.scheduled_time
            ));
        }
        prompt.push_str(&format!("- Repair quote: {}\n\n", self.quote_for(profile)));

        prompt.push_str(&stage_guidance(stage));
        prompt.push('\n');

        prompt.push_str(&self.objections.prompt_block());
        prompt.push('\n');

        prompt.push_str(
            "TOOLS - use at most one per message, and only when the conversation calls for it:\n\
             - scheduleAppointment: only after the customer said yes to a specific time\n\
             - stopConvo: customer is not interested or the request is out of scope\n\
             - requestHumanCallback: question too complex to answer by text\n\
             - updateInfo: the customer says a detail on file is wrong\n\
             - updateAppointment: the customer wants to move an existing booking\n\n",
        );

        prompt.push_str("CONVERSATION SO FAR:\n");
        prompt.push_str(&self.format_history(history));
        prompt.push('\n');
        prompt.push_str(&format!("CUSTOMER'S LATEST MESSAGE: {latest}\n\n"));

        if let Some(instruction) = instruction {
            prompt.push_str(&format!("GUIDANCE FOR THIS REPLY: {instruction}\n\n"));
        }

        prompt.push_str(
            "CRITICAL RESPONSE RULES:\n\
             - ALWAYS end with a clear question so the customer knows what to answer\n\
             - Keep the reply under 160 characters\n\
             - Never use \"...\"\n\
             - Professional but friendly, like a helpful store employee\n\
             - Plain text only, no XML or markup in the reply\n",
        );

        prompt
    }

    /// Prompt for the very first outbound contact
    pub fn first_contact_prompt(&self, profile: &CustomerProfile) -> String {
        format!(
            "You are an SMS assistant for {}, a phone repair store. Write the FIRST message to a \
             customer who submitted a repair request online.\n\n\
             Customer details:\n\
             - Name: {}\n\
             - Phone model: {}\n\
             - Issue: {}\n\n\
             Rules:\n\
             - Greet the customer warmly by name\n\
             - Mention their phone model and the issue\n\
             - Ask them to confirm these details\n\
             - DO NOT mention price yet\n\
             - Keep it under 160 characters\n\
             - End with a yes/no question\n",
            self.store.name,
            profile.display_name(),
            profile.display_model(),
            profile.display_issue(),
        )
    }

    /// Fallback first-contact body when the model is unavailable
    pub fn first_contact_fallback(&self, profile: &CustomerProfile) -> String {
        format!(
            "Hi {}! We received your repair request for your {} regarding {}. Is this correct?",
            profile.display_name(),
            profile.display_model(),
            profile.display_issue(),
        )
    }

    /// Last few turns as "Customer:"/"Store:" lines
    pub fn format_history(&self, history: &[ConversationTurn]) -> String {
        if history.is_empty() {
            return "No previous messages\n".to_string();
        }
        let start = history.len().saturating_sub(self.history_window);
        history[start..]
            .iter()
            .map(|turn| {
                let speaker = match turn.direction {
                    Direction::Inbound => "Customer",
                    Direction::Outbound => "Store",
                };
                format!("{speaker}: {}\n", turn.content)
            })
            .collect()
    }
}

fn stage_guidance(stage: ConversationStage) -> String {
    let guidance = match stage {
        ConversationStage::InitialGreeting => {
            "CURRENT STAGE: Initial greeting\n\
             - Greet the customer by name and mention their phone model and issue\n\
             - Ask them to confirm the details are right\n\
             - Do not mention price yet\n\
             Example: \"Hi John! We got your request for your Iphone 13 screen repair. Is that correct?\""
        }
        ConversationStage::AwaitingConfirmation => {
            "CURRENT STAGE: Awaiting confirmation\n\
             - The customer has not yet confirmed their details\n\
             - If anything is wrong, find out which detail and use updateInfo\n\
             - Once details are confirmed, you may quote on the next message\n\
             Example: \"Just to confirm, that's an Iphone 13 with a cracked screen, right?\""
        }
        ConversationStage::ProvidingQuote => {
            "CURRENT STAGE: Providing quote\n\
             - Give the repair quote shown in CURRENT CUSTOMER INFO\n\
             - If no price is on file, offer a callback instead of guessing\n\
             - Ask if they would like to book a repair\n\
             Example: \"Great news, the screen repair for your Iphone 13 is $159. Want to book a time?\""
        }
        ConversationStage::SchedulingAppointment => {
            "CURRENT STAGE: Scheduling appointment\n\
             - Ask for a day and time that suits them, within store hours\n\
             - Do not book anything until they name a specific time\n\
             Example: \"When works best for you? We're open until 6pm today.\""
        }
        ConversationStage::AppointmentConfirmation => {
            "CURRENT STAGE: Appointment confirmation\n\
             - Restate the proposed time and get an explicit yes before booking\n\
             - Only call scheduleAppointment after the customer says yes\n\
             Example: \"So that's tomorrow at 2pm for your screen repair. Shall I lock that in?\""
        }
        ConversationStage::Completed => {
            "CURRENT STAGE: Completed\n\
             - The conversation is finished; thank the customer and close politely\n\
             Example: \"You're all set! See you tomorrow at 2pm. Anything else I can help with?\""
        }
        ConversationStage::ErrorCorrection => {
            "CURRENT STAGE: Error correction\n\
             - Something on file is wrong or the customer is hesitant\n\
             - Ask specifically which detail is wrong (name, phone model, or issue)\n\
             - Use updateInfo once they tell you the correct value\n\
             Example: \"Sorry about that! Which detail is wrong - the phone model or the issue?\""
        }
    };
    format!("{guidance}\n")
}
