//! Agent orchestrator
//!
//! One inbound message is one orchestration pass: recover the stage,
//! classify, validate, analyze, compose, then at most two model round-trips
//! with a single tool hop between them. Every failure is caught here and
//! turned into the fixed fallback reply; nothing raises past the turn.
//!
//! Turns for the same phone number are serialized through a per-number
//! mutex so overlapping messages cannot persist conflicting stages.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use sms_agent_config::constants::{replies, sms};
use sms_agent_config::{ObjectionGuide, PriceList, Settings, StoreInfo};
use sms_agent_core::{ConversationStage, CustomerProfile, Direction};
use sms_agent_llm::{repair_shop_tools, LlmBackend, Message};
use sms_agent_persistence::{normalize_phone, MessageStore};
use sms_agent_tools::ToolDispatcher;
use sms_agent_transport::SmsSender;

use crate::analyzer::ConversationAnalyzer;
use crate::composer::PromptComposer;
use crate::sanitize::sanitize;
use crate::stage::{resolve_stage, validate_transition, StageClassifier};
use crate::AgentError;

/// Result of one orchestration pass
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub stage: ConversationStage,
}

/// The SMS sales agent. All collaborators are injected so tests can
/// substitute fakes for the model, store, and transport.
pub struct SmsAgent {
    store: Arc<dyn MessageStore>,
    llm: Arc<dyn LlmBackend>,
    dispatcher: ToolDispatcher,
    analyzer: ConversationAnalyzer,
    composer: PromptComposer,
    classifier: StageClassifier,
    sender: Option<Arc<dyn SmsSender>>,
    call_timeout: Duration,
    max_tokens: u32,
    followup_max_tokens: u32,
    max_len: usize,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SmsAgent {
    pub fn new(store: Arc<dyn MessageStore>, llm: Arc<dyn LlmBackend>) -> Self {
        let composer = PromptComposer::new(
            StoreInfo::default(),
            PriceList::default(),
            ObjectionGuide::default(),
        );
        Self {
            dispatcher: ToolDispatcher::new(store.clone()),
            analyzer: ConversationAnalyzer::new(llm.clone()),
            composer,
            classifier: StageClassifier::new(),
            sender: None,
            call_timeout: Duration::from_secs(30),
            max_tokens: 200,
            followup_max_tokens: 150,
            max_len: sms::MAX_LEN,
            locks: DashMap::new(),
            store,
            llm,
        }
    }

    /// Apply loaded settings
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.call_timeout = Duration::from_secs(settings.llm.call_timeout_secs);
        self.max_tokens = settings.llm.max_tokens;
        self.followup_max_tokens = settings.llm.followup_max_tokens;
        self.max_len = settings.sms.max_len;
        self.composer = self
            .composer
            .with_history_window(settings.sms.history_window);
        self
    }

    /// Replace the default composer (custom store data or price table)
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Attach an outbound transport. Without one, replies are only returned
    /// and persisted.
    pub fn with_sender(mut self, sender: Arc<dyn SmsSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Shrink the per-call timeout (tests)
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    fn turn_lock(&self, phone: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(phone.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Send the first outbound contact for a seeded lead. Never fails:
    /// if the model is unavailable the templated greeting goes out instead.
    pub async fn first_contact(&self, phone: &str) -> TurnOutcome {
        let phone = normalize_phone(phone);
        let lock = self.turn_lock(&phone);
        let _guard = lock.lock().await;

        match self.run_first_contact(&phone).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(phone = %phone, error = %err, "First contact failed");
                TurnOutcome {
                    reply: replies::FALLBACK.to_string(),
                    stage: ConversationStage::ErrorCorrection,
                }
            }
        }
    }

    async fn run_first_contact(&self, phone: &str) -> Result<TurnOutcome, AgentError> {
        let history = self.store.history(phone, None).await?;
        let profile = self
            .store
            .profile(phone)
            .await?
            .unwrap_or_else(|| CustomerProfile::new(phone));
        let stored = self.store.load_stage(phone).await?;
        let stage = resolve_stage(stored, &history);

        let prompt = self.composer.first_contact_prompt(&profile);
        let messages = [
            Message::system(prompt),
            Message::user("Write the first message now."),
        ];
        let body = match timeout(
            self.call_timeout,
            self.llm.complete(&messages, &[], self.max_tokens),
        )
        .await
        {
            Ok(Ok(response)) if !response.text.trim().is_empty() => response.text,
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => {
                debug!(phone = %phone, "Using templated first contact");
                self.composer.first_contact_fallback(&profile)
            }
        };

        let reply = sanitize(&body, self.max_len);
        self.store
            .save_turn(phone, Direction::Outbound, &reply)
            .await?;
        self.store.save_stage(phone, stage).await?;
        self.deliver(phone, &reply).await;

        info!(phone = %phone, stage = %stage, "First contact sent");
        Ok(TurnOutcome { reply, stage })
    }

    /// Process one inbound message and produce the reply. All failures
    /// collapse into the fixed fallback with stage `ErrorCorrection`; the
    /// persisted stage is left as it was.
    pub async fn handle_message(&self, phone: &str, content: &str) -> TurnOutcome {
        let phone = normalize_phone(phone);
        let lock = self.turn_lock(&phone);
        let _guard = lock.lock().await;

        match self.run_turn(&phone, content).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(phone = %phone, error = %err, "Turn failed, sending fallback");
                let reply = replies::FALLBACK.to_string();
                // Best effort: record the exchange even though the turn failed
                if let Err(err) = self
                    .store
                    .save_turn(&phone, Direction::Outbound, &reply)
                    .await
                {
                    warn!(phone = %phone, error = %err, "Could not persist fallback turn");
                }
                self.deliver(&phone, &reply).await;
                TurnOutcome {
                    reply,
                    stage: ConversationStage::ErrorCorrection,
                }
            }
        }
    }

    async fn run_turn(&self, phone: &str, content: &str) -> Result<TurnOutcome, AgentError> {
        let history = self.store.history(phone, None).await?;
        let profile = self
            .store
            .profile(phone)
            .await?
            .unwrap_or_else(|| CustomerProfile::new(phone));
        let stored = self.store.load_stage(phone).await?;

        let current = resolve_stage(stored, &history);
        let candidate = self.classifier.classify(current, content, &history);

        self.store
            .save_turn(phone, Direction::Inbound, content)
            .await?;

        if let Err(err) = validate_transition(current, candidate) {
            // Off-graph candidate: clarify without touching the persisted stage
            warn!(phone = %phone, error = %err, "Rejected stage candidate");
            let reply = replies::CLARIFICATION.to_string();
            self.store
                .save_turn(phone, Direction::Outbound, &reply)
                .await?;
            self.deliver(phone, &reply).await;
            return Ok(TurnOutcome {
                reply,
                stage: ConversationStage::ErrorCorrection,
            });
        }
        let stage = candidate;

        let instruction = timeout(
            self.call_timeout,
            self.analyzer.analyze(&profile, &history, content),
        )
        .await
        .map_err(|_| AgentError::Timeout)?
        .map_err(|err| AgentError::Analyzer(err.to_string()))?;

        let system = self
            .composer
            .system_prompt(stage, &profile, &history, content, Some(&instruction));
        let mut messages = vec![Message::system(system), Message::user(content.to_string())];
        let tools = repair_shop_tools();

        let first = timeout(
            self.call_timeout,
            self.llm.complete(&messages, &tools, self.max_tokens),
        )
        .await
        .map_err(|_| AgentError::Timeout)??;

        let raw_reply = if let Some(call) = first.first_tool_call() {
            if first.tool_calls.len() > 1 {
                debug!(
                    phone = %phone,
                    dropped = first.tool_calls.len() - 1,
                    "Only the first tool call is honored"
                );
            }
            // One tool hop, then a second round to phrase the outcome.
            // A failed outcome still goes back to the model so it can
            // explain the failure to the customer.
            let outcome = self.dispatcher.dispatch(&call.name, call.input.clone()).await;

            let lead_in = if first.text.trim().is_empty() {
                format!("Using {} now.", call.name)
            } else {
                first.text.clone()
            };
            messages.push(Message::assistant(lead_in));
            messages.push(Message::tool(format!(
                "Tool result for {}: {}",
                call.name,
                outcome.as_result_json()
            )));

            let second = timeout(
                self.call_timeout,
                self.llm
                    .complete(&messages, &[], self.followup_max_tokens),
            )
            .await
            .map_err(|_| AgentError::Timeout)??;
            // Tool calls in the follow-up round are not honored
            second.text
        } else {
            first.text
        };

        let reply = sanitize(&raw_reply, self.max_len);
        self.store
            .save_turn(phone, Direction::Outbound, &reply)
            .await?;
        self.store.save_stage(phone, stage).await?;
        self.deliver(phone, &reply).await;

        info!(phone = %phone, from = %current, to = %stage, "Turn completed");
        Ok(TurnOutcome { reply, stage })
    }

    /// Hand the reply to the transport. Delivery failures are reported but
    /// never roll back turns already persisted.
    async fn deliver(&self, phone: &str, body: &str) {
        if let Some(sender) = &self.sender {
            match sender.send(phone, body).await {
                Ok(receipt) => {
                    debug!(phone = %phone, message_id = %receipt.message_id, "Reply delivered")
                }
                Err(err) => warn!(phone = %phone, error = %err, "SMS delivery failed"),
            }
        }
    }
}
