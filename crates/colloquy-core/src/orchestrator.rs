//! Top-level conversational turn orchestration.
//!
//! One orchestration run per inbound request: assemble context
//! (history + personalization, fetched concurrently), detect and merge
//! a pending clarification, run the optimizer gateway, dispatch to the
//! backend chain, return the reply, and emit the exchange to the
//! learning subsystem on a detached task.
//!
//! The orchestrator holds no shared mutable state across concurrent
//! requests. Everything needed to resume a paused clarification
//! exchange travels in the conversation history owned by the external
//! history service, which is what keeps this component stateless and
//! horizontally replicable.

use std::fmt;

use chrono::Utc;

use colloquy_types::config::OrchestratorConfig;
use colloquy_types::error::OrchestrateError;
use colloquy_types::exchange::{
    ConversationEntry, Exchange, SendMessage, TurnReply, REPLY_BACKEND, REPLY_OPTIMIZED,
};
use colloquy_types::backend::InferenceRequest;
use colloquy_types::learning::LearningEvent;
use colloquy_types::optimizer::OptimizeRequest;

use crate::backend::dispatcher::BackendDispatcher;
use crate::clarification;
use crate::history::HistoryProvider;
use crate::learning::{LearningEmitter, LearningSink};
use crate::optimizer::{GatewayOutcome, OptimizerGateway, PromptOptimizer};
use crate::personalization::PersonalizationProvider;

/// Progress of one turn through the orchestration pipeline.
///
/// `AwaitingClarification` is terminal for the current turn (the
/// question is the response); the conversation resumes in
/// `AssemblingContext` on the next inbound message via the
/// clarification-merge path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AssemblingContext,
    Optimizing,
    Dispatching,
    AwaitingClarification,
    Responding,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::AssemblingContext => write!(f, "assembling_context"),
            TurnState::Optimizing => write!(f, "optimizing"),
            TurnState::Dispatching => write!(f, "dispatching"),
            TurnState::AwaitingClarification => write!(f, "awaiting_clarification"),
            TurnState::Responding => write!(f, "responding"),
        }
    }
}

/// Sequences one user message into a model reply.
///
/// Generic over the collaborator traits so the core never depends on
/// colloquy-infra; the application layer pins the concrete HTTP
/// implementations.
pub struct Orchestrator<H, P, O, L> {
    config: OrchestratorConfig,
    history: H,
    personalization: P,
    optimizer: OptimizerGateway<O>,
    dispatcher: BackendDispatcher,
    learning: LearningEmitter<L>,
}

impl<H, P, O, L> Orchestrator<H, P, O, L>
where
    H: HistoryProvider,
    P: PersonalizationProvider,
    O: PromptOptimizer,
    L: LearningSink + 'static,
{
    /// Wire an orchestrator from its collaborators.
    ///
    /// The optimizer gateway and learning emitter are built here so
    /// the fail-soft and detachment policies cannot be bypassed.
    pub fn new(
        config: OrchestratorConfig,
        history: H,
        personalization: P,
        optimizer: O,
        dispatcher: BackendDispatcher,
        learning: L,
    ) -> Self {
        let gateway = OptimizerGateway::new(
            optimizer,
            config.optimizer_enabled,
            config.optimizer_timeout(),
        );
        Self {
            config,
            history,
            personalization,
            optimizer: gateway,
            dispatcher,
            learning: LearningEmitter::new(learning),
        }
    }

    /// Run one conversational turn.
    ///
    /// Client errors (missing user id, empty message) and
    /// total-dispatch failure are the only user-visible failures;
    /// every other stage degrades internally.
    #[tracing::instrument(
        name = "send_message",
        skip(self, request),
        fields(
            turn_id = %uuid::Uuid::now_v7(),
            user_id = %request.user_id,
            app_id = request.app_id.as_deref().unwrap_or(""),
        )
    )]
    pub async fn send_message(&self, request: SendMessage) -> Result<TurnReply, OrchestrateError> {
        if request.user_id.trim().is_empty() {
            return Err(OrchestrateError::InvalidRequest(
                "user_id is required".to_string(),
            ));
        }
        if request.message.trim().is_empty() {
            return Err(OrchestrateError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        tracing::debug!(state = %TurnState::AssemblingContext, "Turn started");

        let mut exchange = Exchange::new(
            request.user_id.clone(),
            request.app_id.clone(),
            request.message.clone(),
        );
        if let Some(context) = &request.context {
            exchange.context = context.clone();
        }

        // History and personalization depend only on the user id, so
        // they run concurrently. Both are fail-soft.
        let (history, personalization) = tokio::join!(
            self.assemble_history(&request),
            self.fetch_personalization(&request.user_id),
        );

        // Is this message answering a previously asked question?
        let base_message = match clarification::find_pending(&history) {
            Some(pending) => {
                tracing::info!(
                    original_message_len = pending.original_message.len(),
                    "Resuming paused exchange with clarification answer"
                );
                clarification::mark_resolved(&mut exchange.context, &pending.original_message);
                clarification::merge_clarification(&pending.original_message, &exchange.raw_message)
            }
            None => exchange.raw_message.clone(),
        };

        tracing::debug!(state = %TurnState::Optimizing, "Running prompt optimizer");
        let outcome = self
            .optimizer
            .optimize(OptimizeRequest {
                prompt: base_message,
                context: exchange.context.clone(),
                history: history.clone(),
                notes: request.notes.clone(),
            })
            .await;

        let (message, was_optimized) = match outcome {
            GatewayOutcome::AskUser { question } => {
                // The question is the reply. Encode the waiting state
                // so the next turn can recover the original intent;
                // dispatch and learning are skipped entirely.
                tracing::debug!(state = %TurnState::AwaitingClarification, "Pausing turn");
                let mut context = exchange.context.clone();
                clarification::encode_waiting(&mut context, &exchange.raw_message);
                return Ok(TurnReply {
                    response: question,
                    context,
                    timestamp: Utc::now(),
                    needs_clarification: true,
                });
            }
            GatewayOutcome::Proceed {
                message,
                was_optimized,
            } => (message, was_optimized),
        };
        exchange.optimized_message = message;
        exchange.was_optimized = was_optimized;

        tracing::debug!(state = %TurnState::Dispatching, "Dispatching to backend chain");
        let dispatched = self
            .dispatcher
            .dispatch(&InferenceRequest {
                message: exchange.optimized_message.clone(),
                history,
                personalization: if personalization.is_empty() {
                    None
                } else {
                    Some(personalization)
                },
            })
            .await?;

        tracing::debug!(
            state = %TurnState::Responding,
            backend = %dispatched.backend_name,
            was_optimized = exchange.was_optimized,
            "Turn complete"
        );

        let mut context = exchange.context.clone();
        context.insert(
            REPLY_BACKEND.to_string(),
            serde_json::Value::String(dispatched.backend_name),
        );
        context.insert(
            REPLY_OPTIMIZED.to_string(),
            serde_json::Value::Bool(exchange.was_optimized),
        );

        let reply = TurnReply {
            response: dispatched.response.content,
            context,
            timestamp: Utc::now(),
            needs_clarification: false,
        };

        // Detached: the caller gets the reply at backend-dispatch
        // latency regardless of the learning subsystem.
        self.learning.emit(LearningEvent {
            user_id: exchange.user_id,
            app_id: exchange.app_id,
            message: exchange.raw_message,
            response: reply.response.clone(),
            context: reply.context.clone(),
            occurred_at: reply.timestamp,
        });

        Ok(reply)
    }

    /// Caller-supplied history wins; otherwise fetch from the provider
    /// with a bounded timeout, degrading to an empty history.
    async fn assemble_history(&self, request: &SendMessage) -> Vec<ConversationEntry> {
        if let Some(history) = &request.conversation_history {
            return history.clone();
        }

        let fetch = self.history.fetch(
            &request.user_id,
            request.app_id.as_deref(),
            self.config.history_limit,
            0,
        );
        match tokio::time::timeout(self.config.history_timeout(), fetch).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "History fetch failed; treating as fresh conversation");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!("History fetch timed out; treating as fresh conversation");
                Vec::new()
            }
        }
    }

    /// Best-effort personalization fetch; empty string on any failure.
    async fn fetch_personalization(&self, user_id: &str) -> String {
        let fetch = self.personalization.fetch(user_id);
        match tokio::time::timeout(self.config.personalization_timeout(), fetch).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Personalization fetch failed; proceeding without");
                String::new()
            }
            Err(_) => {
                tracing::warn!("Personalization fetch timed out; proceeding without");
                String::new()
            }
        }
    }
}
