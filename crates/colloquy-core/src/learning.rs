//! Learning sink trait and detached emitter.
//!
//! After a reply is ready to return, the completed exchange is
//! submitted to the learning subsystem on a detached task. The
//! orchestrator never awaits it: the emitter's error channel is
//! drained into a warn log and discarded. At-most-once, no retry, no
//! acknowledgement consumed.

use std::sync::Arc;

use colloquy_types::learning::{LearningError, LearningEvent};

/// Sink trait for the learning subsystem.
///
/// Implementations live in colloquy-infra (e.g., `HttpLearningSink`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait LearningSink: Send + Sync {
    /// Submit one completed exchange. The response body, if any, is
    /// ignored by callers.
    fn record(
        &self,
        event: LearningEvent,
    ) -> impl std::future::Future<Output = Result<(), LearningError>> + Send;
}

/// Fire-and-forget wrapper around a [`LearningSink`].
///
/// `emit` spawns the submission and returns immediately; sink latency
/// and failures are invisible to the response path.
pub struct LearningEmitter<L> {
    sink: Arc<L>,
}

impl<L: LearningSink + 'static> LearningEmitter<L> {
    pub fn new(sink: L) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Submit an event on a detached task.
    pub fn emit(&self, event: LearningEvent) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.record(event).await {
                tracing::warn!(error = %err, "Learning emission failed; dropping event");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use colloquy_types::exchange::ContextBag;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn event(message: &str) -> LearningEvent {
        LearningEvent {
            user_id: "u-1".to_string(),
            app_id: None,
            message: message.to_string(),
            response: "reply".to_string(),
            context: ContextBag::new(),
            occurred_at: Utc::now(),
        }
    }

    struct ChannelSink {
        tx: mpsc::UnboundedSender<LearningEvent>,
    }

    impl LearningSink for ChannelSink {
        async fn record(&self, event: LearningEvent) -> Result<(), LearningError> {
            self.tx.send(event).map_err(|e| LearningError::Transport(e.to_string()))
        }
    }

    struct FailingSink;

    impl LearningSink for FailingSink {
        async fn record(&self, _event: LearningEvent) -> Result<(), LearningError> {
            Err(LearningError::Transport("connection refused".to_string()))
        }
    }

    struct SlowSink;

    impl LearningSink for SlowSink {
        async fn record(&self, _event: LearningEvent) -> Result<(), LearningError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_emitted_event_reaches_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emitter = LearningEmitter::new(ChannelSink { tx });

        emitter.emit(event("hello"));

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event should arrive")
            .expect("channel open");
        assert_eq!(received.message, "hello");
    }

    #[tokio::test]
    async fn test_sink_failure_is_invisible() {
        let emitter = LearningEmitter::new(FailingSink);
        emitter.emit(event("hello"));
        // Give the detached task a chance to run; nothing to assert
        // beyond the absence of a panic or propagated error.
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sink_does_not_delay_caller() {
        let emitter = LearningEmitter::new(SlowSink);
        let before = tokio::time::Instant::now();
        emitter.emit(event("hello"));
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
