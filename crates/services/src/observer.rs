use quiz_core::model::Resolution;
use quiz_core::{QuizEvent, QuizObserver};
use tokio::sync::mpsc;

/// Forwards controller events into an unbounded channel.
///
/// Lets async hosts react to events without re-entering the runner from a callback.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<QuizEvent>,
}

impl ChannelObserver {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<QuizEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl QuizObserver for ChannelObserver {
    fn on_resolved(&self, resolution: &Resolution) {
        self.on_event(&QuizEvent::Resolved(resolution.clone()));
    }

    fn on_event(&self, event: &QuizEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(prompt_id = %event.prompt_id(), "event receiver dropped");
        }
    }
}
