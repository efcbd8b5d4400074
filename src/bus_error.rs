use std::any::Any;

/// Errors surfaced by [`EventBus::try_emit`](crate::EventBus::try_emit).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// A listener panicked; listeners after it were not invoked.
    #[error("listener #{position} for event `{event}` panicked: {message}")]
    ListenerPanicked {
        event: String,
        /// Zero-based position of the listener in the dispatch snapshot.
        position: usize,
        message: String,
    },
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
