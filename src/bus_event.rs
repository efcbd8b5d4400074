/// Events reported by an [`EventBus`](crate::EventBus) to its trace callback.
///
/// These are passed to the callback set via `set_trace_callback`. They borrow
/// the event name from the operation in flight, so a callback that wants to
/// keep one should format it or copy the fields out.
///
/// # Examples
///
/// ```rust
/// use event_registry::BusEvent;
///
/// let event = BusEvent::On { event: "click", listeners: 1 };
/// assert_eq!(event.to_string(), "on { event: click, listeners: 1 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent<'a> {
    /// A listener was appended with `on`.
    On {
        event: &'a str,
        /// Listeners registered for `event` after the append.
        listeners: usize,
    },

    /// A one-shot wrapper was appended with `once`.
    Once { event: &'a str, listeners: usize },

    /// An `off` call finished, including the self-removal of a one-shot wrapper.
    Off {
        event: &'a str,
        removed: usize,
        remaining: usize,
    },

    /// An `emit` is about to dispatch.
    Emit {
        event: &'a str,
        /// Size of the snapshot being dispatched.
        listeners: usize,
        arguments: usize,
    },

    /// Every subscription was dropped by `clear`.
    Clear { events: usize },
}

impl std::fmt::Display for BusEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusEvent::On { event, listeners } => {
                write!(f, "on {{ event: {}, listeners: {} }}", event, listeners)
            }
            BusEvent::Once { event, listeners } => {
                write!(f, "once {{ event: {}, listeners: {} }}", event, listeners)
            }
            BusEvent::Off {
                event,
                removed,
                remaining,
            } => write!(
                f,
                "off {{ event: {}, removed: {}, remaining: {} }}",
                event, removed, remaining
            ),
            BusEvent::Emit {
                event,
                listeners,
                arguments,
            } => write!(
                f,
                "emit {{ event: {}, listeners: {}, arguments: {} }}",
                event, listeners, arguments
            ),
            BusEvent::Clear { events } => write!(f, "clear {{ events: {} }}", events),
        }
    }
}
