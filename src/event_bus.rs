//! The event bus: a table from event name to an ordered list of listeners.
//!
//! Every operation is a direct synchronous call. `emit` dispatches over a
//! snapshot of the listener list taken when it starts, and no internal lock is
//! held while user code runs, so listeners may freely call back into the bus.
//!
//! # Failure policy
//!
//! Dispatch is fail-fast. If a listener panics, the panic unwinds out of
//! [`EventBus::emit`] and the listeners after it are not invoked for that
//! call. [`EventBus::try_emit`] applies the same policy but reports the panic
//! as a [`BusError`] instead of unwinding.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::bus_error::panic_message;
use crate::{BusError, BusEvent, Handler};

/// Event name to listeners. A present key never maps to an empty list.
type Table<T> = HashMap<String, Vec<Handler<T>>>;

/// Callback receiving [`BusEvent`]s for a single bus.
pub type TraceCallback = Arc<dyn Fn(&BusEvent<'_>) + Send + Sync>;

struct Shared<T> {
    subscriptions: Mutex<Table<T>>,
    trace: Mutex<Option<TraceCallback>>,
}

/// In-process publish/subscribe registry.
///
/// `T` is the element type of emitted arguments. Each listener receives the
/// whole argument list of an `emit` as a single `&[T]`.
///
/// Cloning an `EventBus` yields another handle to the same table. Use
/// [`EventBus::new`] for an independent one.
///
/// # Examples
///
/// ```rust
/// use event_registry::EventBus;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// EventBus::new()
///     .on("click", move |args: &[i32]| sink.lock().unwrap().push(args.to_vec()))
///     .emit("click", &[1, 2, 3])
///     .emit("unknown", &[4]);
///
/// assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2, 3]]);
/// ```
pub struct EventBus<T> {
    shared: Arc<Shared<T>>,
}

/// Non-owning handle to an [`EventBus`].
///
/// Listeners that need to reach their own bus should capture one of these;
/// capturing an `EventBus` clone keeps the table alive through itself.
pub struct WeakEventBus<T> {
    shared: Weak<Shared<T>>,
}

/// What an [`EventBus::off`] call removes.
pub enum OffTarget<'a, T> {
    /// Every listener of the event.
    All,
    /// Every occurrence of one handler.
    One(&'a Handler<T>),
    /// Every occurrence of each handler, processed in order.
    Many(&'a [Handler<T>]),
}

impl<'a, T> From<&'a Handler<T>> for OffTarget<'a, T> {
    fn from(handler: &'a Handler<T>) -> Self {
        OffTarget::One(handler)
    }
}

impl<'a, T> From<Option<&'a Handler<T>>> for OffTarget<'a, T> {
    fn from(handler: Option<&'a Handler<T>>) -> Self {
        handler.map_or(OffTarget::All, OffTarget::One)
    }
}

impl<'a, T> From<&'a [Handler<T>]> for OffTarget<'a, T> {
    fn from(handlers: &'a [Handler<T>]) -> Self {
        OffTarget::Many(handlers)
    }
}

impl<'a, T, const N: usize> From<&'a [Handler<T>; N]> for OffTarget<'a, T> {
    fn from(handlers: &'a [Handler<T>; N]) -> Self {
        OffTarget::Many(handlers.as_slice())
    }
}

impl<'a, T> From<&'a Vec<Handler<T>>> for OffTarget<'a, T> {
    fn from(handlers: &'a Vec<Handler<T>>) -> Self {
        OffTarget::Many(handlers.as_slice())
    }
}

impl<T> From<()> for OffTarget<'_, T> {
    fn from(_: ()) -> Self {
        OffTarget::All
    }
}

impl<T: 'static> EventBus<T> {
    /// Create an empty bus with its own table.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                subscriptions: Mutex::new(HashMap::new()),
                trace: Mutex::new(None),
            }),
        }
    }

    /// Create an empty bus that reports every operation to `callback`.
    pub fn with_trace_callback(
        callback: impl Fn(&BusEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        let bus = Self::new();
        bus.set_trace_callback(callback);
        bus
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for this bus.
    ///
    /// The callback runs after the table has been updated and with no lock
    /// held, so it may call into the bus. Lock poisoning is recovered.
    pub fn set_trace_callback(
        &self,
        callback: impl Fn(&BusEvent<'_>) + Send + Sync + 'static,
    ) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback. Subscriptions are not affected.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.shared.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn trace(&self, event: &BusEvent<'_>) {
        let callback = self
            .shared
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------------------------------

    fn table(&self) -> MutexGuard<'_, Table<T>> {
        self.shared
            .subscriptions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
    }

    fn append(&self, name: &str, handler: Handler<T>) -> usize {
        let mut table = self.table();
        let listeners = table.entry(name.to_owned()).or_default();
        listeners.push(handler);
        listeners.len()
    }

    /// Append `callback` to the listeners of `name`.
    ///
    /// The closure gets a fresh identity, so it can only be removed with
    /// `off(name, ())`. Use [`EventBus::on_handler`] to keep a removable handle.
    pub fn on<F>(&self, name: impl Into<String>, callback: F) -> &Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.on_handler(name, &Handler::new(callback))
    }

    /// Append `handler` to the listeners of `name`.
    ///
    /// Registering the same handler again adds another occurrence.
    pub fn on_handler(&self, name: impl Into<String>, handler: &Handler<T>) -> &Self {
        let name = name.into();
        let listeners = self.append(&name, handler.clone());

        log::debug!("on `{}`: {} listener(s)", name, listeners);
        self.trace(&BusEvent::On {
            event: &name,
            listeners,
        });

        self
    }

    /// Register `callback` to run on the next emit of `name` only.
    pub fn once<F>(&self, name: impl Into<String>, callback: F) -> &Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.once_handler(name, &Handler::new(callback))
    }

    /// Register a one-shot wrapper around `handler`.
    ///
    /// The wrapper removes itself from `name` before forwarding to `handler`,
    /// so a re-entrant emit of `name` does not reach it again. The wrapper has
    /// its own identity: `off(name, handler)` does not remove it.
    pub fn once_handler(&self, name: impl Into<String>, handler: &Handler<T>) -> &Self {
        let name = name.into();
        let bus = self.downgrade();
        let key = name.clone();

        let wrapper = Handler::one_shot(handler.clone(), move |me| {
            if let Some(bus) = bus.upgrade() {
                bus.off(&key, me);
            }
        });
        let listeners = self.append(&name, wrapper);

        log::debug!("once `{}`: {} listener(s)", name, listeners);
        self.trace(&BusEvent::Once {
            event: &name,
            listeners,
        });

        self
    }

    /// Remove listeners of `name`.
    ///
    /// - a `&Handler` removes every occurrence of that handler;
    /// - a slice, array or `Vec` of handlers removes each in turn;
    /// - `()`, `None` or [`OffTarget::All`] removes the event entirely.
    ///
    /// Unknown events are ignored. When no listener is left the event name
    /// itself is dropped.
    pub fn off<'a>(&self, name: &str, target: impl Into<OffTarget<'a, T>>) -> &Self {
        match target.into() {
            OffTarget::All => self.remove(name, None),
            OffTarget::One(handler) => self.remove(name, Some(handler)),
            OffTarget::Many(handlers) => {
                for handler in handlers {
                    self.remove(name, Some(handler));
                }
            }
        }

        self
    }

    fn remove(&self, name: &str, handler: Option<&Handler<T>>) {
        // Removed handlers are dropped after the lock is released; their
        // captured state may touch the bus on drop.
        let (removed, remaining) = {
            let mut table = self.table();
            let current = table.remove(name).unwrap_or_default();

            let (removed, kept): (Vec<_>, Vec<_>) = match handler {
                Some(handler) => current.into_iter().partition(|h| h == handler),
                None => (current, Vec::new()),
            };

            let remaining = kept.len();
            if !kept.is_empty() {
                table.insert(name.to_owned(), kept);
            }
            (removed, remaining)
        };

        log::debug!(
            "off `{}`: removed {}, {} remaining",
            name,
            removed.len(),
            remaining
        );
        self.trace(&BusEvent::Off {
            event: name,
            removed: removed.len(),
            remaining,
        });
    }

    /// Remove every listener of every event.
    pub fn clear(&self) -> &Self {
        let dropped = std::mem::take(&mut *self.table());
        let events = dropped.len();
        drop(dropped);

        log::debug!("clear: dropped {} event(s)", events);
        self.trace(&BusEvent::Clear { events });

        self
    }

    // -------------------------------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------------------------------

    fn snapshot(&self, name: &str) -> Vec<Handler<T>> {
        self.table().get(name).cloned().unwrap_or_default()
    }

    fn begin_dispatch(&self, name: &str, args: &[T]) -> Vec<Handler<T>> {
        let snapshot = self.snapshot(name);

        log::trace!(
            "emit `{}` with {} argument(s) to {} listener(s)",
            name,
            args.len(),
            snapshot.len()
        );
        self.trace(&BusEvent::Emit {
            event: name,
            listeners: snapshot.len(),
            arguments: args.len(),
        });

        snapshot
    }

    /// Invoke every listener of `name`, in registration order, with `args`.
    ///
    /// Unknown events are a silent no-op. Listeners added during dispatch run
    /// from the next emit on; listeners removed during dispatch still run in
    /// this one.
    ///
    /// # Panics
    ///
    /// A panicking listener propagates out of this call and the remaining
    /// listeners are skipped. The bus stays usable afterwards.
    pub fn emit(&self, name: &str, args: &[T]) -> &Self {
        for handler in self.begin_dispatch(name, args) {
            handler.call(args);
        }

        self
    }

    /// Like [`EventBus::emit`], but a listener panic is returned as an error.
    ///
    /// # Errors
    ///
    /// [`BusError::ListenerPanicked`] naming the first listener that panicked.
    /// Listeners after it were not invoked.
    pub fn try_emit(&self, name: &str, args: &[T]) -> Result<&Self, BusError> {
        for (position, handler) in self.begin_dispatch(name, args).iter().enumerate() {
            panic::catch_unwind(AssertUnwindSafe(|| handler.call(args))).map_err(|payload| {
                log::debug!("emit `{}`: listener #{} panicked", name, position);
                BusError::ListenerPanicked {
                    event: name.to_owned(),
                    position,
                    message: panic_message(payload.as_ref()),
                }
            })?;
        }

        Ok(self)
    }

    // -------------------------------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------------------------------

    /// Whether `name` has at least one listener.
    pub fn contains(&self, name: &str) -> bool {
        self.table().contains_key(name)
    }

    /// Number of listener occurrences registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.table().get(name).map_or(0, Vec::len)
    }

    /// Names of all events with listeners, in no particular order.
    pub fn event_names(&self) -> Vec<String> {
        self.table().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    /// Non-owning handle to this bus.
    pub fn downgrade(&self) -> WeakEventBus<T> {
        WeakEventBus {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl<T> WeakEventBus<T> {
    /// The bus, if any strong handle to it is still alive.
    pub fn upgrade(&self) -> Option<EventBus<T>> {
        self.shared.upgrade().map(|shared| EventBus { shared })
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Clone for WeakEventBus<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self
            .shared
            .subscriptions
            .lock()
            .unwrap_or_else(|p| p.into_inner());

        f.debug_map()
            .entries(table.iter().map(|(name, listeners)| (name, listeners.len())))
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
