//! Listener handles with identity semantics.
//!
//! A [`Handler`] is a shared reference to a listener closure. Two handlers are
//! equal only when they point at the same allocation, so removing a handler
//! never depends on what the closure captured. Cloning a handler keeps its
//! identity; wrapping the same closure twice with [`Handler::new`] does not.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Boxed listener body. Receives every emitted argument as one slice.
type Callback<T> = Box<dyn Fn(&[T]) + Send + Sync>;

struct Slot<T> {
    callback: Callback<T>,
}

/// Identity-carrying handle to a listener.
///
/// # Examples
///
/// ```rust
/// use event_registry::{EventBus, Handler};
///
/// let bus = EventBus::<i32>::new();
/// let print = Handler::new(|args: &[i32]| println!("{:?}", args));
///
/// bus.on_handler("tick", &print).emit("tick", &[1, 2]);
/// bus.off("tick", &print);
/// assert!(!bus.contains("tick"));
/// ```
pub struct Handler<T> {
    slot: Arc<Slot<T>>,
}

impl<T: 'static> Handler<T> {
    /// Wrap `callback` in a new handler with its own identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        Self {
            slot: Arc::new(Slot {
                callback: Box::new(callback),
            }),
        }
    }

    /// Build a one-shot wrapper around `target`.
    ///
    /// On its first call the wrapper hands its own handle to `retire` and only
    /// then forwards the arguments to `target`. Every later call is ignored,
    /// including calls from an outer dispatch that still holds the wrapper in
    /// its snapshot.
    pub(crate) fn one_shot<R>(target: Handler<T>, retire: R) -> Self
    where
        R: Fn(&Handler<T>) + Send + Sync + 'static,
    {
        let slot = Arc::new_cyclic(|me: &Weak<Slot<T>>| {
            let me = me.clone();
            let fired = AtomicBool::new(false);

            Slot {
                callback: Box::new(move |args: &[T]| {
                    if fired.swap(true, Ordering::AcqRel) {
                        return;
                    }
                    // The dispatching snapshot keeps the slot alive here.
                    if let Some(slot) = me.upgrade() {
                        retire(&Handler { slot });
                    }
                    target.call(args);
                }),
            }
        });

        Self { slot }
    }
}

impl<T> Handler<T> {
    /// Invoke the listener directly, bypassing any bus.
    pub fn call(&self, args: &[T]) {
        (self.slot.callback)(args)
    }

    /// Whether `self` and `other` are the same listener.
    pub fn ptr_eq(&self, other: &Handler<T>) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> PartialEq for Handler<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Handler<T> {}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.slot))
            .finish()
    }
}
