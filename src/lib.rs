//! # Event Registry
//!
//! A synchronous, in-process publish/subscribe registry. Listeners are
//! registered under an event name, triggered by name with a list of
//! arguments, and removed by identity.
//!
//! ## Quick Start
//!
//! ```rust
//! use event_registry::{EventBus, Handler};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let bus = EventBus::<i32>::new();
//!
//! let sink = seen.clone();
//! let click = Handler::new(move |args: &[i32]| sink.lock().unwrap().push(args.to_vec()));
//!
//! bus.on_handler("click", &click)
//!     .emit("click", &[1, 2, 3])
//!     .off("click", &click)
//!     .emit("click", &[4]);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2, 3]]);
//! ```
//!
//! ## Features
//!
//! - **Ordered dispatch**: listeners run in registration order
//! - **One-shot listeners**: `once` removes itself before it runs
//! - **Identity-based removal**: [`Handler`] equality is pointer equality
//! - **Re-entrant**: listeners may call back into the bus during `emit`
//! - **Tracing support**: optional per-bus callback receiving [`BusEvent`]s
//!
//! ## Main Operations
//!
//! - [`EventBus::on`] / [`EventBus::on_handler`] - Register a listener
//! - [`EventBus::once`] / [`EventBus::once_handler`] - Register a one-shot listener
//! - [`EventBus::off`] - Remove one handler, several, or the whole event
//! - [`EventBus::emit`] - Dispatch arguments to every listener of an event
//! - [`EventBus::try_emit`] - Dispatch, reporting a listener panic as [`BusError`]
//! - [`EventBus::set_trace_callback`] - Observe bus operations

mod bus_error;
mod bus_event;
mod event_bus;
mod handler;

pub use bus_error::BusError;
pub use bus_event::BusEvent;
pub use event_bus::{EventBus, OffTarget, TraceCallback, WeakEventBus};
pub use handler::Handler;
