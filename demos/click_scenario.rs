//! Click scenario for event-registry.
//!
//! Demonstrates:
//! - Registering regular listeners with `on_handler()`
//! - Registering a one-shot listener with `once()`
//! - Dispatching with `emit()` (every listener gets the whole argument list)
//! - Removing a single listener with `off()`
//! - Observing the bus with a trace callback
//!
//! Run with: `RUST_LOG=debug cargo run --example click_scenario`

use event_registry::{EventBus, Handler};

fn main() {
    env_logger::init();

    println!("=== event-registry: Click Scenario ===\n");

    let bus = EventBus::<String>::with_trace_callback(|event| {
        println!("   [trace] {}", event);
    });

    // -------------------------------------------------------------------------
    // 1. Register listeners
    // -------------------------------------------------------------------------
    println!("1. Registering listeners...");

    let f1 = Handler::new(|args: &[String]| println!("   f1 got {:?}", args));
    let f2 = Handler::new(|args: &[String]| println!("   f2 got {:?}", args));

    bus.on_handler("click", &f1)
        .on_handler("click", &f2)
        .once("blabla", |args| println!("   once got {:?}", args));

    // -------------------------------------------------------------------------
    // 2. Emit events
    // -------------------------------------------------------------------------
    println!("\n2. Emitting `click` and `blabla`...");

    bus.emit("click", &args(&["1", "2", "3"]))
        .emit("blabla", &args(&["once"]));

    // -------------------------------------------------------------------------
    // 3. Remove f2 and emit again
    // -------------------------------------------------------------------------
    println!("\n3. Removing f2 and emitting again...");

    bus.off("click", &f2)
        .emit("click", &args(&["2"]))
        .emit("blabla", &args(&["twice"]));

    // -------------------------------------------------------------------------
    // 4. Inspect what is left
    // -------------------------------------------------------------------------
    println!("\n4. Remaining subscriptions: {:?}", bus);

    println!("\n=== Done ===");
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
