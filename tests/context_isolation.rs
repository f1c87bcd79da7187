//! Concurrent dispatch tests: correlation ids and log context never cross
//! between invocations running on different threads.

use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Barrier, Mutex};

use toolhost::context_event;
use toolhost::tools::{tool_fn, Params, Registry};
use toolhost::Dispatcher;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// One captured event: field name → rendered value.
type Record = HashMap<String, String>;

#[derive(Clone, Default)]
struct CaptureLayer {
    records: Arc<Mutex<Vec<Record>>>,
}

struct FieldVisitor<'a>(&'a mut Record);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut record = Record::new();
        event.record(&mut FieldVisitor(&mut record));
        self.records.lock().unwrap().push(record);
    }
}

fn dispatcher(barrier: Arc<Barrier>) -> Dispatcher {
    let mut builder = Registry::builder();
    for name in ["alpha", "beta"] {
        let barrier = Arc::clone(&barrier);
        builder
            .register(
                &format!("T/{}", name),
                tool_fn("T", name, "waits for its peer", move |ctx, _| {
                    ctx.logger().info("before rendezvous");
                    // Both invocations are in flight at the same time past this point.
                    barrier.wait();
                    context_event!(info, ctx.logger(), step = "after", "after rendezvous");
                    Ok(json!({"caller": ctx.caller().as_str()}))
                }),
            )
            .unwrap();
    }
    Dispatcher::new(Arc::new(builder.build()))
}

#[test]
fn test_concurrent_invocations_keep_their_own_context() {
    let barrier = Arc::new(Barrier::new(2));
    let dispatcher = dispatcher(barrier);

    let runs = [("user-a", "T/alpha"), ("user-b", "T/beta")];
    let outcomes: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = runs
            .iter()
            .map(|&(caller, path)| {
                let dispatcher = &dispatcher;
                s.spawn(move || {
                    let layer = CaptureLayer::default();
                    let records = Arc::clone(&layer.records);
                    let subscriber = tracing_subscriber::registry().with(layer);
                    let result = tracing::subscriber::with_default(subscriber, || {
                        dispatcher.execute(caller, path, Params::new())
                    });
                    let records = records.lock().unwrap().clone();
                    (caller, path, result, records)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let (_, _, first, _) = &outcomes[0];
    let (_, _, second, _) = &outcomes[1];
    assert!(first.is_success() && second.is_success());
    assert_ne!(first.correlation_id(), second.correlation_id());

    for (caller, path, result, records) in &outcomes {
        assert_eq!(result.payload(), Some(&json!({"caller": caller})));
        assert!(records.iter().any(|r| r.get("step").map(String::as_str) == Some("after")));

        for record in records.iter().filter(|r| r.contains_key("correlation_id")) {
            assert_eq!(record["correlation_id"], result.correlation_id().as_str());
            assert_eq!(record["caller"], *caller);
            assert_eq!(record["tool_path"], *path);
        }
    }
}

#[test]
fn test_context_fields_on_every_dispatch_event() {
    let layer = CaptureLayer::default();
    let records = Arc::clone(&layer.records);
    let subscriber = tracing_subscriber::registry().with(layer);

    let barrier = Arc::new(Barrier::new(1));
    let dispatcher = dispatcher(barrier);
    let result = tracing::subscriber::with_default(subscriber, || {
        dispatcher.execute("user-a", "T/alpha", Params::new())
    });

    let records = records.lock().unwrap();
    let messages: Vec<&str> = records
        .iter()
        .filter(|r| r.contains_key("correlation_id"))
        .filter_map(|r| r.get("message").map(String::as_str))
        .collect();

    assert!(messages.contains(&"tool execution started"));
    assert!(messages.contains(&"before rendezvous"));
    assert!(messages.contains(&"tool execution completed"));
    assert!(records
        .iter()
        .filter(|r| r.contains_key("correlation_id"))
        .all(|r| r["correlation_id"] == result.correlation_id().as_str()));
}
