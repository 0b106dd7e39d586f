//! In-memory tracing layer for asserting on emitted events and span fields.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: &'static str,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<CapturedEvent>,
    spans: Vec<CapturedSpan>,
    index: HashMap<Id, usize>,
}

/// Records every event and span seen while its guard is held.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    inner: Arc<Mutex<Inner>>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the thread-local subscriber until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// Events whose target starts with `prefix`, in emission order.
    pub fn events_from(&self, prefix: &str) -> Vec<CapturedEvent> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.target.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// The most recent span with this name.
    pub fn span(&self, name: &str) -> Option<CapturedSpan> {
        self.inner
            .lock()
            .unwrap()
            .spans
            .iter()
            .rev()
            .find(|s| s.name == name)
            .cloned()
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);

        let mut inner = self.inner.lock().unwrap();
        let idx = inner.spans.len();
        inner.spans.push(CapturedSpan {
            name: attrs.metadata().name(),
            fields: visitor.fields,
        });
        inner.index.insert(id.clone(), idx);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);

        let mut inner = self.inner.lock().unwrap();
        if let Some(&idx) = inner.index.get(id) {
            inner.spans[idx].fields.extend(visitor.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.inner.lock().unwrap().events.push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.fields.remove("message").unwrap_or_default(),
        });
    }
}
