//! Shared fixtures for model policy tests.

#![allow(dead_code)]

use mealappeal_models::{
    ImageDetail, ModelCost, ModelDescriptor, ModelRegistry, TierPolicy, TierPolicyTable,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// A live model with the given prices.
pub fn model(id: &str, input: f64, output: f64) -> ModelDescriptor {
    ModelDescriptor::builder()
        .model_id(id)
        .display_name(id.to_uppercase())
        .max_tokens(800u32)
        .temperature(0.4)
        .image_detail(ImageDetail::Auto)
        .cost_per_million_tokens(ModelCost::new(input, output))
        .build()
        .unwrap()
}

/// A deprecated model pointing at `fallback`.
pub fn deprecated(id: &str, fallback: &str) -> ModelDescriptor {
    ModelDescriptor::builder()
        .model_id(id)
        .display_name(id.to_uppercase())
        .max_tokens(800u32)
        .temperature(0.4)
        .cost_per_million_tokens(ModelCost::new(5.0, 15.0))
        .deprecated(true)
        .deprecation_date("2024-12-31")
        .fallback_model_id(fallback)
        .build()
        .unwrap()
}

/// A deprecated model with no replacement.
pub fn retired(id: &str) -> ModelDescriptor {
    ModelDescriptor::builder()
        .model_id(id)
        .display_name(id.to_uppercase())
        .max_tokens(800u32)
        .temperature(0.4)
        .cost_per_million_tokens(ModelCost::new(5.0, 15.0))
        .deprecated(true)
        .build()
        .unwrap()
}

/// Registry `{A: live, B: deprecated -> A}` with `A` as default.
pub fn a_b_registry() -> ModelRegistry {
    ModelRegistry::new(vec![model("A", 1.0, 2.0), deprecated("B", "A")], "A").unwrap()
}

/// Every tier pointing at `model_id` with no overrides.
pub fn uniform_policies(model_id: &str, safe_default: &str) -> TierPolicyTable {
    TierPolicyTable::new(
        TierPolicy::new(model_id, safe_default),
        TierPolicy::new(model_id, safe_default),
        TierPolicy::new(model_id, safe_default),
    )
}

/// One recorded `tracing` event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Layer that records every event it sees.
#[derive(Debug, Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedEvents {
    /// Run `f` with only this layer installed, returning its result.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        use tracing_subscriber::layer::SubscriberExt;

        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    /// WARN events carrying `substitution = kind`.
    pub fn substitutions(&self, kind: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == Level::WARN && event.field("substitution") == Some(kind))
            .cloned()
            .collect()
    }

    /// Every WARN event.
    pub fn warnings(&self) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == Level::WARN)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }
}
