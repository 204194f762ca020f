//! In-process domain events
//!
//! A typed channel: handlers subscribe to an [`EventKind`] and receive the
//! matching [`DomainEvent`] variant. Handler failures are collected into an
//! [`EmitReport`] instead of being discarded, and never fail the emitter.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::models::{Feedback, MetadataWeight, RecommendationType};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSubmitted {
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsRefreshed {
    pub user_id: String,
    pub kind: RecommendationType,
    pub count: usize,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataWeightsUpdated {
    pub user_id: String,
    pub weights: Vec<MetadataWeight>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    FeedbackSubmitted(FeedbackSubmitted),
    RecommendationsRefreshed(RecommendationsRefreshed),
    MetadataWeightsUpdated(MetadataWeightsUpdated),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FeedbackSubmitted,
    RecommendationsRefreshed,
    MetadataWeightsUpdated,
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::FeedbackSubmitted(_) => EventKind::FeedbackSubmitted,
            DomainEvent::RecommendationsRefreshed(_) => EventKind::RecommendationsRefreshed,
            DomainEvent::MetadataWeightsUpdated(_) => EventKind::MetadataWeightsUpdated,
        }
    }
}

type Handler = Arc<dyn Fn(&DomainEvent) -> anyhow::Result<()> + Send + Sync>;

/// A handler error captured during [`EventEmitter::emit`]
#[derive(Debug)]
pub struct HandlerFailure {
    pub kind: EventKind,
    /// Position of the handler in registration order
    pub handler_index: usize,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct EmitReport {
    pub delivered: usize,
    pub failures: Vec<HandlerFailure>,
}

impl EmitReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pub/sub bus scoped to one session
#[derive(Default)]
pub struct EventEmitter {
    handlers: RwLock<HashMap<EventKind, Vec<Handler>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler for `kind`; handlers run in registration order
    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&DomainEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        handlers.entry(kind).or_default().push(Arc::new(handler));
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` synchronously to every handler of its kind
    ///
    /// Handlers run against a snapshot taken before the first call, so a
    /// handler may subscribe to this emitter; new handlers see the next emit.
    /// A panicking handler is recorded as a failure like an `Err` return.
    pub fn emit(&self, event: &DomainEvent) -> EmitReport {
        let kind = event.kind();
        let subscribers: Vec<Handler> = self
            .handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        let mut report = EmitReport::default();
        for (handler_index, handler) in subscribers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| handler(event))).unwrap_or_else(|payload| {
                Err(anyhow::anyhow!("handler panicked: {}", panic_message(&*payload)))
            });

            match result {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    tracing::warn!(
                        event = ?kind,
                        handler_index,
                        error = %error,
                        "Event handler failed"
                    );
                    report.failures.push(HandlerFailure {
                        kind,
                        handler_index,
                        error,
                    });
                }
            }
        }

        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
