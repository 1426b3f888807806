//! # Request Context
//!
//! Per-call value carrying routing metadata, the event log and phase state.
//!
//! ## Value Semantics
//!
//! Every `with_*` producer consumes the context and returns a new value with
//! exactly one field changed. Clone first to keep the original:
//!
//! ```rust,ignore
//! let base = RequestContext::new(BaseContext::background(), EventLog::new());
//! let at_height = base.clone().with_height(42);
//! ```
//!
//! ## Event Log Ownership
//!
//! The event log is a constructor parameter. Passing `EventLog::new()` gives
//! the call its own log; passing a handle taken from another context makes
//! both contexts append to the same list. Derivations through `with_*`
//! keep whatever log the context already holds.
//!
//! ## Phase
//!
//! A context is in the response phase iff it carries a validated response.

use crate::entities::{Operator, ValidatedResponse};
use crate::events::{Event, EventLog};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

// =============================================================================
// BASE CONTEXT (cancellation and deadline)
// =============================================================================

/// Cancellation and deadline carrier embedded in every request context.
#[derive(Debug, Clone, Default)]
pub struct BaseContext {
    signals: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Handle that cancels the `BaseContext` it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the paired context and everything derived from it.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl BaseContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that is also cancelled through the returned handle.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut child = self.clone();
        child.signals.push(rx);
        (child, CancelHandle { tx })
    }

    /// Derive a context expiring at `deadline`, or earlier if already bounded.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut child = self.clone();
        child.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        child
    }

    /// Derive a context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context was cancelled or its deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return true;
        }
        self.signals.iter().any(|rx| *rx.borrow())
    }

    /// Resolves once the context is cancelled or expires.
    ///
    /// Never resolves for a background context.
    pub async fn cancelled(&self) {
        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(d) => tokio::time::sleep_until(tokio::time::Instant::from_std(d)).await,
                None => std::future::pending::<()>().await,
            }
        };

        let waiters: Vec<_> = self
            .signals
            .iter()
            .cloned()
            .map(|mut rx| {
                Box::pin(async move {
                    // A dropped handle can no longer cancel.
                    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                })
            })
            .collect();
        let signalled = async move {
            if waiters.is_empty() {
                std::future::pending::<()>().await;
            } else {
                futures::future::select_all(waiters).await;
            }
        };

        tokio::select! {
            () = expiry => {}
            () = signalled => {}
        }
    }
}

// =============================================================================
// REQUEST CONTEXT
// =============================================================================

/// Per-call dispatch context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    base: BaseContext,
    chain_id: i64,
    height: i64,
    group_numbers: Vec<u32>,
    group_threshold_percentages: Vec<u32>,
    request_payload: Vec<u8>,
    operators: Vec<Operator>,
    validated_response: Option<Arc<ValidatedResponse>>,
    events: EventLog,
    span: tracing::Span,
}

impl RequestContext {
    /// Create a context around `base` that records into `events`.
    pub fn new(base: BaseContext, events: EventLog) -> Self {
        Self {
            base,
            chain_id: 0,
            height: 0,
            group_numbers: Vec::new(),
            group_threshold_percentages: Vec::new(),
            request_payload: Vec::new(),
            operators: Vec::new(),
            validated_response: None,
            events,
            span: tracing::Span::none(),
        }
    }

    /// Background context with its own event log.
    pub fn background() -> Self {
        Self::new(BaseContext::background(), EventLog::new())
    }

    // -------------------------------------------------------------------------
    // Read-only accessors
    // -------------------------------------------------------------------------

    pub fn base(&self) -> &BaseContext {
        &self.base
    }

    pub fn chain_id(&self) -> i64 {
        self.chain_id
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn group_numbers(&self) -> &[u32] {
        &self.group_numbers
    }

    pub fn group_threshold_percentages(&self) -> &[u32] {
        &self.group_threshold_percentages
    }

    pub fn request_payload(&self) -> &[u8] {
        &self.request_payload
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn validated_response(&self) -> Option<&ValidatedResponse> {
        self.validated_response.as_deref()
    }

    /// True once a validated response is attached.
    pub fn is_response_phase(&self) -> bool {
        self.validated_response.is_some()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    /// Shorthand for `event_log().emit(event)`.
    pub fn emit_event(&self, event: Event) {
        self.events.emit(event);
    }

    /// Span handlers should log under.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn is_cancelled(&self) -> bool {
        self.base.is_cancelled()
    }

    // -------------------------------------------------------------------------
    // Producers
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn with_base(mut self, base: BaseContext) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_chain_id(mut self, chain_id: i64) -> Self {
        self.chain_id = chain_id;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: i64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_group_numbers(mut self, group_numbers: Vec<u32>) -> Self {
        self.group_numbers = group_numbers;
        self
    }

    #[must_use]
    pub fn with_group_threshold_percentages(mut self, percentages: Vec<u32>) -> Self {
        self.group_threshold_percentages = percentages;
        self
    }

    #[must_use]
    pub fn with_request_payload(mut self, payload: Vec<u8>) -> Self {
        self.request_payload = payload;
        self
    }

    #[must_use]
    pub fn with_operators(mut self, operators: Vec<Operator>) -> Self {
        self.operators = operators;
        self
    }

    /// Attach (or clear) the validated response, switching the phase.
    #[must_use]
    pub fn with_validated_response(mut self, response: Option<ValidatedResponse>) -> Self {
        self.validated_response = response.map(Arc::new);
        self
    }

    /// Replace the event log handle.
    #[must_use]
    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }
}
