//! Interfaces for external dependencies of the domain layer.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::model::Principal;

/// Errors from the identity delegate.
///
/// `Unauthorized` is a security decision made by the auth service;
/// `ServiceUnavailable` is a transient infrastructure failure and must never
/// be collapsed into it.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication rejected: {0}")]
    Unauthorized(String),

    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Identity delegate: validates a bearer token against the external auth
/// service and returns the principal it vouches for.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthError>;
}

/// Externally-visible state changes propagated to webhook subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    VendorRegistered,
    VendorStatusChanged,
    BranchCreated,
    BranchUpdated,
    MenuItemCreated,
    MenuItemUpdated,
    OfferCreated,
    OfferUpdated,
    ReviewCreated,
    ReviewUpdated,
    ReplyCreated,
}

impl EventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::VendorRegistered => "vendor.registered",
            EventKind::VendorStatusChanged => "vendor.status_changed",
            EventKind::BranchCreated => "branch.created",
            EventKind::BranchUpdated => "branch.updated",
            EventKind::MenuItemCreated => "menu_item.created",
            EventKind::MenuItemUpdated => "menu_item.updated",
            EventKind::OfferCreated => "offer.created",
            EventKind::OfferUpdated => "offer.updated",
            EventKind::ReviewCreated => "review.created",
            EventKind::ReviewUpdated => "review.updated",
            EventKind::ReplyCreated => "reply.created",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: EventKind,
    pub data: serde_json::Value,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(kind: EventKind, data: &T) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(event = kind.as_str(), error = %e, "Failed to serialize event payload");
                serde_json::Value::Null
            }
        };
        Self { kind, data }
    }
}

/// Best-effort propagation of change events.
///
/// `publish` must return without awaiting delivery; failures are the
/// implementation's to log and swallow.
pub trait Notifier: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

/// No-op notifier for tests and for running without subscribers.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _event: ChangeEvent) {}
}
