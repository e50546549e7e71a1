//! Session lifecycle.
//!
//! Exactly one store subscription exists while a principal is signed
//! in, zero while signed out. The subscription is scoped to the
//! session: a new sign-in replaces it, sign-out releases it.

use std::sync::Arc;

use crate::auth::{AuthEvent, Principal};
use crate::error::Result;
use crate::store::{namespace_for, StoreMsg, Subscription, TaskStore};

/// The currently authenticated principal.
#[derive(Debug, Clone)]
pub struct Session {
    pub principal: Principal,
}

impl Session {
    /// Namespace holding this principal's task documents.
    pub fn namespace(&self) -> String {
        namespace_for(&self.principal.id)
    }
}

/// Reacts to identity transitions, switching between signed-out and
/// signed-in state and (re)starting/stopping the store subscription.
pub struct SessionController {
    store: Arc<dyn TaskStore>,
    session: Option<Session>,
    subscription: Option<Subscription>,
}

impl SessionController {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            session: None,
            subscription: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Apply an identity transition.
    ///
    /// A failed sign-in leaves prior state (and any live subscription)
    /// unchanged; the caller surfaces the error once and does not retry.
    pub fn handle_auth_event(&mut self, event: AuthEvent) -> Result<()> {
        match event {
            AuthEvent::SignedIn(principal) => {
                let namespace = namespace_for(&principal.id);
                let subscription = self.store.subscribe(&namespace)?;
                if let Some(previous) = self.subscription.take() {
                    previous.cancel();
                }
                tracing::debug!(namespace = %namespace, principal = %principal.id, "session started");
                self.subscription = Some(subscription);
                self.session = Some(Session { principal });
            }
            AuthEvent::SignedOut => {
                if let Some(previous) = self.subscription.take() {
                    previous.cancel();
                }
                if let Some(session) = self.session.take() {
                    tracing::debug!(principal = %session.principal.id, "session ended");
                }
            }
        }
        Ok(())
    }

    /// Drain pending subscription messages without blocking.
    pub fn poll(&mut self) -> Vec<StoreMsg> {
        let mut messages = Vec::new();
        if let Some(subscription) = self.subscription.as_ref() {
            while let Some(msg) = subscription.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}
