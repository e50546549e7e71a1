//! Identity provider seam.
//!
//! The federated sign-in flow (provider popup, token exchange) is an
//! external collaborator. This module models it as a trait that emits
//! sign-in/sign-out transitions on a channel, the analog of the
//! provider's auth-state-changed callback. `DevIdentity` is the local
//! stand-in that signs a configured profile in immediately.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;
use crate::error::{Error, Result};

/// The signed-in principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    // The provider spells this one with trailing caps.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Identity transitions delivered by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Principal),
    SignedOut,
}

/// Seam for the external identity provider.
///
/// Implementations deliver transitions on the channel handed out at
/// construction; `sign_in`/`sign_out` only report whether the request
/// was accepted. A failed call emits no event and leaves prior state
/// unchanged.
pub trait IdentityProvider: Send {
    fn sign_in(&self) -> Result<()>;
    fn sign_out(&self) -> Result<()>;
}

/// Local development identity: signs in instantly with the configured
/// profile instead of opening a provider popup.
pub struct DevIdentity {
    principal: Principal,
    events: Mutex<Sender<AuthEvent>>,
}

impl DevIdentity {
    /// Build the provider and the receiving end of its event channel.
    pub fn new(profile: &IdentityConfig) -> (Self, Receiver<AuthEvent>) {
        let (tx, rx) = mpsc::channel();
        let principal = Principal {
            // Stable per display name so the same profile maps to the
            // same namespace across runs.
            id: format!("dev-{}", slug(&profile.display_name)),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            photo_url: profile.photo_url.clone(),
        };
        (
            Self {
                principal,
                events: Mutex::new(tx),
            },
            rx,
        )
    }

    fn send(&self, event: AuthEvent) -> Result<()> {
        let sender = self
            .events
            .lock()
            .map_err(|_| Error::OperationFailed("identity channel poisoned".to_string()))?;
        sender
            .send(event)
            .map_err(|_| Error::OperationFailed("identity listener gone".to_string()))
    }
}

impl IdentityProvider for DevIdentity {
    fn sign_in(&self) -> Result<()> {
        tracing::debug!(principal = %self.principal.id, "dev sign-in");
        self.send(AuthEvent::SignedIn(self.principal.clone()))
    }

    fn sign_out(&self) -> Result<()> {
        tracing::debug!(principal = %self.principal.id, "dev sign-out");
        self.send(AuthEvent::SignedOut)
    }
}

fn slug(value: &str) -> String {
    let slug: String = value
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        "user".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> IdentityConfig {
        IdentityConfig {
            client_id: String::new(),
            display_name: name.to_string(),
            email: Some("ada@example.com".to_string()),
            photo_url: None,
        }
    }

    #[test]
    fn sign_in_emits_principal_transition() {
        let (provider, events) = DevIdentity::new(&profile("Ada Lovelace"));
        provider.sign_in().expect("sign in");
        match events.recv().expect("event") {
            AuthEvent::SignedIn(principal) => {
                assert_eq!(principal.id, "dev-ada-lovelace");
                assert_eq!(principal.display_name, "Ada Lovelace");
                assert_eq!(principal.email.as_deref(), Some("ada@example.com"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn sign_out_emits_signed_out() {
        let (provider, events) = DevIdentity::new(&profile("Ada"));
        provider.sign_in().expect("sign in");
        provider.sign_out().expect("sign out");
        let _ = events.recv().expect("signed in");
        assert_eq!(events.recv().expect("signed out"), AuthEvent::SignedOut);
    }

    #[test]
    fn same_profile_maps_to_same_namespace_id() {
        let (a, _rx_a) = DevIdentity::new(&profile("Ada"));
        let (b, _rx_b) = DevIdentity::new(&profile("Ada"));
        assert_eq!(a.principal.id, b.principal.id);
    }
}
