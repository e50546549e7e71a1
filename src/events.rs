//! Event dispatch.
//!
//! All inbound control flow (identity transitions, subscription pushes,
//! user input) funnels through `apply_event`, one reducer-like function
//! that updates the session controller and presenter and reports
//! whether the view changed plus an optional user-facing notice.
//! Failures surface as a single notice and are never retried.

use chrono::NaiveDate;

use crate::auth::{AuthEvent, IdentityProvider};
use crate::presenter::Presenter;
use crate::session::SessionController;
use crate::store::StoreMsg;
use crate::task::{Filter, TaskRecord};

/// A user interaction translated away from the input layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    SignIn,
    SignOut,
    Add {
        title: String,
        due_date: Option<NaiveDate>,
    },
    Toggle {
        id: String,
        completed: bool,
    },
    Retitle {
        id: String,
        title: String,
    },
    Delete {
        id: String,
    },
    ClearCompleted,
    SetFilter(Filter),
}

/// Inbound events consumed by the reducer.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Auth(AuthEvent),
    Snapshot(Vec<TaskRecord>),
    StoreError(String),
    Action(UserAction),
}

impl From<StoreMsg> for AppEvent {
    fn from(msg: StoreMsg) -> Self {
        match msg {
            StoreMsg::Snapshot(tasks) => AppEvent::Snapshot(tasks),
            StoreMsg::Error(text) => AppEvent::StoreError(text),
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// The view model changed and needs a re-render.
    pub changed: bool,
    /// Single user-facing notification, e.g. a failed sign-in.
    pub notice: Option<String>,
}

impl Outcome {
    fn changed() -> Self {
        Self {
            changed: true,
            notice: None,
        }
    }

    fn notice(text: impl Into<String>) -> Self {
        Self {
            changed: false,
            notice: Some(text.into()),
        }
    }

    fn quiet() -> Self {
        Self::default()
    }
}

/// Consume one inbound event.
pub fn apply_event(
    presenter: &mut Presenter,
    controller: &mut SessionController,
    provider: &dyn IdentityProvider,
    event: AppEvent,
) -> Outcome {
    match event {
        AppEvent::Auth(auth_event) => {
            let signed_out = matches!(auth_event, AuthEvent::SignedOut);
            match controller.handle_auth_event(auth_event) {
                Ok(()) => {
                    if signed_out {
                        presenter.clear();
                    }
                    Outcome::changed()
                }
                Err(err) => Outcome::notice(err.to_string()),
            }
        }
        AppEvent::Snapshot(tasks) => {
            presenter.receive_snapshot(tasks);
            Outcome::changed()
        }
        AppEvent::StoreError(text) => {
            tracing::warn!("subscription error: {text}");
            Outcome::notice(format!("Sync error: {text}"))
        }
        AppEvent::Action(action) => apply_action(presenter, controller, provider, action),
    }
}

fn apply_action(
    presenter: &mut Presenter,
    controller: &mut SessionController,
    provider: &dyn IdentityProvider,
    action: UserAction,
) -> Outcome {
    let session = controller.session();
    let result = match action {
        UserAction::SignIn => return into_outcome(provider.sign_in()),
        UserAction::SignOut => return into_outcome(provider.sign_out()),
        UserAction::SetFilter(filter) => {
            presenter.set_filter(filter);
            return Outcome::changed();
        }
        UserAction::Add { title, due_date } => presenter.request_add(session, &title, due_date),
        UserAction::Toggle { id, completed } => presenter.request_toggle(session, &id, completed),
        UserAction::Retitle { id, title } => presenter.request_retitle(session, &id, &title),
        UserAction::Delete { id } => presenter.request_delete(session, &id),
        UserAction::ClearCompleted => presenter.request_clear_completed(session),
    };
    match result {
        // The view only changes once the store pushes a new snapshot;
        // refused input (blank title, no session) is silently dropped.
        Ok(_) => Outcome::quiet(),
        Err(err) => Outcome::notice(err.to_string()),
    }
}

fn into_outcome(result: crate::error::Result<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::quiet(),
        Err(err) => Outcome::notice(err.to_string()),
    }
}
