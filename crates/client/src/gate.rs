//! Route guard for protected and guest-only views.

use crate::api::ConsoleClient;
use crate::error::{ApiError, ApiResult};
use folio_core::UserProfile;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use url::form_urlencoded;

/// Path of the sign-in view.
pub const SIGN_IN_PATH: &str = "/login";

/// Where to send a visitor who must sign in first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignInRedirect {
    /// The path originally requested.
    pub next: String,
}

impl SignInRedirect {
    pub fn new(next: impl Into<String>) -> Self {
        Self { next: next.into() }
    }

    /// `/login?next=<encoded path>`.
    pub fn location(&self) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("next", &self.next)
            .finish();
        format!("{SIGN_IN_PATH}?{query}")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GateState {
    #[default]
    Unchecked,
    Checking,
    Authenticated(UserProfile),
    Unauthenticated(SignInRedirect),
}

impl GateState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Guard for protected views.
///
/// `unchecked -> checking -> authenticated | unauthenticated`. Without an
/// access token the gate goes straight to `unauthenticated`. Otherwise it
/// runs the identity check through the cache, so concurrent checks share a
/// single request.
#[derive(Clone)]
pub struct SessionGate {
    client: ConsoleClient,
    state: Arc<Mutex<GateState>>,
}

impl SessionGate {
    pub fn new(client: ConsoleClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(GateState::Unchecked)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("gate state mutex was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    fn transition(&self, next: GateState) -> GateState {
        let mut state = self.guard();
        debug!(from = ?*state, to = ?next, "session gate transition");
        *state = next.clone();
        next
    }

    pub fn state(&self) -> GateState {
        self.guard().clone()
    }

    /// Decide whether `requested_path` may render.
    ///
    /// A 401 that survives the gateway's refresh ends in `Unauthenticated`.
    /// Other failures (network, server errors) are returned and put the gate
    /// back to `Unchecked` so the check can be retried.
    pub async fn check(&self, requested_path: &str) -> ApiResult<GateState> {
        if self.client.tokens().access_token().is_none() {
            info!(path = requested_path, "no session; redirecting to sign-in");
            return Ok(self.transition(GateState::Unauthenticated(SignInRedirect::new(
                requested_path,
            ))));
        }

        self.transition(GateState::Checking);
        match self.client.me().await {
            Ok(profile) => Ok(self.transition(GateState::Authenticated(profile))),
            Err(ApiError::AuthExpired { .. }) => {
                info!(path = requested_path, "session rejected; redirecting to sign-in");
                Ok(self.transition(GateState::Unauthenticated(SignInRedirect::new(
                    requested_path,
                ))))
            }
            Err(e) => {
                self.transition(GateState::Unchecked);
                Err(e)
            }
        }
    }
}

/// Where the sign-in view sends an already authenticated user.
///
/// Only absolute in-app paths are honored; anything else goes home.
pub fn guest_return_path(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}
