//! Authenticated session and the auth endpoint wire types.

use crate::id::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in staff member.
///
/// Only the id is relied upon; every other field the backend sends is kept
/// in `extra` so the profile round-trips through durable storage intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Name to show in the console header.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| format!("user {}", self.id))
    }
}

/// In-memory session state.
///
/// The access and refresh tokens travel together: a session with only one
/// of them is treated as signed out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Build a session, collapsing partial or blank credentials to empty.
    pub fn new(
        access_token: Option<String>,
        refresh_token: Option<String>,
        user: Option<UserProfile>,
    ) -> Self {
        let access_token = access_token.filter(|t| !t.is_empty());
        let refresh_token = refresh_token.filter(|t| !t.is_empty());
        match (access_token, refresh_token) {
            (Some(access), Some(refresh)) => Self {
                access_token: Some(access),
                refresh_token: Some(refresh),
                user,
            },
            _ => Self::default(),
        }
    }

    /// Whether both tokens are present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }
}

/// Body of `POST /v1/auth/login`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /v1/auth/register`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of `POST /v1/auth/login`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl LoginResponse {
    /// Convert into a session when all three parts are present.
    pub fn into_session(self) -> Option<Session> {
        match (self.access_token, self.refresh_token, self.user) {
            (Some(access), Some(refresh), Some(user)) => {
                let session = Session::new(Some(access), Some(refresh), Some(user));
                session.is_authenticated().then_some(session)
            }
            _ => None,
        }
    }
}

/// Body of `POST /v1/auth/refresh-token` and `POST /v1/auth/logout`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Response of `POST /v1/auth/refresh-token`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}
