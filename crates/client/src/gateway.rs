//! Authenticated request gateway.
//!
//! Every API call goes through [`Gateway::execute`], which attaches the
//! session's bearer token and handles an expired access token with at most
//! one refresh followed by at most one retry:
//!
//! 1. send with the current access token (or the caller's own credential)
//! 2. on 401 without a refresh token, clear the session and fail
//! 3. otherwise call the refresh endpoint once; on success store the new
//!    access token and replay the original request once
//! 4. if the refresh fails, clear the session and surface the original 401
//! 5. whatever the replay returns is final, including another 401

use crate::error::{ApiError, ApiResult};
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, RawResponse, Transport};
use folio_core::API_PREFIX;
use folio_core::session::{RefreshResponse, RefreshTokenRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Path of the token refresh endpoint.
pub fn refresh_path() -> String {
    format!("{API_PREFIX}/auth/refresh-token")
}

#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Perform `request`, returning the unwrapped payload of a 2xx response.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Value> {
        let bearer = request
            .bearer
            .clone()
            .or_else(|| self.tokens.access_token());
        let first = self.send(request, bearer.as_deref()).await?;
        if first.status != 401 {
            return into_payload(first);
        }

        let Some(refresh_token) = self.tokens.refresh_token() else {
            debug!(request = %request, "401 without a refresh token");
            self.tokens.clear();
            return Err(auth_expired(first));
        };

        let Some(access_token) = self.refresh(&refresh_token).await else {
            self.tokens.clear();
            return Err(auth_expired(first));
        };
        self.tokens.set_access_token(&access_token);

        debug!(request = %request, "retrying after token refresh");
        let retried = self.send(request, Some(&access_token)).await?;
        if retried.status == 401 {
            info!(request = %request, "still unauthorized after refresh; signing out");
            self.tokens.clear();
            return Err(auth_expired(retried));
        }
        into_payload(retried)
    }

    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> ApiResult<RawResponse> {
        self.transport.send(request, bearer).await.map_err(|e| {
            warn!(request = %request, error = %e, "request failed");
            ApiError::Network(e.0)
        })
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Sent without a bearer credential. Any failure, including a 2xx
    /// without a token, yields `None`.
    async fn refresh(&self, refresh_token: &str) -> Option<String> {
        let request = ApiRequest::post(refresh_path())
            .with_json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            })
            .ok()?;
        let response = match self.transport.send(&request, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return None;
            }
        };
        if !response.is_success() {
            warn!(status = response.status, "token refresh rejected");
            return None;
        }
        match serde_json::from_value::<RefreshResponse>(unwrap_envelope(response.body)) {
            Ok(RefreshResponse {
                access_token: Some(access_token),
            }) if !access_token.is_empty() => {
                info!("access token refreshed");
                Some(access_token)
            }
            _ => {
                warn!("token refresh response carried no access token");
                None
            }
        }
    }
}

/// Strip a top-level `{"data": ...}` envelope.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn into_payload(response: RawResponse) -> ApiResult<Value> {
    if response.is_success() {
        Ok(unwrap_envelope(response.body))
    } else {
        Err(ApiError::Server {
            status: response.status,
            body: response.body,
        })
    }
}

fn auth_expired(response: RawResponse) -> ApiError {
    ApiError::AuthExpired {
        status: response.status,
        body: response.body,
    }
}
