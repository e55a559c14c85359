use super::{ConsoleClient, Mutation, decode, json_request};
use crate::cache::{QueryKey, QuerySpec, ResourceTag};
use crate::error::{ApiError, ApiResult};
use crate::transport::ApiRequest;
use folio_core::API_PREFIX;
use folio_core::{Session, UserProfile};
use folio_core::session::{LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest};
use serde_json::Value;
use tracing::info;

pub const ME_ENDPOINT: &str = "me";

impl ConsoleClient {
    /// Identity check used by the session gate.
    pub fn me_query(&self) -> QuerySpec {
        self.query_spec(
            QueryKey::bare(ME_ENDPOINT),
            ApiRequest::get(format!("{API_PREFIX}/auth/me")),
            |_| vec![ResourceTag::Auth],
        )
    }

    pub async fn me(&self) -> ApiResult<UserProfile> {
        self.fetch(self.me_query()).await
    }

    /// Sign in and store the session.
    ///
    /// The session is only stored when the response carries both tokens and
    /// the user profile.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let request = json_request(
            ApiRequest::post(format!("{API_PREFIX}/auth/login")),
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )?;
        let payload = self
            .mutate(Mutation::new(request).invalidates([ResourceTag::Auth]))
            .await?;
        let response: LoginResponse = decode(payload)?;
        let Some(Session {
            access_token: Some(access),
            refresh_token: Some(refresh),
            user: Some(user),
        }) = response.into_session()
        else {
            return Err(ApiError::Decode(
                "login response is missing tokens or user".to_string(),
            ));
        };
        self.tokens().set_session(&access, &refresh, Some(user.clone()));
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        let request = json_request(ApiRequest::post(format!("{API_PREFIX}/auth/register")), request)?;
        self.mutate(Mutation::new(request)).await
    }

    /// Sign out.
    ///
    /// The local session and every cache entry are dropped before the server
    /// is told; a failed server call does not bring the session back.
    pub async fn logout(&self) -> ApiResult<()> {
        let session = self.tokens().session();
        self.tokens().clear();
        self.cache().reset();
        info!("signed out");

        let Some(refresh_token) = session.refresh_token else {
            return Ok(());
        };
        let mut request = json_request(
            ApiRequest::post(format!("{API_PREFIX}/auth/logout")),
            &RefreshTokenRequest { refresh_token },
        )?;
        if let Some(access) = session.access_token {
            request = request.with_bearer(access);
        }
        self.gateway().execute(&request).await.map(|_| ())
    }
}
