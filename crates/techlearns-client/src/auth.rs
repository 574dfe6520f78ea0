//! Role-specific login and registration.

use reqwest::Method;
use serde::Deserialize;
use techlearns_core::validation::{LoginForm, SignupForm};
use techlearns_core::{Session, UserInfo, UserType};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Login and register responses. The profile arrives either under a role
/// key or inline next to the token.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, alias = "mentor", alias = "school")]
    user: Option<UserInfo>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl AuthResponse {
    fn into_session(self, user_type: UserType) -> ClientResult<Option<Session>> {
        let Some(token) = self.token else {
            return Ok(None);
        };
        let user_info = match self.user {
            Some(user) => user,
            None => serde_json::from_value(serde_json::Value::Object(self.rest))
                .map_err(|e| ClientError::Decode(e.to_string()))?,
        };
        Ok(Some(Session::new(token, user_info, user_type)))
    }
}

/// What registration produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// The service logged the new account in.
    LoggedIn(Session),
    /// Account created; the user still has to log in.
    LoginRequired,
}

fn auth_path(user_type: UserType, action: &str) -> String {
    format!("/api/{}/{}", user_type.api_segment(), action)
}

/// Client for `/api/{users,mentors,schools}/{login,register}`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate the form, then log in. Invalid forms never reach the network.
    pub async fn login(&self, form: &LoginForm) -> ClientResult<Session> {
        form.validate()?;
        let request = self
            .api
            .request(Method::POST, &auth_path(form.user_type, "login"), None)
            .json(form);
        let response: AuthResponse = self.api.send_json(request).await?;
        response
            .into_session(form.user_type)?
            .ok_or_else(|| ClientError::Decode("login response has no token".to_string()))
    }

    /// Validate the form, then register.
    pub async fn register(&self, form: &SignupForm) -> ClientResult<RegisterOutcome> {
        form.validate()?;
        let request = self
            .api
            .request(Method::POST, &auth_path(form.user_type, "register"), None)
            .json(form);
        let response: AuthResponse = self.api.send_json(request).await?;
        Ok(match response.into_session(form.user_type)? {
            Some(session) => RegisterOutcome::LoggedIn(session),
            None => RegisterOutcome::LoginRequired,
        })
    }
}
