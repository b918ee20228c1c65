//! Login form state and its error mapping.

use thiserror::Error;

use crate::api::{ApiClient, ApiError, Credentials};
use crate::session::View;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Login failed. Please check your connection.")]
    Failed(#[source] ApiError),
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            LoginError::InvalidCredentials
        } else {
            LoginError::Failed(err)
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Inline message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn credentials(&self) -> Result<Credentials, LoginError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(LoginError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(LoginError::MissingField("password"));
        }
        Ok(Credentials::new(email, self.password.clone()))
    }

    /// Exchange the credentials for a token and sign the session in.
    ///
    /// The session is moved to the login view first so a 401 here reads as a
    /// bad password rather than an expired credential. On failure the
    /// previous view is restored.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<(), LoginError> {
        self.error = None;
        let previous_view = client.session().view();
        client.session().set_view(View::Login);

        let result = self.try_submit(client).await;
        if let Err(err) = &result {
            tracing::warn!("Login failed: {:?}", err);
            self.error = Some(err.to_string());
            client.session().set_view(previous_view);
        }
        result
    }

    async fn try_submit(&self, client: &ApiClient) -> Result<(), LoginError> {
        let credentials = self.credentials()?;
        let token = client.login(&credentials).await?;
        client
            .session()
            .sign_in(&token)
            .map_err(|err| LoginError::Failed(err.into()))?;
        tracing::info!(email = %credentials.email, "Logged in");
        Ok(())
    }
}
