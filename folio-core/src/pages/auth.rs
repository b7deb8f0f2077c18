//! Login / register form

use crate::api::CatalogApi;
use crate::error::{ApiError, Result};
use crate::session::SessionContext;
use crate::types::{Ack, Registration, UserProfile};

/// Which form is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Combined login and registration form
#[derive(Debug)]
pub struct AuthPage {
    mode: AuthMode,
    session: SessionContext,
}

impl AuthPage {
    pub fn new(session: SessionContext) -> Self {
        Self {
            mode: AuthMode::Login,
            session,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switch between the login and register forms
    pub fn toggle_mode(&mut self) -> AuthMode {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.mode
    }

    /// Sign in and publish the user on the session
    pub async fn login(
        &mut self,
        api: &dyn CatalogApi,
        username: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let user = api.login(username.trim(), password).await?;
        self.session.sign_in(user.clone());
        Ok(user)
    }

    /// Validate locally, register, then switch back to the login form
    ///
    /// Nothing is sent when validation fails.
    pub async fn register(&mut self, api: &dyn CatalogApi, form: &Registration) -> Result<Ack> {
        form.validate()?;
        let ack = api.register(form).await?;
        tracing::info!("Registered {}", form.username);
        self.mode = AuthMode::Login;
        Ok(ack)
    }

    /// End the session; the local session is cleared even when the backend call fails
    pub async fn logout(&mut self, api: &dyn CatalogApi) -> Result<()> {
        let result = api.logout().await;
        self.session.sign_out();
        match result {
            Ok(_) | Err(ApiError::Unauthorized) => Ok(()),
            Err(e) => {
                tracing::warn!("Logout request failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}
