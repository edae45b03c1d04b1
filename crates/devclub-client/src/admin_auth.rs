//! Admin sign-in and sign-out

use crate::api_client::ApiClient;
use crate::notify::{Notice, Notifier};
use crate::routes::Route;
use devclub_core::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Admin login page behaviour
pub struct AdminAuthFlow {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for AdminAuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthFlow")
            .field("session", self.api.session())
            .finish_non_exhaustive()
    }
}

impl AdminAuthFlow {
    /// Create the flow
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Open the login page; an existing token skips straight to the dashboard
    pub fn enter(&self) -> Route {
        self.api.session().enter(Route::AdminLogin)
    }

    /// Sign in with email and password
    ///
    /// There is no lockout; every attempt goes to the server.
    ///
    /// # Errors
    ///
    /// Returns the validation, request or session error after notifying
    /// "Login Failed". The token store is untouched unless the server answered
    /// 401, in which case it is empty.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        match self.try_login(email, password).await {
            Ok(()) => {
                info!(email, "Admin signed in");
                self.notifier.notify(Notice::success(
                    "Login Successful",
                    "Welcome to the admin dashboard",
                ));
                self.api.session().navigate(Route::AdminDashboard);
                Ok(())
            }
            Err(e) => {
                warn!(email, "Admin sign-in failed: {}", e);
                self.notifier.notify(Notice::from_error("Login Failed", &e));
                Err(e)
            }
        }
    }

    /// Sign out and return to the login page
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be cleared.
    pub fn logout(&self) -> Result<()> {
        self.api.session().end()?;
        self.api.session().navigate(Route::AdminLogin);
        self.notifier
            .notify(Notice::info("Logged Out", "You have been signed out"));
        Ok(())
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(Error::validation("email", "Email is required"));
        }
        if password.is_empty() {
            return Err(Error::validation("password", "Password is required"));
        }

        let response = self.api.admin_login(email.trim(), password).await?;
        let token = response
            .token()
            .ok_or_else(|| Error::Authentication("No access token received".to_string()))?;
        self.api.session().establish(token)
    }
}
