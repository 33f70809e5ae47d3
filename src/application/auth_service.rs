// Auth service - Simulated sign-up / sign-in against the local credential slot
use crate::application::credential_store::{CredentialStore, USER_KEY};
use crate::domain::error::{AuthError, ValidationError};
use crate::domain::user::{SignInForm, SignUpForm, StoredUser};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionGateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("credential store failure: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    simulated_delay: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, simulated_delay: Duration) -> Self {
        Self {
            store,
            simulated_delay,
        }
    }

    /// Overwrites the stored record unconditionally.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<StoredUser, SessionGateError> {
        self.simulate_latency().await;
        form.validate()?;

        let user = form.into_user();
        self.store.save(USER_KEY, &user).await?;
        tracing::info!(email = %user.email, "account created");
        Ok(user)
    }

    pub async fn sign_in(&self, form: SignInForm) -> Result<StoredUser, SessionGateError> {
        self.simulate_latency().await;
        form.validate()?;

        match self.store.load(USER_KEY).await? {
            Some(user) if form.matches(&user) => {
                tracing::info!(email = %user.email, "signed in");
                Ok(user)
            }
            _ => {
                tracing::debug!(email = %form.email, "sign-in rejected");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    async fn simulate_latency(&self) {
        if !self.simulated_delay.is_zero() {
            tokio::time::sleep(self.simulated_delay).await;
        }
    }
}
