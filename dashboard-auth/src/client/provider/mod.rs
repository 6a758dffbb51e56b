mod registry;
mod rest;

pub use registry::{ListenerRegistry, Subscription};
pub use rest::RestIdentityProvider;

use secrecy::SecretString;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::common::Identity;

/// External identity provider handle.
///
/// Constructed by the composition root and passed to [`crate::SessionObserver`]
/// and [`crate::SessionLogin`], so tests can substitute their own provider.
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with email and password. A single attempt, no retries.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Register a listener for authentication state changes.
    ///
    /// The listener receives the current identity (or `None` when signed out)
    /// every time the provider's state changes. Deliveries never overlap.
    /// Dropping or cancelling the returned [`Subscription`] unregisters it.
    fn on_auth_state_changed<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(Option<Identity>) + Send + 'static;

    /// Identity of the current session, if any
    fn current_identity(&self) -> Option<Identity>;

    /// End the current session and notify listeners with `None`
    fn sign_out(&self) -> impl Future<Output = ()> + Send;

    /// Keep the current session's credentials valid.
    ///
    /// Providers without expiring credentials keep the default no-op.
    fn refresh_session(&self) -> impl Future<Output = Result<(), ProviderError>> + Send {
        async { Ok(()) }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider refused the request (bad credentials, disabled account, ...)
    #[error("{}", .description.as_deref().unwrap_or(.code.as_str()))]
    Rejected {
        code: String,
        description: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Human readable description suitable for showing to the user
    pub fn description(&self) -> Option<&str> {
        let description = match self {
            ProviderError::Rejected { description, .. } => description.as_deref(),
            ProviderError::Network(description) => Some(description.as_str()),
            ProviderError::MalformedResponse(_) => None,
        };
        description.filter(|d| !d.trim().is_empty())
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ProviderError::Rejected { .. })
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_without_description_has_none() {
        let err = ProviderError::Rejected {
            code: "OPERATION_NOT_ALLOWED".to_string(),
            description: None,
        };
        assert_eq!(err.description(), None);
        assert_eq!(err.to_string(), "OPERATION_NOT_ALLOWED");
    }

    #[test]
    fn blank_descriptions_count_as_missing() {
        let err = ProviderError::Rejected {
            code: "X".to_string(),
            description: Some("   ".to_string()),
        };
        assert_eq!(err.description(), None);
        assert_eq!(ProviderError::Network(String::new()).description(), None);
    }

    #[test]
    fn network_error_describes_itself() {
        let err = ProviderError::Network("Network request failed".to_string());
        assert_eq!(err.description(), Some("Network request failed"));
        assert!(!err.is_rejection());
    }

    #[test]
    fn malformed_response_has_no_user_description() {
        let err = ProviderError::MalformedResponse("lookup returned no users".to_string());
        assert_eq!(err.description(), None);
    }
}
