use std::sync::Arc;
use tokio::sync::watch;

use crate::client::provider::{IdentityProvider, Subscription};
use crate::client::storage::KeyValueStore;
use crate::common::{Identity, SessionSnapshot};

/// What the rendering layer knows about the signed in user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No answer from the provider yet
    #[default]
    Initializing,
    /// The provider reported a user, or `None` when nobody is signed in
    Known(Option<Identity>),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Known(identity) => identity.as_ref(),
            SessionState::Initializing => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity().is_some()
    }
}

/// Follows the provider's auth state for as long as it is active.
///
/// Dropping the observer (or calling [`SessionObserver::deactivate`]) unregisters
/// its listener.
pub struct SessionObserver {
    state: watch::Receiver<SessionState>,
    subscription: Option<Subscription>,
}

impl SessionObserver {
    pub fn activate<P: IdentityProvider>(provider: &P) -> Self {
        Self::start(provider, None)
    }

    /// Like [`SessionObserver::activate`], and also clears the stored
    /// [`SessionSnapshot`] whenever the provider reports that nobody is signed in.
    pub fn activate_with_snapshot<P, S>(provider: &P, store: Arc<S>) -> Self
    where
        P: IdentityProvider,
        S: KeyValueStore + 'static,
    {
        let clear = move || {
            if let Err(e) = SessionSnapshot::clear(store.as_ref()) {
                tracing::warn!("Failed to clear session snapshot: {}", e);
            }
        };
        Self::start(provider, Some(Box::new(clear)))
    }

    fn start<P: IdentityProvider>(
        provider: &P,
        on_signed_out: Option<Box<dyn Fn() + Send>>,
    ) -> Self {
        let (tx, rx) = watch::channel(SessionState::Initializing);

        let subscription = provider.on_auth_state_changed(move |identity: Option<Identity>| {
            match &identity {
                Some(identity) => tracing::debug!(user_id = %identity.id, "Auth state: signed in"),
                None => {
                    tracing::debug!("Auth state: signed out");
                    if let Some(clear) = &on_signed_out {
                        clear();
                    }
                }
            }
            tx.send_replace(SessionState::Known(identity));
        });

        Self {
            state: rx,
            subscription: Some(subscription),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver for consumers that await changes instead of polling
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop following the provider. The last known state stays readable.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::debug!("Session observer deactivated");
        }
    }
}
