use dashboard_auth::{IdentityProvider, KeyValueStore, SessionLogin};
use secrecy::SecretString;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::events::DataEvent;
use crate::location::{get_location, PositionOptions, PositionSource};

/// Builds the futures behind session commands and reports their results as [`DataEvent`]s
pub struct SessionWorker<P, S, L> {
    provider: Arc<P>,
    login: SessionLogin<P, S>,
    location_source: Option<Arc<L>>,
    location_options: PositionOptions,
    data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl<P, S, L> SessionWorker<P, S, L>
where
    P: IdentityProvider + 'static,
    S: KeyValueStore + 'static,
    L: PositionSource + 'static,
{
    pub fn new(
        provider: Arc<P>,
        store: Arc<S>,
        location_source: Option<Arc<L>>,
        location_options: PositionOptions,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            login: SessionLogin::new(provider.clone(), store),
            provider,
            location_source,
            location_options,
            data_tx,
        }
    }

    pub fn sign_in(
        &self,
        email: String,
        password: SecretString,
    ) -> impl Future<Output = ()> + Send + 'static {
        let login = self.login.clone();
        let data_tx = self.data_tx.clone();
        async move {
            let result = login.sign_in(&email, &password).await;
            if data_tx
                .send(DataEvent::SignInCompleted { email, result })
                .is_err()
            {
                tracing::debug!("Sign in finished after shutdown, result discarded");
            }
        }
    }

    pub fn sign_out(&self) -> impl Future<Output = ()> + Send + 'static {
        let provider = self.provider.clone();
        async move {
            provider.sign_out().await;
        }
    }

    pub fn locate(&self) -> impl Future<Output = ()> + Send + 'static {
        let source = self.location_source.clone();
        let options = self.location_options.clone();
        let data_tx = self.data_tx.clone();
        async move {
            let coordinates = get_location(source.as_deref(), &options).await;
            if data_tx
                .send(DataEvent::LocationResolved(coordinates))
                .is_err()
            {
                tracing::debug!("Location resolved after shutdown, result discarded");
            }
        }
    }

    /// Refresh loop; runs until the task is aborted
    pub fn keep_session_fresh(&self, every: Duration) -> impl Future<Output = ()> + Send + 'static {
        let provider = self.provider.clone();
        async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match provider.refresh_session().await {
                    Ok(()) => {}
                    Err(e) if e.is_rejection() => {
                        tracing::warn!("Session refresh rejected: {}", e);
                    }
                    Err(e) => tracing::debug!("Session refresh failed, keeping session: {}", e),
                }
            }
        }
    }
}
