use anyhow::Result;
use dashboard_auth::{FileStore, RestIdentityProvider, SessionObserver, SessionSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app_core::AppCore;
use crate::background::session_worker::SessionWorker;
use crate::commands::executor::TaskHandler;
use crate::events::DataEvent;
use crate::location::IpPositionSource;
use crate::logging::init_logging;
use crate::settings::AppSettings;
use crate::ui;

const SESSION_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Composition root: owns the provider, store and observer for the whole run
pub struct App {
    settings: AppSettings,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        let log_path = init_logging()?;
        tracing::info!("dashboard starting, logging to {}", log_path.display());

        let provider = Arc::new(RestIdentityProvider::from_settings(&self.settings.auth));
        let store = Arc::new(FileStore::new()?);
        tracing::debug!("Session snapshots stored in {}", store.dir().display());

        // Read before the observer starts, it may clear the snapshot
        let previous = SessionSnapshot::load(store.as_ref()).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable session snapshot: {}", e);
            None
        });

        let mut observer = if self.settings.auth.clear_snapshot_on_sign_out {
            SessionObserver::activate_with_snapshot(provider.as_ref(), store.clone())
        } else {
            SessionObserver::activate(provider.as_ref())
        };
        let mut auth_changes = observer.subscribe();

        let location_source = if self.settings.location.is_enabled() {
            Some(Arc::new(IpPositionSource::new(
                &self.settings.location.lookup_url,
            )?))
        } else {
            tracing::info!("Geolocation disabled");
            None
        };

        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();
        let worker = SessionWorker::new(
            provider.clone(),
            store.clone(),
            location_source,
            self.settings.location.position_options(),
            data_tx,
        );

        let mut core = AppCore::new(TaskHandler::new(worker));
        core.handler_mut()
            .start_session_refresh(SESSION_REFRESH_INTERVAL);
        core.handle_data_event(DataEvent::AuthStateChanged(
            auth_changes.borrow_and_update().clone(),
        ));

        if let Some(snapshot) = previous {
            let name = snapshot.email.unwrap_or(snapshot.id);
            core.state_mut()
                .push_notice(format!("Last signed in as {}, log in again to continue", name));
        }
        core.state_mut().push_notice("Type 'help' for a list of commands");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = std::io::stdout();

        tracing::info!("Entering main loop");
        loop {
            ui::render(&mut stdout, core.state_mut())?;

            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => core.handle_line(&line),
                    None => {
                        tracing::info!("Input closed, exiting");
                        break;
                    }
                },
                Ok(()) = auth_changes.changed() => {
                    let session = auth_changes.borrow_and_update().clone();
                    core.handle_data_event(DataEvent::AuthStateChanged(session));
                }
                Some(event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", event);
                    core.handle_data_event(event);
                }
            }

            if core.should_quit() {
                break;
            }
        }

        tracing::info!("Cleaning up application");
        for notice in core.state_mut().take_notices() {
            println!("{}", notice);
        }
        core.handler_mut().shutdown();
        observer.deactivate();

        Ok(())
    }
}
