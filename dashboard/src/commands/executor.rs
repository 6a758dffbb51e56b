use dashboard_auth::{IdentityProvider, KeyValueStore};
use std::time::Duration;

use crate::app_core::CommandHandler;
use crate::background::{session_worker::SessionWorker, BackgroundTaskManager};
use crate::events::AppCommand;
use crate::location::PositionSource;
use crate::state::AppState;
use crate::ui;

/// Execute a command: update state, then start whatever background work it needs
pub fn execute_command<P, S, L>(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    worker: &SessionWorker<P, S, L>,
) where
    P: IdentityProvider + 'static,
    S: KeyValueStore + 'static,
    L: PositionSource + 'static,
{
    match command {
        AppCommand::SignIn { email, password } => {
            state.begin_sign_in(&email);
            // Not tracked: a sign in finishes even if the app is shutting down
            tokio::spawn(worker.sign_in(email, password));
        }
        AppCommand::SignOut => {
            task_manager.spawn_task("sign-out".to_string(), worker.sign_out());
        }
        AppCommand::Locate => {
            state.begin_locate();
            task_manager.spawn_task("locate".to_string(), worker.locate());
        }
        command => execute_command_sync(command, state),
    }
}

/// Execute a command without side effects (tests, and commands that only touch state)
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) {
    match command {
        AppCommand::SignIn { email, .. } => state.begin_sign_in(&email),
        AppCommand::SignOut => {}
        AppCommand::Locate => state.begin_locate(),
        AppCommand::ShowIdentity => {
            let description = if state.is_loading() {
                "Still connecting to the identity provider".to_string()
            } else {
                ui::describe_identity(state.identity())
            };
            state.push_notice(description);
        }
        AppCommand::ShowHelp => state.push_notice(ui::HELP),
        AppCommand::Quit => {
            tracing::info!("Quit requested");
            state.should_quit = true;
        }
    }
}

/// Production [`CommandHandler`]: runs commands against the real session services
pub struct TaskHandler<P, S, L> {
    worker: SessionWorker<P, S, L>,
    task_manager: BackgroundTaskManager,
}

impl<P, S, L> TaskHandler<P, S, L>
where
    P: IdentityProvider + 'static,
    S: KeyValueStore + 'static,
    L: PositionSource + 'static,
{
    pub fn new(worker: SessionWorker<P, S, L>) -> Self {
        Self {
            worker,
            task_manager: BackgroundTaskManager::new(),
        }
    }

    /// Periodically refresh the provider session
    pub fn start_session_refresh(&mut self, every: Duration) {
        self.task_manager
            .spawn_task("session-refresh".to_string(), self.worker.keep_session_fresh(every));
    }

    pub fn shutdown(&mut self) {
        self.task_manager.cancel_all();
    }
}

impl<P, S, L> CommandHandler for TaskHandler<P, S, L>
where
    P: IdentityProvider + 'static,
    S: KeyValueStore + 'static,
    L: PositionSource + 'static,
{
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        execute_command(command, state, &mut self.task_manager, &self.worker);
    }
}
