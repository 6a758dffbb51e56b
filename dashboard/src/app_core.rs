use crate::commands::handlers;
use crate::events::{AppCommand, DataEvent};
use crate::input::InputLine;
use crate::state::{reducer, AppState};

/// Trait for handling command execution (production = real session tasks, test = mock)
///
/// Abstracts the side effects of command execution so tests can inject a
/// handler that neither spawns tasks nor talks to the identity provider.
pub trait CommandHandler {
    /// Execute a command with access to mutable state
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState);
}

/// Testable application core without terminal dependencies
///
/// Generic over H (handler): in production commands start background work,
/// in tests they update state synchronously.
pub struct AppCore<H: CommandHandler> {
    ui_state: AppState,
    handler: H,
}

impl<H: CommandHandler> AppCore<H> {
    pub fn new(handler: H) -> Self {
        Self {
            ui_state: AppState::new(),
            handler,
        }
    }

    /// Handle one typed line
    ///
    /// Parses the line, maps it to an AppCommand and executes it. Lines that
    /// do not form a command produce a notice instead.
    pub fn handle_line(&mut self, line: &str) {
        let Some(input) = InputLine::parse(line) else {
            return;
        };
        match handlers::handle_input(input, &self.ui_state) {
            Ok(command) => {
                tracing::info!("Executing command: {:?}", command);
                self.handler.execute_with_context(command, &mut self.ui_state);
            }
            Err(e) => self.ui_state.push_notice(e.to_string()),
        }
    }

    /// Handle a data event (observer updates or background task results)
    pub fn handle_data_event(&mut self, event: DataEvent) {
        reducer::reduce_data_event(&mut self.ui_state, event);
    }

    /// Read-only access to the current state (for rendering or assertions)
    pub fn state(&self) -> &AppState {
        &self.ui_state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.ui_state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }
}
