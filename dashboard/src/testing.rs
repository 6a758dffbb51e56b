use crate::app_core::{AppCore, CommandHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent};
use crate::state::AppState;

/// Mock command handler for tests (no real async tasks)
///
/// Records each command's debug form, then executes it with
/// [`executor::execute_command_sync`], which updates state only.
#[derive(Default)]
pub struct MockCommandHandler {
    pub executed: Vec<String>,
}

impl MockCommandHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandHandler for MockCommandHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        self.executed.push(format!("{:?}", command));
        executor::execute_command_sync(command, state);
    }
}

pub struct TestApp {
    core: AppCore<MockCommandHandler>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockCommandHandler::new()),
        }
    }

    /// Type a single line
    pub fn send_line(&mut self, line: &str) {
        self.core.handle_line(line);
    }

    pub fn send_lines(&mut self, lines: &[&str]) {
        for line in lines {
            self.send_line(line);
        }
    }

    /// Inject a data event (simulate an observer update or a finished task)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        self.core.state_mut().take_notices()
    }

    /// Debug form of every command that reached the handler
    pub fn executed(&self) -> &[String] {
        &self.core.handler().executed
    }

    pub fn assert_notice_contains(&self, needle: &str) {
        assert!(
            self.state().notices().iter().any(|n| n.contains(needle)),
            "No notice contains {:?}. Notices: {:?}",
            needle,
            self.state().notices()
        );
    }

    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
