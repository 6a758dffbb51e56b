use dashboard_auth::{SessionState, SignInResult};
use secrecy::SecretString;

use crate::location::Coordinates;

/// Commands to execute (user actions → background tasks)
#[derive(Debug)]
pub enum AppCommand {
    SignIn {
        email: String,
        password: SecretString,
    },
    SignOut,
    ShowIdentity,
    Locate,
    ShowHelp,
    Quit,
}

/// Results flowing back into the app (observer updates, finished tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum DataEvent {
    /// The session observer published a new state
    AuthStateChanged(SessionState),

    SignInCompleted {
        email: String,
        result: SignInResult,
    },

    LocationResolved(Coordinates),
}
