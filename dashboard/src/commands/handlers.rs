use secrecy::SecretString;
use thiserror::Error;

use crate::events::AppCommand;
use crate::input::InputLine;
use crate::state::{AppState, SignInStatus};

const LOGIN_USAGE: &str = "login <email> <password>";

/// Why a typed line did not become a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command '{0}', type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Already signing in as {0}")]
    SignInPending(String),

    #[error("Nobody is signed in")]
    NotSignedIn,

    #[error("Already looking up the location")]
    AlreadyLocating,
}

/// Map a typed line to an AppCommand based on current state
pub fn handle_input(input: InputLine, state: &AppState) -> Result<AppCommand, InputError> {
    match input.command.as_str() {
        "login" | "signin" => {
            if let SignInStatus::Pending { email } = &state.sign_in {
                return Err(InputError::SignInPending(email.clone()));
            }
            // Credentials are checked by the provider, not here
            let (email, password) = input
                .rest
                .split_once(char::is_whitespace)
                .ok_or(InputError::Usage(LOGIN_USAGE))?;
            Ok(AppCommand::SignIn {
                email: email.to_string(),
                password: SecretString::from(password.trim_start().to_string()),
            })
        }
        "logout" | "signout" => {
            if state.identity().is_none() {
                return Err(InputError::NotSignedIn);
            }
            Ok(AppCommand::SignOut)
        }
        "whoami" => Ok(AppCommand::ShowIdentity),
        "locate" | "location" => {
            if state.is_locating() {
                return Err(InputError::AlreadyLocating);
            }
            Ok(AppCommand::Locate)
        }
        "help" | "?" => Ok(AppCommand::ShowHelp),
        "quit" | "exit" | "q" => Ok(AppCommand::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
