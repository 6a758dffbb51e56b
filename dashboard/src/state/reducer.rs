use dashboard_auth::{SessionState, SignInResult};

use super::{AppState, LocationStatus, SignInStatus};
use crate::events::DataEvent;
use crate::ui;

/// Pure state transition function for data events
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        DataEvent::AuthStateChanged(session) => {
            if session == state.session {
                return;
            }
            match &session {
                SessionState::Initializing => {}
                SessionState::Known(identity) => {
                    let was_known = !state.session.is_loading();
                    // Silent for the first answer when nobody is signed in
                    if identity.is_some() || was_known {
                        state.push_notice(ui::describe_identity(identity.as_ref()));
                    }
                }
            }
            state.session = session;
        }

        DataEvent::SignInCompleted { email, result } => match result {
            SignInResult::Success { .. } => {
                // The observer reports the new identity
                state.sign_in = SignInStatus::Idle;
                tracing::debug!(email = %email, "Sign in completed");
            }
            SignInResult::Failure { message } => {
                state.push_notice(format!("Sign in as {} failed: {}", email, message));
                state.sign_in = SignInStatus::Failed { message };
            }
        },

        DataEvent::LocationResolved(coordinates) => {
            state.location = LocationStatus::Resolved(coordinates);
            state.push_notice(format!("Location: {}", coordinates));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Coordinates, FALLBACK_COORDINATES};
    use dashboard_auth::Identity;

    fn ada() -> Identity {
        Identity {
            id: "ada".to_string(),
            email: Some("ada@example.com".to_string()),
            email_verified: true,
        }
    }

    #[test]
    fn first_signed_out_answer_is_quiet() {
        let mut state = AppState::new();
        reduce_data_event(&mut state, DataEvent::AuthStateChanged(SessionState::Known(None)));
        assert!(!state.is_loading());
        assert!(state.notices().is_empty());
    }

    #[test]
    fn identity_changes_are_announced() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::AuthStateChanged(SessionState::Known(Some(ada()))),
        );
        reduce_data_event(&mut state, DataEvent::AuthStateChanged(SessionState::Known(None)));
        assert_eq!(
            state.take_notices(),
            vec!["Signed in as ada@example.com", "Signed out"]
        );
    }

    #[test]
    fn repeated_state_is_ignored() {
        let mut state = AppState::new();
        let known = SessionState::Known(Some(ada()));
        reduce_data_event(&mut state, DataEvent::AuthStateChanged(known.clone()));
        reduce_data_event(&mut state, DataEvent::AuthStateChanged(known));
        assert_eq!(state.take_notices().len(), 1);
    }

    #[test]
    fn failed_sign_in_keeps_message() {
        let mut state = AppState::new();
        state.begin_sign_in("ada@example.com");
        state.take_notices();

        reduce_data_event(
            &mut state,
            DataEvent::SignInCompleted {
                email: "ada@example.com".to_string(),
                result: SignInResult::Failure {
                    message: "Invalid email or password".to_string(),
                },
            },
        );

        assert_eq!(
            state.sign_in,
            SignInStatus::Failed {
                message: "Invalid email or password".to_string()
            }
        );
        assert_eq!(
            state.take_notices(),
            vec!["Sign in as ada@example.com failed: Invalid email or password"]
        );
    }

    #[test]
    fn successful_sign_in_clears_pending() {
        let mut state = AppState::new();
        state.begin_sign_in("ada@example.com");
        reduce_data_event(
            &mut state,
            DataEvent::SignInCompleted {
                email: "ada@example.com".to_string(),
                result: SignInResult::Success { identity: ada() },
            },
        );
        assert_eq!(state.sign_in, SignInStatus::Idle);
    }

    #[test]
    fn location_is_recorded() {
        let mut state = AppState::new();
        state.begin_locate();
        reduce_data_event(&mut state, DataEvent::LocationResolved(FALLBACK_COORDINATES));
        assert_eq!(state.location, LocationStatus::Resolved(FALLBACK_COORDINATES));

        reduce_data_event(
            &mut state,
            DataEvent::LocationResolved(Coordinates::new(10.0, 20.0)),
        );
        assert_eq!(state.take_notices().last().unwrap(), "Location: [10, 20]");
    }
}
