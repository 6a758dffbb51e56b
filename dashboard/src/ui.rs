use dashboard_auth::Identity;
use std::io::{self, Write};

use crate::state::{AppState, LocationStatus};

pub const HELP: &str = "\
Commands:
  login <email> <password>   sign in
  logout                     sign out
  whoami                     show the signed in user
  locate                     look up the current position
  help                       show this help
  quit                       exit";

pub fn describe_identity(identity: Option<&Identity>) -> String {
    match identity {
        None => "Signed out".to_string(),
        Some(identity) => {
            let name = identity.email.as_deref().unwrap_or(&identity.id);
            if identity.email_verified {
                format!("Signed in as {}", name)
            } else {
                format!("Signed in as {} (email not verified)", name)
            }
        }
    }
}

/// Short status shown in front of the prompt
pub fn status(state: &AppState) -> String {
    let session = if state.is_loading() {
        "connecting".to_string()
    } else if let Some(identity) = state.identity() {
        identity.email.clone().unwrap_or_else(|| identity.id.clone())
    } else {
        "signed out".to_string()
    };

    match state.location {
        LocationStatus::Resolved(coordinates) => format!("{} @ {}", session, coordinates),
        LocationStatus::Locating => format!("{} @ ...", session),
        LocationStatus::Unknown => session,
    }
}

/// Print queued notices followed by the prompt
pub fn render(out: &mut impl Write, state: &mut AppState) -> io::Result<()> {
    for notice in state.take_notices() {
        writeln!(out, "{}", notice)?;
    }
    write!(out, "[{}] > ", status(state))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use dashboard_auth::SessionState;

    fn identity(verified: bool) -> Identity {
        Identity {
            id: "ada".to_string(),
            email: Some("ada@example.com".to_string()),
            email_verified: verified,
        }
    }

    #[test]
    fn describes_verification() {
        assert_eq!(
            describe_identity(Some(&identity(true))),
            "Signed in as ada@example.com"
        );
        assert_eq!(
            describe_identity(Some(&identity(false))),
            "Signed in as ada@example.com (email not verified)"
        );
        assert_eq!(describe_identity(None), "Signed out");
    }

    #[test]
    fn falls_back_to_id_without_email() {
        let identity = Identity {
            email: None,
            ..identity(true)
        };
        assert_eq!(describe_identity(Some(&identity)), "Signed in as ada");
    }

    #[test]
    fn render_drains_notices_and_prompts() {
        let mut state = AppState::new();
        state.push_notice("hello");
        let mut out = Vec::new();
        render(&mut out, &mut state).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n[connecting] > ");
        assert!(state.notices().is_empty());

        state.session = SessionState::Known(Some(identity(true)));
        state.location = LocationStatus::Resolved(Coordinates::new(10.0, 20.0));
        assert_eq!(status(&state), "ada@example.com @ [10, 20]");
    }
}
