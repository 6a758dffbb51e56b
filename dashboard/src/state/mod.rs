pub mod reducer;

use dashboard_auth::{Identity, SessionState};

use crate::location::Coordinates;

/// Progress of the most recent sign in
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum SignInStatus {
    #[default]
    Idle,
    Pending {
        email: String,
    },
    Failed {
        message: String,
    },
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    #[default]
    Unknown,
    Locating,
    Resolved(Coordinates),
}

/// Everything the rendering layer shows
#[derive(Debug, Default)]
pub struct AppState {
    pub session: SessionState,
    pub sign_in: SignInStatus,
    pub location: LocationStatus,
    pub should_quit: bool,
    notices: Vec<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    /// True until the session observer has heard from the provider
    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn is_signing_in(&self) -> bool {
        matches!(self.sign_in, SignInStatus::Pending { .. })
    }

    pub fn is_locating(&self) -> bool {
        matches!(self.location, LocationStatus::Locating)
    }

    pub fn begin_sign_in(&mut self, email: &str) {
        self.sign_in = SignInStatus::Pending {
            email: email.to_string(),
        };
        self.push_notice(format!("Signing in as {}...", email));
    }

    pub fn begin_locate(&mut self) {
        self.location = LocationStatus::Locating;
        self.push_notice("Locating...");
    }

    /// Queue a line of output for the user
    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Drain queued output
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
