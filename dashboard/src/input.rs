use std::fmt;

/// One line typed at the prompt: a command word plus the raw remainder.
///
/// The remainder is kept verbatim (minus surrounding whitespace) so passwords
/// with inner spaces survive.
#[derive(Clone, PartialEq, Eq)]
pub struct InputLine {
    pub command: String,
    pub rest: String,
}

impl InputLine {
    /// `None` for blank lines
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        Some(Self {
            command: command.to_lowercase(),
            rest: rest.trim_start().to_string(),
        })
    }

    /// Whitespace separated arguments
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.rest.split_whitespace()
    }
}

// The remainder may hold a password
impl fmt::Debug for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputLine")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}
