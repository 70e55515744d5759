use std::{fs, path::Path};

use engine::Currency;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_STATE_PATH: &str = "config/tui_state.json";

/// Client-side state that survives restarts.
///
/// The display preference lives here, under the fixed `preferred_currency`
/// key; the server never stores it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub preferred_currency: Option<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// The stored preference, if present and still a supported code.
    pub fn preferred(&self) -> Option<Currency> {
        self.preferred_currency
            .as_deref()
            .and_then(|code| Currency::try_from(code).ok())
    }

    pub fn set_preferred(&mut self, currency: Currency) {
        self.preferred_currency = Some(currency.code().to_string());
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_round_trips_through_the_code_string() {
        let mut state = LocalState::default();
        assert_eq!(state.preferred(), None);

        state.set_preferred(Currency::Jpy);
        assert_eq!(state.preferred_currency.as_deref(), Some("JPY"));
        assert_eq!(state.preferred(), Some(Currency::Jpy));
    }

    #[test]
    fn unknown_stored_code_is_ignored() {
        let state = LocalState {
            preferred_currency: Some("XTS".to_string()),
        };
        assert_eq!(state.preferred(), None);
    }
}
