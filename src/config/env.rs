use crate::ConfigError;
use std::env;

/// Mail credentials and recipient taken from the environment
#[derive(Clone)]
pub struct MailCredentials {
    /// SMTP login (`EMAIL_USER`)
    pub user: String,

    /// SMTP password (`EMAIL_PASS`)
    pub pass: String,

    /// Notification recipient (`EMAIL_TO`)
    pub to: String,
}

impl MailCredentials {
    /// Reads `EMAIL_USER`, `EMAIL_PASS` and `EMAIL_TO`
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            user: require("EMAIL_USER")?,
            pass: require("EMAIL_PASS")?,
            to: require("EMAIL_TO")?,
        })
    }
}

// Keeps the password out of log lines.
impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .field("to", &self.to)
            .finish()
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(key.to_string())),
    }
}
