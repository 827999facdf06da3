//! Secrets read from the environment.

use super::ConfigError;

pub const EMAIL_ADDRESS_VAR: &str = "EMAIL_ADDRESS";
pub const EMAIL_PASSWORD_VAR: &str = "EMAIL_PASSWORD";
pub const TO_EMAIL_VAR: &str = "TO_EMAIL";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// SMTP login and delivery addresses
#[derive(Clone)]
pub struct MailCredentials {
    /// Sender address, also the SMTP username
    pub address: String,
    pub password: String,
    /// One or more recipients (`TO_EMAIL` may be comma-separated)
    pub recipients: Vec<String>,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .field("recipients", &self.recipients)
            .finish()
    }
}

impl MailCredentials {
    /// Read `EMAIL_ADDRESS`, `EMAIL_PASSWORD` and `TO_EMAIL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
        };

        let address = required(EMAIL_ADDRESS_VAR)?;
        let password = required(EMAIL_PASSWORD_VAR)?;
        let recipients: Vec<String> = required(TO_EMAIL_VAR)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if recipients.is_empty() {
            return Err(ConfigError::MissingEnv(TO_EMAIL_VAR.to_string()));
        }

        Ok(Self {
            address,
            password,
            recipients,
        })
    }
}

/// The summarization API key, required only when summaries are enabled
pub fn openai_api_key() -> Result<String, ConfigError> {
    std::env::var(OPENAI_API_KEY_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(OPENAI_API_KEY_VAR.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_complete_credentials() {
        let creds = MailCredentials::from_lookup(lookup(&[
            ("EMAIL_ADDRESS", "bot@example.com"),
            ("EMAIL_PASSWORD", "app-password"),
            ("TO_EMAIL", "a@example.com, b@example.com,"),
        ]))
        .unwrap();

        assert_eq!(creds.address, "bot@example.com");
        assert_eq!(creds.recipients, vec!["a@example.com", "b@example.com"]);
        assert!(!format!("{:?}", creds).contains("app-password"));
    }

    #[test]
    fn test_missing_variable_named() {
        let err = MailCredentials::from_lookup(lookup(&[
            ("EMAIL_ADDRESS", "bot@example.com"),
            ("TO_EMAIL", "a@example.com"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "Missing env var: EMAIL_PASSWORD");
    }

    #[test]
    fn test_blank_recipient_list_rejected() {
        let err = MailCredentials::from_lookup(lookup(&[
            ("EMAIL_ADDRESS", "bot@example.com"),
            ("EMAIL_PASSWORD", "pw"),
            ("TO_EMAIL", " , "),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnv(ref k) if k == "TO_EMAIL"));
    }
}
