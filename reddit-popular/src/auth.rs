use lists_core::ListsError;
use std::env;
use std::fmt;

const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// Script-app credentials for the app-only OAuth2 flow.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, ListsError> {
        if client_id.is_empty() {
            return Err(ListsError::Authentication {
                reason: "client id is empty".to_string(),
            });
        }
        if client_secret.is_empty() {
            return Err(ListsError::Authentication {
                reason: "client secret is empty".to_string(),
            });
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Reads credentials from the process environment. Missing variables are
    /// an authentication failure at startup, before any network call.
    pub fn from_env() -> Result<Self, ListsError> {
        let client_id = env::var(CLIENT_ID_VAR).map_err(|_| ListsError::Authentication {
            reason: format!("environment variable {CLIENT_ID_VAR} is not set"),
        })?;
        let client_secret = env::var(CLIENT_SECRET_VAR).map_err(|_| ListsError::Authentication {
            reason: format!("environment variable {CLIENT_SECRET_VAR} is not set"),
        })?;
        Self::new(client_id, client_secret)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Short-lived bearer token. The whole run completes well inside the token's
/// lifetime, so expiry is not tracked. The value is invalidated on drop.
pub struct AccessToken {
    token: String,
}

impl AccessToken {
    pub(crate) fn new(token: String) -> Self {
        Self { token }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl Drop for AccessToken {
    fn drop(&mut self) {
        self.token.clear();
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        let err = Credentials::new(String::new(), "secret".to_string()).unwrap_err();
        assert!(matches!(err, ListsError::Authentication { .. }));

        let err = Credentials::new("id".to_string(), String::new()).unwrap_err();
        assert!(matches!(err, ListsError::Authentication { .. }));
    }

    #[test]
    fn test_missing_env_fails_before_any_network_call() {
        env::remove_var(CLIENT_ID_VAR);
        env::remove_var(CLIENT_SECRET_VAR);

        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, ListsError::Authentication { .. }));
        assert!(err.to_string().contains(CLIENT_ID_VAR));
    }

    #[test]
    fn test_secrets_redacted_in_debug_output() {
        let creds = Credentials::new("my_id".to_string(), "my_secret".to_string()).unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("my_id"));
        assert!(!debug.contains("my_secret"));

        let token = AccessToken::new("bearer-value".to_string());
        assert!(!format!("{token:?}").contains("bearer-value"));
    }
}
