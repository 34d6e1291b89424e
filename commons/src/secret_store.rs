use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),
    #[error("secret backend error: {0}")]
    Backend(String),
}

/// Source of signing credentials. The scheduler never touches key material
/// directly; it only sees the store at startup.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, key: &str) -> Result<String, SecretError>;
}

/// Reads secrets from process environment variables.
pub struct EnvSecretStore;

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, key: &str) -> Result<String, SecretError> {
        std::env::var(key).map_err(|_| SecretError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn env_store_reports_missing_keys() {
        let store = EnvSecretStore;
        let err = store.get_secret("PACER_NO_SUCH_SECRET").await.unwrap_err();
        assert!(matches!(err, SecretError::NotFound(_)));
    }
}
