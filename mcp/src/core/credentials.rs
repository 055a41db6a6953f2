//! Bearer credential supply for registry calls.
//!
//! Token acquisition lives outside this crate. The client asks the provider for
//! a credential on every request and never caches or inspects it.

use std::fmt;

use async_trait::async_trait;

use crate::error::McpResult;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, or `None` to send the request unauthenticated.
    async fn bearer_token(&self) -> McpResult<Option<String>>;
}

/// Fixed token, e.g. read once from the environment by the host process.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken").field(&"****").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> McpResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> McpResult<Option<String>> {
        Ok(None)
    }
}
