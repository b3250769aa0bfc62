//! 身份校验客户端
//!
//! 进程启动时通过 [`init`] 注入一次，之后由 [`verifier`] 全局读取。重复初始化返回错误，
//! 未初始化时读取返回 `None`。

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity verifier already initialized")]
    AlreadyInitialized,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("identity service error: {0}")]
    Service(String),
}

/// 身份服务凭据
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub endpoint: String,
}

/// 校验通过的用户
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifiedUser {
    pub uid: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError>;
}

static VERIFIER: OnceLock<Arc<dyn TokenVerifier>> = OnceLock::new();

pub fn init(verifier: Arc<dyn TokenVerifier>) -> Result<(), IdentityError> {
    VERIFIER
        .set(verifier)
        .map_err(|_| IdentityError::AlreadyInitialized)
}

pub fn verifier() -> Option<Arc<dyn TokenVerifier>> {
    VERIFIER.get().cloned()
}

/// 通过 HTTP `accounts:lookup` 校验 ID token
pub struct HttpTokenVerifier {
    client: Client,
    config: IdentityConfig,
}

impl HttpTokenVerifier {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| IdentityError::Service(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            return Err(IdentityError::Service(format!("status {}", status)));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Service(e.to_string()))?;

        body.users
            .into_iter()
            .next()
            .map(|user| VerifiedUser {
                uid: user.local_id,
                email: user.email,
            })
            .ok_or(IdentityError::InvalidToken)
    }
}
