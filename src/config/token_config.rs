//! # Token Configuration
//!
//! 용도별 서명 시크릿과 TTL, 그리고 모든 토큰이 공유하는 발급자/대상 값을 관리합니다.
//!
//! 시크릿은 용도마다 독립적입니다. 한 용도의 시크릿이 유출되어도
//! 다른 용도의 토큰을 위조할 수 없습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use account_token_broker::config::TokenConfig;
//! use account_token_broker::domain::token::Purpose;
//!
//! // 코드로 직접 구성
//! let config = TokenConfig::new("My Project")
//!     .with_purpose(Purpose::Access, "access-secret", 3600)
//!     .with_purpose(Purpose::Refresh, "refresh-secret", 604_800);
//!
//! // 환경 변수에서 구성
//! let config = TokenConfig::from_env();
//! let ttl = config.ttl(Purpose::Access)?;
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;

use log::warn;

use crate::core::errors::{TokenError, TokenResult};
use crate::domain::token::Purpose;
use crate::utils::string_utils::slugify;

/// 발급자/대상 기본값의 원본 프로젝트 이름
pub const DEFAULT_PROJECT_NAME: &str = "Account Service";

/// 단일 용도의 서명 설정
#[derive(Clone, PartialEq, Eq)]
pub struct PurposeSettings {
    pub secret: String,
    pub ttl_seconds: u64,
}

impl fmt::Debug for PurposeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurposeSettings")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// 용도별 토큰 설정 집합
#[derive(Clone)]
pub struct TokenConfig {
    issuer: String,
    audience: String,
    secrets: HashMap<Purpose, String>,
    ttls: HashMap<Purpose, u64>,
}

impl TokenConfig {
    /// 프로젝트 이름의 슬러그를 발급자와 대상으로 사용하는 빈 설정을 만듭니다.
    pub fn new(project_name: &str) -> Self {
        let slug = slugify(project_name);
        Self {
            issuer: slug.clone(),
            audience: slug,
            secrets: HashMap::new(),
            ttls: HashMap::new(),
        }
    }

    pub fn with_purpose(
        mut self,
        purpose: Purpose,
        secret: impl Into<String>,
        ttl_seconds: u64,
    ) -> Self {
        self.secrets.insert(purpose, secret.into());
        self.ttls.insert(purpose, ttl_seconds);
        self
    }

    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정을 구성합니다.
    ///
    /// 각 용도에 대해 `{PURPOSE}_TOKEN_SECRET`, `{PURPOSE}_TOKEN_EXPIRY`를 읽습니다.
    /// 비어 있거나 파싱할 수 없는 값은 누락으로 남기고 경고만 기록합니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_name = lookup("PROJECT_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

        let mut config = Self::new(&project_name);

        for purpose in Purpose::ALL {
            let prefix = purpose.env_prefix();
            let secret_key = format!("{}_TOKEN_SECRET", prefix);
            let expiry_key = format!("{}_TOKEN_EXPIRY", prefix);

            match lookup(&secret_key).filter(|v| !v.is_empty()) {
                Some(secret) => {
                    config.secrets.insert(purpose, secret);
                }
                None => warn!("{} 미설정: {} 토큰을 발급/검증할 수 없습니다", secret_key, purpose),
            }

            match lookup(&expiry_key).map(|raw| raw.trim().parse::<u64>()) {
                Some(Ok(ttl)) => {
                    config.ttls.insert(purpose, ttl);
                }
                Some(Err(e)) => warn!("{} 파싱 실패: {}", expiry_key, e),
                None => warn!("{} 미설정: {} 토큰 TTL이 없습니다", expiry_key, purpose),
            }
        }

        config
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// 용도의 서명 시크릿
    ///
    /// # Errors
    ///
    /// * `TokenError::ConfigMissing` - 시크릿이 없거나 비어 있음
    pub fn secret(&self, purpose: Purpose) -> TokenResult<&str> {
        self.secrets
            .get(&purpose)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::config_missing(purpose, "signing secret not set"))
    }

    /// 용도의 TTL(초). `0`은 누락으로 취급합니다.
    pub fn ttl(&self, purpose: Purpose) -> TokenResult<u64> {
        self.ttls
            .get(&purpose)
            .copied()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| TokenError::config_missing(purpose, "token expiry not set"))
    }

    pub fn settings(&self, purpose: Purpose) -> TokenResult<PurposeSettings> {
        Ok(PurposeSettings {
            secret: self.secret(purpose)?.to_string(),
            ttl_seconds: self.ttl(purpose)?,
        })
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut configured: Vec<&str> = self.secrets.keys().map(Purpose::as_str).collect();
        configured.sort_unstable();
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("secrets_for", &configured)
            .field("ttls", &self.ttls)
            .finish()
    }
}
