//! JWT 서명/검증 서비스 구현
//!
//! 용도별 시크릿으로 토큰을 서명하고 검증하는 무상태 컴포넌트입니다.
//! 저장소에 접근하지 않으며, 검증 실패는 항상 `TokenError::InvalidToken`으로 닫힙니다.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::TokenConfig;
use crate::core::errors::{TokenError, TokenResult};
use crate::domain::token::{Purpose, TokenClaims};
use crate::services::auth::clock::Clock;

/// JWT 서명/검증 서비스
///
/// HMAC-SHA256 서명을 사용하며, 용도마다 다른 시크릿을 사용합니다.
/// 따라서 A 용도로 발급한 토큰은 B 용도로 검증할 수 없습니다.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<TokenConfig>,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: Arc<TokenConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// 용도별 시크릿으로 서명된 토큰을 발급합니다.
    ///
    /// # Arguments
    ///
    /// * `purpose` - 토큰 용도 (시크릿 선택)
    /// * `subject` - 토큰의 주체 (계정 ID)
    /// * `ttl_seconds` - 유효 기간 (초)
    ///
    /// # Errors
    ///
    /// * `TokenError::ConfigMissing` - 시크릿 누락, `ttl_seconds == 0`, 표현할 수 없는 만료 시각
    ///
    /// 같은 입력과 같은 시각이면 같은 토큰이 만들어집니다.
    pub fn issue(&self, purpose: Purpose, subject: &str, ttl_seconds: u64) -> TokenResult<String> {
        if ttl_seconds == 0 {
            return Err(TokenError::config_missing(purpose, "token expiry must be positive"));
        }
        let secret = self.config.secret(purpose)?;
        let ttl = i64::try_from(ttl_seconds)
            .map_err(|_| TokenError::config_missing(purpose, "token expiry out of range"))?;

        let now = self.clock.now();
        let expires_at = Duration::try_seconds(ttl)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| TokenError::config_missing(purpose, "token expiry out of range"))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iss: self.config.issuer().to_string(),
            aud: self.config.audience().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::InvalidToken(format!("{} 토큰 서명 실패: {}", purpose, e)))
    }

    /// 설정된 TTL로 토큰을 발급합니다.
    pub fn issue_configured(&self, purpose: Purpose, subject: &str) -> TokenResult<String> {
        let ttl = self.config.ttl(purpose)?;
        self.issue(purpose, subject, ttl)
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 서명, 알고리즘, 발급자, 대상, 필수 클레임, 만료를 모두 검사합니다.
    /// 만료는 주입된 시계 기준이며 `exp <= now`이면 만료입니다 (허용 오차 없음).
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` - 어떤 검사든 실패
    /// * `TokenError::ConfigMissing` - 용도의 시크릿 누락
    pub fn verify(&self, token: &str, purpose: Purpose) -> TokenResult<TokenClaims> {
        let secret = self.config.secret(purpose)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_audience(&[self.config.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let key = DecodingKey::from_secret(secret.as_bytes());
        let claims = decode::<TokenClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                TokenError::InvalidToken(format!("{} 토큰 검증 실패: {:?}", purpose, e.kind()))
            })?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::InvalidToken(format!("{} 토큰이 만료되었습니다", purpose)));
        }
        if claims.sub.is_empty() {
            return Err(TokenError::InvalidToken(format!("{} 토큰에 주체가 없습니다", purpose)));
        }

        Ok(claims)
    }

    /// 토큰을 검증하고 주체(계정 ID)만 반환합니다.
    pub fn verify_subject(&self, token: &str, purpose: Purpose) -> TokenResult<String> {
        self.verify(token, purpose).map(|claims| claims.sub)
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을 추출합니다.
    /// 스킴은 대소문자를 구분하지 않으며, 토큰은 정확히 하나여야 합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let token = token_service.extract_bearer_token("Bearer eyJhbGciOiJIUzI1NiJ9...")?;
    /// ```
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> TokenResult<&'a str> {
        let mut parts = auth_header.split_whitespace();

        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
            _ => Err(TokenError::InvalidToken("유효하지 않은 인증 헤더 형식입니다".to_string())),
        }
    }
}
