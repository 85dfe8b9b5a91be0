//! # Token Error Handling
//!
//! 토큰 수명주기 브로커 전역에서 사용하는 에러 타입입니다.
//! `thiserror` 기반 열거형으로 정의되며, `actix_web::ResponseError`를 구현하여
//! 호출 측 핸들러가 그대로 반환하면 적절한 HTTP 응답으로 변환됩니다.
//!
//! ## 에러 분류
//!
//! | 변형 | 의미 | HTTP 상태 |
//! |------|------|-----------|
//! | `ConfigMissing` | 용도별 서명 시크릿 또는 TTL 누락 | 500 |
//! | `InvalidToken` | 서명/만료/발급자/대상 검증 실패 | 401 |
//! | `CacheMismatch` | 서명은 유효하지만 저장소의 현재 토큰과 불일치 | 401 |
//! | `StoreUnavailable` | 공유 캐시 장애 또는 타임아웃 | 503 |
//!
//! `InvalidToken`과 `CacheMismatch`는 클라이언트에게 동일한 응답 본문을 돌려줍니다.
//! "발급된 적 없음", "이미 사용됨", "대체됨"을 외부에서 구분할 수 없어야 합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use account_token_broker::core::errors::{TokenError, TokenResult};
//!
//! async fn me(broker: web::Data<TokenBroker>, token: &str) -> TokenResult<HttpResponse> {
//!     let subject = broker.authenticate(token).await?; // 실패 시 401/503 자동 변환
//!     Ok(HttpResponse::Ok().json(subject))
//! }
//! ```

use thiserror::Error;

use crate::domain::token::Purpose;

/// 토큰 브로커 에러 타입
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// 용도별 설정(시크릿, TTL) 누락
    #[error("Token configuration missing for {purpose}: {detail}")]
    ConfigMissing {
        purpose: Purpose,
        detail: String,
    },

    /// 서명, 만료, 발급자, 대상 중 하나라도 검증 실패
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// 서명은 유효하지만 저장소의 현재 값과 일치하지 않음
    #[error("Token does not match the active {0} token")]
    CacheMismatch(Purpose),

    /// 토큰 저장소 장애 (서명만으로 신뢰하지 않고 서버 에러로 전파)
    #[error("Token store unavailable: {0}")]
    StoreUnavailable(String),
}

impl TokenError {
    pub fn config_missing(purpose: Purpose, detail: impl Into<String>) -> Self {
        TokenError::ConfigMissing {
            purpose,
            detail: detail.into(),
        }
    }

    /// 요청을 미인증으로 처리해야 하는 에러인지 여부
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, TokenError::InvalidToken(_) | TokenError::CacheMismatch(_))
    }
}

impl From<redis::RedisError> for TokenError {
    fn from(err: redis::RedisError) -> Self {
        TokenError::StoreUnavailable(err.to_string())
    }
}

impl actix_web::ResponseError for TokenError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            TokenError::InvalidToken(_) | TokenError::CacheMismatch(_) => StatusCode::UNAUTHORIZED,
            TokenError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TokenError::ConfigMissing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 인증 실패 계열은 원인을 노출하지 않고 하나의 메시지로 통일합니다.
    /// 설정/인프라 에러 역시 내부 정보를 응답에 싣지 않습니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let message = match self {
            TokenError::InvalidToken(_) | TokenError::CacheMismatch(_) => {
                "Invalid Or Expired Token"
            }
            TokenError::StoreUnavailable(_) => "Service Temporarily Unavailable",
            TokenError::ConfigMissing { .. } => "Internal Server Error",
        };

        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": message
            }))
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
