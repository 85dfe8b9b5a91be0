//! JWT 토큰 클레임 및 브로커 연산 결과
//!
//! RFC 7519 표준 클레임만으로 구성된 최소 클레임 세트와,
//! 발급(`EnsuredToken`)/검증(`Validation`) 결과를 표현하는 타입을 제공합니다.
use serde::{Deserialize, Serialize};

use crate::core::errors::{TokenError, TokenResult};
use crate::domain::token::Purpose;

/// JWT 토큰의 클레임(Payload) 구조체
///
/// ## 클레임 구성
///
/// - `sub`: 토큰의 주체 (계정 ID)
/// - `iss`: 발급자 (프로젝트 이름 슬러그)
/// - `aud`: 대상 (프로젝트 이름 슬러그)
/// - `iat`: 토큰 발급 시간 (Unix timestamp)
/// - `exp`: 토큰 만료 시간 (Unix timestamp)
///
/// 용도는 클레임이 아닙니다. 용도별 시크릿이 다르므로 다른 용도로 검증하면 서명이 깨집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// `EnsureToken` 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredToken {
    pub token: String,
    /// `true`면 새로 발급, `false`면 저장소의 기존 토큰 재사용
    pub fresh: bool,
}

impl EnsuredToken {
    pub fn generated(token: String) -> Self {
        Self { token, fresh: true }
    }

    pub fn reused(token: String) -> Self {
        Self { token, fresh: false }
    }
}

/// 제시된 토큰의 검증 결과
///
/// `Mismatch`는 "발급된 적 없음", "이미 소비됨", "다른 토큰으로 대체됨"을 구분하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// 서명이 유효하고 저장소의 현재 토큰과 일치
    Ok { subject: String },
    /// 서명, 만료, 발급자, 대상 검증 실패 (저장소 미조회)
    Invalid,
    /// 서명은 유효하지만 저장소 값이 없거나 다름
    Mismatch,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Ok { .. })
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Validation::Ok { subject } => Some(subject),
            _ => None,
        }
    }

    /// 결과를 주체 또는 인증 에러로 변환합니다.
    pub fn into_subject(self, purpose: Purpose) -> TokenResult<String> {
        match self {
            Validation::Ok { subject } => Ok(subject),
            Validation::Invalid => Err(TokenError::InvalidToken(format!(
                "{} token failed verification",
                purpose
            ))),
            Validation::Mismatch => Err(TokenError::CacheMismatch(purpose)),
        }
    }
}

/// 액세스/리프레시 토큰 쌍
///
/// 로그인 및 재로그인 응답으로 클라이언트에게 전달되는 토큰 집합입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// 액세스 토큰 (API 접근용 단기 토큰)
    pub access_token: String,
    /// 리프레시 토큰 (토큰 갱신용 장기 토큰)
    pub refresh_token: String,
    /// 액세스 토큰 만료 시간 (초)
    pub expires_in: u64,
}

/// 액션 토큰 확인(confirm) 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfirmation {
    pub subject: String,
    /// 전이 후 새로 필요한 후속 토큰 (예: 사용자명 변경 후 재활성화 링크)
    pub follow_up: Option<(Purpose, EnsuredToken)>,
}
