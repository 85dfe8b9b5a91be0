//! 인증 토큰 서비스 모듈
//!
//! 용도별 서명 토큰의 발급, 검증, 재사용, 소비, 폐기를 담당합니다.
//!
//! # Features
//!
//! - 용도별 HMAC-SHA256 시크릿으로 서명/검증 ([`TokenService`])
//! - 캐시 기반 수명주기 관리 ([`TokenBroker`])
//! - 계정 전이별 폐기 연쇄 테이블 ([`revocation`])
//! - 주입 가능한 시계 ([`Clock`])
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AccountTransition, TokenBroker};
//!
//! let pair = broker.issue_session(&user_id).await?;
//! let subject = broker.authenticate(&pair.access_token).await?;
//! broker.apply_transition(&subject, AccountTransition::Logout).await?;
//! ```

pub mod clock;
pub mod revocation;
pub mod token_broker;
pub mod token_service;

pub use clock::*;
pub use revocation::*;
pub use token_broker::*;
pub use token_service::*;
