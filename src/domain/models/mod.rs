//! 도메인 모델 모듈
//!
//! ```rust,ignore
//! use account_token_broker::domain::token::{Purpose, TokenClaims, Validation};
//! use account_token_broker::domain::auth::AuthenticatedSubject;
//! ```

pub mod auth;
pub mod token;
