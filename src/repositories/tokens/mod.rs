//! 토큰 캐시 엔트리 리포지토리 모듈
//!
//! (용도, 주체)마다 최대 하나의 캐시 엔트리를 관리합니다.
//!
//! # Features
//!
//! - **키 규칙**: `"{purpose}_token_{subject}"`
//! - **TTL 자동 관리**: 저장소 TTL로 만료 처리 (브로커는 만료를 추적하지 않음)
//! - **왕복 시간 제한**: 느린 캐시가 호출 흐름을 무기한 붙잡지 않도록 제한
//! - **일괄 삭제**: 폐기 연쇄를 위한 다중 용도 동시 삭제
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::repositories::tokens::TokenRepository;
//!
//! repo.save(Purpose::ResetPassword, "user-1", &token, 1800).await?;
//! repo.remove_all("user-1", &[Purpose::Access, Purpose::Refresh]).await?;
//! ```

pub mod token_repository;

pub use token_repository::*;
