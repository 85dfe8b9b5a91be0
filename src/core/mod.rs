//! # Core Module
//!
//! 브로커 전역에서 공유하는 핵심 타입을 제공합니다.
//!
//! ### [`errors`] - 통합 에러 처리
//! - **TokenError**: 설정 누락, 토큰 무효, 캐시 불일치, 저장소 장애
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **자동 변환**: `redis::RedisError` → `TokenError::StoreUnavailable`

pub mod errors;

pub use errors::*;
