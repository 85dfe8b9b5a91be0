//! # Domain Layer
//!
//! 토큰 수명주기의 도메인 타입을 정의합니다.
//!
//! - [`models::token`] - 토큰 용도(Purpose), 클레임, 발급/검증 결과
//! - [`models::auth`] - 인증된 주체와 인증 모드
//!
//! 도메인 타입은 저장소나 HTTP 계층에 의존하지 않으며,
//! 서비스 계층과 미들웨어가 공통으로 사용하는 어휘입니다.

pub mod models;

pub use models::*;
