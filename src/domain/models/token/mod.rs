//! 토큰 도메인 모델
//!
//! 용도별 토큰 식별자([`Purpose`])와 JWT 클레임, 브로커 연산 결과 타입을 제공합니다.

pub mod purpose;
pub mod token;

pub use purpose::*;
pub use token::*;
