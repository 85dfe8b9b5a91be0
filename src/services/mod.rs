//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 토큰 서명/검증, 수명주기 브로커, 계정 전이별 폐기 연쇄를 제공합니다.

pub mod auth;
