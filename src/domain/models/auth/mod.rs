//! 인증 도메인 모델

pub mod authenticated_subject;
pub mod authentication_request;

pub use authenticated_subject::*;
pub use authentication_request::*;
