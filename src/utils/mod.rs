//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 슬러그 변환, 로그용 토큰 지문
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::{slugify, token_fingerprint};
//!
//! let issuer = slugify("My Project"); // "my-project"
//! log::debug!("토큰 발급: {}", token_fingerprint(&token));
//! ```

pub mod string_utils;
