//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 저장소 구현체([`crate::caching::TokenStore`]) 위에서 키 규칙과
//! 왕복 시간 제한을 책임집니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::tokens::TokenRepository;
//!
//! let repo = TokenRepository::new(store, Duration::from_millis(300));
//! let cached = repo.find(Purpose::Access, "user-1").await?;
//! ```

pub mod tokens;
