//! 캐싱 계층 모듈
//!
//! 토큰 저장소 추상화([`store::TokenStore`])와 그 구현체를 제공합니다.
//!
//! # 주요 기능
//!
//! - 키/값 + 키별 TTL 인터페이스 (`get`, `set`, `delete`)
//! - Redis 어댑터: 모든 요청 처리 워커가 같은 상태를 보는 공유 저장소
//! - 메모리 어댑터: 테스트와 단일 프로세스 도구 전용
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::caching::{redis::RedisTokenStore, store::TokenStore};
//!
//! let store: Arc<dyn TokenStore> = Arc::new(RedisTokenStore::connect(&RedisConfig::from_env()).await?);
//! store.set("access_token_42", "eyJ...", 3600).await?;
//! let token = store.get("access_token_42").await?;
//! store.delete("access_token_42").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod memory;
pub mod redis;
pub mod store;

pub use memory::MemoryTokenStore;
pub use self::redis::RedisTokenStore;
pub use store::TokenStore;
