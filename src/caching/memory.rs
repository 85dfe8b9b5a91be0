//! 프로세스 내부 토큰 저장소
//!
//! 테스트와 단일 프로세스 도구 전용입니다. 프로세스 사이에 상태가 공유되지 않으므로
//! 여러 워커가 요청을 처리하는 배포 환경에서는 [`RedisTokenStore`](super::RedisTokenStore)를 사용해야 합니다.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::caching::store::TokenStore;
use crate::core::errors::{TokenError, TokenResult};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// TTL을 지키는 메모리 저장소
///
/// 만료는 조회 시점에 게으르게 처리됩니다.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 만료되지 않은 키의 수
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 남은 TTL (테스트에서 저장된 TTL 확인용)
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.expires_at - now)
    }

    fn poisoned() -> TokenError {
        TokenError::StoreUnavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> TokenResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> TokenResult<()> {
        // Redis도 범위를 벗어난 EX 값은 에러로 거부한다
        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(ttl_seconds))
            .ok_or_else(|| {
                TokenError::StoreUnavailable(format!(
                    "ttl {}s out of range for {}",
                    ttl_seconds, key
                ))
            })?;

        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> TokenResult<()> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }
}
