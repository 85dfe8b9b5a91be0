use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::caching::store::TokenStore;
use crate::core::errors::{TokenError, TokenResult};
use crate::domain::token::Purpose;

/// 용도별 토큰 캐시 엔트리 리포지토리
///
/// 저장소 핸들은 생성자로 주입됩니다. 모든 왕복은 `operation_timeout`으로 제한되며,
/// 제한 시간 초과는 `TokenError::StoreUnavailable`로 보고됩니다.
#[derive(Clone)]
pub struct TokenRepository {
    store: Arc<dyn TokenStore>,
    operation_timeout: Duration,
}

impl TokenRepository {
    pub fn new(store: Arc<dyn TokenStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    pub fn key(purpose: Purpose, subject: &str) -> String {
        purpose.cache_key(subject)
    }

    /// 현재 캐시된 토큰을 조회합니다.
    pub async fn find(&self, purpose: Purpose, subject: &str) -> TokenResult<Option<String>> {
        let key = Self::key(purpose, subject);
        self.bounded("GET", &key, self.store.get(&key)).await
    }

    /// 토큰을 저장합니다. 같은 키의 기존 토큰은 통째로 대체됩니다.
    pub async fn save(
        &self,
        purpose: Purpose,
        subject: &str,
        token: &str,
        ttl_seconds: u64,
    ) -> TokenResult<()> {
        let key = Self::key(purpose, subject);
        self.bounded("SET", &key, self.store.set(&key, token, ttl_seconds)).await
    }

    pub async fn remove(&self, purpose: Purpose, subject: &str) -> TokenResult<()> {
        let key = Self::key(purpose, subject);
        self.bounded("DEL", &key, self.store.delete(&key)).await
    }

    /// 여러 용도의 엔트리를 동시에 삭제합니다.
    ///
    /// 삭제는 서로 독립된 호출이므로 하나가 실패해도 나머지는 모두 시도합니다.
    /// 실패가 있으면 첫 번째 실패를 반환합니다.
    pub async fn remove_all(&self, subject: &str, purposes: &[Purpose]) -> TokenResult<()> {
        let results = join_all(purposes.iter().map(|purpose| self.remove(*purpose, subject))).await;

        results.into_iter().collect::<TokenResult<Vec<()>>>()?;
        Ok(())
    }

    async fn bounded<T, F>(&self, op: &str, key: &str, fut: F) -> TokenResult<T>
    where
        F: Future<Output = TokenResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                log::error!("토큰 저장소 {} 실패 - key: {}, 에러: {}", op, key, e);
                Err(e)
            }
            Err(_) => {
                log::error!(
                    "토큰 저장소 {} 타임아웃 - key: {}, 제한: {}ms",
                    op,
                    key,
                    self.operation_timeout.as_millis()
                );
                Err(TokenError::StoreUnavailable(format!(
                    "{} {} timed out after {}ms",
                    op,
                    key,
                    self.operation_timeout.as_millis()
                )))
            }
        }
    }
}
