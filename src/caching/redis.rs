//! # Redis 토큰 저장소 구현
//!
//! Redis를 백엔드로 하는 [`TokenStore`] 구현체입니다.
//! 여러 워커 프로세스가 같은 Redis를 바라보므로 발급/소비/폐기 상태가
//! 모든 요청 처리기에 즉시 공유됩니다.
//!
//! ## 연결 관리
//!
//! `ConnectionManager`는 멀티플렉싱된 단일 연결을 공유하며,
//! 연결이 끊기면 다음 명령에서 자동으로 재연결합니다.
//! 재시도와 백오프는 호출 측의 책임이며 이 어댑터는 재시도하지 않습니다.

use async_trait::async_trait;
use log::info;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::caching::store::TokenStore;
use crate::config::RedisConfig;
use crate::core::errors::TokenResult;

/// Redis 토큰 저장소
///
/// 값은 직렬화 없이 토큰 문자열 그대로 저장됩니다 (`SET key token EX ttl`).
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let store = RedisTokenStore::connect(&RedisConfig::from_env()).await?;
/// store.set("reset_password_token_42", &token, 1800).await?;
/// ```
#[derive(Clone)]
pub struct RedisTokenStore {
    /// 자동 재연결을 지원하는 멀티플렉싱 연결
    connection: ConnectionManager,
}

impl RedisTokenStore {
    /// Redis 서버에 연결하고 PING으로 가용성을 확인합니다.
    ///
    /// ## 에러 케이스
    ///
    /// - 잘못된 URL 형식
    /// - Redis 서버에 연결할 수 없는 경우
    /// - 인증 실패
    ///
    /// 모두 `TokenError::StoreUnavailable`로 반환됩니다.
    pub async fn connect(config: &RedisConfig) -> TokenResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let mut connection = ConnectionManager::new(client).await?;

        // 연결 테스트 - PING 명령으로 서버 가용성 확인
        redis::cmd("PING").query_async::<()>(&mut connection).await?;

        info!("✅ Redis 토큰 저장소 연결 성공");

        Ok(Self { connection })
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn get(&self, key: &str) -> TokenResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> TokenResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> TokenResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
