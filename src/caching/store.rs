//! 토큰 저장소 인터페이스

use async_trait::async_trait;

use crate::core::errors::TokenResult;

/// 키별 TTL을 지원하는 공유 키/값 저장소
///
/// 구현체는 독립적으로 스케줄되는 요청 처리 워커들이 동시에 호출해도 안전해야 하며,
/// 프로덕션에서는 프로세스 외부의 공유 캐시여야 합니다.
///
/// 각 연산은 독립 호출입니다. 브로커는 이를 트랜잭션으로 묶지 않습니다.
///
/// # Errors
///
/// 인프라 장애는 `TokenError::StoreUnavailable`로 반환합니다.
/// 키가 없는 것은 에러가 아닙니다.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 키의 현재 값 (없거나 만료되면 `None`)
    async fn get(&self, key: &str) -> TokenResult<Option<String>>;

    /// 값을 저장하고 TTL(초)을 설정합니다. 기존 값은 통째로 대체됩니다.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> TokenResult<()>;

    /// 키를 삭제합니다. 키가 없어도 성공입니다.
    async fn delete(&self, key: &str) -> TokenResult<()>;
}
