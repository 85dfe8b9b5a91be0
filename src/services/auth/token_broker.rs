//! # 토큰 수명주기 브로커
//!
//! 서명 토큰의 발급/재사용, 검증/소비, 폐기를 조율합니다.
//!
//! 서명 토큰은 그 자체로 검증 가능하지만 재사용, 일회성 소비, 즉시 폐기를 표현할 수 없습니다.
//! 브로커는 (용도, 주체)마다 하나의 캐시 엔트리를 두고, 토큰이 **살아있음**을
//! "용도의 시크릿으로 서명이 검증됨 **그리고** 현재 캐시 값과 문자열이 같음"으로 정의합니다.
//! 서명이 유효하고 만료되지 않았더라도 대체되었거나 폐기되었다면 죽은 토큰입니다.
//!
//! ## 상태 전이
//!
//! 액션 토큰: `ABSENT → ISSUED → CONSUMED | EXPIRED` (소비/만료된 토큰은 다시 살아나지 않음)
//!
//! Bearer 토큰: `ABSENT → ISSUED → REUSED(자기 루프) | SUPERSEDED | REVOKED`
//!
//! ## 동시성
//!
//! 브로커는 확인 후 실행(check-then-act) 구간에 잠금을 두지 않습니다.
//! 같은 (용도, 주체)에 대한 동시 요청은 중복 발급이나 중복 후속 작업(메일 재발송 등)을
//! 일으킬 수 있지만, 시크릿 없이 서명을 위조할 수는 없으므로 보안 문제는 아닙니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let broker = TokenBroker::new(Arc::new(config), store);
//!
//! // 로그인
//! let pair = broker.issue_session(&user_id).await?;
//!
//! // 비밀번호 재설정 요청 → 링크 발송
//! let reset = broker.request_action(AccountTransition::ResetPassword, &user_id).await?;
//!
//! // 링크 확인 → 토큰 소비 + 세션 폐기
//! let confirmed = broker.confirm_action(AccountTransition::ResetPassword, &presented).await?;
//! ```

use std::sync::Arc;

use log::debug;

use crate::caching::{RedisTokenStore, TokenStore};
use crate::config::{load_env_file, RedisConfig, TokenConfig};
use crate::core::errors::{TokenError, TokenResult};
use crate::domain::token::{ActionConfirmation, EnsuredToken, Purpose, TokenPair, Validation};
use crate::repositories::tokens::TokenRepository;
use crate::services::auth::clock::{Clock, SystemClock};
use crate::services::auth::revocation::AccountTransition;
use crate::services::auth::token_service::TokenService;
use crate::utils::string_utils::token_fingerprint;

/// 토큰 수명주기 브로커
///
/// 저장소와 설정은 생성자로 주입되며, 프로세스 전역 상태를 두지 않습니다.
/// 브로커의 모든 연산은 보안 관련 결과를 삼키지 않고 타입이 있는 결과로 반환합니다.
/// 재시도는 하지 않습니다.
#[derive(Clone)]
pub struct TokenBroker {
    signer: TokenService,
    repository: TokenRepository,
}

impl TokenBroker {
    /// 시스템 시계와 기본 저장소 타임아웃으로 브로커를 만듭니다.
    pub fn new(config: Arc<TokenConfig>, store: Arc<dyn TokenStore>) -> Self {
        Self::with_parts(
            TokenService::new(config, Arc::new(SystemClock)),
            TokenRepository::new(store, RedisConfig::default().operation_timeout),
        )
    }

    pub fn with_clock(
        config: Arc<TokenConfig>,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_parts(
            TokenService::new(config, clock),
            TokenRepository::new(store, RedisConfig::default().operation_timeout),
        )
    }

    pub fn with_parts(signer: TokenService, repository: TokenRepository) -> Self {
        Self { signer, repository }
    }

    /// 환경 설정으로 Redis 기반 브로커를 구성합니다.
    ///
    /// `PROFILE`에 맞는 `.env` 파일을 읽고, 용도별 시크릿/TTL과 Redis 연결을 준비합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::StoreUnavailable` - Redis 연결 또는 PING 실패
    pub async fn from_env() -> TokenResult<Self> {
        load_env_file();

        let redis_config = RedisConfig::from_env();
        let store = RedisTokenStore::connect(&redis_config).await?;

        Ok(Self::with_parts(
            TokenService::new(Arc::new(TokenConfig::from_env()), Arc::new(SystemClock)),
            TokenRepository::new(Arc::new(store), redis_config.operation_timeout),
        ))
    }

    pub fn signer(&self) -> &TokenService {
        &self.signer
    }

    pub fn config(&self) -> &TokenConfig {
        self.signer.config()
    }

    /// `EnsureToken`: 살아있는 캐시 토큰이 있으면 재사용하고, 없으면 새로 발급합니다.
    ///
    /// 1. 캐시된 토큰을 조회합니다.
    /// 2. 토큰이 있고, 용도의 시크릿으로 검증되며, 주체가 같으면 재사용합니다 (`fresh = false`).
    /// 3. 그 밖에는 새로 서명해 저장하고 반환합니다 (`fresh = true`).
    ///
    /// # Errors
    ///
    /// * `TokenError::ConfigMissing` - 용도의 시크릿 누락, `ttl_seconds == 0`, 범위를 벗어난 TTL
    /// * `TokenError::StoreUnavailable` - 저장소 조회/저장 실패
    pub async fn ensure_token(
        &self,
        purpose: Purpose,
        subject: &str,
        ttl_seconds: u64,
    ) -> TokenResult<EnsuredToken> {
        if let Some(cached) = self.repository.find(purpose, subject).await? {
            match self.signer.verify(&cached, purpose) {
                Ok(claims) if claims.sub == subject => {
                    debug!(
                        "토큰 재사용 - purpose: {}, subject: {}, token: {}",
                        purpose,
                        subject,
                        token_fingerprint(&cached)
                    );
                    return Ok(EnsuredToken::reused(cached));
                }
                // 만료, 위조, 다른 주체의 토큰은 새 토큰으로 덮어쓴다
                Ok(_) | Err(TokenError::InvalidToken(_)) => {}
                Err(e) => return Err(e),
            }
        }

        self.generate(purpose, subject, ttl_seconds).await
    }

    /// 설정된 TTL로 `EnsureToken`을 수행합니다.
    pub async fn ensure(&self, purpose: Purpose, subject: &str) -> TokenResult<EnsuredToken> {
        let ttl = self.config().ttl(purpose)?;
        self.ensure_token(purpose, subject, ttl).await
    }

    /// 캐시 상태와 관계없이 새 토큰을 발급해 기존 토큰을 대체합니다.
    pub async fn reissue(&self, purpose: Purpose, subject: &str) -> TokenResult<EnsuredToken> {
        let ttl = self.config().ttl(purpose)?;
        self.generate(purpose, subject, ttl).await
    }

    async fn generate(
        &self,
        purpose: Purpose,
        subject: &str,
        ttl_seconds: u64,
    ) -> TokenResult<EnsuredToken> {
        let token = self.signer.issue(purpose, subject, ttl_seconds)?;
        self.repository.save(purpose, subject, &token, ttl_seconds).await?;

        debug!(
            "토큰 발급 - purpose: {}, subject: {}, ttl: {}초, token: {}",
            purpose,
            subject,
            ttl_seconds,
            token_fingerprint(&token)
        );
        Ok(EnsuredToken::generated(token))
    }

    /// 제시된 토큰이 살아있는지 확인합니다. 저장소는 변경하지 않습니다.
    ///
    /// 서명/만료 검사가 캐시 조회보다 먼저 수행되므로,
    /// 만료된 토큰은 캐시에 남아 있어도 `Invalid`입니다.
    ///
    /// # Returns
    ///
    /// * `Validation::Invalid` - 서명, 만료, 발급자, 대상 검증 실패 (저장소 미조회)
    /// * `Validation::Mismatch` - 캐시 엔트리가 없거나 값이 다름
    /// * `Validation::Ok` - 살아있는 토큰
    ///
    /// # Errors
    ///
    /// * `TokenError::ConfigMissing` - 용도의 시크릿 누락
    /// * `TokenError::StoreUnavailable` - 저장소 장애 (서명만 믿고 통과시키지 않음)
    pub async fn validate(&self, purpose: Purpose, presented: &str) -> TokenResult<Validation> {
        let subject = match self.signer.verify_subject(presented, purpose) {
            Ok(subject) => subject,
            Err(TokenError::InvalidToken(_)) => return Ok(Validation::Invalid),
            Err(e) => return Err(e),
        };

        match self.repository.find(purpose, &subject).await? {
            Some(cached) if cached == presented => Ok(Validation::Ok { subject }),
            _ => Ok(Validation::Mismatch),
        }
    }

    /// `ValidateAndConsume`: 검증 후, 액션 토큰이면 즉시 캐시에서 삭제합니다.
    ///
    /// Bearer 토큰(`access`, `refresh`)은 삭제하지 않습니다.
    /// 삭제가 실패하면 일회성을 보장할 수 없으므로 `Ok` 대신 에러를 반환합니다.
    pub async fn validate_and_consume(
        &self,
        purpose: Purpose,
        presented: &str,
    ) -> TokenResult<Validation> {
        let validation = self.validate(purpose, presented).await?;

        if let Validation::Ok { subject } = &validation {
            if purpose.is_action() {
                self.repository.remove(purpose, subject).await?;
                debug!(
                    "액션 토큰 소비 - purpose: {}, subject: {}, token: {}",
                    purpose,
                    subject,
                    token_fingerprint(presented)
                );
            }
        }

        Ok(validation)
    }

    /// `RevokeAll`: 주체의 지정된 용도 엔트리를 모두 삭제합니다.
    ///
    /// 멱등적입니다. 이미 없는 엔트리의 삭제는 아무 일도 하지 않습니다.
    pub async fn revoke_all(&self, subject: &str, purposes: &[Purpose]) -> TokenResult<()> {
        self.repository.remove_all(subject, purposes).await?;

        debug!("토큰 폐기 - subject: {}, purposes: {:?}", subject, purposes);
        Ok(())
    }

    /// 로그인: 액세스/리프레시 토큰을 확보합니다 (살아있으면 재사용).
    pub async fn issue_session(&self, subject: &str) -> TokenResult<TokenPair> {
        let access = self.ensure(Purpose::Access, subject).await?;
        let refresh = self.ensure(Purpose::Refresh, subject).await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: self.config().ttl(Purpose::Access)?,
        })
    }

    /// 재로그인: 리프레시 토큰을 검증하고(소비하지 않음) 새 액세스 토큰으로 교체합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` / `TokenError::CacheMismatch` - 리프레시 토큰이 죽음
    pub async fn refresh_session(&self, refresh_token: &str) -> TokenResult<TokenPair> {
        let subject = self
            .validate(Purpose::Refresh, refresh_token)
            .await?
            .into_subject(Purpose::Refresh)?;

        let access = self.reissue(Purpose::Access, &subject).await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.config().ttl(Purpose::Access)?,
        })
    }

    /// 요청 인증: 액세스 토큰이 살아있으면 주체를 반환합니다.
    pub async fn authenticate(&self, access_token: &str) -> TokenResult<String> {
        self.validate(Purpose::Access, access_token)
            .await?
            .into_subject(Purpose::Access)
    }

    /// 전이 확인용 액션 토큰을 확보합니다 (요청 흐름: 링크 메일 발송 전).
    ///
    /// 아직 살아있는 링크 토큰이 있으면 재사용합니다.
    /// 확인 토큰이 없는 전이(`Logout`)는 `None`을 반환합니다.
    pub async fn request_action(
        &self,
        transition: AccountTransition,
        subject: &str,
    ) -> TokenResult<Option<EnsuredToken>> {
        match transition.action_purpose() {
            Some(purpose) => self.ensure(purpose, subject).await.map(Some),
            None => Ok(None),
        }
    }

    /// 전이의 폐기 연쇄를 실행하고, 후속 토큰이 필요하면 새로 발급합니다.
    pub async fn apply_transition(
        &self,
        subject: &str,
        transition: AccountTransition,
    ) -> TokenResult<Option<(Purpose, EnsuredToken)>> {
        self.revoke_all(subject, transition.revoked_purposes()).await?;

        match transition.follow_up() {
            Some(purpose) => {
                let token = self.reissue(purpose, subject).await?;
                Ok(Some((purpose, token)))
            }
            None => Ok(None),
        }
    }

    /// 확인 흐름: 액션 토큰을 소비하고 전이의 폐기 연쇄와 후속 발급을 수행합니다.
    ///
    /// 계정 저장소 변경이 실패할 수 있는 호출 측은 `validate_and_consume`과
    /// `apply_transition`을 나누어 호출해도 됩니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` - 토큰 검증 실패, 또는 확인 토큰이 없는 전이
    /// * `TokenError::CacheMismatch` - 이미 소비됨, 대체됨, 발급된 적 없음
    pub async fn confirm_action(
        &self,
        transition: AccountTransition,
        presented: &str,
    ) -> TokenResult<ActionConfirmation> {
        let purpose = transition.action_purpose().ok_or_else(|| {
            TokenError::InvalidToken(format!("{} has no confirmation token", transition))
        })?;

        let subject = self
            .validate_and_consume(purpose, presented)
            .await?
            .into_subject(purpose)?;

        let follow_up = self.apply_transition(&subject, transition).await?;

        Ok(ActionConfirmation { subject, follow_up })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caching::MemoryTokenStore;
    use crate::services::auth::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;
    use uuid::Uuid;

    const NOW: i64 = 1_700_000_000;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn full_config() -> TokenConfig {
        Purpose::ALL.into_iter().fold(TokenConfig::new("Account Service"), |config, purpose| {
            let ttl = match purpose {
                Purpose::Access => 3600,
                Purpose::Refresh => 7 * 24 * 3600,
                _ => 1800,
            };
            config.with_purpose(purpose, format!("{}-secret", purpose), ttl)
        })
    }

    struct Fixture {
        broker: TokenBroker,
        store: Arc<MemoryTokenStore>,
        clock: Arc<FixedClock>,
    }

    fn fixture() -> Fixture {
        init_logging();
        let store = Arc::new(MemoryTokenStore::new());
        let clock = Arc::new(FixedClock::at_timestamp(NOW));
        let broker = TokenBroker::with_clock(Arc::new(full_config()), store.clone(), clock.clone());
        Fixture { broker, store, clock }
    }

    fn new_subject() -> String {
        Uuid::new_v4().to_string()
    }

    /// 모든 호출이 실패하는 저장소
    struct DownStore;

    #[async_trait]
    impl TokenStore for DownStore {
        async fn get(&self, _key: &str) -> TokenResult<Option<String>> {
            Err(TokenError::StoreUnavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> TokenResult<()> {
            Err(TokenError::StoreUnavailable("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> TokenResult<()> {
            Err(TokenError::StoreUnavailable("connection refused".to_string()))
        }
    }

    /// 조회/저장은 되지만 삭제가 실패하는 저장소
    #[derive(Default)]
    struct UndeletableStore {
        inner: MemoryTokenStore,
        delete_attempts: AtomicUsize,
    }

    #[async_trait]
    impl TokenStore for UndeletableStore {
        async fn get(&self, key: &str) -> TokenResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> TokenResult<()> {
            self.inner.set(key, value, ttl_seconds).await
        }

        async fn delete(&self, _key: &str) -> TokenResult<()> {
            self.delete_attempts.fetch_add(1, Ordering::SeqCst);
            Err(TokenError::StoreUnavailable("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ensure_on_empty_store_generates_and_caches() {
        let Fixture { broker, store, .. } = fixture();

        let ensured = broker.ensure_token(Purpose::Access, "user-1", 3600).await.unwrap();

        assert!(ensured.fresh);
        assert_eq!(
            store.get("access_token_user-1").await.unwrap(),
            Some(ensured.token.clone())
        );
        let ttl = store.ttl("access_token_user-1").unwrap();
        assert!(ttl <= StdDuration::from_secs(3600) && ttl > StdDuration::from_secs(3590));
    }

    #[tokio::test]
    async fn test_second_ensure_reuses_cached_token() {
        let Fixture { broker, .. } = fixture();

        let first = broker.ensure_token(Purpose::Access, "user-1", 3600).await.unwrap();
        let second = broker.ensure_token(Purpose::Access, "user-1", 3600).await.unwrap();

        assert!(first.fresh);
        assert!(!second.fresh);
        assert_eq!(first.token, second.token);
        assert_eq!(
            broker.signer().verify_subject(&second.token, Purpose::Access).unwrap(),
            "user-1"
        );
    }

    #[tokio::test]
    async fn test_reuse_holds_for_every_purpose() {
        let Fixture { broker, .. } = fixture();
        let subject = new_subject();

        for purpose in Purpose::ALL {
            let first = broker.ensure(purpose, &subject).await.unwrap();
            let second = broker.ensure(purpose, &subject).await.unwrap();
            assert!(first.fresh && !second.fresh, "{}", purpose);
            assert_eq!(first.token, second.token);
        }
    }

    #[tokio::test]
    async fn test_ensure_replaces_expired_cached_token() {
        let Fixture { broker, store, clock } = fixture();
        let subject = new_subject();
        let first = broker.ensure(Purpose::Activation, &subject).await.unwrap();

        clock.advance(Duration::seconds(1800));
        let second = broker.ensure(Purpose::Activation, &subject).await.unwrap();

        assert!(second.fresh);
        assert_ne!(first.token, second.token);
        assert_eq!(
            store.get(&Purpose::Activation.cache_key(&subject)).await.unwrap(),
            Some(second.token)
        );
    }

    #[tokio::test]
    async fn test_ensure_replaces_garbage_cache_entry() {
        let Fixture { broker, store, .. } = fixture();
        store.set("deletion_token_user-9", "not-a-token", 60).await.unwrap();

        let ensured = broker.ensure(Purpose::Deletion, "user-9").await.unwrap();

        assert!(ensured.fresh);
        assert_ne!(ensured.token, "not-a-token");
    }

    #[tokio::test]
    async fn test_ensure_replaces_token_of_other_purpose_under_key() {
        let Fixture { broker, store, .. } = fixture();
        let access = broker.signer().issue(Purpose::Access, "user-9", 600).unwrap();
        store.set("refresh_token_user-9", &access, 60).await.unwrap();

        let ensured = broker.ensure(Purpose::Refresh, "user-9").await.unwrap();

        assert!(ensured.fresh);
        assert_ne!(ensured.token, access);
    }

    #[tokio::test]
    async fn test_consume_once_for_action_tokens() {
        let Fixture { broker, store, .. } = fixture();
        let subject = new_subject();
        let issued = broker.ensure(Purpose::ResetPassword, &subject).await.unwrap();

        let first = broker
            .validate_and_consume(Purpose::ResetPassword, &issued.token)
            .await
            .unwrap();
        let second = broker
            .validate_and_consume(Purpose::ResetPassword, &issued.token)
            .await
            .unwrap();

        assert_eq!(first, Validation::Ok { subject: subject.clone() });
        assert_eq!(second, Validation::Mismatch);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_consumed_action_token_is_not_rearmed_by_validation() {
        let Fixture { broker, .. } = fixture();
        let subject = new_subject();
        let issued = broker.ensure(Purpose::Deactivation, &subject).await.unwrap();
        broker
            .validate_and_consume(Purpose::Deactivation, &issued.token)
            .await
            .unwrap();

        assert_eq!(
            broker.validate(Purpose::Deactivation, &issued.token).await.unwrap(),
            Validation::Mismatch
        );
    }

    #[tokio::test]
    async fn test_bearer_tokens_are_not_consumed() {
        let Fixture { broker, .. } = fixture();
        let issued = broker.ensure(Purpose::Access, "user-2").await.unwrap();

        for _ in 0..3 {
            let validation = broker
                .validate_and_consume(Purpose::Access, &issued.token)
                .await
                .unwrap();
            assert!(validation.is_ok());
        }
    }

    #[tokio::test]
    async fn test_never_issued_action_token_is_mismatch_without_state_change() {
        let Fixture { broker, store, .. } = fixture();
        let t2 = broker.signer().issue(Purpose::Activation, "user-7", 1800).unwrap();

        let validation = broker.validate_and_consume(Purpose::Activation, &t2).await.unwrap();

        assert_eq!(validation, Validation::Mismatch);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid_even_while_cached() {
        let Fixture { broker, store, clock } = fixture();
        let issued = broker.ensure(Purpose::Access, "user-4").await.unwrap();

        clock.advance(Duration::seconds(3600));

        assert_eq!(
            broker.validate(Purpose::Access, &issued.token).await.unwrap(),
            Validation::Invalid
        );
        assert_eq!(
            store.get("access_token_user-4").await.unwrap(),
            Some(issued.token)
        );
    }

    #[tokio::test]
    async fn test_token_presented_under_wrong_purpose_is_invalid() {
        let Fixture { broker, .. } = fixture();
        let access = broker.ensure(Purpose::Access, "user-5").await.unwrap();

        assert_eq!(
            broker.validate(Purpose::Refresh, &access.token).await.unwrap(),
            Validation::Invalid
        );
    }

    #[tokio::test]
    async fn test_superseded_bearer_token_is_dead() {
        let Fixture { broker, clock, .. } = fixture();
        let old = broker.ensure(Purpose::Access, "user-6").await.unwrap();

        clock.advance(Duration::seconds(5));
        let new = broker.reissue(Purpose::Access, "user-6").await.unwrap();

        assert!(new.fresh);
        assert_ne!(old.token, new.token);
        assert_eq!(
            broker.validate(Purpose::Access, &old.token).await.unwrap(),
            Validation::Mismatch
        );
        assert!(broker.validate(Purpose::Access, &new.token).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_revoke_all_deletes_each_purpose() {
        let Fixture { broker, store, .. } = fixture();
        broker.issue_session("user-3").await.unwrap();

        broker
            .revoke_all("user-3", &[Purpose::Access, Purpose::Refresh])
            .await
            .unwrap();

        assert_eq!(store.get("access_token_user-3").await.unwrap(), None);
        assert_eq!(store.get("refresh_token_user-3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke_all_is_idempotent() {
        let Fixture { broker, store, .. } = fixture();
        broker.issue_session("user-3").await.unwrap();

        broker.revoke_all("user-3", &[Purpose::Access, Purpose::Refresh]).await.unwrap();
        broker.revoke_all("user-3", &[Purpose::Access, Purpose::Refresh]).await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_revoke_leaves_other_subjects_untouched() {
        let Fixture { broker, .. } = fixture();
        let other = broker.issue_session("user-b").await.unwrap();
        broker.issue_session("user-a").await.unwrap();

        broker.revoke_all("user-a", &Purpose::ALL).await.unwrap();

        assert_eq!(broker.authenticate(&other.access_token).await.unwrap(), "user-b");
    }

    #[tokio::test]
    async fn test_store_outage_is_surfaced_not_bypassed() {
        init_logging();
        let config = Arc::new(full_config());
        let clock = Arc::new(FixedClock::at_timestamp(NOW));
        let healthy = TokenService::new(config.clone(), clock.clone());
        let broker = TokenBroker::with_clock(config, Arc::new(DownStore), clock);
        let valid_signature = healthy.issue(Purpose::Access, "user-1", 3600).unwrap();

        assert!(matches!(
            broker.validate(Purpose::Access, &valid_signature).await,
            Err(TokenError::StoreUnavailable(_))
        ));
        assert!(matches!(
            broker.ensure(Purpose::Access, "user-1").await,
            Err(TokenError::StoreUnavailable(_))
        ));
        assert!(matches!(
            broker.revoke_all("user-1", &[Purpose::Access]).await,
            Err(TokenError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_token_does_not_touch_store_even_when_down() {
        init_logging();
        let broker = TokenBroker::with_clock(
            Arc::new(full_config()),
            Arc::new(DownStore),
            Arc::new(FixedClock::at_timestamp(NOW)),
        );

        assert_eq!(
            broker.validate(Purpose::Access, "garbage").await.unwrap(),
            Validation::Invalid
        );
    }

    #[tokio::test]
    async fn test_failed_consume_delete_is_not_reported_as_ok() {
        init_logging();
        let store = Arc::new(UndeletableStore::default());
        let broker = TokenBroker::with_clock(
            Arc::new(full_config()),
            store.clone(),
            Arc::new(FixedClock::at_timestamp(NOW)),
        );
        let session = broker.issue_session("user-f").await.unwrap();
        let link = broker.ensure(Purpose::ResetPassword, "user-f").await.unwrap();

        assert!(matches!(
            broker.validate_and_consume(Purpose::ResetPassword, &link.token).await,
            Err(TokenError::StoreUnavailable(_))
        ));
        assert_eq!(store.delete_attempts.load(Ordering::SeqCst), 1);

        assert!(matches!(
            broker
                .confirm_action(AccountTransition::ResetPassword, &link.token)
                .await,
            Err(TokenError::StoreUnavailable(_))
        ));
        // 소비 삭제 1회만 시도하고 폐기 연쇄로 넘어가지 않음
        assert_eq!(store.delete_attempts.load(Ordering::SeqCst), 2);
        assert_eq!(broker.authenticate(&session.access_token).await.unwrap(), "user-f");
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_from_env_is_config_error() {
        init_logging();
        let config = TokenConfig::from_lookup(|key| match key {
            "ACCESS_TOKEN_SECRET" => Some("access-secret".to_string()),
            "ACCESS_TOKEN_EXPIRY" => Some("9223372036854775807".to_string()),
            _ => None,
        });
        let store = Arc::new(MemoryTokenStore::new());
        let broker = TokenBroker::with_clock(
            Arc::new(config),
            store.clone(),
            Arc::new(FixedClock::at_timestamp(NOW)),
        );

        assert!(matches!(
            broker.ensure(Purpose::Access, "user-1").await,
            Err(TokenError::ConfigMissing { purpose: Purpose::Access, .. })
        ));
        assert!(matches!(
            broker
                .ensure_token(Purpose::Access, "user-1", 9_223_372_036_854_775_807)
                .await,
            Err(TokenError::ConfigMissing { .. })
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_purpose_config_is_reported() {
        init_logging();
        let config = TokenConfig::new("Account Service").with_purpose(Purpose::Access, "s", 3600);
        let broker = TokenBroker::new(Arc::new(config), Arc::new(MemoryTokenStore::new()));

        assert!(matches!(
            broker.ensure(Purpose::Deletion, "user-1").await,
            Err(TokenError::ConfigMissing { purpose: Purpose::Deletion, .. })
        ));
        assert!(matches!(
            broker.validate(Purpose::Deletion, "a.b.c").await,
            Err(TokenError::ConfigMissing { .. })
        ));
        assert!(matches!(
            broker.issue_session("user-1").await,
            Err(TokenError::ConfigMissing { purpose: Purpose::Refresh, .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_ensure_leaves_one_live_entry() {
        let Fixture { broker, store, .. } = fixture();

        let (a, b) = tokio::join!(
            broker.ensure(Purpose::Reactivation, "user-c"),
            broker.ensure(Purpose::Reactivation, "user-c"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        let cached = store.get("reactivation_token_user-c").await.unwrap().unwrap();

        assert!(cached == a.token || cached == b.token);
        assert_eq!(store.len(), 1);
        assert!(broker.validate(Purpose::Reactivation, &cached).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_login_refresh_authenticate_logout() {
        let Fixture { broker, clock, .. } = fixture();
        let subject = new_subject();

        let login = broker.issue_session(&subject).await.unwrap();
        assert_eq!(login.expires_in, 3600);
        assert_eq!(broker.authenticate(&login.access_token).await.unwrap(), subject);

        let again = broker.issue_session(&subject).await.unwrap();
        assert_eq!(again.access_token, login.access_token);
        assert_eq!(again.refresh_token, login.refresh_token);

        clock.advance(Duration::seconds(10));
        let refreshed = broker.refresh_session(&login.refresh_token).await.unwrap();
        assert_ne!(refreshed.access_token, login.access_token);
        assert_eq!(refreshed.refresh_token, login.refresh_token);
        assert_eq!(
            broker.authenticate(&login.access_token).await,
            Err(TokenError::CacheMismatch(Purpose::Access))
        );
        assert_eq!(broker.authenticate(&refreshed.access_token).await.unwrap(), subject);

        broker.apply_transition(&subject, AccountTransition::Logout).await.unwrap();
        assert!(broker.authenticate(&refreshed.access_token).await.is_err());
        assert_eq!(
            broker.refresh_session(&login.refresh_token).await.unwrap_err(),
            TokenError::CacheMismatch(Purpose::Refresh)
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejects_refresh_token() {
        let Fixture { broker, .. } = fixture();
        let pair = broker.issue_session("user-r").await.unwrap();

        assert!(matches!(
            broker.authenticate(&pair.refresh_token).await,
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_request_action_reuses_outstanding_link() {
        let Fixture { broker, .. } = fixture();

        let first = broker
            .request_action(AccountTransition::Delete, "user-d")
            .await
            .unwrap()
            .unwrap();
        let second = broker
            .request_action(AccountTransition::Delete, "user-d")
            .await
            .unwrap()
            .unwrap();

        assert!(first.fresh);
        assert!(!second.fresh);
        assert_eq!(first.token, second.token);
        assert!(broker
            .request_action(AccountTransition::Logout, "user-d")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_confirm_reset_password_revokes_session() {
        let Fixture { broker, store, .. } = fixture();
        let subject = new_subject();
        let session = broker.issue_session(&subject).await.unwrap();
        let link = broker
            .request_action(AccountTransition::ResetPassword, &subject)
            .await
            .unwrap()
            .unwrap();

        let confirmed = broker
            .confirm_action(AccountTransition::ResetPassword, &link.token)
            .await
            .unwrap();

        assert_eq!(confirmed.subject, subject);
        assert_eq!(confirmed.follow_up, None);
        assert!(broker.authenticate(&session.access_token).await.is_err());
        assert!(store.is_empty());

        assert_eq!(
            broker
                .confirm_action(AccountTransition::ResetPassword, &link.token)
                .await
                .unwrap_err(),
            TokenError::CacheMismatch(Purpose::ResetPassword)
        );
    }

    #[tokio::test]
    async fn test_confirm_change_email_issues_activation_follow_up() {
        let Fixture { broker, store, .. } = fixture();
        let subject = new_subject();
        broker.issue_session(&subject).await.unwrap();
        let link = broker
            .request_action(AccountTransition::ChangeEmail, &subject)
            .await
            .unwrap()
            .unwrap();

        let confirmed = broker
            .confirm_action(AccountTransition::ChangeEmail, &link.token)
            .await
            .unwrap();

        let (purpose, activation) = confirmed.follow_up.unwrap();
        assert_eq!(purpose, Purpose::Activation);
        assert!(activation.fresh);
        assert_eq!(store.len(), 1);

        let activated = broker
            .confirm_action(AccountTransition::Activate, &activation.token)
            .await
            .unwrap();
        assert_eq!(activated.subject, subject);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_change_username_issues_reactivation_follow_up() {
        let Fixture { broker, .. } = fixture();
        let link = broker
            .request_action(AccountTransition::ChangeUsername, "user-u")
            .await
            .unwrap()
            .unwrap();

        let confirmed = broker
            .confirm_action(AccountTransition::ChangeUsername, &link.token)
            .await
            .unwrap();

        let (purpose, reactivation) = confirmed.follow_up.unwrap();
        assert_eq!(purpose, Purpose::Reactivation);
        assert!(broker
            .validate(Purpose::Reactivation, &reactivation.token)
            .await
            .unwrap()
            .is_ok());
    }

    #[tokio::test]
    async fn test_confirm_with_token_of_other_transition_fails() {
        let Fixture { broker, .. } = fixture();
        let deletion = broker
            .request_action(AccountTransition::Delete, "user-x")
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            broker.confirm_action(AccountTransition::Deactivate, &deletion.token).await,
            Err(TokenError::InvalidToken(_))
        ));
        assert!(matches!(
            broker.confirm_action(AccountTransition::Logout, &deletion.token).await,
            Err(TokenError::InvalidToken(_))
        ));
        assert!(broker
            .validate(Purpose::Deletion, &deletion.token)
            .await
            .unwrap()
            .is_ok());
    }
}
