//! 계정 토큰 수명주기 브로커
//!
//! 계정 서비스가 사용하는 용도별 서명 토큰(액세스, 리프레시, 활성화, 비활성화,
//! 재활성화, 삭제, 비밀번호 재설정, 이메일 변경, 사용자명 변경)의 수명주기를 관리합니다.
//!
//! # Features
//!
//! - **용도별 시크릿**: 한 용도로 발급된 토큰은 다른 용도로 검증되지 않음
//! - **재사용**: 살아있는 토큰이 있으면 같은 토큰을 다시 돌려줌 (중복 링크 방지)
//! - **일회성 소비**: 액션 토큰은 검증 성공 즉시 캐시에서 삭제
//! - **즉시 폐기**: 계정 전이마다 선언된 용도들을 한 번에 삭제
//! - **Redis**: 모든 요청 처리 워커가 공유하는 토큰 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Middlewares   │ ← BearerAuth (actix-web)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  TokenBroker    │ ← 발급/재사용, 검증/소비, 폐기 연쇄
//! └─────────────────┘
//!     │         │
//!     ▼         ▼
//! ┌────────┐ ┌─────────────────┐
//! │ Signer │ │ TokenRepository │ ← 키 규칙, 왕복 시간 제한
//! └────────┘ └─────────────────┘
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │  Redis / Memory │ ← TokenStore
//!          └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use account_token_broker::services::auth::{AccountTransition, TokenBroker};
//!
//! let broker = TokenBroker::from_env().await?;
//!
//! // 로그인
//! let pair = broker.issue_session(&user_id).await?;
//!
//! // 계정 삭제 요청 → 확인 링크
//! let link = broker.request_action(AccountTransition::Delete, &user_id).await?;
//!
//! // 확인 → 토큰 소비 + 세션 폐기
//! let confirmed = broker.confirm_action(AccountTransition::Delete, &presented).await?;
//! ```

pub mod core;
pub mod config;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod middlewares;
