//! 미들웨어 모듈
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰을 확인하는 미들웨어를 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### BearerAuth
//! - `Authorization: Bearer {token}` 헤더에서 액세스 토큰 추출
//! - 브로커로 서명 검증 + 캐시 일치 확인 (폐기/대체된 토큰 거부)
//! - 주체 정보를 request extension에 저장 ([`AuthenticatedSubject`](crate::domain::auth::AuthenticatedSubject))
//! - 선택적/강제 인증 모드 지원
//!
//! 저장소 장애는 두 모드 모두에서 503으로 응답합니다. 서명만 보고 통과시키지 않습니다.
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use account_token_broker::middlewares::BearerAuth;
//!
//! let broker = web::Data::new(TokenBroker::from_env().await?);
//!
//! App::new()
//!     .app_data(broker.clone())
//!     .service(
//!         web::scope("/api/protected")
//!             .wrap(BearerAuth::required())
//!             .route("/me", web::get().to(me))
//!     )
//!     .service(
//!         web::scope("/api/public")
//!             .wrap(BearerAuth::optional())
//!             .route("/status", web::get().to(status))
//!     )
//! ```

pub mod bearer_auth;
mod bearer_inner;

pub use bearer_auth::BearerAuth;
