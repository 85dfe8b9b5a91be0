//! Bearer 토큰 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰이 살아있는지 확인하고 주체 정보를 추출합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::auth::AuthMode;
use crate::middlewares::bearer_inner::BearerAuthService;

/// Bearer 토큰 인증 미들웨어
///
/// 브로커는 `web::Data<TokenBroker>`로 앱에 등록되어 있어야 합니다.
pub struct BearerAuth {
    mode: AuthMode,
}

impl BearerAuth {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BearerAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}
