//! BearerAuth 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::{TokenError, TokenResult};
use crate::domain::auth::{AuthMode, AuthenticatedSubject};
use crate::domain::token::Purpose;
use crate::services::auth::TokenBroker;

/// 실제 인증 로직을 수행하는 서비스
pub struct BearerAuthService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;

        Box::pin(async move {
            let auth_result = match req.app_data::<web::Data<TokenBroker>>().cloned() {
                Some(broker) => authenticate_request(&req, &broker).await,
                None => Err(TokenError::config_missing(
                    Purpose::Access,
                    "TokenBroker is not registered as app data",
                )),
            };

            match (mode, auth_result) {
                (_, Ok(Some(subject))) => {
                    log::debug!("인증 성공: subject {}", subject.subject);
                    req.extensions_mut().insert(subject);
                }
                (AuthMode::Optional, Ok(None)) => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
                (AuthMode::Optional, Err(err)) if err.is_unauthenticated() => {
                    log::debug!("선택적 인증: 토큰 거부, 익명으로 진행 ({})", err);
                }
                (AuthMode::Required, Ok(None)) => {
                    let err = TokenError::InvalidToken("Authorization 헤더가 없습니다".to_string());
                    return Ok(reject::<B>(req, err));
                }
                (_, Err(err)) => return Ok(reject::<B>(req, err)),
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, err: TokenError) -> ServiceResponse<EitherBody<B>> {
    if err.is_unauthenticated() {
        log::warn!("인증 실패: {}", err);
    } else {
        log::error!("인증 처리 불가: {}", err);
    }

    let response = err.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// 요청에서 Bearer 토큰을 추출하고 브로커로 확인
///
/// Authorization 헤더가 없으면 저장소를 조회하지 않고 `Ok(None)`을 반환합니다.
async fn authenticate_request(
    req: &ServiceRequest,
    broker: &TokenBroker,
) -> TokenResult<Option<AuthenticatedSubject>> {
    let Some(auth_header) = req.headers().get("Authorization") else {
        return Ok(None);
    };
    let auth_header = auth_header
        .to_str()
        .map_err(|_| {
            TokenError::InvalidToken("유효하지 않은 인증 헤더 형식입니다".to_string())
        })?;

    let token = broker.signer().extract_bearer_token(auth_header)?;
    let subject = broker.authenticate(token).await?;

    Ok(Some(AuthenticatedSubject {
        subject,
        token: token.to_string(),
    }))
}
