use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

/// 검증된 액세스 토큰에서 추출된 주체 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSubject {
    /// 계정 고유 ID (토큰의 `sub`)
    pub subject: String,

    /// 인증에 사용된 원본 액세스 토큰
    #[serde(skip_serializing)]
    pub token: String,
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedSubject {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedSubject>() {
            Some(subject) => ready(Ok(subject.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}

/// 선택적 인증 주체 추출자
#[derive(Debug, Clone)]
pub struct OptionalSubject(pub Option<AuthenticatedSubject>);

impl FromRequest for OptionalSubject {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let subject = req.extensions().get::<AuthenticatedSubject>().cloned();
        ready(Ok(OptionalSubject(subject)))
    }
}
