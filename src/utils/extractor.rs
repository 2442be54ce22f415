use std::ops::Deref;

use actix_web::{
    FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::auth::entities::Actor;
use crate::models::{ApiResponse, ErrorCode};

/// 已认证的调用者，由 RequireJWT 写入请求扩展
///
/// 未经过 RequireJWT 的请求提取失败并返回 401。
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl Deref for CurrentActor {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<Actor>() {
            Some(actor) => Ok(CurrentActor(actor.clone())),
            None => {
                let response = HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Unauthorized: caller identity not resolved",
                ));
                Err(InternalError::from_response("missing actor", response).into())
            }
        };
        ready(result)
    }
}
