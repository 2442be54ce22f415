/*!
 * JWT 认证中间件
 *
 * 验证访问令牌，并把令牌中的账户解析为调用者身份 `Actor`。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new()
 *     .service(
 *         web::scope("/api/v1/evaluations")
 *             .wrap(RequireJWT)
 *             .route("", web::post().to(save_evaluation))
 *     )
 * ```
 *
 * 在处理程序中提取调用者：
 * ```rust,ignore
 * async fn handler(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let actor = RequireJWT::extract_actor(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件校验令牌签名、过期时间与类型
 * 3. 管理员账户直接放行；评委账户必须对应一名在任评委
 * 4. 解析出的 `Actor` 存入请求扩展，失败返回 401
 */

use crate::errors::JuryError;
use crate::models::ErrorCode;
use crate::models::auth::entities::Actor;
use crate::services::AppServices;
use crate::utils::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：提取并验证 JWT access token，解析调用者
async fn extract_and_resolve_actor(req: &ServiceRequest) -> Result<Actor, JuryError> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| JuryError::authentication("Missing or invalid Authorization header"))?;

    let jwt = req
        .app_data::<web::Data<JwtUtils>>()
        .ok_or_else(|| JuryError::storage("JwtUtils not found in app data"))?;
    let claims = jwt.verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        JuryError::authentication("Invalid JWT token")
    })?;

    let account_id = claims
        .account_id()
        .ok_or_else(|| JuryError::authentication("Invalid account ID in JWT"))?;
    let role = claims
        .account_role()
        .ok_or_else(|| JuryError::authentication("Invalid role in JWT"))?;

    let services = req
        .app_data::<web::Data<AppServices>>()
        .ok_or_else(|| JuryError::storage("AppServices not found in app data"))?;
    services.roster.resolve_actor(account_id, role).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_resolve_actor(&req).await {
                Ok(actor) => {
                    debug!(
                        "JWT authentication successful for account {} ({})",
                        actor.account_id,
                        actor.role_label()
                    );
                    req.extensions_mut().insert(actor);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(JuryError::Authentication(msg)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        msg
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {msg}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(err) => {
                    error!("Failed to resolve caller for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to resolve caller identity",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
