/*!
 * 重放保护中间件
 *
 * 所有写操作（POST/PUT/PATCH/DELETE）必须携带 `X-Request-Nonce` 请求头。
 * 同一账户在 `replay.nonce_ttl` 秒内重复使用的 nonce 被拒绝（409）。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * App::new()
 *     .app_data(web::Data::new(ReplayGuard::new(&config.replay)))
 *     .service(
 *         web::scope("/api/v1/resets")
 *             .wrap(RequireNonce) // 内层：依赖 RequireJWT 解析出的调用者
 *             .wrap(RequireJWT)   // 外层：先认证
 *             .route("/bulk", web::post().to(bulk_reset)),
 *     )
 * ```
 */

use crate::config::ReplayConfig;
use crate::models::ErrorCode;
use crate::models::auth::entities::Actor;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use std::rc::Rc;
use std::time::Duration;
use tracing::{error, warn};

use super::create_error_response;

pub const NONCE_HEADER: &str = "X-Request-Nonce";
const MAX_NONCE_LEN: usize = 128;

#[derive(Clone)]
pub struct RequireNonce;

/// 已使用的 nonce，启动时创建一次并通过 app_data 在各 worker 之间共享
#[derive(Clone)]
pub struct ReplayGuard {
    seen: Cache<String, ()>,
}

impl ReplayGuard {
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            seen: Cache::builder()
                .time_to_live(Duration::from_secs(config.nonce_ttl))
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    /// 登记 nonce；窗口内已出现过时返回 false
    pub async fn register(&self, key: String) -> bool {
        // entry 的插入是原子的，并发的同一 nonce 只有一个能拿到新条目
        self.seen.entry(key).or_insert(()).await.is_fresh()
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// 从请求中提取 nonce，缺失或格式不合法时返回 None
fn extract_nonce(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(NONCE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|n| !n.is_empty() && n.len() <= MAX_NONCE_LEN)
        .map(str::to_string)
}

impl<S, B> Transform<S, ServiceRequest> for RequireNonce
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireNonceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireNonceMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireNonceMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireNonceMiddleware<S>
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
            if !is_mutating(req.method()) {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            let Some(nonce) = extract_nonce(&req) else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid X-Request-Nonce header",
                    )
                    .map_into_right_body(),
                ));
            };

            let account = req
                .extensions()
                .get::<Actor>()
                .map(|actor| actor.account_id.to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            let Some(guard) = req.app_data::<web::Data<ReplayGuard>>().cloned() else {
                error!("ReplayGuard not found in app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Replay protection unavailable",
                    )
                    .map_into_right_body(),
                ));
            };

            if !guard.register(format!("{account}:{nonce}")).await {
                warn!(
                    "Replayed request rejected for {} (account {})",
                    req.path(),
                    account
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::CONFLICT,
                        ErrorCode::ReplayDetected,
                        "Request nonce has already been used",
                    )
                    .map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nonce_is_single_use() {
        let guard = ReplayGuard::new(&ReplayConfig::default());
        assert!(guard.register("1:abc".to_string()).await);
        assert!(!guard.register("1:abc".to_string()).await);
        // 不同账户的相同 nonce 互不影响
        assert!(guard.register("2:abc".to_string()).await);
    }

    #[test]
    fn test_only_writes_are_guarded() {
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::DELETE));
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::OPTIONS));
    }
}
