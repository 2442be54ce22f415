use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::resets::{
    requests::{BulkResetRequest, IndividualResetRequest, ResetHistoryQuery},
    responses::ResetHistoryResponse,
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn reset_individual(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<IndividualResetRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .resets
            .reset_individual(&actor, body.into_inner())
            .await,
        "Vote reset successfully",
    )
}

pub async fn bulk_reset(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<BulkResetRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services.resets.bulk_reset(&actor, body.into_inner()).await,
        "Bulk reset completed successfully",
    )
}

pub async fn reset_history(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<ResetHistoryQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .audit
        .reset_history(&actor, query.limit)
        .await
        .map(|resets| ResetHistoryResponse { resets });
    respond(result, "Reset history retrieved successfully")
}

// 配置路由
pub fn configure_reset_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/resets")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .route("/individual", web::post().to(reset_individual))
            .route("/bulk", web::post().to(bulk_reset))
            .route("/history", web::get().to(reset_history)),
    );
}
