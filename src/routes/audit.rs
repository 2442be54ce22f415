use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::audit::{
    entities::{AuditAction, AuditScope},
    requests::{AuditListQuery, AuditLookupQuery, CleanAuditLogRequest},
    responses::{AuditEntriesResponse, CleanAuditLogResponse},
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn list_audit_logs(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<AuditListQuery>,
) -> ActixResult<HttpResponse> {
    respond(
        services.audit.list(&actor, query.into_inner()).await,
        "Audit logs retrieved successfully",
    )
}

pub async fn audit_statistics(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.audit.statistics(&actor).await,
        "Audit statistics retrieved successfully",
    )
}

pub async fn clean_audit_logs(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<CleanAuditLogRequest>,
) -> ActixResult<HttpResponse> {
    let result = services
        .audit
        .clean_old_logs(&actor, body.days)
        .await
        .map(|deleted| CleanAuditLogResponse { deleted });
    respond(result, "Audit logs cleaned successfully")
}

pub async fn audit_by_actor(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    actor_id: web::Path<i64>,
    query: web::Query<AuditLookupQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .audit
        .get_by_actor(&actor, actor_id.into_inner(), query.limit)
        .await
        .map(|items| AuditEntriesResponse { items });
    respond(result, "Audit logs retrieved successfully")
}

pub async fn audit_by_scope(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    scope: web::Path<AuditScope>,
    query: web::Query<AuditLookupQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .audit
        .get_by_scope(&actor, scope.into_inner(), query.limit)
        .await
        .map(|items| AuditEntriesResponse { items });
    respond(result, "Audit logs retrieved successfully")
}

pub async fn audit_by_action(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    action: web::Path<AuditAction>,
    query: web::Query<AuditLookupQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .audit
        .get_by_action(&actor, action.into_inner(), query.limit)
        .await
        .map(|items| AuditEntriesResponse { items });
    respond(result, "Audit logs retrieved successfully")
}

// 配置路由
pub fn configure_audit_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/audit")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .route("", web::get().to(list_audit_logs))
            .route("/statistics", web::get().to(audit_statistics))
            .route("/clean", web::post().to(clean_audit_logs))
            .route("/by-actor/{actor_id}", web::get().to(audit_by_actor))
            .route("/by-scope/{scope}", web::get().to(audit_by_scope))
            .route("/by-action/{action}", web::get().to(audit_by_action)),
    );
}
