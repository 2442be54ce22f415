use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::backups::{
    requests::{
        BackupHistoryQuery, CreateBackupRequest, PurgeBackupsRequest, RestoreBackupRequest,
    },
    responses::{BackupHistoryResponse, PurgeBackupsResponse},
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn create_backup(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<CreateBackupRequest>,
) -> ActixResult<HttpResponse> {
    respond_created(
        services.resets.create_backup(&actor, body.into_inner()).await,
        "Backup created successfully",
    )
}

pub async fn backup_history(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<BackupHistoryQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .resets
        .backup_history(&actor, query.into_inner())
        .await
        .map(|backups| BackupHistoryResponse { backups });
    respond(result, "Backup history retrieved successfully")
}

pub async fn restore_backup(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<RestoreBackupRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .resets
            .restore_backup(&actor, body.into_inner())
            .await,
        "Backup restored successfully",
    )
}

pub async fn backup_statistics(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.resets.backup_statistics(&actor).await,
        "Backup statistics retrieved successfully",
    )
}

pub async fn purge_backups(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<PurgeBackupsRequest>,
) -> ActixResult<HttpResponse> {
    let result = services
        .resets
        .purge_expired_backups(&actor, body.days)
        .await
        .map(|deleted| PurgeBackupsResponse { deleted });
    respond(result, "Expired backups purged successfully")
}

// 配置路由
pub fn configure_backup_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/backups")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(backup_history))
                    .route(web::post().to(create_backup)),
            )
            .route("/restore", web::post().to(restore_backup))
            .route("/statistics", web::get().to(backup_statistics))
            .route("/purge", web::post().to(purge_backups)),
    );
}
