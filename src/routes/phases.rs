use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::phases::requests::SetPhaseLockRequest;
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn list_phases(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.phases.list(&actor).await,
        "Phases retrieved successfully",
    )
}

pub async fn current_phase(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.phases.current(&actor).await,
        "Current phase retrieved successfully",
    )
}

pub async fn set_phase_lock(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    name: web::Path<String>,
    body: web::Json<SetPhaseLockRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .phases
            .set_lock(&actor, &name, body.locked)
            .await,
        "Phase lock updated successfully",
    )
}

// 配置路由
pub fn configure_phase_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/phases")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .route("", web::get().to(list_phases))
            .route("/current", web::get().to(current_phase))
            .route("/{name}/lock", web::put().to(set_phase_lock)),
    );
}
