use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::candidates::requests::{
    CandidateListQuery, CreateCandidateRequest, ImportCandidatesRequest,
    UpdateCandidateStatusRequest,
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn list_candidates(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<CandidateListQuery>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .roster
            .list_candidates(&actor, query.into_inner())
            .await,
        "Candidates retrieved successfully",
    )
}

pub async fn create_candidate(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<CreateCandidateRequest>,
) -> ActixResult<HttpResponse> {
    respond_created(
        services
            .roster
            .create_candidate(&actor, body.into_inner())
            .await,
        "Candidate created successfully",
    )
}

pub async fn import_candidates(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<ImportCandidatesRequest>,
) -> ActixResult<HttpResponse> {
    respond_created(
        services
            .roster
            .import_candidates(&actor, body.into_inner())
            .await,
        "Candidates imported successfully",
    )
}

pub async fn get_candidate(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    respond(
        services.roster.get_candidate(&actor, id.into_inner()).await,
        "Candidate retrieved successfully",
    )
}

pub async fn update_candidate_status(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    id: web::Path<i64>,
    body: web::Json<UpdateCandidateStatusRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .roster
            .update_candidate_status(&actor, id.into_inner(), body.into_inner())
            .await,
        "Candidate status updated successfully",
    )
}

pub async fn get_candidate_average(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .evaluations
            .average_for_candidate(&actor, id.into_inner())
            .await,
        "Average score retrieved successfully",
    )
}

// 配置路由
pub fn configure_candidate_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/candidates")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_candidates))
                    .route(web::post().to(create_candidate)),
            )
            .route("/import", web::post().to(import_candidates))
            .route("/{id}", web::get().to(get_candidate))
            .route("/{id}/status", web::put().to(update_candidate_status))
            .route("/{id}/average", web::get().to(get_candidate_average)),
    );
}
