use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created, respond_empty};
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::assignments::{
    requests::{
        AssignmentListQuery, AutoDistributeRequest, ClearAssignmentsRequest, ManualAssignRequest,
    },
    responses::{AssignmentListResponse, UnassignedCandidatesResponse},
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn list_assignments(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<AssignmentListQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .assignments
        .list(&actor, query.into_inner())
        .await
        .map(|items| AssignmentListResponse { items });
    respond(result, "Assignments retrieved successfully")
}

pub async fn manual_assign(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<ManualAssignRequest>,
) -> ActixResult<HttpResponse> {
    respond_created(
        services
            .assignments
            .manual_assign(&actor, body.into_inner())
            .await,
        "Candidates assigned successfully",
    )
}

pub async fn auto_distribute(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<AutoDistributeRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .assignments
            .auto_distribute(&actor, body.into_inner())
            .await,
        "Assignments distributed successfully",
    )
}

pub async fn rebalance(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.assignments.rebalance(&actor).await,
        "Assignments rebalanced successfully",
    )
}

pub async fn clear_assignments(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<ClearAssignmentsRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .assignments
            .clear_all(&actor, body.cascade_evaluations)
            .await,
        "Assignments cleared successfully",
    )
}

pub async fn get_statistics(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.assignments.statistics(&actor).await,
        "Assignment statistics retrieved successfully",
    )
}

pub async fn get_unassigned(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    let result = services
        .assignments
        .unassigned_candidates(&actor)
        .await
        .map(|candidate_ids| UnassignedCandidatesResponse { candidate_ids });
    respond(result, "Unassigned candidates retrieved successfully")
}

pub async fn assignment_exists(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (evaluator_id, candidate_id) = path.into_inner();
    respond(
        services
            .assignments
            .exists(&actor, evaluator_id, candidate_id)
            .await,
        "Assignment lookup completed",
    )
}

pub async fn remove_assignment(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    path: web::Path<(i64, i64)>,
    query: web::Query<ClearAssignmentsRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluator_id, candidate_id) = path.into_inner();
    respond_empty(
        services
            .assignments
            .remove_assignment(&actor, evaluator_id, candidate_id, query.cascade_evaluations)
            .await,
        "Assignment removed successfully",
    )
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(manual_assign)),
            )
            .route("/auto-distribute", web::post().to(auto_distribute))
            .route("/rebalance", web::post().to(rebalance))
            .route("/clear", web::post().to(clear_assignments))
            .route("/statistics", web::get().to(get_statistics))
            .route("/unassigned", web::get().to(get_unassigned))
            .service(
                web::resource("/{evaluator_id}/{candidate_id}")
                    .route(web::get().to(assignment_exists))
                    .route(web::delete().to(remove_assignment)),
            ),
    );
}
