use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::evaluators::{
    requests::{CreateEvaluatorRequest, EvaluatorListQuery},
    responses::EvaluatorListResponse,
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn list_evaluators(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<EvaluatorListQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .roster
        .list_evaluators(&actor, query.into_inner())
        .await
        .map(|items| EvaluatorListResponse { items });
    respond(result, "Evaluators retrieved successfully")
}

pub async fn create_evaluator(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<CreateEvaluatorRequest>,
) -> ActixResult<HttpResponse> {
    respond_created(
        services
            .roster
            .create_evaluator(&actor, body.into_inner())
            .await,
        "Evaluator onboarded successfully",
    )
}

pub async fn get_evaluator(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    respond(
        services.roster.get_evaluator(&actor, id.into_inner()).await,
        "Evaluator retrieved successfully",
    )
}

pub async fn deactivate_evaluator(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .roster
            .deactivate_evaluator(&actor, id.into_inner())
            .await,
        "Evaluator deactivated successfully",
    )
}

// 配置路由
pub fn configure_evaluator_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluators")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_evaluators))
                    .route(web::post().to(create_evaluator)),
            )
            .route("/{id}", web::get().to(get_evaluator))
            .route("/{id}/deactivate", web::post().to(deactivate_evaluator)),
    );
}
