use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::evaluations::{
    requests::{
        GetEvaluationQuery, JuryProgressQuery, JuryRankingQuery, SaveEvaluationRequest,
        TopCandidatesQuery,
    },
    responses::{EvaluationResponse, TopCandidatesResponse},
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn save_evaluation(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<SaveEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services.evaluations.save(&actor, body.into_inner()).await,
        "Evaluation saved successfully",
    )
}

pub async fn get_evaluation(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<GetEvaluationQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .evaluations
        .get_evaluation(&actor, query.into_inner())
        .await
        .map(|evaluation| EvaluationResponse { evaluation });
    respond(result, "Evaluation retrieved successfully")
}

pub async fn top_candidates(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<TopCandidatesQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .evaluations
        .top_candidates(&actor, query.into_inner())
        .await
        .map(|items| TopCandidatesResponse { items });
    respond(result, "Top candidates retrieved successfully")
}

pub async fn jury_ranking(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<JuryRankingQuery>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .evaluations
            .ranked_for_jury(&actor, query.into_inner())
            .await,
        "Jury ranking retrieved successfully",
    )
}

pub async fn get_statistics(
    actor: CurrentActor,
    services: web::Data<AppServices>,
) -> ActixResult<HttpResponse> {
    respond(
        services.evaluations.statistics(&actor).await,
        "Evaluation statistics retrieved successfully",
    )
}

pub async fn jury_progress(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<JuryProgressQuery>,
) -> ActixResult<HttpResponse> {
    respond(
        services
            .evaluations
            .jury_progress(&actor, query.evaluator_id)
            .await,
        "Jury progress retrieved successfully",
    )
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(get_evaluation))
                    .route(web::post().to(save_evaluation)),
            )
            .route("/top", web::get().to(top_candidates))
            .route("/ranking", web::get().to(jury_ranking))
            .route("/statistics", web::get().to(get_statistics))
            .route("/progress", web::get().to(jury_progress)),
    );
}
