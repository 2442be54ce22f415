use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares::{RequireJWT, RequireNonce};
use crate::models::votes::{
    requests::{CastVoteRequest, GetVoteQuery},
    responses::VoteResponse,
};
use crate::services::AppServices;
use crate::utils::CurrentActor;

// HTTP处理程序
pub async fn cast_vote(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    body: web::Json<CastVoteRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        services.votes.cast_vote(&actor, body.into_inner()).await,
        "Vote cast successfully",
    )
}

pub async fn get_vote(
    actor: CurrentActor,
    services: web::Data<AppServices>,
    query: web::Query<GetVoteQuery>,
) -> ActixResult<HttpResponse> {
    let result = services
        .votes
        .get_vote(&actor, query.candidate_id)
        .await
        .map(|vote| VoteResponse { vote });
    respond(result, "Vote retrieved successfully")
}

// 配置路由
pub fn configure_vote_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/votes")
            .wrap(RequireNonce)
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(get_vote))
                    .route(web::post().to(cast_vote)),
            ),
    );
}
