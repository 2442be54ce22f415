pub mod assignments;
pub mod audit;
pub mod backups;
pub mod candidates;
pub mod evaluations;
pub mod evaluators;
pub mod phases;
pub mod resets;
pub mod system;
pub mod votes;

pub use assignments::configure_assignment_routes;
pub use audit::configure_audit_routes;
pub use backups::configure_backup_routes;
pub use candidates::configure_candidate_routes;
pub use evaluations::configure_evaluation_routes;
pub use evaluators::configure_evaluator_routes;
pub use phases::configure_phase_routes;
pub use resets::configure_reset_routes;
pub use system::configure_system_routes;
pub use votes::configure_vote_routes;

use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

use crate::errors::{JuryError, Result};
use crate::models::ApiResponse;
use crate::models::common::response::status_code_of;

/// 注册全部路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_system_routes(cfg);
    configure_candidate_routes(cfg);
    configure_evaluator_routes(cfg);
    configure_assignment_routes(cfg);
    configure_evaluation_routes(cfg);
    configure_vote_routes(cfg);
    configure_phase_routes(cfg);
    configure_reset_routes(cfg);
    configure_backup_routes(cfg);
    configure_audit_routes(cfg);
}

/// 领域错误转换为 HTTP 响应
pub(crate) fn error_response(err: &JuryError) -> HttpResponse {
    let status = status_code_of(err);
    if status.is_server_error() {
        error!("Request failed: {}", err.format_simple());
    }
    HttpResponse::build(status).json(ApiResponse::from_error(err))
}

/// 服务层结果转换为 200 响应
pub(crate) fn respond<T>(result: Result<T>, message: &str) -> ActixResult<HttpResponse>
where
    T: Serialize + TS,
{
    Ok(match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(err) => error_response(&err),
    })
}

/// 服务层结果转换为 201 响应
pub(crate) fn respond_created<T>(result: Result<T>, message: &str) -> ActixResult<HttpResponse>
where
    T: Serialize + TS,
{
    Ok(match result {
        Ok(data) => HttpResponse::Created().json(ApiResponse::success(data, message)),
        Err(err) => error_response(&err),
    })
}

/// 无返回数据的操作
pub(crate) fn respond_empty(result: Result<()>, message: &str) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_empty(message)),
        Err(err) => error_response(&err),
    })
}
