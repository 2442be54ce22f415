use serde::Deserialize;
use ts_rs::TS;

use super::entities::EvaluatorRole;

// 评委入职请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluator.ts")]
pub struct CreateEvaluatorRequest {
    pub account_id: i64,
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: EvaluatorRole,
}

fn default_role() -> EvaluatorRole {
    EvaluatorRole::Member
}

// 评委列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluatorListQuery {
    #[serde(default)]
    pub active_only: bool,
}
