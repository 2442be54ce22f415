use serde::Serialize;
use ts_rs::TS;

use super::entities::Evaluator;

// 评委列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluator.ts")]
pub struct EvaluatorListResponse {
    pub items: Vec<Evaluator>,
}
