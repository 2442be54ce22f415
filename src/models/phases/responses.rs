use serde::Serialize;
use ts_rs::TS;

use super::entities::Phase;

// 阶段列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct PhaseListResponse {
    pub current: String,
    pub phases: Vec<Phase>,
}
