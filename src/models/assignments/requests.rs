use serde::Deserialize;
use ts_rs::TS;

use super::entities::DistributionMethod;

// 自动分配请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AutoDistributeRequest {
    #[serde(default)]
    pub method: DistributionMethod,
    #[serde(default = "default_candidates_per_jury")]
    pub candidates_per_jury: u32,
    #[serde(default)]
    pub clear_existing: bool,
    // 仅返回分配计划，不写入
    #[serde(default)]
    pub dry_run: bool,
    // 随机分配的种子，给定时结果可复现
    #[ts(type = "number | null")]
    pub seed: Option<u64>,
    // 本次最多新增的分配数
    pub max_total: Option<u32>,
}

fn default_candidates_per_jury() -> u32 {
    20
}

impl Default for AutoDistributeRequest {
    fn default() -> Self {
        Self {
            method: DistributionMethod::Balanced,
            candidates_per_jury: default_candidates_per_jury(),
            clear_existing: false,
            dry_run: false,
            seed: None,
            max_total: None,
        }
    }
}

// 手动分配请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ManualAssignRequest {
    pub evaluator_id: i64,
    pub candidate_ids: Vec<i64>,
}

// 删除分配 / 清空分配的参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ClearAssignmentsRequest {
    #[serde(default)]
    pub cascade_evaluations: bool,
}

// 分配列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListQuery {
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
}
