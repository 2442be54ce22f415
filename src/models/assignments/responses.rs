use serde::Serialize;
use ts_rs::TS;

use super::entities::{
    Assignment, AssignmentMove, AssignmentPair, DistributionQuality, EvaluatorLoad,
};

// 自动分配结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct DistributionResult {
    pub assignments_created: u64,
    pub per_evaluator_counts: Vec<EvaluatorLoad>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planned: Vec<AssignmentPair>,
}

impl DistributionResult {
    pub fn empty(dry_run: bool) -> Self {
        Self {
            assignments_created: 0,
            per_evaluator_counts: Vec::new(),
            dry_run,
            planned: Vec::new(),
        }
    }
}

// 手动分配结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ManualAssignResponse {
    pub assigned_count: u64,
}

// 再平衡结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct RebalanceResult {
    pub moved_count: u64,
    pub moves: Vec<AssignmentMove>,
}

// 清空分配结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ClearAssignmentsResult {
    pub assignments_removed: u64,
    pub evaluations_removed: u64,
}

// 分配统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentStatistics {
    pub total: i64,
    pub assigned_candidates: i64,
    pub assigned_evaluators: i64,
    pub per_evaluator_counts: Vec<EvaluatorLoad>,
    pub min: i64,
    pub max: i64,
    pub average: f64,
    pub stddev: f64,
    pub quality: DistributionQuality,
}

// 未分配候选人
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UnassignedCandidatesResponse {
    pub candidate_ids: Vec<i64>,
}

// 分配列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}
