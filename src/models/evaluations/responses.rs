use serde::Serialize;
use ts_rs::TS;

use super::entities::{Evaluation, EvaluationStatus};
use crate::models::candidates::entities::CandidateCategory;

// 保存评分结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SaveEvaluationResponse {
    pub evaluation_id: i64,
    pub total_score: i32,
    pub status: EvaluationStatus,
}

// 获取评分结果，未评分时为 null
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationResponse {
    pub evaluation: Option<Evaluation>,
}

// 候选人平均分，无已提交评分时 average 为 null
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CandidateAverage {
    pub candidate_id: i64,
    pub average: Option<f64>,
    pub evaluation_count: i64,
}

// 总排行榜条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RankedCandidate {
    pub rank: i64,
    pub candidate_id: i64,
    pub name: String,
    pub category: CandidateCategory,
    pub average_score: f64,
    pub evaluation_count: i64,
}

// 评委个人排名条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct JuryRankedCandidate {
    pub rank: i64,
    pub candidate_id: i64,
    pub name: String,
    pub total_score: i32,
}

// 各项标准平均分
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CriteriaAverages {
    pub courage: Option<f64>,
    pub innovation: Option<f64>,
    pub implementation: Option<f64>,
    pub relevance: Option<f64>,
    pub visibility: Option<f64>,
}

// 评分统计，草稿不计入平均值
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationStatistics {
    pub submitted: i64,
    pub drafts: i64,
    pub average_total: Option<f64>,
    pub criteria: CriteriaAverages,
}

// 评委进度
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct JuryProgress {
    pub evaluator_id: i64,
    pub assigned: i64,
    pub submitted: i64,
    pub drafts: i64,
    pub pending: i64,
    pub completion_rate: f64,
}

// 排行榜响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct TopCandidatesResponse {
    pub items: Vec<RankedCandidate>,
}

// 评委个人排名响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct JuryRankingResponse {
    pub evaluator_id: i64,
    pub items: Vec<JuryRankedCandidate>,
}
