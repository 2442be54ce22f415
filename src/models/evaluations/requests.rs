use serde::Deserialize;
use ts_rs::TS;

use super::entities::{EvaluationStatus, Scores};
use crate::models::candidates::entities::CandidateCategory;

// 保存/提交评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SaveEvaluationRequest {
    pub candidate_id: i64,
    pub scores: Scores,
    pub comments: Option<String>,
    #[serde(default = "default_status")]
    pub status: EvaluationStatus,
}

fn default_status() -> EvaluationStatus {
    EvaluationStatus::Draft
}

// 获取评分查询参数，管理员可指定评委
#[derive(Debug, Clone, Deserialize)]
pub struct GetEvaluationQuery {
    pub candidate_id: i64,
    pub evaluator_id: Option<i64>,
}

// 排行榜查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopCandidatesQuery {
    pub limit: Option<usize>,
    pub category: Option<CandidateCategory>,
}

// 评委个人排名查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JuryRankingQuery {
    pub evaluator_id: Option<i64>,
    pub limit: Option<usize>,
}

// 评委进度查询参数，管理员必须指定评委
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JuryProgressQuery {
    pub evaluator_id: Option<i64>,
}
