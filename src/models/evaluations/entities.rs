use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 评分状态，只允许 draft -> submitted
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
    pub enum EvaluationStatus {
        Draft => "draft",
        Submitted => "submitted",
    }
}

/// 单项评分下限
pub const MIN_SCORE: i32 = 1;
/// 单项评分上限
pub const MAX_SCORE: i32 = 10;

// 五项评审标准得分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Scores {
    pub courage: i32,
    pub innovation: i32,
    pub implementation: i32,
    pub relevance: i32,
    pub visibility: i32,
}

impl Scores {
    /// 按固定顺序列出各项标准名称与得分
    pub fn criteria(&self) -> [(&'static str, i32); 5] {
        [
            ("courage", self.courage),
            ("innovation", self.innovation),
            ("implementation", self.implementation),
            ("relevance", self.relevance),
            ("visibility", self.visibility),
        ]
    }
}

// 评分记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub phase: String,
    pub scores: Scores,
    pub total_score: i32,
    pub comments: Option<String>,
    pub status: EvaluationStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// 经过校验、待写入的评分
#[derive(Debug, Clone)]
pub struct ValidatedEvaluation {
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub scores: Scores,
    pub total_score: i32,
    pub comments: Option<String>,
    pub status: EvaluationStatus,
}
