use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 投票记录，重置时软删除
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct Vote {
    pub id: i64,
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub phase: String,
    pub rating: i32,
    pub comments: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reset_at: Option<DateTime<Utc>>,
    pub reset_by: Option<i64>,
}
