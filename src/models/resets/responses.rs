use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

// 重置结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct ResetOutcome {
    pub votes_reset: i64,
    pub evaluations_reset: i64,
    pub backup_count: i64,
    pub backup_id: Option<i64>,
}

impl ResetOutcome {
    pub fn affected_rows(&self) -> i64 {
        self.votes_reset + self.evaluations_reset
    }
}

// 重置历史条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct ResetHistoryItem {
    pub audit_id: i64,
    pub reset_at: DateTime<Utc>,
    pub reset_type: String,
    pub user: Option<i64>,
    pub candidate: Option<i64>,
    pub phase: Option<String>,
    pub initiated_by: i64,
    pub reason: Option<String>,
    pub affected_rows: i64,
    pub success: bool,
}

// 重置历史响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct ResetHistoryResponse {
    pub resets: Vec<ResetHistoryItem>,
}
