use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entity::{evaluations, votes};

define_string_enum! {
    /// 备份内容类型
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
    pub enum BackupType {
        Votes => "votes",
        Scores => "scores",
        Full => "full",
    }
}

impl BackupType {
    pub fn includes_votes(&self) -> bool {
        matches!(self, BackupType::Votes | BackupType::Full)
    }

    pub fn includes_scores(&self) -> bool {
        matches!(self, BackupType::Scores | BackupType::Full)
    }
}

define_string_enum! {
    /// 备份来源
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
    pub enum BackupSource {
        Manual => "manual",
        IndividualReset => "individual_reset",
        BulkCandidate => "bulk_candidate",
        BulkJury => "bulk_jury",
        PhaseTransition => "phase_transition",
        FullReset => "full_reset",
    }
}

// 备份记录（不含载荷）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct Backup {
    pub id: i64,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    pub source: BackupSource,
    pub reason: String,
    pub votes_count: i32,
    pub scores_count: i32,
    pub payload_size: i64,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
    pub restored_at: Option<DateTime<Utc>>,
    pub restored_by: Option<i64>,
}

/// 备份载荷：被替换行的逐字拷贝
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupPayload {
    pub votes: Vec<votes::Model>,
    pub evaluations: Vec<evaluations::Model>,
}

impl BackupPayload {
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty() && self.evaluations.is_empty()
    }
}
