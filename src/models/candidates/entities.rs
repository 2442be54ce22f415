use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 奖项类别
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
    pub enum CandidateCategory {
        EstablishedCompanies => "established_companies",
        StartupsNewMakers => "startups_new_makers",
        Governance => "governance",
    }
}

define_string_enum! {
    /// 候选人状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
    pub enum CandidateStatus {
        Nominated => "nominated",
        Shortlisted => "shortlisted",
        Finalist => "finalist",
        Winner => "winner",
        Withdrawn => "withdrawn",
    }
}

impl CandidateStatus {
    /// 是否参与评审分配
    pub fn is_distributable(&self) -> bool {
        !matches!(self, CandidateStatus::Withdrawn)
    }
}

// 候选人实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub organization: Option<String>,
    pub category: CandidateCategory,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
