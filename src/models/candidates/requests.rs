use serde::Deserialize;
use ts_rs::TS;

use super::entities::{CandidateCategory, CandidateStatus};
use crate::models::PaginationQuery;

// 创建候选人请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct CreateCandidateRequest {
    pub name: String,
    pub organization: Option<String>,
    pub category: CandidateCategory,
}

// 批量导入候选人请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct ImportCandidatesRequest {
    pub candidates: Vec<CreateCandidateRequest>,
}

// 更新候选人状态请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct UpdateCandidateStatusRequest {
    pub status: CandidateStatus,
}

// 候选人列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<CandidateCategory>,
    pub status: Option<CandidateStatus>,
}
