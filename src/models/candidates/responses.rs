use serde::Serialize;
use ts_rs::TS;

use super::entities::Candidate;
use crate::models::PaginationInfo;

// 候选人列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct CandidateListResponse {
    pub items: Vec<Candidate>,
    pub pagination: PaginationInfo,
}

// 批量导入响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct ImportCandidatesResponse {
    pub imported: usize,
    pub candidates: Vec<Candidate>,
}
