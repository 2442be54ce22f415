use serde::Serialize;
use ts_rs::TS;

use super::entities::Vote;

// 投票结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct CastVoteResponse {
    pub vote_id: i64,
}

// 获取投票结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteResponse {
    pub vote: Option<Vote>,
}
