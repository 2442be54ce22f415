use serde::Deserialize;
use ts_rs::TS;

// 投票请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct CastVoteRequest {
    pub candidate_id: i64,
    pub rating: i32,
    pub comments: Option<String>,
}

// 获取投票查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct GetVoteQuery {
    pub candidate_id: i64,
}
