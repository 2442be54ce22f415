use serde::Deserialize;
use ts_rs::TS;

define_string_enum! {
    /// 批量重置范围
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
    pub enum BulkResetScope {
        AllUserVotes => "all_user_votes",
        AllCandidateVotes => "all_candidate_votes",
        PhaseTransition => "phase_transition",
        FullReset => "full_reset",
    }
}

// 单条重置请求：按投票 ID 或评委+候选人定位
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct IndividualResetRequest {
    pub vote_id: Option<i64>,
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    #[serde(default)]
    pub reason: String,
}

// 批量重置选项
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct BulkResetOptions {
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub to_phase: Option<String>,
    pub reason: Option<String>,
    #[serde(default)]
    pub confirm: bool,
}

// 批量重置请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reset.ts")]
pub struct BulkResetRequest {
    pub reset_scope: BulkResetScope,
    #[serde(default)]
    pub options: BulkResetOptions,
}

// 重置历史查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetHistoryQuery {
    pub limit: Option<u64>,
}
