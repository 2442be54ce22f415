use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 评委角色
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/evaluator.ts")]
    pub enum EvaluatorRole {
        Member => "member",
        President => "president",
        VicePresident => "vice_president",
    }
}

// 评委实体，停用而不删除以保留历史
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluator.ts")]
pub struct Evaluator {
    pub id: i64,
    pub account_id: i64,
    pub display_name: String,
    pub role: EvaluatorRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
