use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AuditAction, AuditScope};
use crate::models::PaginationQuery;

// 审计日志列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub action: Option<AuditAction>,
    pub scope: Option<AuditScope>,
    pub actor_id: Option<i64>,
}

// 清理旧日志请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct CleanAuditLogRequest {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    365
}

// 按操作者、范围或动作查询时的条数限制
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLookupQuery {
    pub limit: Option<u64>,
}
