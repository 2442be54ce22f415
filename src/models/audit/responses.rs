use serde::Serialize;
use ts_rs::TS;

use super::entities::{AuditAction, AuditEntry};
use crate::models::PaginationInfo;

// 审计日志列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub pagination: PaginationInfo,
}

// 按动作统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct ActionCount {
    pub action: AuditAction,
    pub count: i64,
}

// 审计统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditStatistics {
    pub total: i64,
    pub failures: i64,
    pub by_action: Vec<ActionCount>,
}

// 清理结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct CleanAuditLogResponse {
    pub deleted: u64,
}

// 按操作者、范围或动作查询的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditEntriesResponse {
    pub items: Vec<AuditEntry>,
}
