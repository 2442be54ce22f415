use serde::Deserialize;
use ts_rs::TS;

// 锁定/解锁阶段请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/phase.ts")]
pub struct SetPhaseLockRequest {
    pub locked: bool,
}
