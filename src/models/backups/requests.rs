use serde::Deserialize;
use ts_rs::TS;

use super::entities::BackupType;

// 手动备份请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct CreateBackupRequest {
    pub reason: String,
    #[serde(rename = "type", default = "default_backup_type")]
    pub backup_type: BackupType,
}

fn default_backup_type() -> BackupType {
    BackupType::Full
}

// 恢复备份请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct RestoreBackupRequest {
    pub backup_id: i64,
    pub backup_type: Option<BackupType>,
}

// 备份历史查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackupHistoryQuery {
    pub limit: Option<u64>,
}

// 清理过期备份请求，days 为空时使用配置的保留期
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct PurgeBackupsRequest {
    pub days: Option<i64>,
}
