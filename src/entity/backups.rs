//! 备份实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "backups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub backup_type: String,
    pub source: String,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub votes_count: i32,
    pub scores_count: i32,
    pub payload_size: i64,
    pub created_at: i64,
    pub created_by: i64,
    pub restored_at: Option<i64>,
    pub restored_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为不含载荷的备份记录
    pub fn into_backup(self) -> crate::models::backups::entities::Backup {
        use crate::models::backups::entities::{Backup, BackupSource, BackupType};

        Backup {
            id: self.id,
            backup_type: self
                .backup_type
                .parse::<BackupType>()
                .unwrap_or(BackupType::Full),
            source: self
                .source
                .parse::<BackupSource>()
                .unwrap_or(BackupSource::Manual),
            reason: self.reason,
            votes_count: self.votes_count,
            scores_count: self.scores_count,
            payload_size: self.payload_size,
            created_at: super::ts(self.created_at),
            created_by: self.created_by,
            restored_at: self.restored_at.map(super::ts),
            restored_by: self.restored_by,
        }
    }
}
