use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 评审阶段表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Phases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Phases::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Phases::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Phases::Locked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Phases::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Phases::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 备份表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Backups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Backups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Backups::BackupType).string().not_null())
                    .col(ColumnDef::new(Backups::Source).string().not_null())
                    .col(ColumnDef::new(Backups::Reason).text().not_null())
                    .col(ColumnDef::new(Backups::Payload).text().not_null())
                    .col(ColumnDef::new(Backups::VotesCount).integer().not_null())
                    .col(ColumnDef::new(Backups::ScoresCount).integer().not_null())
                    .col(
                        ColumnDef::new(Backups::PayloadSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Backups::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Backups::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Backups::RestoredAt).big_integer().null())
                    .col(ColumnDef::new(Backups::RestoredBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_backups_created_at")
                    .table(Backups::Table)
                    .col(Backups::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 审计日志表 ====================
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLog::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLog::Action).string().not_null())
                    .col(ColumnDef::new(AuditLog::Scope).string().not_null())
                    .col(ColumnDef::new(AuditLog::ActorId).big_integer().not_null())
                    .col(ColumnDef::new(AuditLog::ActorRole).string().not_null())
                    .col(ColumnDef::new(AuditLog::EvaluatorId).big_integer().null())
                    .col(ColumnDef::new(AuditLog::CandidateId).big_integer().null())
                    .col(ColumnDef::new(AuditLog::Phase).string().null())
                    .col(
                        ColumnDef::new(AuditLog::AffectedRows)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLog::Reason).text().null())
                    .col(ColumnDef::new(AuditLog::Details).text().null())
                    .col(ColumnDef::new(AuditLog::Success).boolean().not_null())
                    .col(ColumnDef::new(AuditLog::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 审计日志索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_log_actor_id")
                    .table(AuditLog::Table)
                    .col(AuditLog::ActorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_log_action")
                    .table(AuditLog::Table)
                    .col(AuditLog::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_log_created_at")
                    .table(AuditLog::Table)
                    .col(AuditLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 插入初始阶段 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let insert = Query::insert()
            .into_table(Phases::Table)
            .columns([
                Phases::Name,
                Phases::IsCurrent,
                Phases::Locked,
                Phases::CreatedAt,
                Phases::UpdatedAt,
            ])
            .values_panic([
                "phase_1".into(),
                true.into(),
                false.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Backups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phases::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Phases {
    Table,
    Name,
    IsCurrent,
    Locked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Backups {
    Table,
    Id,
    BackupType,
    Source,
    Reason,
    Payload,
    VotesCount,
    ScoresCount,
    PayloadSize,
    CreatedAt,
    CreatedBy,
    RestoredAt,
    RestoredBy,
}

#[derive(DeriveIden)]
enum AuditLog {
    #[sea_orm(iden = "audit_log")]
    Table,
    Id,
    Action,
    Scope,
    ActorId,
    ActorRole,
    EvaluatorId,
    CandidateId,
    Phase,
    AffectedRows,
    Reason,
    Details,
    Success,
    CreatedAt,
}
