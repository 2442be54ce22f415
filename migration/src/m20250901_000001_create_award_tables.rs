use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 候选人表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidates::Name).string().not_null())
                    .col(ColumnDef::new(Candidates::Organization).string().null())
                    .col(ColumnDef::new(Candidates::Category).string().not_null())
                    .col(ColumnDef::new(Candidates::Status).string().not_null())
                    .col(
                        ColumnDef::new(Candidates::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Candidates::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 评委表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Evaluators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluators::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluators::AccountId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Evaluators::DisplayName).string().not_null())
                    .col(ColumnDef::new(Evaluators::Role).string().not_null())
                    .col(
                        ColumnDef::new(Evaluators::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Evaluators::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluators::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 分配表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CandidateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::AssignedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::EvaluatorId)
                            .to(Evaluators::Table, Evaluators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一评委-候选人只能分配一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_assignments_evaluator_candidate")
                    .table(Assignments::Table)
                    .col(Assignments::EvaluatorId)
                    .col(Assignments::CandidateId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_candidate_id")
                    .table(Assignments::Table)
                    .col(Assignments::CandidateId)
                    .to_owned(),
            )
            .await?;

        // ==================== 评分表 ====================
        // 评分行不设外键：清空分配而不级联时，评分需要保留下来由读取路径拒绝
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CandidateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Phase).string().not_null())
                    .col(
                        ColumnDef::new(Evaluations::CourageScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::InnovationScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::ImplementationScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::RelevanceScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::VisibilityScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::TotalScore)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Comments).text().null())
                    .col(ColumnDef::new(Evaluations::Status).string().not_null())
                    .col(
                        ColumnDef::new(Evaluations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个阶段内同一评委-候选人最多一条评分
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluations_pair_phase")
                    .table(Evaluations::Table)
                    .col(Evaluations::EvaluatorId)
                    .col(Evaluations::CandidateId)
                    .col(Evaluations::Phase)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_candidate_status")
                    .table(Evaluations::Table)
                    .col(Evaluations::CandidateId)
                    .col(Evaluations::Status)
                    .to_owned(),
            )
            .await?;

        // ==================== 投票表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::EvaluatorId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::CandidateId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::Phase).string().not_null())
                    .col(ColumnDef::new(Votes::Rating).integer().not_null())
                    .col(ColumnDef::new(Votes::Comments).text().null())
                    .col(
                        ColumnDef::new(Votes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Votes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Votes::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Votes::ResetAt).big_integer().null())
                    .col(ColumnDef::new(Votes::ResetBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_pair_active")
                    .table(Votes::Table)
                    .col(Votes::EvaluatorId)
                    .col(Votes::CandidateId)
                    .col(Votes::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Candidates::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Candidates {
    Table,
    Id,
    Name,
    Organization,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluators {
    Table,
    Id,
    AccountId,
    DisplayName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    EvaluatorId,
    CandidateId,
    AssignedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    Table,
    Id,
    EvaluatorId,
    CandidateId,
    Phase,
    CourageScore,
    InnovationScore,
    ImplementationScore,
    RelevanceScore,
    VisibilityScore,
    TotalScore,
    Comments,
    Status,
    IsActive,
    CreatedAt,
    UpdatedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    EvaluatorId,
    CandidateId,
    Phase,
    Rating,
    Comments,
    IsActive,
    CreatedAt,
    UpdatedAt,
    ResetAt,
    ResetBy,
}
