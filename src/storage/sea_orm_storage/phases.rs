//! 评审阶段存储操作

use super::{SeaOrmStorage, audit::insert_audit, now};
use crate::entity::phases::{self, Entity as Phases};
use crate::errors::{JuryError, Result};
use crate::models::{audit::entities::NewAuditEntry, phases::entities::Phase};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

/// 读取当前阶段，可在事务内调用
pub(super) async fn current_phase_in<C: ConnectionTrait>(conn: &C) -> Result<phases::Model> {
    Phases::find()
        .filter(phases::Column::IsCurrent.eq(true))
        .one(conn)
        .await
        .map_err(|e| JuryError::storage(format!("查询当前阶段失败: {e}")))?
        .ok_or_else(|| JuryError::storage("未设置当前评审阶段"))
}

/// 将当前阶段切换为新阶段
pub(super) async fn switch_phase_in<C: ConnectionTrait>(conn: &C, to_phase: &str) -> Result<()> {
    let now = now();

    Phases::update_many()
        .col_expr(phases::Column::IsCurrent, Expr::value(false))
        .col_expr(phases::Column::UpdatedAt, Expr::value(now))
        .filter(phases::Column::IsCurrent.eq(true))
        .exec(conn)
        .await
        .map_err(|e| JuryError::storage(format!("更新阶段失败: {e}")))?;

    phases::ActiveModel {
        name: Set(to_phase.to_string()),
        is_current: Set(true),
        locked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| JuryError::storage(format!("创建阶段失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 列出阶段
    pub async fn list_phases_impl(&self) -> Result<Vec<Phase>> {
        let result = Phases::find()
            .order_by_asc(phases::Column::CreatedAt)
            .order_by_asc(phases::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询阶段列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_phase()).collect())
    }

    /// 锁定/解锁阶段
    pub async fn set_phase_lock_impl(
        &self,
        name: &str,
        locked: bool,
        mut audit: NewAuditEntry,
    ) -> Result<Option<Phase>> {
        let txn = self.db.begin().await?;

        let Some(existing) = Phases::find_by_id(name.to_string())
            .one(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询阶段失败: {e}")))?
        else {
            return Ok(None);
        };

        let changed = existing.locked != locked;
        let mut model: phases::ActiveModel = existing.into();
        model.locked = Set(locked);
        model.updated_at = Set(now());
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("更新阶段锁定状态失败: {e}")))?;

        audit.affected_rows = i64::from(changed);
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交阶段事务失败: {e}")))?;

        Ok(Some(updated.into_phase()))
    }
}
