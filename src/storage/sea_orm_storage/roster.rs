//! 候选人与评委存储操作

use super::{SeaOrmStorage, is_unique_violation, now};
use crate::entity::candidates::{self, Entity as Candidates};
use crate::entity::evaluators::{self, Entity as Evaluators};
use crate::errors::{JuryError, Result};
use crate::models::{
    PaginationInfo,
    candidates::{
        entities::{Candidate, CandidateStatus},
        requests::{CandidateListQuery, CreateCandidateRequest},
        responses::CandidateListResponse,
    },
    evaluators::{entities::Evaluator, requests::CreateEvaluatorRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

async fn insert_candidate<C: ConnectionTrait>(
    conn: &C,
    req: CreateCandidateRequest,
) -> Result<Candidate> {
    let now = now();
    let model = candidates::ActiveModel {
        name: Set(req.name.trim().to_string()),
        organization: Set(req.organization),
        category: Set(req.category.to_string()),
        status: Set(CandidateStatus::Nominated.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = model
        .insert(conn)
        .await
        .map_err(|e| JuryError::storage(format!("创建候选人失败: {e}")))?;

    Ok(result.into_candidate())
}

impl SeaOrmStorage {
    /// 创建候选人
    pub async fn create_candidate_impl(&self, req: CreateCandidateRequest) -> Result<Candidate> {
        insert_candidate(&self.db, req).await
    }

    /// 批量导入候选人，任一失败则全部回滚
    pub async fn import_candidates_impl(
        &self,
        reqs: Vec<CreateCandidateRequest>,
    ) -> Result<Vec<Candidate>> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(reqs.len());
        for req in reqs {
            created.push(insert_candidate(&txn, req).await?);
        }
        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交导入事务失败: {e}")))?;
        Ok(created)
    }

    /// 通过 ID 获取候选人
    pub async fn get_candidate_impl(&self, id: i64) -> Result<Option<Candidate>> {
        let result = Candidates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询候选人失败: {e}")))?;

        Ok(result.map(|m| m.into_candidate()))
    }

    /// 列出候选人（分页）
    pub async fn list_candidates_impl(
        &self,
        query: CandidateListQuery,
    ) -> Result<CandidateListResponse> {
        let page = query.pagination.page();
        let size = query.pagination.size();

        let mut select = Candidates::find();
        if let Some(category) = query.category {
            select = select.filter(candidates::Column::Category.eq(category.to_string()));
        }
        if let Some(status) = query.status {
            select = select.filter(candidates::Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_asc(candidates::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| JuryError::storage(format!("查询候选人总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| JuryError::storage(format!("查询候选人列表失败: {e}")))?;

        Ok(CandidateListResponse {
            items: items.into_iter().map(|m| m.into_candidate()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 参与分配的候选人（排除已退出）
    pub async fn list_distributable_candidates_impl(&self) -> Result<Vec<Candidate>> {
        let result = Candidates::find()
            .filter(candidates::Column::Status.ne(CandidateStatus::Withdrawn.to_string()))
            .order_by_asc(candidates::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询候选人列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_candidate()).collect())
    }

    /// 更新候选人状态
    pub async fn update_candidate_status_impl(
        &self,
        id: i64,
        status: CandidateStatus,
    ) -> Result<Option<Candidate>> {
        if self.get_candidate_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = candidates::ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(now()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("更新候选人状态失败: {e}")))?;

        Ok(Some(updated.into_candidate()))
    }

    /// 评委入职，账户 ID 唯一
    pub async fn create_evaluator_impl(&self, req: CreateEvaluatorRequest) -> Result<Evaluator> {
        let now = now();
        let model = evaluators::ActiveModel {
            account_id: Set(req.account_id),
            display_name: Set(req.display_name.trim().to_string()),
            role: Set(req.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created.into_evaluator()),
            Err(e) if is_unique_violation(&e) => Err(JuryError::conflict(format!(
                "账户 {} 已绑定评委",
                req.account_id
            ))),
            Err(e) => Err(JuryError::storage(format!("创建评委失败: {e}"))),
        }
    }

    /// 通过 ID 获取评委
    pub async fn get_evaluator_impl(&self, id: i64) -> Result<Option<Evaluator>> {
        let result = Evaluators::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询评委失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluator()))
    }

    /// 通过账户 ID 获取评委
    pub async fn get_evaluator_by_account_impl(&self, account_id: i64) -> Result<Option<Evaluator>> {
        let result = Evaluators::find()
            .filter(evaluators::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询评委失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluator()))
    }

    /// 列出评委
    pub async fn list_evaluators_impl(&self, active_only: bool) -> Result<Vec<Evaluator>> {
        let mut select = Evaluators::find();
        if active_only {
            select = select.filter(evaluators::Column::IsActive.eq(true));
        }

        let result = select
            .order_by_asc(evaluators::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询评委列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_evaluator()).collect())
    }

    /// 停用评委（保留历史，不删除）
    pub async fn deactivate_evaluator_impl(&self, id: i64) -> Result<Option<Evaluator>> {
        if self.get_evaluator_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = evaluators::ActiveModel {
            id: Set(id),
            is_active: Set(false),
            updated_at: Set(now()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("停用评委失败: {e}")))?;

        Ok(Some(updated.into_evaluator()))
    }
}
