//! 候选人与评委名册

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{JuryError, Result};
use crate::models::{
    auth::entities::{AccountRole, Actor, Capability},
    candidates::{
        entities::Candidate,
        requests::{
            CandidateListQuery, CreateCandidateRequest, ImportCandidatesRequest,
            UpdateCandidateStatusRequest,
        },
        responses::{CandidateListResponse, ImportCandidatesResponse},
    },
    evaluators::{
        entities::Evaluator,
        requests::{CreateEvaluatorRequest, EvaluatorListQuery},
    },
};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

/// 单次导入的候选人上限
const MAX_IMPORT_BATCH: usize = 1000;

#[derive(Clone)]
pub struct RosterService {
    storage: Arc<dyn Storage>,
}

fn normalize_candidate(req: CreateCandidateRequest) -> Result<CreateCandidateRequest> {
    let name = validate_name(&req.name).map_err(JuryError::validation)?;
    let organization = req
        .organization
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());
    Ok(CreateCandidateRequest {
        name,
        organization,
        category: req.category,
    })
}

impl RosterService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 将令牌中的账户解析为调用者身份；评委账户必须对应一名在任评委
    pub async fn resolve_actor(&self, account_id: i64, role: AccountRole) -> Result<Actor> {
        match role {
            AccountRole::Admin => Ok(Actor::admin(account_id)),
            AccountRole::Jury => {
                let evaluator = self
                    .storage
                    .get_evaluator_by_account(account_id)
                    .await?
                    .filter(|e| e.is_active)
                    .ok_or_else(|| {
                        JuryError::authentication(format!("账户 {account_id} 不是在任评委"))
                    })?;
                Ok(Actor::jury(evaluator))
            }
        }
    }

    // 创建候选人
    pub async fn create_candidate(
        &self,
        actor: &Actor,
        req: CreateCandidateRequest,
    ) -> Result<Candidate> {
        actor.require(Capability::ManageRoster)?;
        let candidate = self
            .storage
            .create_candidate(normalize_candidate(req)?)
            .await?;
        info!(
            "Candidate {} ({}) created by account {}",
            candidate.id, candidate.name, actor.account_id
        );
        Ok(candidate)
    }

    // 批量导入候选人，任一条无效则全部不导入
    pub async fn import_candidates(
        &self,
        actor: &Actor,
        req: ImportCandidatesRequest,
    ) -> Result<ImportCandidatesResponse> {
        actor.require(Capability::ManageRoster)?;
        if req.candidates.is_empty() {
            return Err(JuryError::validation("导入列表不能为空"));
        }
        if req.candidates.len() > MAX_IMPORT_BATCH {
            return Err(JuryError::validation(format!(
                "单次最多导入 {MAX_IMPORT_BATCH} 名候选人"
            )));
        }

        let reqs = req
            .candidates
            .into_iter()
            .map(normalize_candidate)
            .collect::<Result<Vec<_>>>()?;
        let candidates = self.storage.import_candidates(reqs).await?;

        info!(
            "Imported {} candidates by account {}",
            candidates.len(),
            actor.account_id
        );
        Ok(ImportCandidatesResponse {
            imported: candidates.len(),
            candidates,
        })
    }

    // 获取候选人；评委只能查看分配给自己的候选人
    pub async fn get_candidate(&self, actor: &Actor, id: i64) -> Result<Candidate> {
        match actor.role {
            AccountRole::Admin => actor.require(Capability::ViewReports)?,
            AccountRole::Jury => {
                let evaluator_id = actor.evaluator_id()?;
                if !self.storage.assignment_exists(evaluator_id, id).await? {
                    return Err(JuryError::permission("该候选人未分配给当前评委"));
                }
            }
        }
        self.storage
            .get_candidate(id)
            .await?
            .ok_or_else(|| JuryError::not_found(format!("候选人不存在: {id}")))
    }

    // 列出候选人
    pub async fn list_candidates(
        &self,
        actor: &Actor,
        query: CandidateListQuery,
    ) -> Result<CandidateListResponse> {
        actor.require(Capability::ViewReports)?;
        debug!("Listing candidates: {:?}", query);
        self.storage.list_candidates(query).await
    }

    // 更新候选人状态
    pub async fn update_candidate_status(
        &self,
        actor: &Actor,
        id: i64,
        req: UpdateCandidateStatusRequest,
    ) -> Result<Candidate> {
        actor.require(Capability::ManageRoster)?;
        let candidate = self
            .storage
            .update_candidate_status(id, req.status)
            .await?
            .ok_or_else(|| JuryError::not_found(format!("候选人不存在: {id}")))?;
        info!(
            "Candidate {} status set to {} by account {}",
            id, candidate.status, actor.account_id
        );
        Ok(candidate)
    }

    // 评委入职
    pub async fn create_evaluator(
        &self,
        actor: &Actor,
        req: CreateEvaluatorRequest,
    ) -> Result<Evaluator> {
        actor.require(Capability::ManageRoster)?;
        if req.account_id <= 0 {
            return Err(JuryError::validation("account_id 必须为正数"));
        }
        let display_name = validate_name(&req.display_name).map_err(JuryError::validation)?;

        let evaluator = self
            .storage
            .create_evaluator(CreateEvaluatorRequest {
                display_name,
                ..req
            })
            .await?;
        info!(
            "Evaluator {} ({}) onboarded as {} by account {}",
            evaluator.id, evaluator.display_name, evaluator.role, actor.account_id
        );
        Ok(evaluator)
    }

    // 获取评委
    pub async fn get_evaluator(&self, actor: &Actor, id: i64) -> Result<Evaluator> {
        actor.require(Capability::ViewReports)?;
        self.storage
            .get_evaluator(id)
            .await?
            .ok_or_else(|| JuryError::not_found(format!("评委不存在: {id}")))
    }

    // 列出评委
    pub async fn list_evaluators(
        &self,
        actor: &Actor,
        query: EvaluatorListQuery,
    ) -> Result<Vec<Evaluator>> {
        actor.require(Capability::ViewReports)?;
        self.storage.list_evaluators(query.active_only).await
    }

    // 停用评委，保留其历史数据
    pub async fn deactivate_evaluator(&self, actor: &Actor, id: i64) -> Result<Evaluator> {
        actor.require(Capability::ManageRoster)?;
        let evaluator = self
            .storage
            .deactivate_evaluator(id)
            .await?
            .ok_or_else(|| JuryError::not_found(format!("评委不存在: {id}")))?;
        warn!("Evaluator {} deactivated by account {}", id, actor.account_id);
        Ok(evaluator)
    }
}
