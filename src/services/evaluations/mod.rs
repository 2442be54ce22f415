//! 评分生命周期

pub mod ranking;
pub mod scoring;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{JuryError, Result};
use crate::models::{
    auth::entities::{AccountRole, Actor, Capability},
    evaluations::{
        entities::{Evaluation, EvaluationStatus},
        requests::{GetEvaluationQuery, JuryRankingQuery, SaveEvaluationRequest, TopCandidatesQuery},
        responses::{
            CandidateAverage, EvaluationStatistics, JuryProgress, JuryRankedCandidate,
            JuryRankingResponse, RankedCandidate, SaveEvaluationResponse,
        },
    },
};
use crate::storage::{EvaluationFilter, Storage};

const DEFAULT_TOP_LIMIT: usize = 10;
const MAX_TOP_LIMIT: usize = 100;

#[derive(Clone)]
pub struct EvaluationService {
    storage: Arc<dyn Storage>,
}

impl EvaluationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 解析查询针对的评委：评委账户只能查询自己，管理员必须显式指定
    fn target_evaluator(actor: &Actor, requested: Option<i64>) -> Result<i64> {
        match actor.role {
            AccountRole::Jury => {
                actor.require(Capability::ViewOwnEvaluations)?;
                let own = actor.evaluator_id()?;
                match requested {
                    Some(id) if id != own => Err(JuryError::permission("评委只能查看自己的评分")),
                    _ => Ok(own),
                }
            }
            AccountRole::Admin => {
                actor.require(Capability::ViewReports)?;
                requested.ok_or_else(|| JuryError::validation("必须指定 evaluator_id"))
            }
        }
    }

    // 保存或提交评分
    pub async fn save(
        &self,
        actor: &Actor,
        req: SaveEvaluationRequest,
    ) -> Result<SaveEvaluationResponse> {
        actor.require(Capability::SubmitEvaluations)?;
        let evaluator_id = actor.evaluator_id()?;

        let validated = scoring::validate(evaluator_id, req)?;
        let saved = self.storage.save_evaluation(validated).await?;

        info!(
            "Evaluation {} saved as {} by evaluator {} for candidate {} (total {})",
            saved.id, saved.status, evaluator_id, saved.candidate_id, saved.total_score
        );
        Ok(SaveEvaluationResponse {
            evaluation_id: saved.id,
            total_score: saved.total_score,
            status: saved.status,
        })
    }

    // 获取评分，未评分时返回 None
    pub async fn get_evaluation(
        &self,
        actor: &Actor,
        query: GetEvaluationQuery,
    ) -> Result<Option<Evaluation>> {
        let evaluator_id = Self::target_evaluator(actor, query.evaluator_id)?;
        debug!(
            "Fetching evaluation for evaluator {} / candidate {}",
            evaluator_id, query.candidate_id
        );
        self.storage
            .get_evaluation(evaluator_id, query.candidate_id)
            .await
    }

    // 候选人平均分；没有已提交评分时 average 为 None
    pub async fn average_for_candidate(
        &self,
        actor: &Actor,
        candidate_id: i64,
    ) -> Result<CandidateAverage> {
        actor.require(Capability::ViewReports)?;
        if self.storage.get_candidate(candidate_id).await?.is_none() {
            return Err(JuryError::not_found(format!("候选人不存在: {candidate_id}")));
        }

        let evaluations = self
            .storage
            .list_evaluations(EvaluationFilter {
                candidate_id: Some(candidate_id),
                submitted_only: true,
                ..Default::default()
            })
            .await?;
        let sum = ranking::sums_by_candidate(&evaluations)
            .remove(&candidate_id)
            .unwrap_or_default();

        Ok(CandidateAverage {
            candidate_id,
            average: sum.average(),
            evaluation_count: sum.count,
        })
    }

    // 总排行榜
    pub async fn top_candidates(
        &self,
        actor: &Actor,
        query: TopCandidatesQuery,
    ) -> Result<Vec<RankedCandidate>> {
        actor.require(Capability::ViewReports)?;
        let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);

        let candidates: HashMap<i64, _> = self
            .storage
            .list_distributable_candidates()
            .await?
            .into_iter()
            .filter(|c| query.category.is_none_or(|category| c.category == category))
            .map(|c| (c.id, c))
            .collect();

        let evaluations = self
            .storage
            .list_evaluations(EvaluationFilter {
                submitted_only: true,
                ..Default::default()
            })
            .await?;
        let sums = ranking::sums_by_candidate(&evaluations);

        Ok(ranking::rank_by_average(&sums)
            .into_iter()
            .filter_map(|(id, sum)| candidates.get(&id).map(|c| (c, sum)))
            .take(limit)
            .enumerate()
            .map(|(i, (candidate, sum))| RankedCandidate {
                rank: i as i64 + 1,
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                category: candidate.category,
                average_score: sum.average().unwrap_or(0.0),
                evaluation_count: sum.count,
            })
            .collect())
    }

    // 评委个人排名，只包含该评委已提交的评分
    pub async fn ranked_for_jury(
        &self,
        actor: &Actor,
        query: JuryRankingQuery,
    ) -> Result<JuryRankingResponse> {
        let evaluator_id = Self::target_evaluator(actor, query.evaluator_id)?;
        if self.storage.get_evaluator(evaluator_id).await?.is_none() {
            return Err(JuryError::not_found(format!("评委不存在: {evaluator_id}")));
        }
        let limit = query.limit.unwrap_or(MAX_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);

        let evaluations = self
            .storage
            .list_evaluations(EvaluationFilter {
                evaluator_id: Some(evaluator_id),
                submitted_only: true,
                ..Default::default()
            })
            .await?;

        let mut items = Vec::new();
        for (i, evaluation) in ranking::rank_for_jury(&evaluations)
            .into_iter()
            .take(limit)
            .enumerate()
        {
            let name = self
                .storage
                .get_candidate(evaluation.candidate_id)
                .await?
                .map(|c| c.name)
                .unwrap_or_default();
            items.push(JuryRankedCandidate {
                rank: i as i64 + 1,
                candidate_id: evaluation.candidate_id,
                name,
                total_score: evaluation.total_score,
            });
        }

        Ok(JuryRankingResponse {
            evaluator_id,
            items,
        })
    }

    // 评分统计，草稿只计数不参与平均
    pub async fn statistics(&self, actor: &Actor) -> Result<EvaluationStatistics> {
        actor.require(Capability::ViewReports)?;

        let evaluations = self
            .storage
            .list_evaluations(EvaluationFilter::default())
            .await?;
        let submitted = evaluations
            .iter()
            .filter(|e| e.status == EvaluationStatus::Submitted)
            .count() as i64;

        Ok(EvaluationStatistics {
            submitted,
            drafts: evaluations.len() as i64 - submitted,
            average_total: ranking::average_total(&evaluations),
            criteria: ranking::criteria_averages(&evaluations),
        })
    }

    // 评委进度
    pub async fn jury_progress(
        &self,
        actor: &Actor,
        evaluator_id: Option<i64>,
    ) -> Result<JuryProgress> {
        let evaluator_id = Self::target_evaluator(actor, evaluator_id)?;
        if self.storage.get_evaluator(evaluator_id).await?.is_none() {
            return Err(JuryError::not_found(format!("评委不存在: {evaluator_id}")));
        }

        let assigned = self
            .storage
            .list_assignments(Some(evaluator_id), None)
            .await?
            .len() as i64;
        let evaluations = self
            .storage
            .list_evaluations(EvaluationFilter {
                evaluator_id: Some(evaluator_id),
                ..Default::default()
            })
            .await?;
        let submitted = evaluations
            .iter()
            .filter(|e| e.status == EvaluationStatus::Submitted)
            .count() as i64;
        let drafts = evaluations.len() as i64 - submitted;

        Ok(JuryProgress {
            evaluator_id,
            assigned,
            submitted,
            drafts,
            pending: (assigned - submitted - drafts).max(0),
            completion_rate: if assigned > 0 {
                submitted as f64 / assigned as f64
            } else {
                0.0
            },
        })
    }
}
