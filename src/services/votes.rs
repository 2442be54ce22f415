//! 投票

use std::sync::Arc;

use tracing::info;

use crate::errors::{JuryError, Result};
use crate::models::{
    auth::entities::{Actor, Capability},
    evaluations::entities::{MAX_SCORE, MIN_SCORE},
    votes::{
        entities::Vote,
        requests::CastVoteRequest,
        responses::CastVoteResponse,
    },
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct VoteService {
    storage: Arc<dyn Storage>,
}

impl VoteService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 投票；同一阶段重复投票覆盖原有效投票
    pub async fn cast_vote(&self, actor: &Actor, req: CastVoteRequest) -> Result<CastVoteResponse> {
        actor.require(Capability::SubmitEvaluations)?;
        let evaluator_id = actor.evaluator_id()?;

        if !(MIN_SCORE..=MAX_SCORE).contains(&req.rating) {
            return Err(JuryError::validation(format!(
                "rating 必须在 {MIN_SCORE} 到 {MAX_SCORE} 之间，实际为 {}",
                req.rating
            )));
        }
        let comments = req
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let vote = self
            .storage
            .cast_vote(evaluator_id, req.candidate_id, req.rating, comments)
            .await?;

        info!(
            "Vote {} cast by evaluator {} for candidate {} (rating {})",
            vote.id, evaluator_id, vote.candidate_id, vote.rating
        );
        Ok(CastVoteResponse { vote_id: vote.id })
    }

    // 获取调用者在当前阶段的有效投票
    pub async fn get_vote(&self, actor: &Actor, candidate_id: i64) -> Result<Option<Vote>> {
        actor.require(Capability::ViewOwnEvaluations)?;
        let evaluator_id = actor.evaluator_id()?;
        self.storage.get_vote(evaluator_id, candidate_id).await
    }
}
