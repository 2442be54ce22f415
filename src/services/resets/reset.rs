use tracing::warn;

use super::ResetService;
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::entities::{AuditAction, AuditScope, NewAuditEntry},
    auth::entities::{Actor, Capability},
    resets::{
        entities::ResetCommand,
        requests::{BulkResetRequest, BulkResetScope, IndividualResetRequest},
        responses::ResetOutcome,
    },
};
use crate::services::record_failure;
use crate::utils::validate::{validate_phase_name, validate_reason};

/// 执行重置命令
///
/// 权限检查之后的每次调用都恰好留下一条审计记录：
/// 成功时由存储层在事务内写入，失败（含校验失败）时补写 success=false。
async fn run_reset<F>(
    service: &ResetService,
    entry: NewAuditEntry,
    prepare: F,
) -> Result<ResetOutcome>
where
    F: std::future::Future<Output = Result<(ResetCommand, NewAuditEntry)>>,
{
    let result = match prepare.await {
        Ok((command, entry)) => {
            service
                .storage()
                .execute_reset(command, entry)
                .await
        }
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        record_failure(service.storage(), entry, err).await;
    }
    result
}

fn bulk_action(scope: BulkResetScope) -> (AuditAction, AuditScope) {
    match scope {
        BulkResetScope::AllUserVotes => (AuditAction::BulkJuryReset, AuditScope::Evaluator),
        BulkResetScope::AllCandidateVotes => (AuditAction::BulkCandidateReset, AuditScope::Candidate),
        BulkResetScope::PhaseTransition => (AuditAction::PhaseTransition, AuditScope::Phase),
        BulkResetScope::FullReset => (AuditAction::FullReset, AuditScope::All),
    }
}

pub async fn reset_individual(
    service: &ResetService,
    actor: &Actor,
    req: IndividualResetRequest,
) -> Result<ResetOutcome> {
    actor.require(Capability::ManageVotes)?;

    let entry = NewAuditEntry::new(AuditAction::IndividualReset, AuditScope::Individual, actor)
        .evaluator(req.evaluator_id)
        .candidate(req.candidate_id)
        .reason(Some(req.reason.clone()));

    let prepare = async {
        let reason = validate_reason(&req.reason).map_err(JuryError::validation)?;

        let (evaluator_id, candidate_id) = match req.vote_id {
            Some(vote_id) => {
                let vote = service
                    .storage()
                    .get_vote_by_id(vote_id)
                    .await?
                    .ok_or_else(|| JuryError::not_found(format!("投票不存在: {vote_id}")))?;
                (vote.evaluator_id, vote.candidate_id)
            }
            None => match (req.evaluator_id, req.candidate_id) {
                (Some(e), Some(c)) => (e, c),
                _ => {
                    return Err(JuryError::validation(
                        "必须提供 vote_id，或同时提供 evaluator_id 与 candidate_id",
                    ));
                }
            },
        };

        let command = ResetCommand::Individual {
            evaluator_id,
            candidate_id,
        };
        let entry = NewAuditEntry::new(command.action(), command.scope(), actor)
            .evaluator(Some(evaluator_id))
            .candidate(Some(candidate_id))
            .reason(Some(reason));
        Ok::<_, JuryError>((command, entry))
    };

    let outcome = run_reset(service, entry, prepare).await?;
    warn!(
        "Individual reset by account {}: {} votes, {} evaluations (backup {:?})",
        actor.account_id, outcome.votes_reset, outcome.evaluations_reset, outcome.backup_id
    );
    Ok(outcome)
}

pub async fn bulk_reset(
    service: &ResetService,
    actor: &Actor,
    req: BulkResetRequest,
) -> Result<ResetOutcome> {
    actor.require(Capability::ManageVotes)?;
    if req.reset_scope == BulkResetScope::PhaseTransition {
        actor.require(Capability::ManagePhases)?;
    }

    let options = req.options;
    let (action, scope) = bulk_action(req.reset_scope);
    let mut entry = NewAuditEntry::new(action, scope, actor)
        .evaluator(options.evaluator_id)
        .candidate(options.candidate_id)
        .reason(options.reason.clone());
    if let Some(to_phase) = &options.to_phase {
        entry = entry.details(serde_json::json!({ "to_phase": to_phase }));
    }

    let prepare = async {
        let command = match req.reset_scope {
            BulkResetScope::AllUserVotes => {
                let evaluator_id = options
                    .evaluator_id
                    .ok_or_else(|| JuryError::validation("all_user_votes 需要 evaluator_id"))?;
                if service.storage().get_evaluator(evaluator_id).await?.is_none() {
                    return Err(JuryError::not_found(format!("评委不存在: {evaluator_id}")));
                }
                ResetCommand::Jury { evaluator_id }
            }
            BulkResetScope::AllCandidateVotes => {
                let candidate_id = options
                    .candidate_id
                    .ok_or_else(|| JuryError::validation("all_candidate_votes 需要 candidate_id"))?;
                if service.storage().get_candidate(candidate_id).await?.is_none() {
                    return Err(JuryError::not_found(format!("候选人不存在: {candidate_id}")));
                }
                ResetCommand::Candidate { candidate_id }
            }
            BulkResetScope::PhaseTransition => {
                let to_phase = options
                    .to_phase
                    .as_deref()
                    .map(str::trim)
                    .ok_or_else(|| JuryError::validation("phase_transition 需要 to_phase"))?;
                validate_phase_name(to_phase).map_err(JuryError::validation)?;
                ResetCommand::PhaseTransition {
                    to_phase: to_phase.to_string(),
                }
            }
            BulkResetScope::FullReset => {
                if !options.confirm {
                    return Err(JuryError::validation("full_reset 需要 confirm=true"));
                }
                ResetCommand::Full
            }
        };

        // 针对单个评委或候选人的重置必须说明原因
        let reason = match command {
            ResetCommand::Jury { .. } | ResetCommand::Candidate { .. } => Some(
                validate_reason(options.reason.as_deref().unwrap_or_default())
                    .map_err(JuryError::validation)?,
            ),
            _ => options
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        };

        let entry = NewAuditEntry::new(command.action(), command.scope(), actor)
            .evaluator(command.evaluator_id())
            .candidate(command.candidate_id())
            .reason(reason);
        Ok::<_, JuryError>((command, entry))
    };

    let outcome = run_reset(service, entry, prepare).await?;
    warn!(
        "Bulk reset {} by account {}: {} votes, {} evaluations (backup {:?})",
        req.reset_scope,
        actor.account_id,
        outcome.votes_reset,
        outcome.evaluations_reset,
        outcome.backup_id
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_action_matches_command() {
        let cases = [
            (BulkResetScope::AllUserVotes, ResetCommand::Jury { evaluator_id: 1 }),
            (BulkResetScope::AllCandidateVotes, ResetCommand::Candidate { candidate_id: 1 }),
            (
                BulkResetScope::PhaseTransition,
                ResetCommand::PhaseTransition {
                    to_phase: "phase_2".to_string(),
                },
            ),
            (BulkResetScope::FullReset, ResetCommand::Full),
        ];
        for (scope, command) in cases {
            assert_eq!(bulk_action(scope), (command.action(), command.scope()));
        }
    }
}
