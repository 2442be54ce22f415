mod common;

use award_jury::errors::JuryError;
use award_jury::models::audit::entities::AuditAction;
use award_jury::models::evaluations::requests::GetEvaluationQuery;
use award_jury::models::evaluators::entities::Evaluator;
use award_jury::models::resets::requests::{
    BulkResetOptions, BulkResetRequest, BulkResetScope, IndividualResetRequest,
};
use award_jury::models::votes::requests::CastVoteRequest;
use common::{Harness, jury, scores};
use sea_orm::ConnectionTrait;

/// 一位评委对一位候选人已提交评分并投票
async fn scored() -> (Harness, Evaluator, i64) {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);
    let candidate_id = h.candidates(1).await[0].id;
    h.distribute(1).await;
    h.submit(&evaluator, candidate_id, scores([8, 7, 9, 6, 10]))
        .await;
    h.services
        .votes
        .cast_vote(
            &jury(&evaluator),
            CastVoteRequest {
                candidate_id,
                rating: 8,
                comments: None,
            },
        )
        .await
        .unwrap();
    (h, evaluator, candidate_id)
}

async fn evaluation_exists(h: &Harness, evaluator: &Evaluator, candidate_id: i64) -> bool {
    h.services
        .evaluations
        .get_evaluation(
            &h.admin,
            GetEvaluationQuery {
                candidate_id,
                evaluator_id: Some(evaluator.id),
            },
        )
        .await
        .unwrap()
        .is_some()
}

async fn vote_exists(h: &Harness, evaluator: &Evaluator, candidate_id: i64) -> bool {
    h.services
        .votes
        .get_vote(&jury(evaluator), candidate_id)
        .await
        .unwrap()
        .is_some()
}

fn individual(evaluator_id: i64, candidate_id: i64, reason: &str) -> IndividualResetRequest {
    IndividualResetRequest {
        vote_id: None,
        evaluator_id: Some(evaluator_id),
        candidate_id: Some(candidate_id),
        reason: reason.to_string(),
    }
}

fn full_reset(confirm: bool) -> BulkResetRequest {
    BulkResetRequest {
        reset_scope: BulkResetScope::FullReset,
        options: BulkResetOptions {
            confirm,
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_individual_reset_backs_up_then_removes() {
    let (h, evaluator, candidate_id) = scored().await;

    let outcome = h
        .services
        .resets
        .reset_individual(&h.admin, individual(evaluator.id, candidate_id, "scored wrong file"))
        .await
        .unwrap();
    assert_eq!(outcome.evaluations_reset, 1);
    assert_eq!(outcome.votes_reset, 1);
    assert_eq!(outcome.backup_count, 1);

    let backup_id = outcome.backup_id.unwrap();
    let history = h
        .services
        .resets
        .backup_history(&h.admin, Default::default())
        .await
        .unwrap();
    assert_eq!(history[0].id, backup_id);
    assert_eq!(history[0].scores_count, 1);
    assert_eq!(history[0].votes_count, 1);

    assert!(!evaluation_exists(&h, &evaluator, candidate_id).await);
    assert!(!vote_exists(&h, &evaluator, candidate_id).await);

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::IndividualReset, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].success);
    assert_eq!(entries[0].affected_rows, 2);
    assert_eq!(entries[0].reason.as_deref(), Some("scored wrong file"));
}

#[tokio::test]
async fn test_failed_backup_write_leaves_rows_untouched() {
    let (h, evaluator, candidate_id) = scored().await;

    h.db.connection()
        .execute_unprepared("DROP TABLE backups")
        .await
        .unwrap();

    let err = h
        .services
        .resets
        .reset_individual(&h.admin, individual(evaluator.id, candidate_id, "fault injection"))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Storage(_)));

    assert!(evaluation_exists(&h, &evaluator, candidate_id).await);
    assert!(vote_exists(&h, &evaluator, candidate_id).await);

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::IndividualReset, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
}

#[tokio::test]
async fn test_failed_backup_write_aborts_every_bulk_scope() {
    let cases = [
        (BulkResetScope::AllUserVotes, AuditAction::BulkJuryReset),
        (BulkResetScope::AllCandidateVotes, AuditAction::BulkCandidateReset),
        (BulkResetScope::PhaseTransition, AuditAction::PhaseTransition),
        (BulkResetScope::FullReset, AuditAction::FullReset),
    ];

    for (reset_scope, action) in cases {
        let (h, evaluator, candidate_id) = scored().await;
        h.db.connection()
            .execute_unprepared("DROP TABLE backups")
            .await
            .unwrap();

        let err = h
            .services
            .resets
            .bulk_reset(
                &h.admin,
                BulkResetRequest {
                    reset_scope,
                    options: BulkResetOptions {
                        evaluator_id: Some(evaluator.id),
                        candidate_id: Some(candidate_id),
                        to_phase: Some("phase_2".to_string()),
                        reason: Some("fault injection".to_string()),
                        confirm: true,
                    },
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JuryError::Storage(_)), "{reset_scope}: {err:?}");

        assert!(evaluation_exists(&h, &evaluator, candidate_id).await, "{reset_scope}");
        assert!(vote_exists(&h, &evaluator, candidate_id).await, "{reset_scope}");

        let current = h.services.phases.current(&h.admin).await.unwrap();
        assert_eq!(current.name, "phase_1", "{reset_scope}");

        let entries = h
            .services
            .audit
            .get_by_action(&h.admin, action, None)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1, "{reset_scope}");
        assert!(!entries[0].success, "{reset_scope}");
        assert_eq!(entries[0].affected_rows, 0, "{reset_scope}");
    }
}

#[tokio::test]
async fn test_missing_reason_is_rejected_and_audited() {
    let (h, evaluator, candidate_id) = scored().await;

    let err = h
        .services
        .resets
        .reset_individual(&h.admin, individual(evaluator.id, candidate_id, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
    assert!(evaluation_exists(&h, &evaluator, candidate_id).await);

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::IndividualReset, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
}

#[tokio::test]
async fn test_full_reset_requires_confirmation() {
    let (h, evaluator, candidate_id) = scored().await;
    let before = h
        .services
        .resets
        .backup_statistics(&h.admin)
        .await
        .unwrap()
        .total_backups;

    let err = h
        .services
        .resets
        .bulk_reset(&h.admin, full_reset(false))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
    assert!(evaluation_exists(&h, &evaluator, candidate_id).await);
    assert_eq!(
        h.services
            .resets
            .backup_statistics(&h.admin)
            .await
            .unwrap()
            .total_backups,
        before
    );

    let outcome = h
        .services
        .resets
        .bulk_reset(&h.admin, full_reset(true))
        .await
        .unwrap();
    assert_eq!(outcome.evaluations_reset, 1);
    assert_eq!(outcome.votes_reset, 1);
    assert!(!evaluation_exists(&h, &evaluator, candidate_id).await);
    assert!(!vote_exists(&h, &evaluator, candidate_id).await);
    assert_eq!(
        h.services
            .resets
            .backup_statistics(&h.admin)
            .await
            .unwrap()
            .total_backups,
        before + 1
    );

    let history = h.services.audit.reset_history(&h.admin, None).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|r| r.success && r.reset_type == "full_reset"));
    assert!(history.iter().any(|r| !r.success));
}

#[tokio::test]
async fn test_bulk_jury_reset_requires_reason() {
    let (h, evaluator, candidate_id) = scored().await;

    let err = h
        .services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::AllUserVotes,
                options: BulkResetOptions {
                    evaluator_id: Some(evaluator.id),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));

    let outcome = h
        .services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::AllUserVotes,
                options: BulkResetOptions {
                    evaluator_id: Some(evaluator.id),
                    reason: Some("juror recused".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.evaluations_reset, 1);
    assert!(!evaluation_exists(&h, &evaluator, candidate_id).await);
}

#[tokio::test]
async fn test_locked_phase_blocks_targeted_resets() {
    let (h, evaluator, candidate_id) = scored().await;

    let phase = h
        .services
        .phases
        .set_lock(&h.admin, "phase_1", true)
        .await
        .unwrap();
    assert!(phase.locked);

    let err = h
        .services
        .resets
        .reset_individual(&h.admin, individual(evaluator.id, candidate_id, "too late"))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Conflict(_)));
    assert!(evaluation_exists(&h, &evaluator, candidate_id).await);

    // 全量重置不受阶段锁限制
    h.services
        .resets
        .bulk_reset(&h.admin, full_reset(true))
        .await
        .unwrap();
    assert!(!evaluation_exists(&h, &evaluator, candidate_id).await);
}

#[tokio::test]
async fn test_phase_transition_archives_current_phase() {
    let (h, evaluator, candidate_id) = scored().await;

    let outcome = h
        .services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::PhaseTransition,
                options: BulkResetOptions {
                    to_phase: Some("phase_2".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.evaluations_reset, 1);

    let current = h.services.phases.current(&h.admin).await.unwrap();
    assert_eq!(current.name, "phase_2");
    assert!(!evaluation_exists(&h, &evaluator, candidate_id).await);

    // 新阶段可以重新评分
    h.submit(&evaluator, candidate_id, scores([5, 5, 5, 5, 5]))
        .await;
    assert!(evaluation_exists(&h, &evaluator, candidate_id).await);

    let err = h
        .services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::PhaseTransition,
                options: BulkResetOptions {
                    to_phase: Some("phase_2".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Conflict(_)));
}

#[tokio::test]
async fn test_jury_cannot_reset() {
    let (h, evaluator, candidate_id) = scored().await;

    let err = h
        .services
        .resets
        .reset_individual(
            &jury(&evaluator),
            individual(evaluator.id, candidate_id, "self service"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));

    let history = h.services.audit.reset_history(&h.admin, None).await.unwrap();
    assert!(history.is_empty());
}
