mod common;

use award_jury::errors::JuryError;
use award_jury::models::backups::{
    entities::{BackupSource, BackupType},
    requests::{CreateBackupRequest, RestoreBackupRequest},
};
use award_jury::models::evaluations::requests::GetEvaluationQuery;
use award_jury::models::resets::requests::{BulkResetOptions, BulkResetRequest, BulkResetScope};
use award_jury::models::votes::requests::CastVoteRequest;
use common::{Harness, jury, scores};

fn manual(reason: &str) -> CreateBackupRequest {
    CreateBackupRequest {
        reason: reason.to_string(),
        backup_type: BackupType::Full,
    }
}

#[tokio::test]
async fn test_restore_reproduces_rows_exactly_once() {
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
                rating: 7,
                comments: Some("strong".to_string()),
            },
        )
        .await
        .unwrap();

    let query = GetEvaluationQuery {
        candidate_id,
        evaluator_id: Some(evaluator.id),
    };
    let evaluation_before = h
        .services
        .evaluations
        .get_evaluation(&h.admin, query.clone())
        .await
        .unwrap();
    let vote_before = h
        .services
        .votes
        .get_vote(&jury(&evaluator), candidate_id)
        .await
        .unwrap();

    let created = h
        .services
        .resets
        .create_backup(&h.admin, manual("before full reset"))
        .await
        .unwrap();
    assert_eq!(created.votes_backed_up, 1);
    assert_eq!(created.scores_backed_up, 1);

    h.services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::FullReset,
                options: BulkResetOptions {
                    confirm: true,
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

    let restored = h
        .services
        .resets
        .restore_backup(
            &h.admin,
            RestoreBackupRequest {
                backup_id: created.backup_id,
                backup_type: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(restored.votes_restored, 1);
    assert_eq!(restored.scores_restored, 1);

    let evaluation_after = h
        .services
        .evaluations
        .get_evaluation(&h.admin, query)
        .await
        .unwrap();
    let vote_after = h
        .services
        .votes
        .get_vote(&jury(&evaluator), candidate_id)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&evaluation_after).unwrap(),
        serde_json::to_value(&evaluation_before).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&vote_after).unwrap(),
        serde_json::to_value(&vote_before).unwrap()
    );

    let err = h
        .services
        .resets
        .restore_backup(
            &h.admin,
            RestoreBackupRequest {
                backup_id: created.backup_id,
                backup_type: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Conflict(_)));

    let stats = h.services.resets.backup_statistics(&h.admin).await.unwrap();
    assert_eq!(stats.total_backups, 2);
    assert_eq!(stats.recent_backups, 2);
    assert_eq!(stats.restorations, 1);
    assert!(
        stats
            .by_source
            .iter()
            .any(|s| s.source == BackupSource::FullReset && s.count == 1)
    );
}

#[tokio::test]
async fn test_restore_unknown_backup() {
    let h = Harness::new().await;

    let err = h
        .services
        .resets
        .restore_backup(
            &h.admin,
            RestoreBackupRequest {
                backup_id: 42,
                backup_type: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::NotFound(_)));
}

#[tokio::test]
async fn test_restore_with_mismatched_type() {
    let h = Harness::new().await;
    let created = h
        .services
        .resets
        .create_backup(
            &h.admin,
            CreateBackupRequest {
                reason: "votes only".to_string(),
                backup_type: BackupType::Votes,
            },
        )
        .await
        .unwrap();

    let err = h
        .services
        .resets
        .restore_backup(
            &h.admin,
            RestoreBackupRequest {
                backup_id: created.backup_id,
                backup_type: Some(BackupType::Scores),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
}

#[tokio::test]
async fn test_manual_backup_needs_reason_and_permission() {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);

    let err = h
        .services
        .resets
        .create_backup(&h.admin, manual(""))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));

    let err = h
        .services
        .resets
        .create_backup(&jury(&evaluator), manual("sneaky"))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));
}

#[tokio::test]
async fn test_purge_keeps_recent_backups() {
    let h = Harness::new().await;
    h.services
        .resets
        .create_backup(&h.admin, manual("nightly"))
        .await
        .unwrap();

    let err = h
        .services
        .resets
        .purge_expired_backups(&h.admin, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));

    let deleted = h
        .services
        .resets
        .purge_expired_backups(&h.admin, None)
        .await
        .unwrap();
    assert_eq!(deleted, 0);

    let history = h
        .services
        .resets
        .backup_history(&h.admin, Default::default())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].source, BackupSource::Manual);
}

#[tokio::test]
async fn test_restoring_transition_backup_keeps_current_phase_clean() {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);
    let candidate_id = h.candidates(1).await[0].id;
    h.distribute(1).await;
    h.submit(&evaluator, candidate_id, scores([10, 10, 10, 10, 10]))
        .await;

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
    let backup_id = outcome.backup_id.unwrap();

    h.submit(&evaluator, candidate_id, scores([1, 1, 1, 1, 1]))
        .await;

    let restored = h
        .services
        .resets
        .restore_backup(
            &h.admin,
            RestoreBackupRequest {
                backup_id,
                backup_type: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(restored.scores_restored, 1);

    let average = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, candidate_id)
        .await
        .unwrap();
    assert_eq!(average.evaluation_count, 1);
    assert_eq!(average.average, Some(5.0));

    let current = h
        .services
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
        .unwrap();
    assert_eq!(current.total_score, 5);
    assert_eq!(current.phase, "phase_2");

    let phase = h.services.phases.current(&h.admin).await.unwrap();
    assert_eq!(phase.name, "phase_2");
}
