mod common;

use award_jury::errors::JuryError;
use award_jury::models::audit::{
    entities::{AuditAction, AuditScope, NewAuditEntry},
    requests::AuditListQuery,
};
use award_jury::models::backups::{entities::BackupType, requests::CreateBackupRequest};
use award_jury::models::resets::requests::{BulkResetOptions, BulkResetRequest, BulkResetScope};
use common::{Harness, jury};
use sea_orm::ConnectionTrait;

#[tokio::test]
async fn test_every_mutation_leaves_an_entry() {
    let h = Harness::new().await;
    h.evaluators(2).await;
    h.candidates(4).await;
    h.distribute(2).await;
    h.services
        .phases
        .set_lock(&h.admin, "phase_1", true)
        .await
        .unwrap();
    h.services
        .phases
        .set_lock(&h.admin, "phase_1", false)
        .await
        .unwrap();
    h.services
        .resets
        .create_backup(
            &h.admin,
            CreateBackupRequest {
                reason: "checkpoint".to_string(),
                backup_type: BackupType::Full,
            },
        )
        .await
        .unwrap();

    let stats = h.services.audit.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.failures, 0);
    for action in [
        AuditAction::AssignmentsDistributed,
        AuditAction::PhaseLocked,
        AuditAction::PhaseUnlocked,
        AuditAction::BackupCreated,
    ] {
        assert!(
            stats
                .by_action
                .iter()
                .any(|c| c.action == action && c.count == 1),
            "missing {action}"
        );
    }

    let phase_entries = h
        .services
        .audit
        .get_by_scope(&h.admin, AuditScope::Phase, None)
        .await
        .unwrap();
    assert_eq!(phase_entries.len(), 2);
    assert!(
        phase_entries
            .iter()
            .all(|e| e.phase.as_deref() == Some("phase_1"))
    );

    let by_actor = h
        .services
        .audit
        .get_by_actor(&h.admin, h.admin.account_id, Some(2))
        .await
        .unwrap();
    assert_eq!(by_actor.len(), 2);
}

#[tokio::test]
async fn test_list_is_paginated_and_filtered() {
    let h = Harness::new().await;
    for _ in 0..3 {
        h.services
            .phases
            .set_lock(&h.admin, "phase_1", true)
            .await
            .unwrap();
    }

    let mut query = AuditListQuery {
        action: Some(AuditAction::PhaseLocked),
        ..Default::default()
    };
    query.pagination.size = 2;

    let page = h.services.audit.list(&h.admin, query).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn test_rejected_reset_is_recorded_as_failure() {
    let h = Harness::new().await;

    let err = h
        .services
        .resets
        .bulk_reset(
            &h.admin,
            BulkResetRequest {
                reset_scope: BulkResetScope::AllCandidateVotes,
                options: BulkResetOptions {
                    candidate_id: Some(999),
                    reason: Some("duplicate nomination".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::NotFound(_)));

    let history = h.services.audit.reset_history(&h.admin, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].success);
    assert_eq!(history[0].reset_type, "bulk_candidate_reset");
    assert_eq!(history[0].candidate, Some(999));

    let stats = h.services.audit.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.failures, 1);
}

#[tokio::test]
async fn test_clean_old_logs_keeps_recent_entries() {
    let h = Harness::new().await;
    h.services
        .phases
        .set_lock(&h.admin, "phase_1", true)
        .await
        .unwrap();

    let err = h
        .services
        .audit
        .clean_old_logs(&h.admin, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));

    let deleted = h.services.audit.clean_old_logs(&h.admin, 30).await.unwrap();
    assert_eq!(deleted, 0);
    assert_eq!(h.services.audit.statistics(&h.admin).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_clean_old_logs_records_its_own_entry() {
    let h = Harness::new().await;
    h.services
        .phases
        .set_lock(&h.admin, "phase_1", true)
        .await
        .unwrap();
    h.services
        .phases
        .set_lock(&h.admin, "phase_1", false)
        .await
        .unwrap();
    h.db.connection()
        .execute_unprepared("UPDATE audit_log SET created_at = 0")
        .await
        .unwrap();

    let deleted = h.services.audit.clean_old_logs(&h.admin, 30).await.unwrap();
    assert_eq!(deleted, 2);

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::AuditLogCleaned, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].affected_rows, 2);
    assert_eq!(entries[0].actor_id, h.admin.account_id);
    let details = entries[0].details.as_ref().unwrap();
    assert_eq!(details["retention_days"], 30);
    assert!(details["older_than"].as_i64().unwrap() > 0);
    assert_eq!(h.services.audit.statistics(&h.admin).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_jury_cannot_read_audit_log() {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);

    let err = h
        .services
        .audit
        .statistics(&jury(&evaluator))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));
}

#[tokio::test]
async fn test_log_appends_entry_with_details() {
    let h = Harness::new().await;
    let id = h
        .services
        .audit
        .log(
            NewAuditEntry::new(AuditAction::Unknown, AuditScope::All, &h.admin)
                .reason(Some("  ".to_string()))
                .details(serde_json::json!({ "note": "manual" })),
        )
        .await
        .unwrap();

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::Unknown, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].reason, None);
    assert_eq!(entries[0].details, Some(serde_json::json!({ "note": "manual" })));
    assert!(entries[0].success);
}
