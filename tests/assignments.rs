mod common;

use award_jury::errors::JuryError;
use award_jury::models::assignments::{
    entities::{DistributionMethod, DistributionQuality},
    requests::{AssignmentListQuery, AutoDistributeRequest, ManualAssignRequest},
};
use award_jury::models::audit::entities::AuditAction;
use award_jury::models::candidates::{
    entities::CandidateStatus, requests::UpdateCandidateStatusRequest,
};
use award_jury::models::evaluations::requests::GetEvaluationQuery;
use common::{Harness, jury, scores};

#[tokio::test]
async fn test_three_by_nine_is_perfectly_even() {
    let h = Harness::new().await;
    h.evaluators(3).await;
    h.candidates(9).await;

    let result = h
        .services
        .assignments
        .auto_distribute(
            &h.admin,
            AutoDistributeRequest {
                method: DistributionMethod::Balanced,
                candidates_per_jury: 3,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.assignments_created, 9);
    assert!(result.per_evaluator_counts.iter().all(|l| l.count == 3));

    let stats = h.services.assignments.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.total, 9);
    assert_eq!(stats.stddev, 0.0);
    assert_eq!(stats.quality, DistributionQuality::Balanced);
}

#[tokio::test]
async fn test_balanced_distribution_covers_every_candidate() {
    let h = Harness::new().await;
    h.evaluators(4).await;
    h.candidates(40).await;

    h.distribute(20).await;

    let stats = h.services.assignments.statistics(&h.admin).await.unwrap();
    assert!(stats.stddev <= 1.5);
    assert_eq!(stats.min, 20);
    assert_eq!(stats.max, 20);

    let unassigned = h
        .services
        .assignments
        .unassigned_candidates(&h.admin)
        .await
        .unwrap();
    assert!(unassigned.is_empty());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let h = Harness::new().await;
    h.evaluators(2).await;
    h.candidates(4).await;

    let result = h
        .services
        .assignments
        .auto_distribute(
            &h.admin,
            AutoDistributeRequest {
                candidates_per_jury: 2,
                dry_run: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.dry_run);
    assert_eq!(result.assignments_created, 0);
    assert_eq!(result.planned.len(), 4);

    let stats = h.services.assignments.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn test_distribution_without_evaluators_is_a_no_op() {
    let h = Harness::new().await;
    h.candidates(3).await;

    let result = h
        .services
        .assignments
        .auto_distribute(
            &h.admin,
            AutoDistributeRequest {
                candidates_per_jury: 3,
                clear_existing: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.assignments_created, 0);
    assert!(result.per_evaluator_counts.is_empty());

    let unassigned = h
        .services
        .assignments
        .unassigned_candidates(&h.admin)
        .await
        .unwrap();
    assert_eq!(unassigned.len(), 3);
}

#[tokio::test]
async fn test_distribution_without_candidates_keeps_existing_assignments() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(2).await;
    let candidates = h.candidates(1).await;
    h.services
        .assignments
        .manual_assign(
            &h.admin,
            ManualAssignRequest {
                evaluator_id: evaluators[0].id,
                candidate_ids: vec![candidates[0].id],
            },
        )
        .await
        .unwrap();
    h.services
        .roster
        .update_candidate_status(
            &h.admin,
            candidates[0].id,
            UpdateCandidateStatusRequest {
                status: CandidateStatus::Withdrawn,
            },
        )
        .await
        .unwrap();

    let result = h
        .services
        .assignments
        .auto_distribute(
            &h.admin,
            AutoDistributeRequest {
                clear_existing: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.assignments_created, 0);

    let stats = h.services.assignments.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn test_withdrawn_candidates_are_not_distributed() {
    let h = Harness::new().await;
    h.evaluators(2).await;
    let candidates = h.candidates(3).await;

    h.services
        .roster
        .update_candidate_status(
            &h.admin,
            candidates[0].id,
            UpdateCandidateStatusRequest {
                status: CandidateStatus::Withdrawn,
            },
        )
        .await
        .unwrap();

    h.distribute(5).await;

    let assigned = h
        .services
        .assignments
        .list(
            &h.admin,
            AssignmentListQuery {
                candidate_id: Some(candidates[0].id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(assigned.is_empty());
}

#[tokio::test]
async fn test_manual_assign_skips_duplicates_and_is_audited() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(2).await;

    let first = h
        .services
        .assignments
        .manual_assign(
            &h.admin,
            ManualAssignRequest {
                evaluator_id: evaluators[0].id,
                candidate_ids: vec![candidates[0].id, candidates[0].id, candidates[1].id],
            },
        )
        .await
        .unwrap();
    assert_eq!(first.assigned_count, 2);

    let again = h
        .services
        .assignments
        .manual_assign(
            &h.admin,
            ManualAssignRequest {
                evaluator_id: evaluators[0].id,
                candidate_ids: vec![candidates[1].id],
            },
        )
        .await
        .unwrap();
    assert_eq!(again.assigned_count, 0);

    let entries = h
        .services
        .audit
        .get_by_action(&h.admin, AuditAction::AssignmentsCreated, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.success));
}

#[tokio::test]
async fn test_manual_assign_unknown_candidate() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;

    let err = h
        .services
        .assignments
        .manual_assign(
            &h.admin,
            ManualAssignRequest {
                evaluator_id: evaluators[0].id,
                candidate_ids: vec![999],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::NotFound(_)));
}

#[tokio::test]
async fn test_rebalance_keeps_evaluated_pairs() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(2).await;
    let candidates = h.candidates(4).await;

    h.services
        .assignments
        .manual_assign(
            &h.admin,
            ManualAssignRequest {
                evaluator_id: evaluators[0].id,
                candidate_ids: candidates.iter().map(|c| c.id).collect(),
            },
        )
        .await
        .unwrap();
    h.submit(&evaluators[0], candidates[0].id, scores([5, 5, 5, 5, 5]))
        .await;

    let result = h.services.assignments.rebalance(&h.admin).await.unwrap();
    assert_eq!(result.moved_count, 2);
    assert!(
        result
            .moves
            .iter()
            .all(|m| m.candidate_id != candidates[0].id && m.to_evaluator_id == evaluators[1].id)
    );

    let kept = h
        .services
        .assignments
        .exists(&h.admin, evaluators[0].id, candidates[0].id)
        .await
        .unwrap();
    assert!(kept);

    let stats = h.services.assignments.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.min, 2);
    assert_eq!(stats.max, 2);
}

#[tokio::test]
async fn test_clear_all_with_cascade_removes_evaluations() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(2).await;
    h.distribute(2).await;
    h.submit(&evaluators[0], candidates[0].id, scores([6, 6, 6, 6, 6]))
        .await;

    let result = h
        .services
        .assignments
        .clear_all(&h.admin, true)
        .await
        .unwrap();
    assert_eq!(result.assignments_removed, 2);
    assert_eq!(result.evaluations_removed, 1);

    let unassigned = h
        .services
        .assignments
        .unassigned_candidates(&h.admin)
        .await
        .unwrap();
    assert_eq!(unassigned.len(), 2);
}

#[tokio::test]
async fn test_clear_all_without_cascade_rejects_orphaned_evaluations() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(1).await;
    h.distribute(1).await;
    h.submit(&evaluators[0], candidates[0].id, scores([7, 7, 7, 7, 7]))
        .await;

    let result = h
        .services
        .assignments
        .clear_all(&h.admin, false)
        .await
        .unwrap();
    assert_eq!(result.assignments_removed, 1);
    assert_eq!(result.evaluations_removed, 0);

    let err = h
        .services
        .evaluations
        .get_evaluation(
            &h.admin,
            GetEvaluationQuery {
                candidate_id: candidates[0].id,
                evaluator_id: Some(evaluators[0].id),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Conflict(_)));

    let average = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, candidates[0].id)
        .await
        .unwrap();
    assert_eq!(average.evaluation_count, 0);
    assert_eq!(average.average, None);
}

#[tokio::test]
async fn test_jury_sees_only_own_assignments() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(2).await;
    h.candidates(4).await;
    h.distribute(2).await;

    let own = h
        .services
        .assignments
        .list(&jury(&evaluators[0]), AssignmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|a| a.evaluator_id == evaluators[0].id));

    let err = h
        .services
        .assignments
        .exists(&jury(&evaluators[0]), evaluators[1].id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));

    let err = h
        .services
        .assignments
        .auto_distribute(&jury(&evaluators[0]), AutoDistributeRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));
}
