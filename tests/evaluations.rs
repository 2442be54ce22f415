mod common;

use award_jury::errors::JuryError;
use award_jury::models::evaluations::{
    entities::EvaluationStatus,
    requests::{GetEvaluationQuery, JuryRankingQuery, SaveEvaluationRequest, TopCandidatesQuery},
};
use award_jury::models::votes::requests::CastVoteRequest;
use common::{Harness, jury, scores};

/// 两位评委、两位候选人，每位评委持有全部候选人
async fn cross_assigned() -> (Harness, Vec<i64>, Vec<i64>) {
    let h = Harness::new().await;
    let evaluators = h.evaluators(2).await;
    let candidates = h.candidates(2).await;
    h.distribute(2).await;
    (
        h,
        evaluators.iter().map(|e| e.id).collect(),
        candidates.iter().map(|c| c.id).collect(),
    )
}

fn draft(candidate_id: i64, values: [i32; 5]) -> SaveEvaluationRequest {
    SaveEvaluationRequest {
        candidate_id,
        scores: scores(values),
        comments: None,
        status: EvaluationStatus::Draft,
    }
}

#[tokio::test]
async fn test_second_submit_conflicts_and_keeps_total() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(1).await;
    h.distribute(1).await;
    let actor = jury(&evaluators[0]);

    let saved = h
        .services
        .evaluations
        .save(
            &actor,
            SaveEvaluationRequest {
                candidate_id: candidates[0].id,
                scores: scores([8, 7, 9, 6, 10]),
                comments: Some("  bold  ".to_string()),
                status: EvaluationStatus::Submitted,
            },
        )
        .await
        .unwrap();
    assert_eq!(saved.total_score, 40);

    let err = h
        .services
        .evaluations
        .save(
            &actor,
            SaveEvaluationRequest {
                candidate_id: candidates[0].id,
                scores: scores([1, 1, 1, 1, 1]),
                comments: None,
                status: EvaluationStatus::Submitted,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Conflict(_)));

    let stored = h
        .services
        .evaluations
        .get_evaluation(
            &actor,
            GetEvaluationQuery {
                candidate_id: candidates[0].id,
                evaluator_id: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_score, 40);
    assert_eq!(stored.status, EvaluationStatus::Submitted);
    assert_eq!(stored.comments.as_deref(), Some("bold"));
}

#[tokio::test]
async fn test_draft_can_be_revised_then_submitted() {
    let (h, evaluators, candidates) = cross_assigned().await;
    let evaluator = h
        .services
        .roster
        .get_evaluator(&h.admin, evaluators[0])
        .await
        .unwrap();
    let actor = jury(&evaluator);

    h.services
        .evaluations
        .save(&actor, draft(candidates[0], [2, 2, 2, 2, 2]))
        .await
        .unwrap();
    let revised = h
        .services
        .evaluations
        .save(&actor, draft(candidates[0], [3, 3, 3, 3, 3]))
        .await
        .unwrap();
    assert_eq!(revised.total_score, 15);

    let submitted = h
        .services
        .evaluations
        .save(
            &actor,
            SaveEvaluationRequest {
                status: EvaluationStatus::Submitted,
                ..draft(candidates[0], [4, 4, 4, 4, 4])
            },
        )
        .await
        .unwrap();
    assert_eq!(submitted.evaluation_id, revised.evaluation_id);
    assert_eq!(submitted.total_score, 20);
}

#[tokio::test]
async fn test_out_of_range_score_is_rejected() {
    let (h, evaluators, candidates) = cross_assigned().await;
    let evaluator = h
        .services
        .roster
        .get_evaluator(&h.admin, evaluators[0])
        .await
        .unwrap();

    let err = h
        .services
        .evaluations
        .save(&jury(&evaluator), draft(candidates[0], [11, 5, 5, 5, 5]))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
}

#[tokio::test]
async fn test_unassigned_pair_cannot_be_scored() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(1).await;

    let err = h
        .services
        .evaluations
        .save(&jury(&evaluators[0]), draft(candidates[0].id, [5, 5, 5, 5, 5]))
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::NotFound(_)));
}

#[tokio::test]
async fn test_averages_and_rankings_ignore_drafts() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(2).await;
    let candidates = h.candidates(2).await;
    h.distribute(2).await;
    let (c1, c2) = (candidates[0].id, candidates[1].id);

    h.submit(&evaluators[0], c1, scores([8, 7, 9, 6, 10])).await;
    h.submit(&evaluators[0], c2, scores([6, 6, 6, 6, 6])).await;
    h.submit(&evaluators[1], c1, scores([10, 10, 10, 10, 10])).await;
    h.services
        .evaluations
        .save(&jury(&evaluators[1]), draft(c2, [4, 4, 4, 4, 4]))
        .await
        .unwrap();

    let average = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, c1)
        .await
        .unwrap();
    assert_eq!(average.average, Some(45.0));
    assert_eq!(average.evaluation_count, 2);

    let average = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, c2)
        .await
        .unwrap();
    assert_eq!(average.average, Some(30.0));
    assert_eq!(average.evaluation_count, 1);

    let top = h
        .services
        .evaluations
        .top_candidates(&h.admin, TopCandidatesQuery::default())
        .await
        .unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].candidate_id, c1);
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[1].candidate_id, c2);

    let ranking = h
        .services
        .evaluations
        .ranked_for_jury(&jury(&evaluators[0]), JuryRankingQuery::default())
        .await
        .unwrap();
    let totals: Vec<i32> = ranking.items.iter().map(|i| i.total_score).collect();
    assert_eq!(totals, vec![40, 30]);

    let progress = h
        .services
        .evaluations
        .jury_progress(&h.admin, Some(evaluators[1].id))
        .await
        .unwrap();
    assert_eq!(progress.assigned, 2);
    assert_eq!(progress.submitted, 1);
    assert_eq!(progress.drafts, 1);
    assert_eq!(progress.pending, 0);
    assert_eq!(progress.completion_rate, 0.5);

    let stats = h.services.evaluations.statistics(&h.admin).await.unwrap();
    assert_eq!(stats.submitted, 3);
    assert_eq!(stats.drafts, 1);
}

#[tokio::test]
async fn test_average_without_submissions_is_null() {
    let h = Harness::new().await;
    let candidates = h.candidates(1).await;

    let average = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, candidates[0].id)
        .await
        .unwrap();
    assert_eq!(average.average, None);
    assert_eq!(average.evaluation_count, 0);

    let err = h
        .services
        .evaluations
        .average_for_candidate(&h.admin, 404)
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::NotFound(_)));
}

#[tokio::test]
async fn test_admin_must_name_evaluator() {
    let (h, _, candidates) = cross_assigned().await;

    let err = h
        .services
        .evaluations
        .get_evaluation(
            &h.admin,
            GetEvaluationQuery {
                candidate_id: candidates[0],
                evaluator_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
}

#[tokio::test]
async fn test_jury_cannot_read_other_evaluations() {
    let (h, evaluators, candidates) = cross_assigned().await;
    let evaluator = h
        .services
        .roster
        .get_evaluator(&h.admin, evaluators[0])
        .await
        .unwrap();

    let err = h
        .services
        .evaluations
        .get_evaluation(
            &jury(&evaluator),
            GetEvaluationQuery {
                candidate_id: candidates[0],
                evaluator_id: Some(evaluators[1]),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Permission(_)));
}

#[tokio::test]
async fn test_recast_vote_replaces_previous() {
    let h = Harness::new().await;
    let evaluators = h.evaluators(1).await;
    let candidates = h.candidates(1).await;
    h.distribute(1).await;
    let actor = jury(&evaluators[0]);

    let first = h
        .services
        .votes
        .cast_vote(
            &actor,
            CastVoteRequest {
                candidate_id: candidates[0].id,
                rating: 6,
                comments: None,
            },
        )
        .await
        .unwrap();
    let second = h
        .services
        .votes
        .cast_vote(
            &actor,
            CastVoteRequest {
                candidate_id: candidates[0].id,
                rating: 9,
                comments: Some("changed my mind".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.vote_id, second.vote_id);

    let vote = h
        .services
        .votes
        .get_vote(&actor, candidates[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vote.rating, 9);

    let err = h
        .services
        .votes
        .cast_vote(
            &actor,
            CastVoteRequest {
                candidate_id: candidates[0].id,
                rating: 0,
                comments: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JuryError::Validation(_)));
}
