//! 评分校验与总分计算

use crate::errors::{JuryError, Result};
use crate::models::evaluations::{
    entities::{MAX_SCORE, MIN_SCORE, Scores, ValidatedEvaluation},
    requests::SaveEvaluationRequest,
};

/// 评语最大长度（字符）
pub const MAX_COMMENT_CHARS: usize = 5000;

/// 校验五项得分并返回整数总分
pub fn total_score(scores: &Scores) -> Result<i32> {
    let mut total = 0;
    for (name, score) in scores.criteria() {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(JuryError::validation(format!(
                "{name} 得分必须在 {MIN_SCORE} 到 {MAX_SCORE} 之间，实际为 {score}"
            )));
        }
        total += score;
    }
    Ok(total)
}

/// 校验保存请求，生成待写入的评分
pub fn validate(evaluator_id: i64, req: SaveEvaluationRequest) -> Result<ValidatedEvaluation> {
    let total_score = total_score(&req.scores)?;

    let comments = req
        .comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if let Some(comments) = &comments {
        if comments.chars().count() > MAX_COMMENT_CHARS {
            return Err(JuryError::validation(format!(
                "评语不能超过 {MAX_COMMENT_CHARS} 个字符"
            )));
        }
    }

    Ok(ValidatedEvaluation {
        evaluator_id,
        candidate_id: req.candidate_id,
        scores: req.scores,
        total_score,
        comments,
        status: req.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::EvaluationStatus;

    fn scores(values: [i32; 5]) -> Scores {
        Scores {
            courage: values[0],
            innovation: values[1],
            implementation: values[2],
            relevance: values[3],
            visibility: values[4],
        }
    }

    #[test]
    fn test_total_is_exact_sum() {
        assert_eq!(total_score(&scores([8, 7, 9, 6, 10])).unwrap(), 40);
        assert_eq!(total_score(&scores([1, 1, 1, 1, 1])).unwrap(), 5);
        assert_eq!(total_score(&scores([10, 10, 10, 10, 10])).unwrap(), 50);
    }

    #[test]
    fn test_total_for_all_valid_tuples_in_range() {
        for a in MIN_SCORE..=MAX_SCORE {
            for b in [MIN_SCORE, 5, MAX_SCORE] {
                let s = scores([a, b, a, b, a]);
                let total = total_score(&s).unwrap();
                assert_eq!(total, 3 * a + 2 * b);
                assert!((5..=50).contains(&total));
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        for bad in [0, 11, -3] {
            let err = total_score(&scores([5, 5, bad, 5, 5])).unwrap_err();
            assert!(matches!(err, JuryError::Validation(_)));
            assert!(err.message().contains("implementation"));
        }
    }

    #[test]
    fn test_validate_trims_comments() {
        let req = SaveEvaluationRequest {
            candidate_id: 3,
            scores: scores([5, 5, 5, 5, 5]),
            comments: Some("   ".to_string()),
            status: EvaluationStatus::Draft,
        };
        let validated = validate(9, req).unwrap();
        assert_eq!(validated.evaluator_id, 9);
        assert_eq!(validated.total_score, 25);
        assert!(validated.comments.is_none());
    }

    #[test]
    fn test_validate_rejects_long_comments() {
        let req = SaveEvaluationRequest {
            candidate_id: 3,
            scores: scores([5, 5, 5, 5, 5]),
            comments: Some("x".repeat(MAX_COMMENT_CHARS + 1)),
            status: EvaluationStatus::Submitted,
        };
        assert!(matches!(validate(1, req), Err(JuryError::Validation(_))));
    }
}
