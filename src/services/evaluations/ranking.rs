//! 排名与聚合计算
//!
//! 只统计已提交的评分。平均分比较使用交叉相乘的整数和，避免浮点误差影响名次。

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::evaluations::{
    entities::{Evaluation, EvaluationStatus},
    responses::CriteriaAverages,
};

/// 某候选人已提交评分的总分之和与份数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSum {
    pub total: i64,
    pub count: i64,
}

impl ScoreSum {
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / self.count as f64)
    }

    /// 按平均分比较，不经过浮点
    fn cmp_average(&self, other: &ScoreSum) -> Ordering {
        (self.total * other.count).cmp(&(other.total * self.count))
    }
}

fn submitted(evaluations: &[Evaluation]) -> impl Iterator<Item = &Evaluation> {
    evaluations
        .iter()
        .filter(|e| e.status == EvaluationStatus::Submitted)
}

/// 按候选人汇总已提交评分
pub fn sums_by_candidate(evaluations: &[Evaluation]) -> BTreeMap<i64, ScoreSum> {
    let mut sums: BTreeMap<i64, ScoreSum> = BTreeMap::new();
    for evaluation in submitted(evaluations) {
        let sum = sums.entry(evaluation.candidate_id).or_default();
        sum.total += i64::from(evaluation.total_score);
        sum.count += 1;
    }
    sums
}

/// 按平均分降序排列，同分按候选人 ID 升序
pub fn rank_by_average(sums: &BTreeMap<i64, ScoreSum>) -> Vec<(i64, ScoreSum)> {
    let mut ranked: Vec<(i64, ScoreSum)> = sums
        .iter()
        .filter(|(_, sum)| sum.count > 0)
        .map(|(id, sum)| (*id, *sum))
        .collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| b.cmp_average(a).then(a_id.cmp(b_id)));
    ranked
}

/// 评委个人排名：按该评委自己的总分降序，同分按候选人 ID 升序
pub fn rank_for_jury(evaluations: &[Evaluation]) -> Vec<&Evaluation> {
    let mut ranked: Vec<&Evaluation> = submitted(evaluations).collect();
    ranked.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then(a.candidate_id.cmp(&b.candidate_id))
    });
    ranked
}

/// 已提交评分的总分平均值
pub fn average_total(evaluations: &[Evaluation]) -> Option<f64> {
    let (total, count) = submitted(evaluations).fold((0i64, 0i64), |(t, c), e| {
        (t + i64::from(e.total_score), c + 1)
    });
    ScoreSum { total, count }.average()
}

/// 各项标准的平均分
pub fn criteria_averages(evaluations: &[Evaluation]) -> CriteriaAverages {
    let mut sums = [0i64; 5];
    let mut count = 0i64;
    for evaluation in submitted(evaluations) {
        for (slot, (_, score)) in sums.iter_mut().zip(evaluation.scores.criteria()) {
            *slot += i64::from(score);
        }
        count += 1;
    }

    let avg = |i: usize| ScoreSum {
        total: sums[i],
        count,
    }
    .average();
    CriteriaAverages {
        courage: avg(0),
        innovation: avg(1),
        implementation: avg(2),
        relevance: avg(3),
        visibility: avg(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::Scores;
    use chrono::Utc;

    fn evaluation(evaluator_id: i64, candidate_id: i64, total: i32, submitted: bool) -> Evaluation {
        // 五项得分之和等于 total
        let base = total / 5;
        let rest = total - base * 4;
        Evaluation {
            id: evaluator_id * 1000 + candidate_id,
            evaluator_id,
            candidate_id,
            phase: "phase_1".to_string(),
            scores: Scores {
                courage: base,
                innovation: base,
                implementation: base,
                relevance: base,
                visibility: rest,
            },
            total_score: total,
            comments: None,
            status: if submitted {
                EvaluationStatus::Submitted
            } else {
                EvaluationStatus::Draft
            },
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            submitted_at: None,
        }
    }

    #[test]
    fn test_drafts_are_excluded() {
        let evals = vec![evaluation(1, 10, 40, true), evaluation(2, 10, 10, false)];
        let sums = sums_by_candidate(&evals);
        assert_eq!(sums[&10], ScoreSum { total: 40, count: 1 });
        assert_eq!(average_total(&evals), Some(40.0));
    }

    #[test]
    fn test_no_submissions_yields_none() {
        let evals = vec![evaluation(1, 10, 30, false)];
        assert!(sums_by_candidate(&evals).is_empty());
        assert_eq!(average_total(&evals), None);
        assert_eq!(criteria_averages(&evals), CriteriaAverages::default());
    }

    #[test]
    fn test_rank_by_average_ties_by_candidate_id() {
        let evals = vec![
            evaluation(1, 30, 40, true),
            evaluation(2, 30, 20, true), // 平均 30
            evaluation(1, 20, 30, true), // 平均 30
            evaluation(1, 10, 45, true),
        ];
        let ranked = rank_by_average(&sums_by_candidate(&evals));
        let ids: Vec<i64> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(ranked[1].1.average(), Some(30.0));
    }

    #[test]
    fn test_rank_by_average_uses_exact_comparison() {
        // 100/3 与 33.333... 的比较
        let mut sums = BTreeMap::new();
        sums.insert(1, ScoreSum { total: 100, count: 3 });
        sums.insert(2, ScoreSum { total: 33, count: 1 });
        let ranked = rank_by_average(&sums);
        assert_eq!(ranked[0].0, 1);
    }

    #[test]
    fn test_rank_for_jury() {
        let evals = vec![
            evaluation(1, 5, 30, true),
            evaluation(1, 3, 42, true),
            evaluation(1, 4, 30, true),
            evaluation(1, 6, 50, false),
        ];
        let ranked: Vec<i64> = rank_for_jury(&evals).iter().map(|e| e.candidate_id).collect();
        assert_eq!(ranked, vec![3, 4, 5]);
    }

    #[test]
    fn test_criteria_averages() {
        let evals = vec![evaluation(1, 1, 25, true), evaluation(2, 1, 35, true)];
        let averages = criteria_averages(&evals);
        assert_eq!(averages.courage, Some(6.0));
        assert_eq!(averages.visibility, Some(6.0));
    }
}
