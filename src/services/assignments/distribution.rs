//! 自动分配规划
//!
//! 纯计算，不访问存储。按轮次分配：每轮把候选人按（已覆盖次数, ID）升序排列，
//! 每个候选人交给一位尚未持有它且未达上限的评委。没有任何新增时停止。

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::models::assignments::entities::{AssignmentPair, DistributionMethod};

/// 规划参数
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub method: DistributionMethod,
    pub candidates_per_jury: u32,
    pub max_total: Option<u32>,
    pub seed: Option<u64>,
}

/// 计算新增分配
///
/// `evaluators` 与 `candidates` 为参与分配的 ID；`existing` 为保留的现有分配，
/// 计入评委负载与候选人覆盖次数，且不会重复规划。
pub fn plan_distribution(
    evaluators: &[i64],
    candidates: &[i64],
    existing: &[AssignmentPair],
    options: &PlanOptions,
) -> Vec<AssignmentPair> {
    if evaluators.is_empty() || candidates.is_empty() || options.candidates_per_jury == 0 {
        return Vec::new();
    }

    let mut evaluators = evaluators.to_vec();
    evaluators.sort_unstable();
    evaluators.dedup();
    let mut candidates = candidates.to_vec();
    candidates.sort_unstable();
    candidates.dedup();

    let cap = options.candidates_per_jury as usize;
    let limit = options.max_total.map(|m| m as usize).unwrap_or(usize::MAX);

    let mut loads: BTreeMap<i64, usize> = evaluators.iter().map(|id| (*id, 0)).collect();
    let mut coverage: HashMap<i64, usize> = HashMap::new();
    let mut held: HashSet<(i64, i64)> = HashSet::new();
    for pair in existing {
        if held.insert((pair.evaluator_id, pair.candidate_id)) {
            if let Some(load) = loads.get_mut(&pair.evaluator_id) {
                *load += 1;
            }
            *coverage.entry(pair.candidate_id).or_default() += 1;
        }
    }

    let mut rng = StdRng::seed_from_u64(options.seed.unwrap_or_else(rand::random));
    let mut planned = Vec::new();

    loop {
        let mut order = candidates.clone();
        order.sort_by_key(|c| (coverage.get(c).copied().unwrap_or(0), *c));

        let mut assigned_this_round = 0;
        for candidate_id in order {
            if planned.len() >= limit {
                return planned;
            }

            let eligible: Vec<i64> = loads
                .iter()
                .filter(|(ev, load)| **load < cap && !held.contains(&(**ev, candidate_id)))
                .map(|(ev, _)| *ev)
                .collect();

            let chosen = match options.method {
                // BTreeMap 按 ID 升序迭代，min_by_key 取第一个最小值即实现 ID 升序决胜
                DistributionMethod::Balanced => eligible.iter().copied().min_by_key(|ev| loads[ev]),
                DistributionMethod::Random => eligible.choose(&mut rng).copied(),
            };
            let Some(evaluator_id) = chosen else {
                continue;
            };

            held.insert((evaluator_id, candidate_id));
            *loads.entry(evaluator_id).or_default() += 1;
            *coverage.entry(candidate_id).or_default() += 1;
            planned.push(AssignmentPair {
                evaluator_id,
                candidate_id,
            });
            assigned_this_round += 1;
        }

        if assigned_this_round == 0 {
            return planned;
        }
    }
}

/// 在现有分配基础上叠加计划后各评委的负载
pub fn loads_after(
    evaluators: &[i64],
    existing: &[AssignmentPair],
    planned: &[AssignmentPair],
) -> BTreeMap<i64, i64> {
    let mut loads: BTreeMap<i64, i64> = evaluators.iter().map(|id| (*id, 0)).collect();
    for pair in existing.iter().chain(planned) {
        if let Some(load) = loads.get_mut(&pair.evaluator_id) {
            *load += 1;
        }
    }
    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assignments::stats::distribution_stats;

    fn options(method: DistributionMethod, per_jury: u32) -> PlanOptions {
        PlanOptions {
            method,
            candidates_per_jury: per_jury,
            max_total: None,
            seed: Some(42),
        }
    }

    fn counts(evaluators: &[i64], planned: &[AssignmentPair]) -> Vec<i64> {
        loads_after(evaluators, &[], planned).into_values().collect()
    }

    #[test]
    fn test_three_by_nine_is_perfectly_even() {
        let evaluators = [1, 2, 3];
        let candidates: Vec<i64> = (1..=9).collect();
        let plan = plan_distribution(
            &evaluators,
            &candidates,
            &[],
            &options(DistributionMethod::Balanced, 3),
        );

        assert_eq!(plan.len(), 9);
        assert_eq!(counts(&evaluators, &plan), vec![3, 3, 3]);
        // 每个候选人恰好被覆盖一次
        let covered: HashSet<i64> = plan.iter().map(|p| p.candidate_id).collect();
        assert_eq!(covered.len(), 9);
        // 第一个候选人交给 ID 最小的评委
        assert_eq!(plan[0].evaluator_id, 1);
        assert_eq!(plan[0].candidate_id, 1);
    }

    #[test]
    fn test_balanced_with_large_target_stays_even() {
        for (m, n) in [(4_i64, 12_i64), (5, 40), (3, 60)] {
            let evaluators: Vec<i64> = (1..=m).collect();
            let candidates: Vec<i64> = (100..100 + n).collect();
            let plan = plan_distribution(
                &evaluators,
                &candidates,
                &[],
                &options(DistributionMethod::Balanced, 20),
            );
            let loads = counts(&evaluators, &plan);
            let stats = distribution_stats(&loads);
            assert!(stats.stddev <= 1.5, "m={m} n={n} loads={loads:?}");

            let covered: HashSet<i64> = plan.iter().map(|p| p.candidate_id).collect();
            assert_eq!(covered.len() as i64, n.min(m * 20));
        }
    }

    #[test]
    fn test_no_duplicate_pairs() {
        let evaluators = [1, 2];
        let candidates = [10, 11, 12];
        let plan = plan_distribution(
            &evaluators,
            &candidates,
            &[],
            &options(DistributionMethod::Balanced, 20),
        );
        let unique: HashSet<AssignmentPair> = plan.iter().copied().collect();
        assert_eq!(unique.len(), plan.len());
        // 每位评委最多持有全部 3 个候选人
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_existing_assignments_are_kept_and_counted() {
        let evaluators = [1, 2];
        let candidates = [10, 11, 12, 13];
        let existing = [
            AssignmentPair {
                evaluator_id: 1,
                candidate_id: 10,
            },
            AssignmentPair {
                evaluator_id: 1,
                candidate_id: 11,
            },
        ];
        let plan = plan_distribution(
            &evaluators,
            &candidates,
            &existing,
            &options(DistributionMethod::Balanced, 2),
        );

        assert!(plan.iter().all(|p| p.evaluator_id == 2));
        assert_eq!(plan.len(), 2);
        // 未覆盖的候选人优先
        let mut taken: Vec<i64> = plan.iter().map(|p| p.candidate_id).collect();
        taken.sort_unstable();
        assert_eq!(taken, vec![12, 13]);
    }

    #[test]
    fn test_empty_inputs_are_noop() {
        let opts = options(DistributionMethod::Balanced, 3);
        assert!(plan_distribution(&[], &[1, 2], &[], &opts).is_empty());
        assert!(plan_distribution(&[1, 2], &[], &[], &opts).is_empty());
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let evaluators: Vec<i64> = (1..=4).collect();
        let candidates: Vec<i64> = (1..=10).collect();
        let opts = options(DistributionMethod::Random, 5);

        let first = plan_distribution(&evaluators, &candidates, &[], &opts);
        let second = plan_distribution(&evaluators, &candidates, &[], &opts);
        assert_eq!(first, second);
        assert!(counts(&evaluators, &first).iter().all(|c| *c <= 5));
    }

    #[test]
    fn test_max_total_caps_plan() {
        let mut opts = options(DistributionMethod::Balanced, 10);
        opts.max_total = Some(4);
        let plan = plan_distribution(&[1, 2, 3], &[1, 2, 3, 4, 5, 6], &[], &opts);
        assert_eq!(plan.len(), 4);
    }
}
