//! 分配再平衡规划
//!
//! 反复从负载最高的评委迁出一名可迁移的候选人给负载最低且差值大于 1 的评委。
//! 持有有效评分的组合不可迁移；目标评委已持有的候选人不可迁入。

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::assignments::entities::{AssignmentMove, AssignmentPair};

/// 计算迁移列表，不访问存储
///
/// `active_evaluators` 为可接收迁入的评委；任何持有分配的评委都可以作为迁出方。
pub fn plan_rebalance(
    active_evaluators: &[i64],
    assignments: &[AssignmentPair],
    pinned: &HashSet<(i64, i64)>,
) -> Vec<AssignmentMove> {
    let mut holdings: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for id in active_evaluators {
        holdings.entry(*id).or_default();
    }
    for pair in assignments {
        holdings
            .entry(pair.evaluator_id)
            .or_default()
            .insert(pair.candidate_id);
    }
    let targets: BTreeSet<i64> = active_evaluators.iter().copied().collect();

    let mut moves = Vec::new();
    let mut exhausted: HashSet<i64> = HashSet::new();

    loop {
        // 负载最高且尚未耗尽的迁出方，同负载取 ID 最小
        let source = holdings
            .iter()
            .filter(|(id, _)| !exhausted.contains(*id))
            .max_by(|(a_id, a), (b_id, b)| a.len().cmp(&b.len()).then(b_id.cmp(a_id)))
            .map(|(id, held)| (*id, held.len()));
        let Some((source_id, source_load)) = source else {
            break;
        };

        let mut ordered_targets: Vec<(usize, i64)> = targets
            .iter()
            .filter(|id| **id != source_id)
            .map(|id| (holdings.get(id).map_or(0, |h| h.len()), *id))
            .collect();
        ordered_targets.sort_unstable();

        let mut chosen = None;
        for (target_load, target_id) in ordered_targets {
            if source_load <= target_load + 1 {
                break;
            }
            let target_held = holdings.get(&target_id);
            let movable = holdings.get(&source_id).and_then(|held| {
                held.iter().copied().find(|candidate_id| {
                    !pinned.contains(&(source_id, *candidate_id))
                        && !target_held.is_some_and(|t| t.contains(candidate_id))
                })
            });
            if let Some(candidate_id) = movable {
                chosen = Some((target_id, candidate_id));
                break;
            }
        }

        match chosen {
            Some((target_id, candidate_id)) => {
                if let Some(held) = holdings.get_mut(&source_id) {
                    held.remove(&candidate_id);
                }
                holdings.entry(target_id).or_default().insert(candidate_id);
                moves.push(AssignmentMove {
                    candidate_id,
                    from_evaluator_id: source_id,
                    to_evaluator_id: target_id,
                });
            }
            None => {
                exhausted.insert(source_id);
            }
        }
    }

    moves
}
