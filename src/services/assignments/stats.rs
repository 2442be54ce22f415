//! 分配负载统计

/// 负载分布摘要
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSummary {
    pub min: i64,
    pub max: i64,
    pub average: f64,
    /// 总体标准差
    pub stddev: f64,
}

pub fn distribution_stats(counts: &[i64]) -> LoadSummary {
    if counts.is_empty() {
        return LoadSummary {
            min: 0,
            max: 0,
            average: 0.0,
            stddev: 0.0,
        };
    }

    let n = counts.len() as f64;
    let average = counts.iter().sum::<i64>() as f64 / n;
    let variance = counts
        .iter()
        .map(|c| {
            let d = *c as f64 - average;
            d * d
        })
        .sum::<f64>()
        / n;

    LoadSummary {
        min: counts.iter().copied().min().unwrap_or(0),
        max: counts.iter().copied().max().unwrap_or(0),
        average,
        stddev: variance.sqrt(),
    }
}
