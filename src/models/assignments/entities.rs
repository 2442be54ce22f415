use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评委-候选人分配
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub assigned_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

define_string_enum! {
    /// 自动分配方式
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
    pub enum DistributionMethod {
        Balanced => "balanced",
        Random => "random",
    }
}

impl Default for DistributionMethod {
    fn default() -> Self {
        DistributionMethod::Balanced
    }
}

define_string_enum! {
    /// 分配均衡度评级，仅用于报告
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
    pub enum DistributionQuality {
        Balanced => "balanced",
        Acceptable => "acceptable",
        Poor => "poor",
    }
}

impl DistributionQuality {
    pub fn from_stddev(stddev: f64) -> Self {
        if stddev <= 1.5 {
            DistributionQuality::Balanced
        } else if stddev <= 3.0 {
            DistributionQuality::Acceptable
        } else {
            DistributionQuality::Poor
        }
    }
}

// 单个评委的分配数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct EvaluatorLoad {
    pub evaluator_id: i64,
    pub count: i64,
}

// 计划中的一条分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentPair {
    pub evaluator_id: i64,
    pub candidate_id: i64,
}

// 再平衡中的一次迁移
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentMove {
    pub candidate_id: i64,
    pub from_evaluator_id: i64,
    pub to_evaluator_id: i64,
}
