//! 集成测试公共设施：内存 SQLite 上的完整服务层

#![allow(dead_code)]

use std::sync::Arc;

use award_jury::config::RetentionConfig;
use award_jury::models::{
    assignments::requests::AutoDistributeRequest,
    auth::entities::Actor,
    candidates::{
        entities::{Candidate, CandidateCategory},
        requests::CreateCandidateRequest,
    },
    evaluations::{entities::Scores, requests::SaveEvaluationRequest},
    evaluations::entities::EvaluationStatus,
    evaluators::{
        entities::{Evaluator, EvaluatorRole},
        requests::CreateEvaluatorRequest,
    },
};
use award_jury::services::AppServices;
use award_jury::storage::{SeaOrmStorage, Storage};

pub struct Harness {
    pub db: SeaOrmStorage,
    pub storage: Arc<dyn Storage>,
    pub services: AppServices,
    pub admin: Actor,
}

impl Harness {
    pub async fn new() -> Self {
        let db = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage should start");
        let storage: Arc<dyn Storage> = Arc::new(db.clone());
        let services = AppServices::new(storage.clone(), &RetentionConfig::default());
        Self {
            db,
            storage,
            services,
            admin: Actor::admin(1),
        }
    }

    pub async fn evaluators(&self, count: usize) -> Vec<Evaluator> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let evaluator = self
                .services
                .roster
                .create_evaluator(
                    &self.admin,
                    CreateEvaluatorRequest {
                        account_id: 100 + i as i64,
                        display_name: format!("Juror {i}"),
                        role: EvaluatorRole::Member,
                    },
                )
                .await
                .expect("evaluator should be created");
            out.push(evaluator);
        }
        out
    }

    pub async fn candidates(&self, count: usize) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let candidate = self
                .services
                .roster
                .create_candidate(
                    &self.admin,
                    CreateCandidateRequest {
                        name: format!("Candidate {i}"),
                        organization: Some("Acme".to_string()),
                        category: CandidateCategory::Governance,
                    },
                )
                .await
                .expect("candidate should be created");
            out.push(candidate);
        }
        out
    }

    pub async fn distribute(&self, candidates_per_jury: u32) {
        self.services
            .assignments
            .auto_distribute(
                &self.admin,
                AutoDistributeRequest {
                    candidates_per_jury,
                    ..Default::default()
                },
            )
            .await
            .expect("distribution should succeed");
    }

    /// 以评委身份提交一条评分
    pub async fn submit(&self, evaluator: &Evaluator, candidate_id: i64, scores: Scores) -> i64 {
        self.services
            .evaluations
            .save(
                &jury(evaluator),
                SaveEvaluationRequest {
                    candidate_id,
                    scores,
                    comments: Some("solid work".to_string()),
                    status: EvaluationStatus::Submitted,
                },
            )
            .await
            .expect("evaluation should be submitted")
            .evaluation_id
    }
}

pub fn jury(evaluator: &Evaluator) -> Actor {
    Actor::jury(evaluator.clone())
}

pub fn scores(values: [i32; 5]) -> Scores {
    Scores {
        courage: values[0],
        innovation: values[1],
        implementation: values[2],
        relevance: values[3],
        visibility: values[4],
    }
}
