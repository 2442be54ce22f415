//! 候选人实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "candidates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub organization: Option<String>,
    pub category: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_candidate(self) -> crate::models::candidates::entities::Candidate {
        use crate::models::candidates::entities::{Candidate, CandidateCategory, CandidateStatus};

        Candidate {
            id: self.id,
            name: self.name,
            organization: self.organization,
            category: self
                .category
                .parse::<CandidateCategory>()
                .unwrap_or(CandidateCategory::EstablishedCompanies),
            status: self
                .status
                .parse::<CandidateStatus>()
                .unwrap_or(CandidateStatus::Nominated),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
