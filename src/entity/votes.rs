//! 投票实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub phase: String,
    pub rating: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub reset_at: Option<i64>,
    pub reset_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_vote(self) -> crate::models::votes::entities::Vote {
        crate::models::votes::entities::Vote {
            id: self.id,
            evaluator_id: self.evaluator_id,
            candidate_id: self.candidate_id,
            phase: self.phase,
            rating: self.rating,
            comments: self.comments,
            is_active: self.is_active,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
            reset_at: self.reset_at.map(super::ts),
            reset_by: self.reset_by,
        }
    }
}
