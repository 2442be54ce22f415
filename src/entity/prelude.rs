//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::audit_log::{
    ActiveModel as AuditLogActiveModel, Entity as AuditLog, Model as AuditLogModel,
};
pub use super::backups::{ActiveModel as BackupActiveModel, Entity as Backups, Model as BackupModel};
pub use super::candidates::{
    ActiveModel as CandidateActiveModel, Entity as Candidates, Model as CandidateModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::evaluators::{
    ActiveModel as EvaluatorActiveModel, Entity as Evaluators, Model as EvaluatorModel,
};
pub use super::phases::{ActiveModel as PhaseActiveModel, Entity as Phases, Model as PhaseModel};
pub use super::votes::{ActiveModel as VoteActiveModel, Entity as Votes, Model as VoteModel};
