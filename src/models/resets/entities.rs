use crate::models::audit::entities::{AuditAction, AuditScope};
use crate::models::backups::entities::BackupSource;

/// 重置命令，存储层在单个事务内执行“先备份、后变更”
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetCommand {
    /// 单个评委对单个候选人的评分与投票
    Individual {
        evaluator_id: i64,
        candidate_id: i64,
    },
    /// 某候选人的全部已提交评分与投票
    Candidate { candidate_id: i64 },
    /// 某评委的全部已提交评分与投票
    Jury { evaluator_id: i64 },
    /// 归档当前阶段并切换到新阶段
    PhaseTransition { to_phase: String },
    /// 全量重置
    Full,
}

impl ResetCommand {
    pub fn source(&self) -> BackupSource {
        match self {
            ResetCommand::Individual { .. } => BackupSource::IndividualReset,
            ResetCommand::Candidate { .. } => BackupSource::BulkCandidate,
            ResetCommand::Jury { .. } => BackupSource::BulkJury,
            ResetCommand::PhaseTransition { .. } => BackupSource::PhaseTransition,
            ResetCommand::Full => BackupSource::FullReset,
        }
    }

    pub fn action(&self) -> AuditAction {
        match self {
            ResetCommand::Individual { .. } => AuditAction::IndividualReset,
            ResetCommand::Candidate { .. } => AuditAction::BulkCandidateReset,
            ResetCommand::Jury { .. } => AuditAction::BulkJuryReset,
            ResetCommand::PhaseTransition { .. } => AuditAction::PhaseTransition,
            ResetCommand::Full => AuditAction::FullReset,
        }
    }

    pub fn scope(&self) -> AuditScope {
        match self {
            ResetCommand::Individual { .. } => AuditScope::Individual,
            ResetCommand::Candidate { .. } => AuditScope::Candidate,
            ResetCommand::Jury { .. } => AuditScope::Evaluator,
            ResetCommand::PhaseTransition { .. } => AuditScope::Phase,
            ResetCommand::Full => AuditScope::All,
        }
    }

    /// 阶段锁定时是否被阻止
    pub fn blocked_by_lock(&self) -> bool {
        !matches!(self, ResetCommand::Full)
    }

    pub fn evaluator_id(&self) -> Option<i64> {
        match self {
            ResetCommand::Individual { evaluator_id, .. } | ResetCommand::Jury { evaluator_id } => {
                Some(*evaluator_id)
            }
            _ => None,
        }
    }

    pub fn candidate_id(&self) -> Option<i64> {
        match self {
            ResetCommand::Individual { candidate_id, .. }
            | ResetCommand::Candidate { candidate_id } => Some(*candidate_id),
            _ => None,
        }
    }
}
