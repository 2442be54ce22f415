//! 业务逻辑层
//!
//! 服务在启动时构造一次，显式持有存储实例，通过 `AppServices` 注入路由层。
//! 每个操作先检查调用者权限，再进行输入校验，最后访问存储。

pub mod assignments;
pub mod audit;
pub mod evaluations;
pub mod phases;
pub mod resets;
pub mod roster;
pub mod votes;

pub use assignments::AssignmentService;
pub use audit::AuditService;
pub use evaluations::EvaluationService;
pub use phases::PhaseService;
pub use resets::ResetService;
pub use roster::RosterService;
pub use votes::VoteService;

use std::future::Future;
use std::sync::Arc;

use tracing::{error, warn};

use crate::config::RetentionConfig;
use crate::errors::{JuryError, Result};
use crate::models::audit::entities::NewAuditEntry;
use crate::storage::Storage;

/// 全部服务的集合
#[derive(Clone)]
pub struct AppServices {
    pub roster: RosterService,
    pub assignments: AssignmentService,
    pub evaluations: EvaluationService,
    pub votes: VoteService,
    pub phases: PhaseService,
    pub resets: ResetService,
    pub audit: AuditService,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>, retention: &RetentionConfig) -> Self {
        Self {
            roster: RosterService::new(storage.clone()),
            assignments: AssignmentService::new(storage.clone()),
            evaluations: EvaluationService::new(storage.clone()),
            votes: VoteService::new(storage.clone()),
            phases: PhaseService::new(storage.clone()),
            resets: ResetService::new(storage.clone(), retention.backup_days),
            audit: AuditService::new(storage, retention.audit_days),
        }
    }
}

/// 补写一条失败的审计记录
pub(crate) async fn record_failure(storage: &Arc<dyn Storage>, entry: NewAuditEntry, err: &JuryError) {
    let action = entry.action;
    warn!("Audited operation {} failed: {}", action, err.format_simple());
    if let Err(audit_err) = storage.append_audit(entry.failed(err.message())).await {
        error!("Failed to record audit entry for {}: {}", action, audit_err);
    }
}

/// 执行一次受审计的操作
///
/// 成功时审计记录已由存储层在同一事务内写入；
/// 校验通过后失败的操作补写一条 success=false 的审计记录。
pub(crate) async fn audited<T, F>(
    storage: &Arc<dyn Storage>,
    entry: NewAuditEntry,
    operation: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match operation.await {
        Err(err) if !err.is_rejection() => {
            record_failure(storage, entry, &err).await;
            Err(err)
        }
        other => other,
    }
}
