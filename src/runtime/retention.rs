//! 数据保留清理
//!
//! 按固定间隔删除超过保留期且从未恢复的备份，以及过期的审计记录。

use std::time::Duration;
use tracing::{error, info};

use crate::config::RetentionConfig;
use crate::models::auth::entities::Actor;
use crate::services::AppServices;

/// 执行一次清理，返回 (删除的备份数, 删除的审计记录数)
pub async fn sweep_once(services: &AppServices) -> (u64, u64) {
    let system = Actor::system();

    let backups = match services.resets.purge_expired_backups(&system, None).await {
        Ok(deleted) => deleted,
        Err(e) => {
            error!("Backup retention sweep failed: {}", e.format_simple());
            0
        }
    };

    let audit_days = services.audit.retention_days();
    let audit = match services.audit.clean_old_logs(&system, audit_days).await {
        Ok(deleted) => deleted,
        Err(e) => {
            error!("Audit retention sweep failed: {}", e.format_simple());
            0
        }
    };

    (backups, audit)
}

/// 启动后台清理任务
pub fn spawn_retention_sweep(services: AppServices, config: &RetentionConfig) {
    let period = Duration::from_secs(config.sweep_interval_secs.max(60));
    info!("Retention sweep scheduled every {}s", period.as_secs());

    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let (backups, audit) = sweep_once(&services).await;
            info!(
                "Retention sweep completed: {} backups, {} audit entries removed",
                backups, audit
            );
        }
    });
}
