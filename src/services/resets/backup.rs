use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use super::ResetService;
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::entities::{AuditAction, AuditScope, NewAuditEntry},
    auth::entities::{Actor, Capability},
    backups::{
        entities::Backup,
        requests::{BackupHistoryQuery, CreateBackupRequest, RestoreBackupRequest},
        responses::{BackupStatistics, CreateBackupResponse, RestoreBackupResponse},
    },
};
use crate::services::audited;
use crate::utils::validate::validate_reason;

const DEFAULT_HISTORY_LIMIT: u64 = 50;
const MAX_HISTORY_LIMIT: u64 = 500;
/// “近期备份”的统计窗口
const RECENT_WINDOW_DAYS: i64 = 7;

pub async fn create_backup(
    service: &ResetService,
    actor: &Actor,
    req: CreateBackupRequest,
) -> Result<CreateBackupResponse> {
    actor.require(Capability::ManageBackups)?;
    let reason = validate_reason(&req.reason).map_err(JuryError::validation)?;

    let entry = NewAuditEntry::new(AuditAction::BackupCreated, AuditScope::All, actor)
        .reason(Some(reason.clone()));
    let backup = audited(
        service.storage(),
        entry.clone(),
        service
            .storage()
            .create_backup(req.backup_type, reason, entry),
    )
    .await?;

    info!(
        "Backup {} ({}) created by account {}: {} votes, {} scores",
        backup.id, backup.backup_type, actor.account_id, backup.votes_count, backup.scores_count
    );
    Ok(CreateBackupResponse {
        backup_id: backup.id,
        votes_backed_up: backup.votes_count,
        scores_backed_up: backup.scores_count,
        timestamp: backup.created_at,
    })
}

pub async fn restore_backup(
    service: &ResetService,
    actor: &Actor,
    req: RestoreBackupRequest,
) -> Result<RestoreBackupResponse> {
    actor.require(Capability::ManageBackups)?;

    let entry = NewAuditEntry::new(AuditAction::BackupRestored, AuditScope::All, actor)
        .details(serde_json::json!({ "backup_id": req.backup_id }));
    let response = audited(
        service.storage(),
        entry.clone(),
        service
            .storage()
            .restore_backup(req.backup_id, req.backup_type, entry),
    )
    .await?;

    warn!(
        "Backup {} restored by account {}: {} votes, {} scores",
        response.backup_id, actor.account_id, response.votes_restored, response.scores_restored
    );
    Ok(response)
}

pub async fn backup_history(
    service: &ResetService,
    actor: &Actor,
    query: BackupHistoryQuery,
) -> Result<Vec<Backup>> {
    actor.require(Capability::ManageBackups)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    service.storage().list_backups(limit).await
}

pub async fn backup_statistics(service: &ResetService, actor: &Actor) -> Result<BackupStatistics> {
    actor.require(Capability::ManageBackups)?;
    let recent_since = (Utc::now() - Duration::days(RECENT_WINDOW_DAYS)).timestamp();
    let stats = service.storage().backup_statistics(recent_since).await?;
    debug!(
        "Backup statistics: total={}, recent={}, restorations={}",
        stats.total_backups, stats.recent_backups, stats.restorations
    );
    Ok(stats)
}

pub async fn purge_expired_backups(
    service: &ResetService,
    actor: &Actor,
    days: Option<i64>,
) -> Result<u64> {
    actor.require(Capability::ManageBackups)?;
    let days = days.unwrap_or(service.backup_retention_days());
    if days < 1 {
        return Err(JuryError::validation("保留天数必须大于 0"));
    }

    let older_than = (Utc::now() - Duration::days(days)).timestamp();
    let entry = NewAuditEntry::new(AuditAction::BackupsPurged, AuditScope::All, actor)
        .details(serde_json::json!({ "retention_days": days }));
    let deleted = audited(
        service.storage(),
        entry.clone(),
        service.storage().purge_backups(older_than, entry),
    )
    .await?;

    if deleted > 0 {
        warn!(
            "Purged {} backups older than {} days by account {}",
            deleted, days, actor.account_id
        );
    }
    Ok(deleted)
}
