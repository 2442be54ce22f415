//! 评审阶段

use std::sync::Arc;

use tracing::{info, warn};

use super::audited;
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::entities::{AuditAction, AuditScope, NewAuditEntry},
    auth::entities::{Actor, Capability},
    phases::{entities::Phase, responses::PhaseListResponse},
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct PhaseService {
    storage: Arc<dyn Storage>,
}

impl PhaseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 当前阶段，任何已认证账户均可查询
    pub async fn current(&self, _actor: &Actor) -> Result<Phase> {
        self.storage.current_phase().await
    }

    // 阶段列表
    pub async fn list(&self, actor: &Actor) -> Result<PhaseListResponse> {
        actor.require(Capability::ViewReports)?;
        let phases = self.storage.list_phases().await?;
        let current = phases
            .iter()
            .find(|p| p.is_current)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        Ok(PhaseListResponse { current, phases })
    }

    // 锁定或解锁阶段
    pub async fn set_lock(&self, actor: &Actor, name: &str, locked: bool) -> Result<Phase> {
        actor.require(Capability::ManagePhases)?;

        let action = if locked {
            AuditAction::PhaseLocked
        } else {
            AuditAction::PhaseUnlocked
        };
        let entry = NewAuditEntry::new(action, AuditScope::Phase, actor).phase(name);
        let phase = audited(
            &self.storage,
            entry.clone(),
            self.storage.set_phase_lock(name, locked, entry),
        )
        .await?
        .ok_or_else(|| JuryError::not_found(format!("阶段不存在: {name}")))?;

        if locked {
            warn!("Phase {} locked by account {}", phase.name, actor.account_id);
        } else {
            info!("Phase {} unlocked by account {}", phase.name, actor.account_id);
        }
        Ok(phase)
    }
}
