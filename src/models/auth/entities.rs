use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{JuryError, Result};
use crate::models::evaluators::entities::Evaluator;

define_string_enum! {
    /// 账户角色，来自访问令牌
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
    pub enum AccountRole {
        Admin => "admin",
        Jury => "jury",
    }
}

define_string_enum! {
    /// 操作权限
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
    pub enum Capability {
        SubmitEvaluations => "submit_evaluations",
        ViewOwnEvaluations => "view_own_evaluations",
        ManageAssignments => "manage_assignments",
        ManageVotes => "manage_votes",
        ManageBackups => "manage_backups",
        ManagePhases => "manage_phases",
        ManageRoster => "manage_roster",
        ViewReports => "view_reports",
        ViewAuditLog => "view_audit_log",
    }
}

impl AccountRole {
    pub fn has(&self, capability: Capability) -> bool {
        match self {
            AccountRole::Admin => capability != Capability::SubmitEvaluations,
            AccountRole::Jury => matches!(
                capability,
                Capability::SubmitEvaluations | Capability::ViewOwnEvaluations
            ),
        }
    }
}

/// 已解析并通过认证的调用者
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct Actor {
    pub account_id: i64,
    pub role: AccountRole,
    pub evaluator: Option<Evaluator>,
}

impl Actor {
    pub fn admin(account_id: i64) -> Self {
        Self {
            account_id,
            role: AccountRole::Admin,
            evaluator: None,
        }
    }

    /// 后台任务使用的系统身份
    pub fn system() -> Self {
        Self::admin(0)
    }

    pub fn jury(evaluator: Evaluator) -> Self {
        Self {
            account_id: evaluator.account_id,
            role: AccountRole::Jury,
            evaluator: Some(evaluator),
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.has(capability)
    }

    /// 检查权限，不满足时返回 Permission 错误
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(JuryError::permission(format!(
                "账户 {} ({}) 缺少权限: {capability}",
                self.account_id, self.role
            )))
        }
    }

    /// 调用者对应的评委 ID
    pub fn evaluator_id(&self) -> Result<i64> {
        self.evaluator
            .as_ref()
            .map(|e| e.id)
            .ok_or_else(|| JuryError::permission("当前账户不是评委"))
    }

    /// 审计日志中记录的角色
    pub fn role_label(&self) -> String {
        match &self.evaluator {
            Some(evaluator) => format!("{}:{}", self.role, evaluator.role),
            None => self.role.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluators::entities::EvaluatorRole;

    fn evaluator() -> Evaluator {
        Evaluator {
            id: 7,
            account_id: 70,
            display_name: "Ada".to_string(),
            role: EvaluatorRole::President,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_admin_capabilities() {
        let admin = Actor::admin(1);
        for cap in Capability::ALL {
            assert_eq!(admin.can(*cap), *cap != Capability::SubmitEvaluations);
        }
        assert!(admin.evaluator_id().is_err());
    }

    #[test]
    fn test_jury_capabilities() {
        let jury = Actor::jury(evaluator());
        assert!(jury.require(Capability::SubmitEvaluations).is_ok());
        let err = jury.require(Capability::ManageVotes).unwrap_err();
        assert!(matches!(err, JuryError::Permission(_)));
        assert_eq!(jury.evaluator_id().unwrap(), 7);
        assert_eq!(jury.role_label(), "jury:president");
    }
}
