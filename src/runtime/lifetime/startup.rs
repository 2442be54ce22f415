use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::ReplayGuard;
use crate::services::AppServices;
use crate::storage::create_storage;
use crate::utils::JwtUtils;

pub struct StartupContext {
    pub services: AppServices,
    pub jwt: JwtUtils,
    pub replay_guard: ReplayGuard,
}

/// 准备服务器启动的上下文
/// 包括服务层、令牌校验和重放保护
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let phase = storage.current_phase().await?;
    warn!(
        "Current phase: {} ({})",
        phase.name,
        if phase.locked { "locked" } else { "unlocked" }
    );

    let services = AppServices::new(storage, &config.retention);
    let jwt = JwtUtils::new(&config.jwt);
    let replay_guard = ReplayGuard::new(&config.replay);
    debug!(
        "Replay guard ready: ttl {}s, capacity {}",
        config.replay.nonce_ttl, config.replay.max_capacity
    );

    Ok(StartupContext {
        services,
        jwt,
        replay_guard,
    })
}
