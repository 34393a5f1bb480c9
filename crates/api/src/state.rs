use infra::db::Db;

use crate::auth::{AuthConfig, JwtService};

/// Shared by every handler and resolver; cloning copies pool handles only.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    auth_config: AuthConfig,
    jwt_service: JwtService,
}

impl AppState {
    /// Production state: auth settings come from the environment.
    pub fn new(db: Db) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        Ok(Self::with_config(db, auth_config))
    }

    pub fn with_config(db: Db, auth_config: AuthConfig) -> Self {
        Self {
            jwt_service: JwtService::new(&auth_config),
            db,
            auth_config,
        }
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
