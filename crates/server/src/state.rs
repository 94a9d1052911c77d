use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use metrics_exporter_prometheus::PrometheusHandle;
use retrieveit::{BackendConfig, Portal, PortalConfig};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Submit flow and read side (shared across requests)
    pub portal: Arc<Portal>,

    /// Renders `/metrics` when a Prometheus recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state, building the portal from
    /// `config.portal_config` (or defaults) and `config.store_path`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let portal_cfg = portal_config(&config)?;
        let portal = Portal::from_config(&portal_cfg)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self::with_portal(config, portal))
    }

    /// State around an already-built portal.
    pub fn with_portal(config: ServerConfig, portal: Portal) -> Self {
        Self {
            config: Arc::new(config),
            portal: Arc::new(portal),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

fn portal_config(config: &ServerConfig) -> ServerResult<PortalConfig> {
    let mut portal_cfg = match &config.portal_config {
        Some(path) => {
            PortalConfig::from_file(path).map_err(|e| ServerError::Config(e.to_string()))?
        }
        None => PortalConfig::default(),
    };
    if let Some(path) = &config.store_path {
        portal_cfg.store.backend = BackendConfig::redb(path.as_str());
    }
    Ok(portal_cfg)
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
