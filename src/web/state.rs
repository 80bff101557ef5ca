use crate::web::{
    config::WebConfig, gateway::AuthGateway, identity::IdentityBackend, session::SessionResolver,
};
use axum::http::{StatusCode, request::Parts};
use std::sync::Arc;
use tracing::error;

/// Shared, immutable state handed to every request through an `Extension`.
pub struct AppState {
    config: WebConfig,
    resolver: SessionResolver,
    gateway: AuthGateway,
}

impl AppState {
    #[must_use]
    pub fn new(config: WebConfig, backend: Arc<dyn IdentityBackend>) -> Self {
        Self {
            config,
            resolver: SessionResolver::new(backend.clone()),
            gateway: AuthGateway::new(backend),
        }
    }

    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    #[must_use]
    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub(crate) fn from_parts(parts: &Parts) -> Result<Arc<Self>, StatusCode> {
        parts.extensions.get::<Arc<Self>>().cloned().ok_or_else(|| {
            error!("AppState extension missing from router");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
