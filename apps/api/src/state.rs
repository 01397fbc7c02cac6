use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::gateway::Gateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Sole path to the generative backend.
    pub gateway: Gateway,
    pub credentials: CredentialStore,
    pub config: Config,
}
