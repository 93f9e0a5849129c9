//! Shared state injected into the dispatcher.

use std::sync::Arc;

use super::LifecycleEngine;
use crate::config::AppConfig;
use crate::ports::ChannelGateway;

/// Everything the update handlers need, cloned into each endpoint.
///
/// The store is reached only through the engine; handlers never mutate
/// persistence directly.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LifecycleEngine>,
    pub gateway: Arc<dyn ChannelGateway>,
    pub config: Arc<AppConfig>,
}
