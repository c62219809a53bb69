use std::sync::Arc;

use crate::actions::ActionRegistry;
use crate::config::Config;
use crate::contract::{PacketReader, PacketWriter};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reader: Arc<dyn PacketReader>,
    pub writer: Arc<dyn PacketWriter>,
    pub registry: Arc<ActionRegistry>,
}

impl AppState {
    pub fn new(config: Config, reader: Arc<dyn PacketReader>, writer: Arc<dyn PacketWriter>) -> Self {
        Self {
            config: Arc::new(config),
            reader,
            writer,
            registry: Arc::new(ActionRegistry::new()),
        }
    }

    /// One contract object serving both capability sets.
    pub fn with_contract<C>(config: Config, contract: Arc<C>) -> Self
    where
        C: PacketReader + PacketWriter + 'static,
    {
        Self::new(config, contract.clone(), contract)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
