use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;
use std::sync::Arc;

use super::claim::ClaimAction;
use super::create::CreateAction;
use super::refund::RefundAction;
use crate::error::AppError;
use crate::schema::{ActionGetResponse, ActionPostResponse};
use crate::state::AppState;

/// One blink endpoint: `GET` describes it, `POST` builds the transaction,
/// and `POST .../next` reports back once the wallet has sent it.
#[async_trait]
pub trait Action: Send + Sync {
    fn path(&self) -> &'static str;

    fn title(&self) -> &'static str;

    async fn metadata(
        &self,
        ctx: &AppState,
        params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError>;

    async fn execute(
        &self,
        ctx: &AppState,
        account: Pubkey,
        params: HashMap<String, String>,
    ) -> Result<ActionPostResponse, AppError>;

    async fn next(
        &self,
        ctx: &AppState,
        account: Pubkey,
        signature: Signature,
        params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError>;
}

pub struct ActionRegistry {
    actions: HashMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            actions: HashMap::new(),
        };
        registry.register(Arc::new(CreateAction));
        registry.register(Arc::new(ClaimAction));
        registry.register(Arc::new(RefundAction));
        registry
    }

    fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.insert(action.path(), action);
    }

    pub fn get(&self, path: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.actions.keys().copied().collect();
        paths.sort_unstable();
        paths
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
