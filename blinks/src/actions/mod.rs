pub mod claim;
pub mod create;
pub mod refund;
mod registry;
mod utils;

pub use registry::{Action, ActionRegistry};
pub use utils::{parse_pubkey, parse_signature};
