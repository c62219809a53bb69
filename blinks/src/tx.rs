use serde::Serialize;

/// Lifecycle of one user-initiated transaction.
///
/// The wallet owns signing and the RPC node owns confirmation; this only
/// records what has been observed so a control can stay disabled while a
/// request is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum TxState {
    #[default]
    Idle,
    Pending,
    Confirmed,
    Failed(String),
}

impl TxState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TxState::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, TxState::Confirmed | TxState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(TxState::Failed("User rejected the request".into())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["error"], "User rejected the request");

        let json = serde_json::to_value(TxState::Confirmed).unwrap();
        assert_eq!(json["state"], "confirmed");
    }

    #[test]
    fn only_pending_blocks() {
        assert!(TxState::Pending.is_pending());
        assert!(!TxState::Idle.is_pending());
        assert!(!TxState::Failed("x".into()).is_pending());
        assert!(TxState::Confirmed.is_settled());
        assert!(!TxState::Pending.is_settled());
    }
}
