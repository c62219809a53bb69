use base64::Engine;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::str::FromStr;

use crate::consts::ICON_URL;
use crate::error::AppError;
use crate::schema::ActionGetResponse;
use crate::tx::TxState;

pub fn get_param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<T, AppError> {
    params
        .get(key)
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{key}' parameter")))?
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid '{key}' parameter")))
}

pub fn parse_pubkey(value: &str) -> Result<Pubkey, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid account".into()))
}

pub fn parse_signature(value: &str) -> Result<Signature, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction signature".into()))
}

/// Optional viewer passed as `?account=` on GET requests.
pub fn viewer_param(params: &HashMap<String, String>) -> Result<Option<Pubkey>, AppError> {
    params.get("account").map(|a| parse_pubkey(a)).transpose()
}

pub fn serialize_tx(tx: &Transaction) -> Result<String, AppError> {
    let bytes = bincode::serialize(tx)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Response for a chained action whose transaction has not landed, or
/// `None` once it is confirmed. Failures are reported as-is, never retried.
/// An unsettled state, `Idle` included, counts as still pending.
pub fn unconfirmed(title: &str, state: &TxState) -> Option<ActionGetResponse> {
    if !state.is_settled() {
        return Some(
            ActionGetResponse::new(
                ICON_URL,
                title,
                "Waiting for the network to confirm the transaction",
                "Confirming...",
            )
            .with_error("Transaction is not confirmed yet"),
        );
    }
    match state {
        TxState::Failed(message) => Some(
            ActionGetResponse::new(ICON_URL, title, "The transaction did not go through", "Failed")
                .with_error(message.clone()),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_confirmed_passes() {
        assert!(unconfirmed("Claim", &TxState::Confirmed).is_none());

        for state in [TxState::Idle, TxState::Pending] {
            let resp = unconfirmed("Claim", &state).unwrap();
            assert_eq!(resp.disabled, Some(true));
            assert_eq!(resp.error.unwrap().message, "Transaction is not confirmed yet");
        }

        let failed = unconfirmed("Claim", &TxState::Failed("blockhash not found".into())).unwrap();
        assert_eq!(failed.label, "Failed");
        assert_eq!(failed.error.unwrap().message, "blockhash not found");
    }

    #[test]
    fn params_are_trimmed_and_typed() {
        let params = HashMap::from([("packet".to_string(), " 12 ".to_string())]);
        assert_eq!(get_param::<u64>(&params, "packet").unwrap(), 12);
        assert!(get_param::<u64>(&params, "count").is_err());
        assert!(viewer_param(&params).unwrap().is_none());
    }
}
