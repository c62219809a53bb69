use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;

use super::utils::{get_param, serialize_tx, unconfirmed, viewer_param};
use super::Action;
use crate::card::{ClaimCard, ClaimRejection};
use crate::consts::*;
use crate::error::AppError;
use crate::format;
use crate::packet::Packet;
use crate::schema::*;
use crate::state::AppState;

pub struct ClaimAction;

fn describe(packet: &Packet, now: i64) -> String {
    let headline = if packet.message.is_empty() {
        format!("Lucky packet #{}", packet.id)
    } else {
        packet.message.clone()
    };
    format!(
        "{headline} - {}/{} shares left ({:.0}%), {} of {} SOL remaining, expires in {}",
        packet.remaining_count,
        packet.total_count,
        packet.remaining_percent(),
        format::format_sol_precision(packet.remaining_amount, 4),
        format::format_sol_precision(packet.total_amount, 4),
        format::time_remaining(packet.expires_at, now),
    )
}

fn claim_label(packet: &Packet) -> String {
    if packet.is_random {
        "Claim (Random Amount)".into()
    } else {
        format!("Claim {} SOL", format::format_sol(packet.equal_share(), 4))
    }
}

#[async_trait]
impl Action for ClaimAction {
    fn path(&self) -> &'static str {
        "claim"
    }

    fn title(&self) -> &'static str {
        "Lucky Packet"
    }

    async fn metadata(
        &self,
        ctx: &AppState,
        params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError> {
        let id: u64 = get_param(&params, PACKET_PARAM)?;
        let viewer = viewer_param(&params)?;

        let packet = ctx.reader.get_packet(id).await?;
        let has_claimed = match viewer {
            Some(v) => ctx.reader.has_user_claimed(id, &v).await?,
            None => false,
        };

        let now = format::now_unix();
        let card = ClaimCard::new(&packet, viewer, has_claimed, now);
        let description = describe(&packet, now);

        // Blink clients fetch metadata before a wallet is attached.
        match card.guard() {
            Ok(_) | Err(ClaimRejection::NotConnected) => Ok(ActionGetResponse::new(
                ICON_URL,
                self.title(),
                &description,
                &claim_label(&packet),
            )),
            Err(reason) => Ok(ActionGetResponse::new(
                ICON_URL,
                self.title(),
                &description,
                card.button_label(),
            )
            .with_error(reason.to_string())),
        }
    }

    async fn execute(
        &self,
        ctx: &AppState,
        account: Pubkey,
        params: HashMap<String, String>,
    ) -> Result<ActionPostResponse, AppError> {
        let id: u64 = get_param(&params, PACKET_PARAM)?;

        // Fetch current state and verify claimable
        let packet = ctx.reader.get_packet(id).await?;
        let has_claimed = ctx.reader.has_user_claimed(id, &account).await?;
        ClaimCard::new(&packet, Some(account), has_claimed, format::now_unix()).guard()?;

        let prepared = ctx.writer.claim_packet(&account, id).await?;
        let transaction = serialize_tx(&prepared.transaction)?;

        tracing::info!("Prepared claim of packet #{id} for {account}");

        let message = if packet.is_random {
            format!("Claiming a random share of lucky packet #{id}")
        } else {
            format!(
                "Claiming {} SOL from lucky packet #{id}",
                format::format_sol(packet.equal_share(), 4)
            )
        };

        Ok(ActionPostResponse::new(transaction, message)
            .with_next(format!("/api/actions/claim/next?{PACKET_PARAM}={id}")))
    }

    async fn next(
        &self,
        ctx: &AppState,
        account: Pubkey,
        signature: Signature,
        params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError> {
        let id: u64 = get_param(&params, PACKET_PARAM)?;

        let state = ctx.writer.transaction_status(&signature).await?;
        if let Some(resp) = unconfirmed(self.title(), &state) {
            tracing::info!("Claim of packet #{id} by {account} not settled: {state:?}");
            return Ok(resp);
        }

        // Claim flag and records as the program now sees them
        let (packet, has_claimed, records) = tokio::try_join!(
            ctx.reader.get_packet(id),
            ctx.reader.has_user_claimed(id, &account),
            ctx.reader.get_claim_records(id),
        )?;
        let card = ClaimCard::new(&packet, Some(account), has_claimed, format::now_unix());

        let received = records
            .iter()
            .find(|r| r.claimer == account)
            .map(|r| format!("You received {} SOL!", format::format_sol(r.amount, 4)))
            .unwrap_or_else(|| "Your claim went through.".into());

        tracing::info!("Packet #{id} claimed by {account} ({signature})");

        Ok(ActionGetResponse::new(
            ICON_URL,
            "Lucky packet claimed!",
            &format!("{received} {}", describe(&packet, format::now_unix())),
            card.button_label(),
        )
        .completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::tests::{sample_packet, NOW};

    #[test]
    fn labels_by_split() {
        let mut packet = sample_packet(Pubkey::new_unique());
        assert_eq!(claim_label(&packet), "Claim (Random Amount)");
        packet.is_random = false;
        assert_eq!(claim_label(&packet), "Claim 0.1000 SOL");
    }

    #[test]
    fn description_uses_message_or_id() {
        let mut packet = sample_packet(Pubkey::new_unique());
        assert!(describe(&packet, NOW).starts_with("Happy new year - 3/5 shares left (60%)"));
        packet.message.clear();
        assert!(describe(&packet, NOW).starts_with("Lucky packet #7 - "));
    }
}
