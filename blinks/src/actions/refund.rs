use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;

use super::utils::{get_param, serialize_tx, unconfirmed, viewer_param};
use super::Action;
use crate::consts::*;
use crate::error::AppError;
use crate::format;
use crate::packet::{Packet, PacketStatus};
use crate::schema::*;
use crate::state::AppState;

pub struct RefundAction;

/// Why `viewer` cannot take back what is left in `packet`, or `None` when
/// [`Packet::can_refund`] allows it. Without a wallet the packet is judged
/// as its creator would see it.
fn refund_blocked(packet: &Packet, viewer: Option<&Pubkey>, now: i64) -> Option<&'static str> {
    let viewer = viewer.unwrap_or(&packet.creator);
    if packet.can_refund(viewer, now) {
        return None;
    }
    let reason = if packet.status == PacketStatus::Refunded {
        "This lucky packet has already been refunded"
    } else if packet.is_completed() {
        "This lucky packet has been fully claimed"
    } else if !packet.is_expired(now) {
        "This lucky packet has not expired yet"
    } else {
        "Only the creator can refund this lucky packet"
    };
    Some(reason)
}

#[async_trait]
impl Action for RefundAction {
    fn path(&self) -> &'static str {
        "refund"
    }

    fn title(&self) -> &'static str {
        "Refund Lucky Packet"
    }

    async fn metadata(
        &self,
        ctx: &AppState,
        params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError> {
        let id: u64 = get_param(&params, PACKET_PARAM)?;
        let viewer = viewer_param(&params)?;
        let packet = ctx.reader.get_packet(id).await?;

        let description = format!(
            "Reclaim the {} SOL left in lucky packet #{id} ({} unclaimed shares). Available to the creator after expiry.",
            format::format_sol_precision(packet.remaining_amount, 4),
            packet.remaining_count
        );
        let resp = ActionGetResponse::new(ICON_URL, self.title(), &description, "Refund");

        match refund_blocked(&packet, viewer.as_ref(), format::now_unix()) {
            Some(reason) => Ok(resp.with_error(reason)),
            None => Ok(resp),
        }
    }

    async fn execute(
        &self,
        ctx: &AppState,
        account: Pubkey,
        params: HashMap<String, String>,
    ) -> Result<ActionPostResponse, AppError> {
        let id: u64 = get_param(&params, PACKET_PARAM)?;

        let packet = ctx.reader.get_packet(id).await?;
        if let Some(reason) = refund_blocked(&packet, Some(&account), format::now_unix()) {
            return Err(AppError::BadRequest(reason.into()));
        }

        let prepared = ctx.writer.refund_packet(&account, id).await?;
        let transaction = serialize_tx(&prepared.transaction)?;

        tracing::info!(
            "Prepared refund of packet #{id}: {} lamports back to {account}",
            packet.remaining_amount
        );

        Ok(ActionPostResponse::new(
            transaction,
            format!(
                "Refunding {} SOL from lucky packet #{id}",
                format::format_sol(packet.remaining_amount, 4)
            ),
        )
        .with_next(format!("/api/actions/refund/next?{PACKET_PARAM}={id}")))
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
            return Ok(resp);
        }

        tracing::info!("Packet #{id} refunded to {account} ({signature})");

        Ok(ActionGetResponse::new(
            ICON_URL,
            "Lucky packet refunded",
            &format!("The unclaimed balance of lucky packet #{id} is back in your wallet."),
            "Refunded",
        )
        .completed())
    }
}
