use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;

use super::utils::{get_param, serialize_tx, unconfirmed};
use super::Action;
use crate::card::share_link;
use crate::consts::*;
use crate::error::AppError;
use crate::form::{CreateFlow, CreatePacketForm};
use crate::format;
use crate::schema::*;
use crate::state::AppState;

pub struct CreateAction;

#[async_trait]
impl Action for CreateAction {
    fn path(&self) -> &'static str {
        "create"
    }

    fn title(&self) -> &'static str {
        "Create Lucky Packet"
    }

    async fn metadata(
        &self,
        _ctx: &AppState,
        _params: HashMap<String, String>,
    ) -> Result<ActionGetResponse, AppError> {
        let resp = ActionGetResponse::new(
            ICON_URL,
            self.title(),
            "Send an on-chain lucky packet and share your luck with friends. A 1% platform fee is deducted.",
            "Create",
        )
        .with_links(vec![LinkedAction::transaction(
            "/api/actions/create?amount={amount}&count={count}&duration={duration}&message={message}&is_random={is_random}",
            "Create Lucky Packet",
        )
        .with_parameters(vec![
            ActionParameter::number("amount", "Amount (SOL)", true).with_min(0.000000001),
            ActionParameter::number("count", "Number of shares (1-100)", true)
                .with_min(MIN_SHARES as f64)
                .with_max(MAX_SHARES as f64),
            ActionParameter::number("duration", "Hours until expiry (1-168)", true)
                .with_min(MIN_DURATION_HOURS as f64)
                .with_max(MAX_DURATION_HOURS as f64),
            ActionParameter::textarea("message", "Greeting", false)
                .with_pattern("^[\\s\\S]{0,100}$", "At most 100 characters"),
            ActionParameter::radio(
                "is_random",
                "Split",
                vec![
                    ActionParameterOption::new("Random amounts", "true").selected(),
                    ActionParameterOption::new("Equal amounts", "false"),
                ],
            ),
        ])]);

        Ok(resp)
    }

    async fn execute(
        &self,
        ctx: &AppState,
        account: Pubkey,
        params: HashMap<String, String>,
    ) -> Result<ActionPostResponse, AppError> {
        let mut flow = CreateFlow::new(CreatePacketForm::from_params(&params));
        let request = flow.submit()?;

        let prepared = ctx.writer.create_packet(&account, &request).await?;
        let id = prepared.packet_id;
        let transaction = serialize_tx(&prepared.transaction)?;

        tracing::info!(
            "Prepared create for packet #{id}: {} lamports, {} shares, {}s, random={}",
            request.lamports,
            request.count,
            request.duration_seconds,
            request.is_random
        );

        let mut message = format!(
            "Lucky packet #{id}: {} SOL in {} shares",
            format::format_sol(request.lamports, 4),
            request.count
        );
        if let Some(preview) = flow.form.preview() {
            message.push_str(&format!(
                ", {} SOL after the 1% platform fee",
                preview.after_fee_display
            ));
            if let Some(per_share) = preview.per_share_display {
                message.push_str(&format!(" ({per_share} SOL each)"));
            }
        }
        message.push_str(&format!(
            ".\n\nShare this link:\n{}",
            share_link(ctx.base_url(), id)
        ));

        Ok(ActionPostResponse::new(transaction, message)
            .with_next(format!("/api/actions/create/next?{PACKET_PARAM}={id}")))
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
            tracing::info!("Create for packet #{id} not settled: {state:?}");
            return Ok(resp);
        }

        tracing::info!("Packet #{id} created by {account} ({signature})");

        let share = share_link(ctx.base_url(), id);
        let description = format!("Lucky packet #{id} is live. Share it: {share}");
        // Viewer plus packet opens the dashboard on its list view.
        let list = format!(
            "{}/?account={account}&{PACKET_PARAM}={id}",
            ctx.base_url()
        );

        Ok(
            ActionGetResponse::new(ICON_URL, "Lucky packet created!", &description, "Created")
                .with_links(vec![
                    LinkedAction::external(list, "My lucky packets"),
                    LinkedAction::external(share, "Open share link"),
                ])
                .completed(),
        )
    }
}
