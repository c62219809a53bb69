//! Claim card: everything one packet tile shows and whether its claim
//! control is live for the current viewer.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::consts::PACKET_PARAM;
use crate::format;
use crate::packet::{Packet, PacketStatus, PacketView};
use crate::tx::TxState;

const SHARE_INTENT_URL: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimRejection {
    #[error("This lucky packet has been fully claimed")]
    Completed,

    #[error("This lucky packet has been refunded")]
    Refunded,

    #[error("This lucky packet has expired")]
    Expired,

    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("You have already claimed this lucky packet")]
    AlreadyClaimed,

    #[error("You cannot claim a lucky packet you created")]
    OwnPacket,

    #[error("A claim for this lucky packet is already pending")]
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Completed,
    Expired,
    Active,
    Random,
    Fixed,
}

pub struct ClaimCard<'a> {
    packet: &'a Packet,
    viewer: Option<Pubkey>,
    has_claimed: bool,
    state: TxState,
    now: i64,
}

impl<'a> ClaimCard<'a> {
    pub fn new(packet: &'a Packet, viewer: Option<Pubkey>, has_claimed: bool, now: i64) -> Self {
        Self {
            packet,
            viewer,
            has_claimed,
            state: TxState::Idle,
            now,
        }
    }

    pub fn with_state(mut self, state: TxState) -> Self {
        self.state = state;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.packet.is_expired(self.now)
    }

    pub fn is_completed(&self) -> bool {
        self.packet.is_completed()
    }

    fn is_refunded(&self) -> bool {
        self.packet.status == PacketStatus::Refunded
    }

    fn is_own(&self) -> bool {
        self.viewer.is_some_and(|v| self.packet.is_creator(&v))
    }

    pub fn badges(&self) -> Vec<Badge> {
        let state = if self.is_completed() {
            Badge::Completed
        } else if self.is_expired() {
            Badge::Expired
        } else {
            Badge::Active
        };
        let split = if self.packet.is_random {
            Badge::Random
        } else {
            Badge::Fixed
        };
        vec![state, split]
    }

    pub fn can_claim(&self) -> bool {
        self.viewer
            .is_some_and(|v| self.packet.can_claim(&v, self.has_claimed, self.now))
    }

    /// Same conditions as [`can_claim`](Self::can_claim), reported as the
    /// first reason that blocks the request.
    pub fn guard(&self) -> Result<Pubkey, ClaimRejection> {
        if self.is_completed() {
            return Err(ClaimRejection::Completed);
        }
        if self.is_refunded() {
            return Err(ClaimRejection::Refunded);
        }
        if self.is_expired() {
            return Err(ClaimRejection::Expired);
        }
        let viewer = self.viewer.ok_or(ClaimRejection::NotConnected)?;
        if self.has_claimed {
            return Err(ClaimRejection::AlreadyClaimed);
        }
        if self.is_own() {
            return Err(ClaimRejection::OwnPacket);
        }
        if self.state.is_pending() {
            return Err(ClaimRejection::Pending);
        }
        Ok(viewer)
    }

    pub fn button_enabled(&self) -> bool {
        self.can_claim() && !self.state.is_pending()
    }

    pub fn button_label(&self) -> &'static str {
        if self.state.is_pending() {
            "Claiming..."
        } else if self.has_claimed {
            "Claimed"
        } else if self.is_completed() {
            "All claimed"
        } else if self.is_refunded() {
            "Refunded"
        } else if self.is_expired() {
            "Expired"
        } else if self.viewer.is_none() {
            "Connect wallet"
        } else if self.is_own() {
            "Cannot claim your own packet"
        } else {
            "Claim now"
        }
    }

    /// Creators can always share; everyone else only while the packet is open.
    pub fn shows_share(&self) -> bool {
        self.is_own() || (!self.is_expired() && !self.is_completed())
    }

    pub fn share_link(&self, base_url: &str) -> String {
        share_link(base_url, self.packet.id)
    }

    pub fn share_intent_url(&self, base_url: &str) -> String {
        let text = if self.packet.message.is_empty() {
            "🧧 Someone sent you an on-chain lucky packet, come claim it!".to_string()
        } else {
            format!("🧧 {} - come claim your lucky packet!", self.packet.message)
        };
        let link = self.share_link(base_url);
        let query = serde_urlencoded::to_string([("text", text.as_str()), ("url", link.as_str())])
            .unwrap_or_default();
        format!("{SHARE_INTENT_URL}?{query}")
    }

    pub fn view(&self, base_url: &str) -> CardView {
        let packet = self.packet;
        let shows_share = self.shows_share();
        CardView {
            packet: PacketView::new(packet, self.now),
            badges: self.badges(),
            has_claimed: self.has_claimed,
            can_claim: self.can_claim(),
            button_label: self.button_label(),
            button_enabled: self.button_enabled(),
            total_sol: format::format_sol_precision(packet.total_amount, 4),
            remaining_sol: format::format_sol_precision(packet.remaining_amount, 4),
            shares: format!("{}/{}", packet.remaining_count, packet.total_count),
            remaining_percent: format!("{:.0}%", packet.remaining_percent()),
            created: format::format_time(packet.created_at),
            time_remaining: format::time_remaining(packet.expires_at, self.now),
            creator_short: format::short_address(&packet.creator),
            share_link: shows_share.then(|| self.share_link(base_url)),
            share_intent_url: shows_share.then(|| self.share_intent_url(base_url)),
        }
    }
}

pub fn share_link(base_url: &str, id: u64) -> String {
    format!("{}/?{PACKET_PARAM}={id}", base_url.trim_end_matches('/'))
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub packet: PacketView,
    pub badges: Vec<Badge>,
    pub has_claimed: bool,
    pub can_claim: bool,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub total_sol: String,
    pub remaining_sol: String,
    pub shares: String,
    pub remaining_percent: String,
    pub created: String,
    pub time_remaining: String,
    pub creator_short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_intent_url: Option<String>,
}
