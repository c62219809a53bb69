//! The packet list: recent open packets, packets the viewer created,
//! packets the viewer claimed, and the single packet a shared link points at.
//!
//! Every refresh re-reads everything and replaces the previous snapshot.
//! A failed read empties the affected view and is logged; it never fails
//! the whole list.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;

use crate::card::{CardView, ClaimCard};
use crate::consts::{NOT_CONFIGURED_NOTICE, RECENT_PACKETS_SCAN};
use crate::contract::PacketReader;
use crate::error::AppError;
use crate::form::View;
use crate::format;
use crate::packet::Packet;

#[derive(Debug, Clone, Default)]
pub struct SharedPacket {
    pub packet: Option<Packet>,
    pub has_claimed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub recent: Vec<Packet>,
    pub created: Vec<Packet>,
    pub claimed: Vec<Packet>,
    pub shared: SharedPacket,
    pub claimed_ids: HashSet<u64>,
}

pub struct PacketList<'a, R: PacketReader + ?Sized> {
    reader: &'a R,
    viewer: Option<Pubkey>,
    shared_id: Option<u64>,
    configured: bool,
    last_trigger: u64,
    snapshot: Snapshot,
}

impl<'a, R: PacketReader + ?Sized> PacketList<'a, R> {
    pub fn new(reader: &'a R, viewer: Option<Pubkey>, shared_id: Option<u64>) -> Self {
        Self {
            reader,
            viewer,
            shared_id,
            configured: true,
            last_trigger: 0,
            snapshot: Snapshot::default(),
        }
    }

    /// Without a program address there is nothing to read; the view shows
    /// the setup notice instead.
    pub fn with_configured(mut self, configured: bool) -> Self {
        self.configured = configured;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Re-issue every read concurrently and replace the snapshot wholesale.
    pub async fn refresh(&mut self) {
        if !self.configured {
            self.snapshot = Snapshot::default();
            return;
        }

        let (recent, created, claimed, shared) = tokio::join!(
            self.load_recent(),
            self.load_created(),
            self.load_claimed(),
            self.load_shared()
        );

        let recent = recent.unwrap_or_else(|e| {
            tracing::warn!("Failed to load recent packets: {e}");
            Vec::new()
        });
        let created = created.unwrap_or_else(|e| {
            tracing::warn!("Failed to load created packets: {e}");
            Vec::new()
        });
        let claimed = claimed.unwrap_or_else(|e| {
            tracing::warn!("Failed to load claimed packets: {e}");
            Vec::new()
        });
        let shared = shared.unwrap_or_else(|e| {
            tracing::warn!("Failed to load shared packet: {e}");
            SharedPacket::default()
        });

        let claimed_ids = claimed.iter().map(|p| p.id).collect();
        self.snapshot = Snapshot {
            recent,
            created,
            claimed,
            shared,
            claimed_ids,
        };
    }

    /// A parent bumps the trigger after a mutation elsewhere; zero and
    /// repeated values are ignored.
    pub async fn set_refresh_trigger(&mut self, trigger: u64) -> bool {
        if trigger == 0 || trigger == self.last_trigger {
            return false;
        }
        self.last_trigger = trigger;
        self.refresh().await;
        true
    }

    async fn load_ids(&self, ids: Vec<u64>) -> Result<Vec<Packet>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let packets = self.reader.get_packets(&ids).await?;
        Ok(packets.into_iter().flatten().collect())
    }

    /// Open packets among the newest ids, newest first.
    async fn load_recent(&self) -> Result<Vec<Packet>, AppError> {
        let next_id = self.reader.packet_id_counter().await?;
        let ids: Vec<u64> = (next_id.saturating_sub(RECENT_PACKETS_SCAN)..next_id)
            .rev()
            .collect();
        let now = format::now_unix();
        let mut packets = self.load_ids(ids).await?;
        packets.retain(|p| p.is_open(now));
        Ok(packets)
    }

    async fn load_created(&self) -> Result<Vec<Packet>, AppError> {
        let Some(viewer) = self.viewer else {
            return Ok(Vec::new());
        };
        let ids = self.reader.get_user_created_packets(&viewer).await?;
        self.load_ids(ids).await
    }

    async fn load_claimed(&self) -> Result<Vec<Packet>, AppError> {
        let Some(viewer) = self.viewer else {
            return Ok(Vec::new());
        };
        let ids = self.reader.get_user_claimed_packets(&viewer).await?;
        self.load_ids(ids).await
    }

    async fn load_shared(&self) -> Result<SharedPacket, AppError> {
        let Some(id) = self.shared_id else {
            return Ok(SharedPacket::default());
        };
        let packet = self.reader.get_packet(id).await?;
        let has_claimed = match self.viewer {
            Some(viewer) => self.reader.has_user_claimed(id, &viewer).await?,
            None => false,
        };
        Ok(SharedPacket {
            packet: Some(packet),
            has_claimed,
        })
    }

    pub fn view(&self, base_url: &str, now: i64) -> DashboardView {
        let snapshot = &self.snapshot;
        let card = |packet: &Packet, has_claimed: bool| {
            ClaimCard::new(packet, self.viewer, has_claimed, now).view(base_url)
        };

        let recent = snapshot
            .recent
            .iter()
            .map(|p| card(p, snapshot.claimed_ids.contains(&p.id)))
            .collect();
        let created = snapshot
            .created
            .iter()
            .map(|p| card(p, snapshot.claimed_ids.contains(&p.id)))
            .collect();
        let claimed = snapshot.claimed.iter().map(|p| card(p, true)).collect();
        let shared = snapshot.shared.packet.as_ref().map(|p| {
            card(
                p,
                snapshot.shared.has_claimed || snapshot.claimed_ids.contains(&p.id),
            )
        });

        // A shared link opens straight on the list once a wallet is connected.
        let active_view = if self.shared_id.is_some() && self.viewer.is_some() {
            View::List
        } else {
            View::Create
        };

        DashboardView {
            viewer: self.viewer.map(|v| v.to_string()),
            active_view,
            recent,
            created,
            claimed,
            shared,
            notice: if !self.configured {
                Some(NOT_CONFIGURED_NOTICE)
            } else {
                self.viewer
                    .is_none()
                    .then_some("Connect a wallet to see your lucky packets")
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub viewer: Option<String>,
    pub active_view: View,
    pub recent: Vec<CardView>,
    pub created: Vec<CardView>,
    pub claimed: Vec<CardView>,
    pub shared: Option<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}
