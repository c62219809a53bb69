use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::AppError;
use crate::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PacketStatus {
    Active = 0,
    Completed = 1,
    Refunded = 2,
}

impl TryFrom<u8> for PacketStatus {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PacketStatus::Active),
            1 => Ok(PacketStatus::Completed),
            2 => Ok(PacketStatus::Refunded),
            other => Err(AppError::Decode(format!("unknown packet status {other}"))),
        }
    }
}

/// Snapshot of one packet account. Owned and mutated by the program only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: u64,
    pub creator: Pubkey,
    pub total_amount: u64,
    pub remaining_amount: u64,
    pub total_count: u32,
    pub remaining_count: u32,
    pub created_at: i64,
    pub expires_at: i64,
    pub message: String,
    pub status: PacketStatus,
    pub is_random: bool,
}

impl Packet {
    pub fn is_expired(&self, now: i64) -> bool {
        format::is_packet_expired(self.expires_at, now)
    }

    pub fn is_completed(&self) -> bool {
        format::is_packet_completed(self.status, self.remaining_count)
    }

    /// Still accepting claims from someone.
    pub fn is_open(&self, now: i64) -> bool {
        self.status == PacketStatus::Active && !self.is_expired(now) && !self.is_completed()
    }

    pub fn is_creator(&self, viewer: &Pubkey) -> bool {
        self.creator == *viewer
    }

    /// Claimable by `viewer` at `now`: still open, not yet claimed by them,
    /// and not their own packet.
    pub fn can_claim(&self, viewer: &Pubkey, has_claimed: bool, now: i64) -> bool {
        !self.is_expired(now)
            && !self.is_completed()
            && self.status != PacketStatus::Refunded
            && !has_claimed
            && !self.is_creator(viewer)
    }

    /// Only the creator may reclaim what is left, and only after expiry.
    pub fn can_refund(&self, viewer: &Pubkey, now: i64) -> bool {
        self.is_creator(viewer)
            && self.is_expired(now)
            && self.status == PacketStatus::Active
            && self.remaining_count > 0
    }

    pub fn remaining_percent(&self) -> f64 {
        format::remaining_percent(self.remaining_count, self.total_count)
    }

    /// Lamports the next claimer receives on an equal split.
    pub fn equal_share(&self) -> u64 {
        if self.remaining_count == 0 {
            return 0;
        }
        self.remaining_amount / self.remaining_count as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    pub claimer: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// JSON projection of a [`Packet`].
#[derive(Debug, Clone, Serialize)]
pub struct PacketView {
    pub id: u64,
    pub creator: String,
    pub total_amount: u64,
    pub remaining_amount: u64,
    pub total_count: u32,
    pub remaining_count: u32,
    pub created_at: i64,
    pub expires_at: i64,
    pub message: String,
    pub status: PacketStatus,
    pub is_random: bool,
    pub expired: bool,
    pub completed: bool,
    pub remaining_percent: f64,
}

impl PacketView {
    pub fn new(packet: &Packet, now: i64) -> Self {
        Self {
            id: packet.id,
            creator: packet.creator.to_string(),
            total_amount: packet.total_amount,
            remaining_amount: packet.remaining_amount,
            total_count: packet.total_count,
            remaining_count: packet.remaining_count,
            created_at: packet.created_at,
            expires_at: packet.expires_at,
            message: packet.message.clone(),
            status: packet.status,
            is_random: packet.is_random,
            expired: packet.is_expired(now),
            completed: packet.is_completed(),
            remaining_percent: packet.remaining_percent(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimRecordView {
    pub claimer: String,
    pub amount: u64,
    pub amount_sol: String,
    pub timestamp: i64,
    pub time: String,
}

impl From<&ClaimRecord> for ClaimRecordView {
    fn from(record: &ClaimRecord) -> Self {
        Self {
            claimer: record.claimer.to_string(),
            amount: record.amount,
            amount_sol: format::format_sol(record.amount, 4),
            timestamp: record.timestamp,
            time: format::format_time(record.timestamp),
        }
    }
}
