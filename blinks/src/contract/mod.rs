//! Access to the lucky packet program.
//!
//! Reads and writes are split into two capability traits so a service can
//! be handed one without the other. Implementations are thin pass-throughs:
//! no retries, no caching.

mod rpc;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::error::AppError;
use crate::form::CreatePacketRequest;
use crate::packet::{ClaimRecord, Packet};
use crate::tx::TxState;

pub use rpc::RpcContract;

#[async_trait]
pub trait PacketReader: Send + Sync {
    /// Id the program will assign to the next packet.
    async fn packet_id_counter(&self) -> Result<u64, AppError>;

    async fn get_packet(&self, id: u64) -> Result<Packet, AppError>;

    /// Batch read; the result lines up with `ids`, `None` where no packet exists.
    async fn get_packets(&self, ids: &[u64]) -> Result<Vec<Option<Packet>>, AppError>;

    async fn get_claim_records(&self, id: u64) -> Result<Vec<ClaimRecord>, AppError>;

    async fn get_user_created_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError>;

    async fn get_user_claimed_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError>;

    async fn has_user_claimed(&self, id: u64, user: &Pubkey) -> Result<bool, AppError>;

    async fn active_packets_count(&self) -> Result<u64, AppError>;

    /// Platform fee in basis points.
    async fn platform_fee_rate(&self) -> Result<u16, AppError>;
}

/// An unsigned transaction ready for the wallet, plus the packet it targets.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub transaction: Transaction,
    pub packet_id: u64,
}

#[async_trait]
pub trait PacketWriter: Send + Sync {
    async fn create_packet(
        &self,
        creator: &Pubkey,
        request: &CreatePacketRequest,
    ) -> Result<Prepared, AppError>;

    async fn claim_packet(&self, claimer: &Pubkey, id: u64) -> Result<Prepared, AppError>;

    async fn refund_packet(&self, creator: &Pubkey, id: u64) -> Result<Prepared, AppError>;

    /// Pending, Confirmed or Failed as last seen by the node. Never Idle.
    async fn transaction_status(&self, signature: &Signature) -> Result<TxState, AppError>;
}
