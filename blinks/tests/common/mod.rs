#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use luckypacket_blinks::config::Config;
use luckypacket_blinks::contract::{PacketReader, PacketWriter, Prepared};
use luckypacket_blinks::error::AppError;
use luckypacket_blinks::form::CreatePacketRequest;
use luckypacket_blinks::format;
use luckypacket_blinks::packet::{ClaimRecord, Packet, PacketStatus};
use luckypacket_blinks::router::build_router;
use luckypacket_blinks::state::AppState;
use luckypacket_blinks::tx::TxState;

pub const BASE_URL: &str = "https://luckypacket.app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(Pubkey, CreatePacketRequest),
    Claim(Pubkey, u64),
    Refund(Pubkey, u64),
}

/// In-memory program: serves reads from maps and records every write.
pub struct MockContract {
    pub packets: Mutex<HashMap<u64, Packet>>,
    pub claims: Mutex<HashMap<u64, Vec<ClaimRecord>>>,
    pub created: Mutex<HashMap<Pubkey, Vec<u64>>>,
    pub claimed: Mutex<HashMap<Pubkey, Vec<u64>>>,
    pub counter: AtomicU64,
    pub tx_state: Mutex<TxState>,
    pub fail_reads: AtomicBool,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for MockContract {
    fn default() -> Self {
        Self {
            packets: Mutex::default(),
            claims: Mutex::default(),
            created: Mutex::default(),
            claimed: Mutex::default(),
            counter: AtomicU64::new(1),
            tx_state: Mutex::new(TxState::Pending),
            fail_reads: AtomicBool::new(false),
            calls: Mutex::default(),
        }
    }
}

impl MockContract {
    pub fn insert(&self, packet: Packet) {
        self.created
            .lock()
            .unwrap()
            .entry(packet.creator)
            .or_default()
            .push(packet.id);
        self.packets.lock().unwrap().insert(packet.id, packet);
    }

    /// Apply a claim the way the program would once the transaction lands.
    pub fn settle_claim(&self, id: u64, claimer: Pubkey, amount: u64) {
        let mut packets = self.packets.lock().unwrap();
        let packet = packets.get_mut(&id).unwrap();
        packet.remaining_amount -= amount;
        packet.remaining_count -= 1;
        if packet.remaining_count == 0 {
            packet.status = PacketStatus::Completed;
        }
        self.claims.lock().unwrap().entry(id).or_default().push(ClaimRecord {
            claimer,
            amount,
            timestamp: format::now_unix(),
        });
        self.claimed.lock().unwrap().entry(claimer).or_default().push(id);
        self.set_tx(TxState::Confirmed);
    }

    pub fn set_tx(&self, state: TxState) {
        *self.tx_state.lock().unwrap() = state;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Decode("node unavailable".into()));
        }
        Ok(())
    }

    fn prepared(&self, payer: &Pubkey, packet_id: u64) -> Prepared {
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &packet_id.to_le_bytes(),
            vec![AccountMeta::new(*payer, true)],
        );
        Prepared {
            transaction: Transaction::new_unsigned(Message::new(&[ix], Some(payer))),
            packet_id,
        }
    }
}

#[async_trait]
impl PacketReader for MockContract {
    async fn packet_id_counter(&self) -> Result<u64, AppError> {
        self.check()?;
        Ok(self.counter.load(Ordering::SeqCst))
    }

    async fn get_packet(&self, id: u64) -> Result<Packet, AppError> {
        self.check()?;
        self.packets
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Lucky packet #{id} not found on chain")))
    }

    async fn get_packets(&self, ids: &[u64]) -> Result<Vec<Option<Packet>>, AppError> {
        self.check()?;
        let packets = self.packets.lock().unwrap();
        Ok(ids.iter().map(|id| packets.get(id).cloned()).collect())
    }

    async fn get_claim_records(&self, id: u64) -> Result<Vec<ClaimRecord>, AppError> {
        self.check()?;
        Ok(self.claims.lock().unwrap().get(&id).cloned().unwrap_or_default())
    }

    async fn get_user_created_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError> {
        self.check()?;
        Ok(self.created.lock().unwrap().get(user).cloned().unwrap_or_default())
    }

    async fn get_user_claimed_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError> {
        self.check()?;
        Ok(self.claimed.lock().unwrap().get(user).cloned().unwrap_or_default())
    }

    async fn has_user_claimed(&self, id: u64, user: &Pubkey) -> Result<bool, AppError> {
        self.check()?;
        Ok(self
            .claimed
            .lock()
            .unwrap()
            .get(user)
            .is_some_and(|ids| ids.contains(&id)))
    }

    async fn active_packets_count(&self) -> Result<u64, AppError> {
        self.check()?;
        Ok(self
            .packets
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == PacketStatus::Active)
            .count() as u64)
    }

    async fn platform_fee_rate(&self) -> Result<u16, AppError> {
        self.check()?;
        Ok(100)
    }
}

#[async_trait]
impl PacketWriter for MockContract {
    async fn create_packet(
        &self,
        creator: &Pubkey,
        request: &CreatePacketRequest,
    ) -> Result<Prepared, AppError> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(*creator, request.clone()));
        Ok(self.prepared(creator, id))
    }

    async fn claim_packet(&self, claimer: &Pubkey, id: u64) -> Result<Prepared, AppError> {
        self.calls.lock().unwrap().push(Call::Claim(*claimer, id));
        Ok(self.prepared(claimer, id))
    }

    async fn refund_packet(&self, creator: &Pubkey, id: u64) -> Result<Prepared, AppError> {
        self.calls.lock().unwrap().push(Call::Refund(*creator, id));
        Ok(self.prepared(creator, id))
    }

    async fn transaction_status(&self, _signature: &Signature) -> Result<TxState, AppError> {
        Ok(self.tx_state.lock().unwrap().clone())
    }
}

pub fn packet(id: u64, creator: Pubkey, expires_in: i64) -> Packet {
    let now = format::now_unix();
    Packet {
        id,
        creator,
        total_amount: 1_000_000_000,
        remaining_amount: 1_000_000_000,
        total_count: 4,
        remaining_count: 4,
        created_at: now - 60,
        expires_at: now + expires_in,
        message: "Good fortune".into(),
        status: PacketStatus::Active,
        is_random: true,
    }
}

pub fn config(program_id: Option<Pubkey>) -> Config {
    let program_id = program_id.map(|p| p.to_string());
    Config::from_lookup(|key| match key {
        "BASE_URL" => Some(BASE_URL.to_string()),
        "LUCKY_PACKET_PROGRAM_ID" => program_id.clone(),
        _ => None,
    })
    .unwrap()
}

pub fn app(mock: Arc<MockContract>) -> Router {
    build_router(AppState::with_contract(config(Some(Pubkey::new_unique())), mock))
}

pub fn unconfigured_app(mock: Arc<MockContract>) -> Router {
    build_router(AppState::with_contract(config(None), mock))
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> (u16, Value) {
    let res = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    read(res).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (u16, Value) {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    read(send(app, req).await).await
}

pub async fn read(res: Response<Body>) -> (u16, Value) {
    let status = res.status().as_u16();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn signature() -> String {
    Signature::from([7u8; 64]).to_string()
}
