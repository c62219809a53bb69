use solana_sdk::pubkey::Pubkey;

use crate::consts::*;
use crate::error::AppError;
use crate::form::CreatePacketRequest;
use crate::packet::{ClaimRecord, Packet, PacketStatus};

// ============================================================
// PDA derivation
// ============================================================

pub fn find_state_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STATE_SEED], program_id)
}

pub fn find_packet_pda(program_id: &Pubkey, id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PACKET_SEED, &id.to_le_bytes()], program_id)
}

pub fn find_vault_pda(program_id: &Pubkey, id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, &id.to_le_bytes()], program_id)
}

pub fn find_user_index_pda(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_SEED, owner.as_ref()], program_id)
}

// ============================================================
// Instruction data builders
// ============================================================

/// Build create instruction data.
/// Layout: [disc=0][count:u32][duration_seconds:u64][is_random:u8][lamports:u64]
///         [message_len:u16][message:u8*len]
pub fn build_create_data(request: &CreatePacketRequest) -> Vec<u8> {
    let message = request.message.as_bytes();
    let mut data = Vec::with_capacity(24 + message.len());

    data.push(IX_CREATE);
    data.extend_from_slice(&request.count.to_le_bytes());
    data.extend_from_slice(&request.duration_seconds.to_le_bytes());
    data.push(request.is_random as u8);
    data.extend_from_slice(&request.lamports.to_le_bytes());
    data.extend_from_slice(&(message.len() as u16).to_le_bytes());
    data.extend_from_slice(message);

    data
}

/// Build claim instruction data: [disc=1][id:u64]
pub fn build_claim_data(id: u64) -> Vec<u8> {
    let mut data = vec![IX_CLAIM];
    data.extend_from_slice(&id.to_le_bytes());
    data
}

/// Build refund instruction data: [disc=2][id:u64]
pub fn build_refund_data(id: u64) -> Vec<u8> {
    let mut data = vec![IX_REFUND];
    data.extend_from_slice(&id.to_le_bytes());
    data
}

// ============================================================
// Account deserialization
// ============================================================

// Program state account (83 bytes, discriminator=1)
// 0       discriminator        u8      1
// 1       authority            [u8;32] 32
// 33      packet_id_counter    u64     8
// 41      active_packets       u64     8
// 49      platform_fee_rate    u16     2   basis points
// 51      treasury             [u8;32] 32
pub const STATE_SIZE: usize = 83;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramState {
    pub authority: Pubkey,
    pub packet_id_counter: u64,
    pub active_packets: u64,
    pub platform_fee_rate: u16,
    pub treasury: Pubkey,
}

// Packet account (491 + 48*claims bytes, discriminator=2)
// 0       discriminator        u8      1
// 1       creator              [u8;32] 32
// 33      id                   u64     8
// 41      total_amount         u64     8
// 49      remaining_amount     u64     8
// 57      total_count          u32     4
// 61      remaining_count      u32     4
// 65      created_at           i64     8
// 73      expires_at           i64     8
// 81      status               u8      1
// 82      is_random            u8      1
// 83      bump                 u8      1
// 84      vault_bump           u8      1
// 85      message_len          u16     2
// 87      message              [u8;400]
// 487     claim_count          u32     4
// 491     claims               [(claimer, amount:u64, timestamp:i64); claim_count]
const CREATOR_OFFSET: usize = 1;
const ID_OFFSET: usize = 33;
const TOTAL_AMOUNT_OFFSET: usize = 41;
const REMAINING_AMOUNT_OFFSET: usize = 49;
const TOTAL_COUNT_OFFSET: usize = 57;
const REMAINING_COUNT_OFFSET: usize = 61;
const CREATED_AT_OFFSET: usize = 65;
const EXPIRES_AT_OFFSET: usize = 73;
const STATUS_OFFSET: usize = 81;
const IS_RANDOM_OFFSET: usize = 82;
const MESSAGE_LEN_OFFSET: usize = 85;
const MESSAGE_OFFSET: usize = 87;
pub const MESSAGE_CAPACITY: usize = 400;
const CLAIM_COUNT_OFFSET: usize = 487;
pub const PACKET_BASE_SIZE: usize = 491;
pub const CLAIM_RECORD_SIZE: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketAccount {
    pub packet: Packet,
    pub claims: Vec<ClaimRecord>,
}

impl PacketAccount {
    pub fn has_claimed(&self, user: &Pubkey) -> bool {
        self.claims.iter().any(|c| c.claimer == *user)
    }
}

// User index account (41 + 8*(created+claimed) bytes, discriminator=3)
// 0       discriminator        u8      1
// 1       owner                [u8;32] 32
// 33      created_len          u32     4
// 37      claimed_len          u32     4
// 41      created ids          [u64; created_len]
// ..      claimed ids          [u64; claimed_len]
const USER_INDEX_BASE_SIZE: usize = 41;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIndex {
    pub created: Vec<u64>,
    pub claimed: Vec<u64>,
}

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], AppError> {
    data.get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| AppError::Decode(format!("account data truncated at offset {offset}")))
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, AppError> {
    read_array(data, offset).map(u16::from_le_bytes)
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, AppError> {
    read_array(data, offset).map(u32::from_le_bytes)
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, AppError> {
    read_array(data, offset).map(u64::from_le_bytes)
}

fn read_i64(data: &[u8], offset: usize) -> Result<i64, AppError> {
    read_array(data, offset).map(i64::from_le_bytes)
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, AppError> {
    read_array::<32>(data, offset).map(Pubkey::new_from_array)
}

fn check_header(data: &[u8], min_len: usize, discriminator: u8, what: &str) -> Result<(), AppError> {
    if data.len() < min_len {
        return Err(AppError::Decode(format!("{what} data too short")));
    }
    if data[0] != discriminator {
        return Err(AppError::Decode(format!("invalid {what} discriminator")));
    }
    Ok(())
}

pub fn decode_state(data: &[u8]) -> Result<ProgramState, AppError> {
    check_header(data, STATE_SIZE, STATE_DISCRIMINATOR, "program state")?;

    Ok(ProgramState {
        authority: read_pubkey(data, 1)?,
        packet_id_counter: read_u64(data, 33)?,
        active_packets: read_u64(data, 41)?,
        platform_fee_rate: read_u16(data, 49)?,
        treasury: read_pubkey(data, 51)?,
    })
}

pub fn decode_packet(data: &[u8]) -> Result<PacketAccount, AppError> {
    check_header(data, PACKET_BASE_SIZE, PACKET_DISCRIMINATOR, "packet")?;

    let message_len = read_u16(data, MESSAGE_LEN_OFFSET)? as usize;
    if message_len > MESSAGE_CAPACITY {
        return Err(AppError::Decode("packet message length out of range".into()));
    }
    let message = std::str::from_utf8(&data[MESSAGE_OFFSET..MESSAGE_OFFSET + message_len])
        .map_err(|_| AppError::Decode("packet message is not valid UTF-8".into()))?
        .to_string();

    let packet = Packet {
        id: read_u64(data, ID_OFFSET)?,
        creator: read_pubkey(data, CREATOR_OFFSET)?,
        total_amount: read_u64(data, TOTAL_AMOUNT_OFFSET)?,
        remaining_amount: read_u64(data, REMAINING_AMOUNT_OFFSET)?,
        total_count: read_u32(data, TOTAL_COUNT_OFFSET)?,
        remaining_count: read_u32(data, REMAINING_COUNT_OFFSET)?,
        created_at: read_i64(data, CREATED_AT_OFFSET)?,
        expires_at: read_i64(data, EXPIRES_AT_OFFSET)?,
        message,
        status: PacketStatus::try_from(data[STATUS_OFFSET])?,
        is_random: data[IS_RANDOM_OFFSET] != 0,
    };

    let claim_count = read_u32(data, CLAIM_COUNT_OFFSET)? as usize;
    let mut claims = Vec::with_capacity(claim_count.min(MAX_SHARES as usize));
    for i in 0..claim_count {
        let offset = PACKET_BASE_SIZE + i * CLAIM_RECORD_SIZE;
        claims.push(ClaimRecord {
            claimer: read_pubkey(data, offset)?,
            amount: read_u64(data, offset + 32)?,
            timestamp: read_i64(data, offset + 40)?,
        });
    }

    Ok(PacketAccount { packet, claims })
}

pub fn decode_user_index(data: &[u8]) -> Result<UserIndex, AppError> {
    check_header(data, USER_INDEX_BASE_SIZE, USER_INDEX_DISCRIMINATOR, "user index")?;

    let created_len = read_u32(data, 33)? as usize;
    let claimed_len = read_u32(data, 37)? as usize;

    let read_ids = |start: usize, len: usize| -> Result<Vec<u64>, AppError> {
        (0..len).map(|i| read_u64(data, start + i * 8)).collect()
    };

    let created = read_ids(USER_INDEX_BASE_SIZE, created_len)?;
    let claimed = read_ids(USER_INDEX_BASE_SIZE + created_len * 8, claimed_len)?;

    Ok(UserIndex { created, claimed })
}
