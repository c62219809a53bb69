use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;

use super::{PacketReader, PacketWriter, Prepared};
use crate::consts::MAX_MULTIPLE_ACCOUNTS;
use crate::error::AppError;
use crate::form::CreatePacketRequest;
use crate::packet::{ClaimRecord, Packet};
use crate::program::{self, PacketAccount, ProgramState, UserIndex};
use crate::tx::TxState;

/// Account data, provided the lucky packet program owns the account.
fn owned_data(program_id: &Pubkey, account: Account) -> Result<Vec<u8>, AppError> {
    if account.owner != *program_id {
        return Err(AppError::Decode("account is not owned by the lucky packet program".into()));
    }
    Ok(account.data)
}

/// One entry of a batch read. Foreign or undecodable accounts are logged
/// and read as missing so the rest of the batch survives.
fn batch_entry(program_id: &Pubkey, id: u64, account: Option<Account>) -> Option<Packet> {
    let decoded = account
        .map(|a| owned_data(program_id, a).and_then(|data| program::decode_packet(&data)))
        .transpose();
    match decoded {
        Ok(account) => account.map(|a| a.packet),
        Err(e) => {
            tracing::warn!("Skipping lucky packet #{id}: {e}");
            None
        }
    }
}

/// Settle a signature status the cluster has reported.
fn settled_state(err: Option<String>, satisfies_commitment: bool) -> TxState {
    match err {
        Some(err) => TxState::Failed(err),
        None if satisfies_commitment => TxState::Confirmed,
        None => TxState::Pending,
    }
}

/// Lucky packet program accessed over JSON-RPC.
pub struct RpcContract {
    rpc: Arc<RpcClient>,
    program_id: Pubkey,
}

impl RpcContract {
    pub fn new(rpc: Arc<RpcClient>, program_id: Pubkey) -> Self {
        Self { rpc, program_id }
    }

    /// The all-zero address stands for "not deployed yet".
    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.program_id == Pubkey::default() {
            return Err(AppError::NotConfigured);
        }
        Ok(())
    }

    async fn fetch(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, AppError> {
        self.ensure_configured()?;
        let account = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?
            .value;
        account.map(|a| owned_data(&self.program_id, a)).transpose()
    }

    async fn fetch_state(&self) -> Result<ProgramState, AppError> {
        let (state_addr, _) = program::find_state_pda(&self.program_id);
        let data = self
            .fetch(&state_addr)
            .await?
            .ok_or_else(|| AppError::NotFound("Lucky packet program state not found".into()))?;
        program::decode_state(&data)
    }

    async fn fetch_packet(&self, id: u64) -> Result<PacketAccount, AppError> {
        let (packet_addr, _) = program::find_packet_pda(&self.program_id, id);
        let data = self
            .fetch(&packet_addr)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lucky packet #{id} not found on chain")))?;
        program::decode_packet(&data)
    }

    /// Users without an index account simply have no packets yet.
    async fn fetch_user_index(&self, user: &Pubkey) -> Result<UserIndex, AppError> {
        let (index_addr, _) = program::find_user_index_pda(&self.program_id, user);
        match self.fetch(&index_addr).await? {
            Some(data) => program::decode_user_index(&data),
            None => Ok(UserIndex::default()),
        }
    }

    async fn unsigned(&self, payer: &Pubkey, ix: Instruction) -> Result<Transaction, AppError> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let msg = Message::new_with_blockhash(&[ix], Some(payer), &blockhash);
        Ok(Transaction::new_unsigned(msg))
    }
}

#[async_trait]
impl PacketReader for RpcContract {
    async fn packet_id_counter(&self) -> Result<u64, AppError> {
        Ok(self.fetch_state().await?.packet_id_counter)
    }

    async fn get_packet(&self, id: u64) -> Result<Packet, AppError> {
        Ok(self.fetch_packet(id).await?.packet)
    }

    async fn get_packets(&self, ids: &[u64]) -> Result<Vec<Option<Packet>>, AppError> {
        self.ensure_configured()?;
        let mut packets = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let addresses: Vec<Pubkey> = chunk
                .iter()
                .map(|id| program::find_packet_pda(&self.program_id, *id).0)
                .collect();
            let accounts = self.rpc.get_multiple_accounts(&addresses).await?;

            packets.extend(
                chunk
                    .iter()
                    .zip(accounts)
                    .map(|(id, account)| batch_entry(&self.program_id, *id, account)),
            );
        }

        Ok(packets)
    }

    async fn get_claim_records(&self, id: u64) -> Result<Vec<ClaimRecord>, AppError> {
        Ok(self.fetch_packet(id).await?.claims)
    }

    async fn get_user_created_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError> {
        Ok(self.fetch_user_index(user).await?.created)
    }

    async fn get_user_claimed_packets(&self, user: &Pubkey) -> Result<Vec<u64>, AppError> {
        Ok(self.fetch_user_index(user).await?.claimed)
    }

    async fn has_user_claimed(&self, id: u64, user: &Pubkey) -> Result<bool, AppError> {
        Ok(self.fetch_packet(id).await?.has_claimed(user))
    }

    async fn active_packets_count(&self) -> Result<u64, AppError> {
        Ok(self.fetch_state().await?.active_packets)
    }

    async fn platform_fee_rate(&self) -> Result<u16, AppError> {
        Ok(self.fetch_state().await?.platform_fee_rate)
    }
}

#[async_trait]
impl PacketWriter for RpcContract {
    async fn create_packet(
        &self,
        creator: &Pubkey,
        request: &CreatePacketRequest,
    ) -> Result<Prepared, AppError> {
        let state = self.fetch_state().await?;
        let id = state.packet_id_counter;

        let (state_addr, _) = program::find_state_pda(&self.program_id);
        let (packet_addr, _) = program::find_packet_pda(&self.program_id, id);
        let (vault_addr, _) = program::find_vault_pda(&self.program_id, id);
        let (index_addr, _) = program::find_user_index_pda(&self.program_id, creator);

        // creator, state, packet, vault, creator index, treasury, system_program (7)
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*creator, true),
                AccountMeta::new(state_addr, false),
                AccountMeta::new(packet_addr, false),
                AccountMeta::new(vault_addr, false),
                AccountMeta::new(index_addr, false),
                AccountMeta::new(state.treasury, false),
                AccountMeta::new_readonly(solana_sdk::system_program::id(), false),
            ],
            data: program::build_create_data(request),
        };

        Ok(Prepared {
            transaction: self.unsigned(creator, ix).await?,
            packet_id: id,
        })
    }

    async fn claim_packet(&self, claimer: &Pubkey, id: u64) -> Result<Prepared, AppError> {
        self.ensure_configured()?;
        let (state_addr, _) = program::find_state_pda(&self.program_id);
        let (packet_addr, _) = program::find_packet_pda(&self.program_id, id);
        let (vault_addr, _) = program::find_vault_pda(&self.program_id, id);
        let (index_addr, _) = program::find_user_index_pda(&self.program_id, claimer);

        // claimer, state, packet, vault, claimer index, system_program (6)
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*claimer, true),
                AccountMeta::new(state_addr, false),
                AccountMeta::new(packet_addr, false),
                AccountMeta::new(vault_addr, false),
                AccountMeta::new(index_addr, false),
                AccountMeta::new_readonly(solana_sdk::system_program::id(), false),
            ],
            data: program::build_claim_data(id),
        };

        Ok(Prepared {
            transaction: self.unsigned(claimer, ix).await?,
            packet_id: id,
        })
    }

    async fn refund_packet(&self, creator: &Pubkey, id: u64) -> Result<Prepared, AppError> {
        self.ensure_configured()?;
        let (state_addr, _) = program::find_state_pda(&self.program_id);
        let (packet_addr, _) = program::find_packet_pda(&self.program_id, id);
        let (vault_addr, _) = program::find_vault_pda(&self.program_id, id);

        // creator, state, packet, vault (4)
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*creator, true),
                AccountMeta::new(state_addr, false),
                AccountMeta::new(packet_addr, false),
                AccountMeta::new(vault_addr, false),
            ],
            data: program::build_refund_data(id),
        };

        Ok(Prepared {
            transaction: self.unsigned(creator, ix).await?,
            packet_id: id,
        })
    }

    async fn transaction_status(&self, signature: &Signature) -> Result<TxState, AppError> {
        let statuses = self.rpc.get_signature_statuses(&[*signature]).await?.value;

        let state = match statuses.into_iter().next().flatten() {
            None => TxState::Pending,
            Some(status) => settled_state(
                status.err.as_ref().map(|e| e.to_string()),
                status.satisfies_commitment(self.rpc.commitment()),
            ),
        };
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::tests::sample_packet;
    use crate::program::tests::encode_packet;

    fn account(owner: Pubkey, data: Vec<u8>) -> Account {
        Account {
            lamports: 1_000_000,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        }
    }

    #[test]
    fn batch_entry_keeps_only_program_packets() {
        let program_id = Pubkey::new_unique();
        let packet = sample_packet(Pubkey::new_unique());
        let data = encode_packet(&PacketAccount {
            packet: packet.clone(),
            claims: Vec::new(),
        });

        let decoded = batch_entry(&program_id, 7, Some(account(program_id, data.clone())));
        assert_eq!(decoded, Some(packet));

        assert_eq!(batch_entry(&program_id, 7, None), None);
        assert_eq!(batch_entry(&program_id, 7, Some(account(Pubkey::new_unique(), data))), None);
        assert_eq!(batch_entry(&program_id, 7, Some(account(program_id, vec![2, 0, 1]))), None);
    }

    #[test]
    fn foreign_owner_is_a_decode_error() {
        let program_id = Pubkey::new_unique();
        let err = owned_data(&program_id, account(Pubkey::new_unique(), vec![1])).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert_eq!(owned_data(&program_id, account(program_id, vec![1])).unwrap(), vec![1]);
    }

    #[test]
    fn signature_status_mapping() {
        assert_eq!(settled_state(None, true), TxState::Confirmed);
        assert_eq!(settled_state(None, false), TxState::Pending);
        assert_eq!(
            settled_state(Some("custom program error: 0x1".into()), true),
            TxState::Failed("custom program error: 0x1".into())
        );
        assert_eq!(
            settled_state(Some("insufficient funds".into()), false),
            TxState::Failed("insufficient funds".into())
        );
    }

    #[tokio::test]
    async fn zero_program_id_never_reaches_the_node() {
        let rpc = Arc::new(RpcClient::new("http://127.0.0.1:1".to_string()));
        let contract = RpcContract::new(rpc, Pubkey::default());

        let err = contract.get_packets(&[1, 2]).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured));
        let err = contract.get_packet(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured));
        let err = contract.claim_packet(&Pubkey::new_unique(), 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured));
    }
}
