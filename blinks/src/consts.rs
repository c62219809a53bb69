pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3001";
pub const DEFAULT_CLUSTER: &str = "devnet";

/// Query parameter carrying the packet id in share links
pub const PACKET_PARAM: &str = "packet";

/// PDA seeds
pub const STATE_SEED: &[u8] = b"state";
pub const PACKET_SEED: &[u8] = b"packet";
pub const VAULT_SEED: &[u8] = b"vault";
pub const USER_SEED: &[u8] = b"user";

/// Account discriminators
pub const STATE_DISCRIMINATOR: u8 = 1;
pub const PACKET_DISCRIMINATOR: u8 = 2;
pub const USER_INDEX_DISCRIMINATOR: u8 = 3;

/// Instruction discriminators
pub const IX_CREATE: u8 = 0;
pub const IX_CLAIM: u8 = 1;
pub const IX_REFUND: u8 = 2;

/// Creation limits
pub const MIN_SHARES: u32 = 1;
pub const MAX_SHARES: u32 = 100;
pub const MIN_DURATION_HOURS: u64 = 1;
pub const MAX_DURATION_HOURS: u64 = 168;
pub const MAX_MESSAGE_CHARS: usize = 100;
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Form defaults
pub const DEFAULT_SHARES: &str = "5";
pub const DEFAULT_DURATION_HOURS: &str = "24";

/// Fee shown in the creation preview: 1% = 100 basis points
pub const PREVIEW_FEE_BPS: u64 = 100;
pub const FEE_DENOMINATOR: u64 = 10_000;

/// `getMultipleAccounts` accepts at most this many keys per call
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// The recent view scans this many of the newest packet ids
pub const RECENT_PACKETS_SCAN: u64 = 20;

/// Icon URL for blink cards
pub const ICON_URL: &str = "https://luckypacket.app/lucky-packet-icon.svg";

/// Solana Actions spec version advertised in `X-Action-Version`
pub const ACTION_VERSION: &str = "2.4";

/// CAIP-2 chain ids advertised in `X-Blockchain-Ids`
pub const BLOCKCHAIN_ID_MAINNET: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";
pub const BLOCKCHAIN_ID_DEVNET: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";
pub const BLOCKCHAIN_ID_TESTNET: &str = "solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z";

pub const NOT_CONFIGURED_NOTICE: &str =
    "Lucky packet program address is not configured yet. Set LUCKY_PACKET_PROGRAM_ID and restart.";
