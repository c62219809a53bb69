use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::consts::*;
use crate::error::AppError;

/// The one network this deployment talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
    Testnet,
}

impl Cluster {
    pub fn blockchain_id(&self) -> &'static str {
        match self {
            Cluster::Mainnet => BLOCKCHAIN_ID_MAINNET,
            Cluster::Devnet => BLOCKCHAIN_ID_DEVNET,
            Cluster::Testnet => BLOCKCHAIN_ID_TESTNET,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "mainnet",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
        }
    }
}

impl FromStr for Cluster {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            other => Err(AppError::Config(format!("unknown cluster '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub host: String,
    pub port: String,
    pub base_url: String,
    pub cluster: Cluster,
    pub program_id: Pubkey,
    pub wallet_project_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.into());
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = var("PORT").unwrap_or_else(|| DEFAULT_PORT.into());
        let base_url = var("BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();
        let cluster = var("CLUSTER")
            .as_deref()
            .unwrap_or(DEFAULT_CLUSTER)
            .parse()?;
        let program_id = match var("LUCKY_PACKET_PROGRAM_ID") {
            Some(id) => id
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("invalid LUCKY_PACKET_PROGRAM_ID '{id}'")))?,
            None => Pubkey::default(),
        };
        let wallet_project_id = var("WALLET_CONNECT_PROJECT_ID");

        Ok(Self {
            rpc_url,
            host,
            port,
            base_url,
            cluster,
            program_id,
            wallet_project_id,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// False while the program address is still the all-zero placeholder.
    pub fn is_configured(&self) -> bool {
        self.program_id != Pubkey::default()
    }
}

/// What a front end needs to know before connecting a wallet.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub configured: bool,
    pub program_id: String,
    pub cluster: Cluster,
    pub blockchain_id: &'static str,
    pub wallet_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl From<&Config> for ConfigView {
    fn from(config: &Config) -> Self {
        Self {
            configured: config.is_configured(),
            program_id: config.program_id.to_string(),
            cluster: config.cluster,
            blockchain_id: config.cluster.blockchain_id(),
            wallet_project_id: config.wallet_project_id.clone(),
            notice: (!config.is_configured()).then_some(NOT_CONFIGURED_NOTICE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_unconfigured_devnet() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.base_url, "http://0.0.0.0:3001");
        assert_eq!(config.cluster, Cluster::Devnet);
        assert!(!config.is_configured());
        assert!(ConfigView::from(&config).notice.is_some());
    }

    #[test]
    fn all_zero_program_id_is_unconfigured() {
        let config = Config::from_lookup(lookup(&[(
            "LUCKY_PACKET_PROGRAM_ID",
            "11111111111111111111111111111111",
        )]))
        .unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn reads_overrides() {
        let program = Pubkey::new_unique();
        let config = Config::from_lookup(lookup(&[
            ("LUCKY_PACKET_PROGRAM_ID", &program.to_string()),
            ("BASE_URL", "https://luckypacket.app/"),
            ("CLUSTER", "mainnet-beta"),
            ("WALLET_CONNECT_PROJECT_ID", "abc123"),
        ]))
        .unwrap();
        assert!(config.is_configured());
        assert_eq!(config.program_id, program);
        assert_eq!(config.base_url, "https://luckypacket.app");
        assert_eq!(config.cluster.blockchain_id(), BLOCKCHAIN_ID_MAINNET);
        assert_eq!(config.wallet_project_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Config::from_lookup(lookup(&[("LUCKY_PACKET_PROGRAM_ID", "0xnope")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CLUSTER", "localnet-9")])).is_err());
    }
}
