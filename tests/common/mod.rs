//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, Log, LogData, TxHash, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use betswirl_tools::blockchain::{
    BlockchainError, BlockchainResult, ConfirmationStatus, ContractRead, ContractWrite,
    EvmWalletClient, LogQuery, ReceiptSummary,
};
use betswirl_tools::casino::abi::{BankToken, IBank, ICasinoGame, IERC20};
use betswirl_tools::config::{AppConfig, CasinoChainConfig};

pub const CHAIN_ID: u64 = 137;
pub const GAS_PRICE: u128 = 30_000_000_000;

pub fn wallet_address() -> Address {
    Address::repeat_byte(0x77)
}

pub fn bank() -> Address {
    Address::repeat_byte(0x11)
}

pub fn coin_toss() -> Address {
    Address::repeat_byte(0x22)
}

pub fn dice() -> Address {
    Address::repeat_byte(0x33)
}

pub fn usdc() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn affiliate() -> Address {
    Address::repeat_byte(0x99)
}

/// Config with coin toss and dice (no roulette) deployed on Polygon.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.blockchain.chain_id = CHAIN_ID;
    config.casino.affiliate = affiliate().to_string();
    config.casino.chains.push(CasinoChainConfig {
        chain_id: CHAIN_ID,
        bank: bank().to_string(),
        coin_toss: Some(coin_toss().to_string()),
        dice: Some(dice().to_string()),
        roulette: None,
    });
    config
}

type ReadKey = (Address, [u8; 4]);

/// In-memory wallet with scripted contract reads.
pub struct MockWallet {
    pub chain_id: u64,
    pub gas_price: u128,
    reads: Mutex<HashMap<ReadKey, Result<Bytes, String>>>,
    pub read_calls: Mutex<Vec<ContractRead>>,
    pub sent: Mutex<Vec<ContractWrite>>,
    send_error: Mutex<Option<String>>,
    receipts: Mutex<HashMap<TxHash, ReceiptSummary>>,
    logs: Mutex<Vec<Log>>,
    pub log_queries: Mutex<Vec<LogQuery>>,
    head: Mutex<u64>,
}

impl MockWallet {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            gas_price: GAS_PRICE,
            reads: Mutex::new(HashMap::new()),
            read_calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            send_error: Mutex::new(None),
            receipts: Mutex::new(HashMap::new()),
            logs: Mutex::new(Vec::new()),
            log_queries: Mutex::new(Vec::new()),
            head: Mutex::new(1_010),
        }
    }

    /// Polygon wallet whose bank lists the gas token and USDC, with generous
    /// bet requirements and a VRF cost of `vrf_cost`.
    pub fn casino(vrf_cost: u64) -> Self {
        let wallet = Self::new(CHAIN_ID);
        wallet.set_bank_tokens(vec![
            bank_token(Address::ZERO, "POL", 18, true, false),
            bank_token(usdc(), "USDC", 6, true, false),
            bank_token(Address::repeat_byte(0xbb), "PAUSED", 18, true, true),
        ]);
        wallet.set_bet_requirements(true, U256::MAX, U256::from(100u64));
        for game in [coin_toss(), dice()] {
            wallet.set_read(
                game,
                ICasinoGame::getChainlinkVRFCostCall::SELECTOR,
                Ok(U256::from(vrf_cost).abi_encode().into()),
            );
        }
        wallet
    }

    /// Latest block reported by the node.
    pub fn set_head(&self, block: u64) {
        *self.head.lock().unwrap() = block;
    }

    pub fn set_read(&self, to: Address, selector: [u8; 4], result: Result<Bytes, String>) {
        self.reads.lock().unwrap().insert((to, selector), result);
    }

    pub fn set_bank_tokens(&self, tokens: Vec<BankToken>) {
        self.set_read(
            bank(),
            IBank::getTokensCall::SELECTOR,
            Ok((tokens,).abi_encode_params().into()),
        );
    }

    pub fn set_bet_requirements(&self, allowed: bool, max_amount: U256, max_count: U256) {
        self.set_read(
            bank(),
            IBank::getBetRequirementsCall::SELECTOR,
            Ok((allowed, max_amount, max_count).abi_encode_params().into()),
        );
    }

    pub fn set_allowance(&self, token: Address, allowance: U256) {
        self.set_read(
            token,
            IERC20::allowanceCall::SELECTOR,
            Ok(allowance.abi_encode().into()),
        );
    }

    pub fn fail_sends(&self, message: &str) {
        *self.send_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn add_receipt(&self, hash: TxHash, logs: Vec<Log>) {
        self.receipts.lock().unwrap().insert(
            hash,
            ReceiptSummary {
                tx_hash: hash,
                success: true,
                block_number: Some(1_000),
                logs,
            },
        );
    }

    pub fn add_log(&self, log: Log) {
        self.logs.lock().unwrap().push(log);
    }

    pub fn sent(&self) -> Vec<ContractWrite> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvmWalletClient for MockWallet {
    fn address(&self) -> Address {
        wallet_address()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        Ok(self.gas_price)
    }

    async fn read(&self, call: ContractRead) -> BlockchainResult<Bytes> {
        self.read_calls.lock().unwrap().push(call.clone());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&call.data[..4]);
        match self.reads.lock().unwrap().get(&(call.to, selector)) {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(e)) => Err(BlockchainError::Rpc(e.clone())),
            None => Err(BlockchainError::Rpc(format!("execution reverted: no mock for {}", call.to))),
        }
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        Ok(*self.head.lock().unwrap())
    }

    async fn send_transaction(&self, call: ContractWrite) -> BlockchainResult<TxHash> {
        if let Some(e) = self.send_error.lock().unwrap().clone() {
            return Err(BlockchainError::Rpc(e));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(call);
        Ok(B256::with_last_byte(sent.len() as u8))
    }

    async fn wait_for_confirmation(
        &self,
        _hash: TxHash,
        _timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        Ok(ConfirmationStatus::Confirmed { block_number: 1_000 })
    }

    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        Ok(self.receipts.lock().unwrap().get(&hash).cloned())
    }

    async fn logs(&self, query: LogQuery) -> BlockchainResult<Vec<Log>> {
        self.log_queries.lock().unwrap().push(query.clone());
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| {
                log.address == query.address
                    && log.data.topics().first() == Some(&query.event_signature)
                    && query
                        .topic1
                        .map_or(true, |topic| log.data.topics().get(1) == Some(&topic))
            })
            .cloned()
            .collect())
    }
}

pub fn bank_token(address: Address, symbol: &str, decimals: u8, allowed: bool, paused: bool) -> BankToken {
    BankToken {
        tokenAddress: address,
        name: symbol.to_string(),
        symbol: symbol.to_string(),
        decimals,
        allowed,
        paused,
    }
}

/// Wrap event data as a log emitted by `address`.
pub fn log_at(address: Address, data: LogData) -> Log {
    Log { address, data }
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// `f` receives the request target (path and query) and returns status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let mut read = 0;
                        while read < buf.len() {
                            match socket.read(&mut buf[read..]).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => read += n,
                            }
                            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        let head = String::from_utf8_lossy(&buf[..read]);
                        let target = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
