//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Price transactions (gas price multiplier and ceiling)
//! - Build transactions with gas estimation and a reserved nonce
//! - Sign locally and broadcast, one send at a time
//! - Monitor confirmations

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;

/// Transaction builder for contract calls.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
    /// Held from nonce reservation until the node answered the broadcast.
    send_lock: Arc<Mutex<()>>,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self {
            client,
            wallet,
            send_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current gas price with the configured safety multiplier applied.
    ///
    /// Fails when the network price is above `max_gas_price_gwei`.
    pub async fn gas_price(&self) -> BlockchainResult<u128> {
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        let config = self.client.config();
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }

        Ok((gas_price as f64 * config.gas_price_multiplier) as u128)
    }

    /// Build a transaction request with nonce and gas estimation.
    ///
    /// # Arguments
    /// * `to` - Destination contract
    /// * `value` - Amount of native token to send
    /// * `data` - Call data
    /// * `gas_price` - Pre-computed gas price, or `None` to fetch one
    pub async fn build(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        gas_price: Option<u128>,
    ) -> BlockchainResult<TransactionRequest> {
        let gas_price = match gas_price {
            Some(price) => price,
            None => self.gas_price().await?,
        };

        let tx = TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_value(value)
            .with_input(data)
            .with_gas_price(gas_price)
            .with_chain_id(self.wallet.chain_id());

        // Reverts surface here, before anything is signed
        let estimated = self.client.estimate_gas(tx.clone()).await?;
        let gas_limit = (estimated as f64 * self.client.config().gas_limit_multiplier) as u64;

        let pending = self
            .client
            .get_pending_transaction_count(self.wallet.address())
            .await?;
        self.wallet.observe_pending_nonce(pending);
        let nonce = self.wallet.get_and_increment_nonce();

        Ok(tx.with_nonce(nonce).with_gas_limit(gas_limit))
    }

    /// Build, sign and broadcast a contract call.
    ///
    /// Sends are serialized. When the node rejects the transaction its nonce
    /// is released for the next send; after a timeout it stays consumed since
    /// the node may still have accepted it.
    pub async fn send(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        gas_price: Option<u128>,
    ) -> BlockchainResult<TxHash> {
        let _guard = self.send_lock.lock().await;

        let tx = self.build(to, value, data, gas_price).await?;
        let nonce = tx.nonce.unwrap_or_default();

        match self.sign_and_send(tx).await {
            Err(e @ (BlockchainError::Rpc(_) | BlockchainError::Wallet(_))) => {
                tracing::warn!(nonce, error = %e, "Transaction rejected, releasing nonce");
                self.wallet.release_nonce(nonce);
                Err(e)
            }
            result => result,
        }
    }

    /// Sign a built transaction and broadcast it.
    pub async fn sign_and_send(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let envelope = tx
            .build(&self.wallet.network_wallet())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

        let tx_hash = self.client.send_tx_envelope(envelope).await?;
        tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `timeout_secs` - Maximum time to wait for confirmation
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        let required_confirmations = self.client.confirmation_blocks();
        let timeout_duration = Duration::from_secs(timeout_secs);
        let poll_interval = Duration::from_secs(2);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block counts as the first confirmation
                let confirmations = (current_block.saturating_sub(tx_block) + 1) as u32;

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(required_confirmations)),
        }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Get the chain the wallet signs for.
    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Get the underlying RPC client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainConfig;
    use serde_json::{json, Value};
    use std::sync::Mutex as StdMutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    type Requests = Arc<StdMutex<Vec<Value>>>;

    /// JSON-RPC node on an ephemeral port answering with `respond(method)`.
    async fn start_rpc_node(respond: fn(&str) -> Result<Value, &'static str>) -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests: Requests = Arc::new(StdMutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 4096];
                    let body_start = loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            return;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if let Some(i) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                            break i + 4;
                        }
                    };
                    let head = String::from_utf8_lossy(&buf[..body_start]).to_lowercase();
                    let length: usize = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(0);
                    while buf.len() < body_start + length {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                    }

                    let request: Value = serde_json::from_slice(&buf[body_start..]).unwrap_or(Value::Null);
                    seen.lock().unwrap().push(request.clone());
                    let method = request["method"].as_str().unwrap_or_default();
                    let body = match respond(method) {
                        Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
                        Err(message) => json!({
                            "jsonrpc": "2.0",
                            "id": request["id"],
                            "error": { "code": -32000, "message": message }
                        }),
                    }
                    .to_string();

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (url, requests)
    }

    /// A node whose mempool never reflects our own transactions.
    fn lagging_node(method: &str) -> Result<Value, &'static str> {
        match method {
            "eth_chainId" => Ok(json!("0x89")),
            "eth_estimateGas" => Ok(json!("0x5208")),
            "eth_getTransactionCount" => Ok(json!("0x5")),
            "eth_sendRawTransaction" => Err("replacement transaction underpriced"),
            _ => Err("method not supported"),
        }
    }

    async fn builder(url: String) -> TxBuilder {
        let config = BlockchainConfig {
            rpc_url: url,
            chain_id: 137,
            rpc_timeout_secs: 5,
            ..BlockchainConfig::default()
        };
        let client = BlockchainClient::new(config).await.unwrap();
        TxBuilder::new(client, Wallet::from_private_key(TEST_KEY, 137).unwrap())
    }

    fn wager_data() -> Bytes {
        Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef])
    }

    #[tokio::test]
    async fn test_back_to_back_transactions_get_distinct_nonces() {
        let (url, requests) = start_rpc_node(lagging_node).await;
        let builder = builder(url).await;
        let to = Address::repeat_byte(0x22);

        let first = builder.build(to, U256::from(1u64), wager_data(), Some(1)).await.unwrap();
        let second = builder.build(to, U256::from(1u64), wager_data(), Some(1)).await.unwrap();

        assert_eq!(first.nonce, Some(5));
        assert_eq!(second.nonce, Some(6));

        let requests = requests.lock().unwrap();
        let count_queries: Vec<_> = requests
            .iter()
            .filter(|r| r["method"] == "eth_getTransactionCount")
            .collect();
        assert_eq!(count_queries.len(), 2);
        assert!(count_queries.iter().all(|r| r["params"][1] == "pending"));
    }

    #[tokio::test]
    async fn test_rejected_send_releases_nonce() {
        let (url, requests) = start_rpc_node(lagging_node).await;
        let builder = builder(url).await;
        let to = Address::repeat_byte(0x22);

        let err = builder.send(to, U256::ZERO, wager_data(), Some(1)).await.unwrap_err();
        assert!(err.to_string().contains("underpriced"));
        let broadcasts = requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r["method"] == "eth_sendRawTransaction")
            .count();
        assert_eq!(broadcasts, 1);

        let next = builder.build(to, U256::ZERO, wager_data(), Some(1)).await.unwrap();
        assert_eq!(next.nonce, Some(5));
    }

    #[tokio::test]
    async fn test_gas_price_unreachable_rpc() {
        let config = BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 1,
            ..BlockchainConfig::default()
        };
        let client = BlockchainClient::new(config).await.unwrap();
        let wallet = Wallet::from_private_key(TEST_KEY, 42161).unwrap();
        let builder = TxBuilder::new(client, wallet);

        assert_eq!(builder.chain_id(), 42161);
        assert!(builder.gas_price().await.is_err());
    }
}
