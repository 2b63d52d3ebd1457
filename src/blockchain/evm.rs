//! Wallet client abstraction consumed by the casino.
//!
//! [`EvmWalletClient`] is what the betting flow needs from a wallet. The
//! signer-backed implementation is [`ChainWallet`]; tests use an
//! in-memory double.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, Log, TxHash};
use alloy::rpc::types::{Filter, TransactionRequest};
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{
    BlockchainResult, ConfirmationStatus, ContractRead, ContractWrite, LogQuery, ReceiptSummary,
};
use crate::blockchain::wallet::Wallet;

/// An EVM wallet able to read contracts and send transactions.
#[async_trait]
pub trait EvmWalletClient: Send + Sync {
    /// Address transactions are sent from.
    fn address(&self) -> Address;

    /// Chain the wallet is connected to.
    fn chain_id(&self) -> u64;

    /// Gas price to use for the next transaction, in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Latest block number.
    async fn block_number(&self) -> BlockchainResult<u64>;

    /// Execute a read-only contract call and return the raw return data.
    async fn read(&self, call: ContractRead) -> BlockchainResult<Bytes>;

    /// Sign and broadcast a contract call. Returns once the node accepted it.
    async fn send_transaction(&self, call: ContractWrite) -> BlockchainResult<TxHash>;

    /// Block until `hash` is mined (or the timeout elapses).
    async fn wait_for_confirmation(
        &self,
        hash: TxHash,
        timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus>;

    /// Receipt of a mined transaction, `None` while pending or unknown.
    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>>;

    /// Logs of one event emitted by one contract.
    async fn logs(&self, query: LogQuery) -> BlockchainResult<Vec<Log>>;
}

/// Signer-backed wallet over the JSON-RPC client.
#[derive(Debug, Clone)]
pub struct ChainWallet {
    tx_builder: TxBuilder,
}

impl ChainWallet {
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self {
            tx_builder: TxBuilder::new(client, wallet),
        }
    }

    fn client(&self) -> &BlockchainClient {
        self.tx_builder.client()
    }
}

#[async_trait]
impl EvmWalletClient for ChainWallet {
    fn address(&self) -> Address {
        self.tx_builder.address()
    }

    fn chain_id(&self) -> u64 {
        self.tx_builder.chain_id()
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.tx_builder.gas_price().await
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.client().get_block_number().await
    }

    async fn read(&self, call: ContractRead) -> BlockchainResult<Bytes> {
        let mut tx = TransactionRequest::default()
            .with_from(self.address())
            .with_to(call.to)
            .with_input(call.data);
        if let Some(gas_price) = call.gas_price {
            tx = tx.with_gas_price(gas_price);
        }
        self.client().call(tx).await
    }

    async fn send_transaction(&self, call: ContractWrite) -> BlockchainResult<TxHash> {
        self.tx_builder
            .send(call.to, call.value, call.data, call.gas_price)
            .await
    }

    async fn wait_for_confirmation(
        &self,
        hash: TxHash,
        timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        self.tx_builder.wait_for_confirmation(hash, timeout_secs).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt = match self.client().get_transaction_receipt(hash).await? {
            Some(receipt) => receipt,
            None => return Ok(None),
        };

        Ok(Some(ReceiptSummary {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        }))
    }

    async fn logs(&self, query: LogQuery) -> BlockchainResult<Vec<Log>> {
        let mut filter = Filter::new()
            .address(query.address)
            .event_signature(query.event_signature)
            .from_block(query.from_block)
            .to_block(query.to_block);
        if let Some(topic1) = query.topic1 {
            filter = filter.topic1(topic1);
        }

        let logs = self.client().get_logs(&filter).await?;
        Ok(logs.into_iter().map(|log| log.inner).collect())
    }
}
