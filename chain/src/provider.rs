//! The capability surface the page needs from a wallet provider.

use async_trait::async_trait;
use ethers_core::types::Address;
use ethers_core::types::Bytes;
use ethers_core::types::TransactionRequest;
use ethers_core::types::H256;
use ethers_core::types::U64;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::config::parse_chain_id;
use crate::error::ProviderError;

/// The slice of a transaction receipt the page cares about: whether the
/// transaction is included, and whether it succeeded.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub transaction_hash: H256,
    /// `None` while the transaction is still pending.
    pub block_number: Option<U64>,
    /// `0x0` for a reverted transaction.
    pub status: Option<U64>,
}

/// Capability interface over a wallet provider.
///
/// Implementations forward [`request`](Self::request) to an EIP-1193 handle;
/// the typed wrappers do the JSON plumbing so session and contract logic
/// never touch raw provider payloads, and a scripted implementation stands
/// in for a real wallet in tests.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// The single EIP-1193 entry point: `request({ method, params })`.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// `eth_requestAccounts`: prompts the wallet for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let raw = self.request("eth_requestAccounts", json!([])).await?;
        let accounts: Vec<String> = serde_json::from_value(raw)
            .map_err(|e| ProviderError::Decode(format!("account list: {e}")))?;
        accounts
            .iter()
            .map(|account| {
                account
                    .parse()
                    .map_err(|e| ProviderError::Decode(format!("account {account:?}: {e}")))
            })
            .collect()
    }

    /// `eth_chainId`: the network the provider is currently attached to,
    /// folded to a plain integer whatever encoding the wallet answers with.
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let raw = self.request("eth_chainId", json!([])).await?;
        normalize_chain_id(&raw)
    }

    /// `eth_call` of a read-only contract method against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
        let raw = self.request("eth_call", json!([tx, "latest"])).await?;
        let hex: String = serde_json::from_value(raw)
            .map_err(|e| ProviderError::Decode(format!("eth_call response: {e}")))?;
        hex.parse()
            .map_err(|e| ProviderError::Decode(format!("eth_call response {hex:?}: {e}")))
    }

    /// `eth_sendTransaction`: hands the transaction to the wallet for
    /// signing and broadcast, returning its hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<H256, ProviderError> {
        let raw = self.request("eth_sendTransaction", json!([tx])).await?;
        serde_json::from_value(raw)
            .map_err(|e| ProviderError::Decode(format!("transaction hash: {e}")))
    }

    /// `eth_getTransactionReceipt`: `None` until the node knows the
    /// transaction.
    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ReceiptSummary>, ProviderError> {
        let raw = self.request("eth_getTransactionReceipt", json!([hash])).await?;
        if raw.is_null() {
            return Ok(None);
        }
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|e| ProviderError::Decode(format!("transaction receipt: {e}")))
    }
}

#[async_trait(?Send)]
impl<P> WalletProvider for std::rc::Rc<P>
where
    P: WalletProvider + ?Sized,
{
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }
}

/// Chain ids arrive as hex strings from most wallets, but decimal strings
/// and plain numbers are seen in the wild. All encodings are folded to a
/// `u64` here so the rest of the code only ever compares integers.
pub fn normalize_chain_id(raw: &Value) -> Result<u64, ProviderError> {
    match raw {
        Value::String(s) => {
            parse_chain_id(s).ok_or_else(|| ProviderError::Decode(format!("chain id {s:?}")))
        }
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ProviderError::Decode(format!("chain id {n}"))),
        other => Err(ProviderError::Decode(format!("chain id {other}"))),
    }
}
