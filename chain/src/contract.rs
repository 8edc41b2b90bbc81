//! Typed client for the two-function check-in contract.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use ethers_core::abi::Abi;
use ethers_core::abi::Token;
use ethers_core::types::Address;
use ethers_core::types::TransactionRequest;
use ethers_core::types::H256;
use ethers_core::types::U256;
use tracing::info;
use tracing::warn;

use crate::compat;
use crate::config::NetworkProfile;
use crate::error::ContractError;
use crate::provider::ReceiptSummary;
use crate::provider::WalletProvider;

/// ABI of the deployed contract, limited to the two methods the page uses.
const CHECK_IN_ABI: &str = r#"[
    {
        "type": "function",
        "name": "checkIn",
        "stateMutability": "nonpayable",
        "inputs": [],
        "outputs": []
    },
    {
        "type": "function",
        "name": "getLastCheckIn",
        "stateMutability": "view",
        "inputs": [ { "name": "account", "type": "address" } ],
        "outputs": [ { "name": "", "type": "uint256" } ]
    }
]"#;

/// How often a pending submission is polled for its receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client for the check-in contract, generic over the wallet provider so
/// the logic runs against a scripted provider in tests.
///
/// Clones share the submission guard: at most one `check_in` may be in
/// flight across all clones of one client.
pub struct CheckInClient<P> {
    provider: P,
    contract: Address,
    abi: Rc<Abi>,
    in_flight: Rc<Cell<bool>>,
}

impl<P: Clone> Clone for CheckInClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            contract: self.contract,
            abi: Rc::clone(&self.abi),
            in_flight: Rc::clone(&self.in_flight),
        }
    }
}

impl<P: WalletProvider> CheckInClient<P> {
    pub fn new(provider: P, profile: &NetworkProfile) -> Result<Self, ContractError> {
        let abi: Abi = serde_json::from_str(CHECK_IN_ABI)
            .map_err(|e| ContractError::Decode(format!("contract ABI: {e}")))?;
        let contract = profile
            .contract_address
            .parse()
            .map_err(|e| ContractError::Decode(format!("contract address: {e}")))?;
        Ok(Self {
            provider,
            contract,
            abi: Rc::new(abi),
            in_flight: Rc::new(Cell::new(false)),
        })
    }

    /// Whether a submission is currently waiting to be mined.
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Reads the account's last recorded check-in.
    ///
    /// The contract answers in whole seconds since the epoch; zero means
    /// the account has never checked in and comes back as `None`.
    pub async fn last_check_in(
        &self,
        account: Address,
    ) -> Result<Option<DateTime<Utc>>, ContractError> {
        let function = self.abi.function("getLastCheckIn")?;
        let data = function.encode_input(&[Token::Address(account)])?;
        let tx = TransactionRequest::new().to(self.contract).data(data);
        let raw = self.provider.call(&tx).await?;
        let mut tokens = function.decode_output(raw.as_ref())?;
        match tokens.pop() {
            Some(Token::Uint(seconds)) => timestamp_from_seconds(seconds),
            other => Err(ContractError::Decode(format!(
                "getLastCheckIn answered {other:?}"
            ))),
        }
    }

    /// Records a check-in for the account and waits until it is mined.
    ///
    /// At most one submission may be in flight; further attempts are
    /// refused with [`ContractError::Busy`] until the current one settles.
    pub async fn check_in(&self, from: Address) -> Result<ReceiptSummary, ContractError> {
        if self.in_flight.replace(true) {
            return Err(ContractError::Busy);
        }
        let result = self.submit_check_in(from).await;
        self.in_flight.set(false);
        result
    }

    async fn submit_check_in(&self, from: Address) -> Result<ReceiptSummary, ContractError> {
        let function = self.abi.function("checkIn")?;
        let data = function.encode_input(&[])?;
        let tx = TransactionRequest::new()
            .from(from)
            .to(self.contract)
            .data(data);
        let hash = self.provider.send_transaction(&tx).await?;
        info!("check-in submitted: {hash:?}");

        let receipt = self.wait_for_receipt(hash).await?;
        if receipt.status == Some(0.into()) {
            warn!("check-in reverted: {hash:?}");
            return Err(ContractError::Reverted);
        }
        info!("check-in mined in block {:?}", receipt.block_number);
        Ok(receipt)
    }

    /// Polls until the transaction is included. No timeout: a submission
    /// that never mines keeps this call (and only this call) suspended.
    async fn wait_for_receipt(&self, hash: H256) -> Result<ReceiptSummary, ContractError> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(hash).await? {
                if receipt.block_number.is_some() {
                    return Ok(receipt);
                }
            }
            compat::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

fn timestamp_from_seconds(seconds: U256) -> Result<Option<DateTime<Utc>>, ContractError> {
    if seconds.is_zero() {
        return Ok(None);
    }
    if seconds > U256::from(i64::MAX as u64) {
        return Err(ContractError::Decode(format!(
            "timestamp out of range: {seconds}"
        )));
    }
    DateTime::from_timestamp(seconds.as_u64() as i64, 0)
        .map(Some)
        .ok_or_else(|| ContractError::Decode(format!("timestamp out of range: {seconds}")))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;

    use futures::pin_mut;
    use futures::poll;
    use serde_json::json;
    use serde_json::Value;
    use tokio::sync::oneshot;

    use super::*;
    use crate::config::UNICHAIN_SEPOLIA;
    use crate::error::ProviderError;
    use crate::provider::testing::ScriptedProvider;

    fn account() -> Address {
        Address::from_low_u64_be(0xbeef)
    }

    fn client(provider: Rc<ScriptedProvider>) -> CheckInClient<Rc<ScriptedProvider>> {
        CheckInClient::new(provider, &UNICHAIN_SEPOLIA).unwrap()
    }

    fn uint256_hex(value: u64) -> Value {
        json!(format!("0x{value:064x}"))
    }

    fn mined_receipt(status: u64) -> Value {
        json!({
            "transactionHash": format!("{:?}", H256::from_low_u64_be(7)),
            "blockNumber": "0x10",
            "status": format!("0x{status:x}")
        })
    }

    #[tokio::test]
    async fn read_decodes_the_returned_timestamp() {
        let provider = Rc::new(
            ScriptedProvider::new().with_response("eth_call", Ok(uint256_hex(1_700_000_000))),
        );
        let client = client(Rc::clone(&provider));

        let when = client.last_check_in(account()).await.unwrap();
        assert_eq!(when, DateTime::from_timestamp(1_700_000_000, 0));

        // The call carries the ABI-encoded selector and padded address to
        // the configured contract.
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "eth_call");
        let tx = &calls[0].1[0];
        assert_eq!(
            tx["to"],
            serde_json::to_value(UNICHAIN_SEPOLIA.contract_address.parse::<Address>().unwrap())
                .unwrap()
        );
        let abi: Abi = serde_json::from_str(CHECK_IN_ABI).unwrap();
        let expected = abi
            .function("getLastCheckIn")
            .unwrap()
            .encode_input(&[Token::Address(account())])
            .unwrap();
        assert_eq!(
            tx["data"],
            serde_json::to_value(ethers_core::types::Bytes::from(expected)).unwrap()
        );
    }

    #[tokio::test]
    async fn zero_timestamp_means_never_checked_in() {
        let provider =
            Rc::new(ScriptedProvider::new().with_response("eth_call", Ok(uint256_hex(0))));
        assert_eq!(client(provider).last_check_in(account()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unsupported_read_surfaces_as_unsupported() {
        let provider = Rc::new(ScriptedProvider::new().with_response(
            "eth_call",
            Err(ProviderError::rpc("eth_call", -32601, "method not found")),
        ));
        assert!(matches!(
            client(provider).last_check_in(account()).await,
            Err(ContractError::Unsupported)
        ));
    }

    #[tokio::test]
    async fn other_read_failures_stay_generic() {
        let provider = Rc::new(ScriptedProvider::new().with_response(
            "eth_call",
            Err(ProviderError::rpc("eth_call", -32000, "boom")),
        ));
        assert!(matches!(
            client(provider).last_check_in(account()).await,
            Err(ContractError::Provider(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn check_in_submits_and_polls_until_mined() {
        let provider = Rc::new(
            ScriptedProvider::new()
                .with_response("eth_sendTransaction", Ok(json!(format!("{:?}", H256::from_low_u64_be(7)))))
                .with_response("eth_getTransactionReceipt", Ok(json!(null)))
                .with_response("eth_getTransactionReceipt", Ok(mined_receipt(1))),
        );
        let client = client(Rc::clone(&provider));

        let receipt = client.check_in(account()).await.unwrap();
        assert_eq!(receipt.block_number, Some(0x10.into()));
        assert_eq!(provider.call_count("eth_sendTransaction"), 1);
        assert_eq!(provider.call_count("eth_getTransactionReceipt"), 2);
        assert!(!client.is_busy());

        // The submission names the caller and carries the selector.
        let calls = provider.calls();
        let tx = &calls[0].1[0];
        assert_eq!(tx["from"], serde_json::to_value(account()).unwrap());
        let abi: Abi = serde_json::from_str(CHECK_IN_ABI).unwrap();
        let expected = abi.function("checkIn").unwrap().encode_input(&[]).unwrap();
        assert_eq!(
            tx["data"],
            serde_json::to_value(ethers_core::types::Bytes::from(expected)).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_check_in_is_an_error_and_clears_the_guard() {
        let provider = Rc::new(
            ScriptedProvider::new()
                .with_response("eth_sendTransaction", Ok(json!(format!("{:?}", H256::from_low_u64_be(7)))))
                .with_response("eth_getTransactionReceipt", Ok(mined_receipt(0))),
        );
        let client = client(Rc::clone(&provider));

        assert!(matches!(
            client.check_in(account()).await,
            Err(ContractError::Reverted)
        ));
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn refreshed_read_reflects_the_new_timestamp() {
        let provider = Rc::new(
            ScriptedProvider::new()
                .with_response("eth_call", Ok(uint256_hex(1_700_000_000)))
                .with_response("eth_call", Ok(uint256_hex(1_700_086_400))),
        );
        let client = client(provider);

        let before = client.last_check_in(account()).await.unwrap();
        let after = client.last_check_in(account()).await.unwrap();
        assert_eq!(before, DateTime::from_timestamp(1_700_000_000, 0));
        assert_eq!(after, DateTime::from_timestamp(1_700_086_400, 0));
    }

    /// Provider whose first submission parks until released, for driving
    /// the in-flight guard.
    struct GatedSubmit {
        release: RefCell<Option<oneshot::Receiver<()>>>,
        sent: Cell<usize>,
    }

    #[async_trait::async_trait(?Send)]
    impl WalletProvider for GatedSubmit {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            match method {
                "eth_sendTransaction" => {
                    self.sent.set(self.sent.get() + 1);
                    let gate = self.release.borrow_mut().take();
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    Ok(json!(format!("{:?}", H256::from_low_u64_be(7))))
                }
                "eth_getTransactionReceipt" => Ok(mined_receipt(1)),
                other => Err(ProviderError::Decode(format!("unexpected {other}"))),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_submission_is_refused_while_one_is_in_flight() {
        let (release, gate) = oneshot::channel();
        let provider = Rc::new(GatedSubmit {
            release: RefCell::new(Some(gate)),
            sent: Cell::new(0),
        });
        let first_client = CheckInClient::new(Rc::clone(&provider), &UNICHAIN_SEPOLIA).unwrap();
        let second_client = first_client.clone();

        let first = first_client.check_in(account());
        pin_mut!(first);
        // Drive the first submission up to the point where it is parked
        // waiting for the wallet.
        assert!(poll!(first.as_mut()).is_pending());
        assert!(second_client.is_busy());

        // A second attempt is refused without reaching the wallet.
        assert!(matches!(
            second_client.check_in(account()).await,
            Err(ContractError::Busy)
        ));
        assert_eq!(provider.sent.get(), 1);

        release.send(()).unwrap();
        assert!(first.await.is_ok());
        assert!(!first_client.is_busy());

        // Once settled, the next attempt goes through again.
        assert!(second_client.check_in(account()).await.is_ok());
        assert_eq!(provider.sent.get(), 2);
    }

    #[test]
    fn out_of_range_timestamps_are_rejected() {
        assert!(timestamp_from_seconds(U256::MAX).is_err());
        assert_eq!(timestamp_from_seconds(U256::zero()).unwrap(), None);
    }
}
