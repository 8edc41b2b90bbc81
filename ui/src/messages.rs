//! User-facing strings for everything the page can surface.

use chain::ContractError;
use chain::WalletError;

pub const INSTALL_WALLET: &str =
    "Ethereum wallet not found! Please install MetaMask, OKX Wallet, or Rabby Wallet.";
pub const SWITCH_NETWORK: &str = "Please switch to the UniChain Sepolia network.";
pub const CONNECT_FAILED: &str =
    "Failed to connect to wallet. Check wallet permissions and network.";
pub const ENS_UNSUPPORTED: &str =
    "This network does not support ENS. Please switch to a supported network.";
pub const FETCH_FAILED: &str = "Error fetching data from the contract.";
pub const CHECK_IN_FAILED: &str =
    "Error during check-in. Make sure to check in only once a day.";
pub const NO_CHECK_IN_YET: &str = "No check-in yet.";

/// Where a failure is surfaced: the inline error line under the heading,
/// or a blocking browser alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    Inline(String),
    Alert(String),
}

/// Message and channel for a failed connect attempt. The wrong-network
/// notice stays on the page so it survives until the user switches and
/// retries; everything else interrupts with an alert.
pub fn connect_failure(error: &WalletError) -> Surface {
    match error {
        WalletError::MissingProvider => Surface::Alert(INSTALL_WALLET.to_owned()),
        WalletError::WrongNetwork { .. } => Surface::Inline(SWITCH_NETWORK.to_owned()),
        _ => Surface::Alert(CONNECT_FAILED.to_owned()),
    }
}

/// Message for a failed last-check-in read; the unsupported-operation case
/// keeps its own wording.
pub fn fetch_failure(error: &ContractError) -> String {
    match error {
        ContractError::Unsupported => ENS_UNSUPPORTED.to_owned(),
        _ => FETCH_FAILED.to_owned(),
    }
}
