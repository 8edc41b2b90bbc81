//! Everything that talks to the blockchain through the user's wallet.
//!
//! The browser extension's EIP-1193 handle is wrapped behind the
//! [`WalletProvider`] capability trait so session establishment and the
//! contract client can run against a scripted provider in tests. ABI
//! encoding, addresses and quantities come from `ethers-core`.

pub mod compat;
pub mod config;
pub mod contract;
pub mod error;
pub mod injected;
pub mod provider;
pub mod wallet;

pub use config::NetworkProfile;
pub use config::UNICHAIN_SEPOLIA;
pub use contract::CheckInClient;
pub use error::ContractError;
pub use error::ProviderError;
pub use error::WalletError;
pub use injected::InjectedWallet;
pub use provider::ReceiptSummary;
pub use provider::WalletProvider;
pub use wallet::connect;
pub use wallet::NetworkCheck;
pub use wallet::Session;
