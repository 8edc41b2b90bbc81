//! Wallet session establishment and the network gate.

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use tracing::info;

use crate::config::NetworkProfile;
use crate::error::WalletError;
use crate::provider::WalletProvider;

/// An established wallet connection.
///
/// Only ever exists after the network check has passed, so holding a
/// `Session` is what "connected" means; there is no separate flag to keep
/// in sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
}

impl Session {
    /// EIP-55 checksummed form of the account, for display.
    pub fn account_display(&self) -> String {
        to_checksum(&self.account, None)
    }
}

/// Outcome of comparing the provider's network against the expected one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkCheck {
    pub observed: u64,
    pub expected: u64,
    pub matches: bool,
}

/// Compares an observed chain id against the profile's expected id, which
/// is accepted in either of its two published encodings.
pub fn check_network(observed: u64, profile: &NetworkProfile) -> NetworkCheck {
    NetworkCheck {
        observed,
        expected: profile.chain_id_decimal,
        matches: profile.accepts_chain_id(observed),
    }
}

/// Requests account access and verifies the network, yielding a session.
///
/// No session is produced unless every step succeeds; a wrong network
/// aborts before the account is exposed to the rest of the app.
pub async fn connect<P: WalletProvider>(
    provider: &P,
    profile: &NetworkProfile,
) -> Result<Session, WalletError> {
    let accounts = provider.request_accounts().await.map_err(|e| {
        if e.is_rejection() {
            WalletError::Rejected
        } else {
            WalletError::Provider(e)
        }
    })?;
    let account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;

    let observed = provider.chain_id().await?;
    let check = check_network(observed, profile);
    info!(
        "chain id: observed {}, expected {}",
        check.observed, check.expected
    );
    if !check.matches {
        return Err(WalletError::WrongNetwork {
            observed: check.observed,
            expected: check.expected,
        });
    }

    Ok(Session { account })
}
