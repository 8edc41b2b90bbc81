//! Error taxonomy for wallet and contract interactions.

use thiserror::Error;

/// Failures while establishing a wallet session.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No EIP-1193 handle is injected into the page.
    #[error("no wallet extension detected in this browser")]
    MissingProvider,

    /// The user dismissed the connection prompt.
    #[error("wallet connection request was rejected")]
    Rejected,

    #[error("wallet returned an empty account list")]
    NoAccounts,

    /// The provider is attached to a different network than the one the
    /// contract is deployed on.
    #[error("connected to chain {observed}, expected chain {expected}")]
    WrongNetwork { observed: u64, expected: u64 },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Failures reported by, or while talking to, the wallet provider.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered with a JSON-RPC / EIP-1193 error object.
    #[error("{method} failed with code {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// The provider cannot serve the requested method on this network
    /// (EIP-1193 code 4200, JSON-RPC code -32601).
    #[error("provider does not support {method}")]
    Unsupported { method: String },

    /// The provider answered with something we could not interpret.
    #[error("malformed provider response: {0}")]
    Decode(String),
}

/// EIP-1193 code for a request the user rejected.
const USER_REJECTED: i64 = 4001;
/// EIP-1193 code for a method the provider does not support.
const UNSUPPORTED_METHOD: i64 = 4200;
/// JSON-RPC code for a method the node does not know.
const METHOD_NOT_FOUND: i64 = -32601;

impl ProviderError {
    /// Classifies an error object returned by the provider.
    pub fn rpc(method: &str, code: i64, message: impl Into<String>) -> Self {
        match code {
            UNSUPPORTED_METHOD | METHOD_NOT_FOUND => Self::Unsupported {
                method: method.to_owned(),
            },
            _ => Self::Rpc {
                method: method.to_owned(),
                code,
                message: message.into(),
            },
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code, .. } if *code == USER_REJECTED)
    }
}

/// Failures while reading from or writing to the check-in contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The connected network cannot serve this operation, e.g. a
    /// naming-service lookup on a network without that feature.
    #[error("operation not supported on the connected network")]
    Unsupported,

    /// A submission is already waiting to be mined.
    #[error("a check-in is already in flight")]
    Busy,

    /// The transaction was mined but the contract reverted it.
    #[error("check-in transaction reverted")]
    Reverted,

    #[error(transparent)]
    Provider(ProviderError),

    #[error("could not decode contract response: {0}")]
    Decode(String),

    #[error("contract ABI error: {0}")]
    Abi(#[from] ethers_core::abi::Error),
}

impl From<ProviderError> for ContractError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unsupported { .. } => Self::Unsupported,
            other => Self::Provider(other),
        }
    }
}
