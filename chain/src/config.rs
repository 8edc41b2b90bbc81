//! Static description of the network and contract the page talks to.

/// UniChain Sepolia, the network the check-in contract is deployed on.
pub const UNICHAIN_SEPOLIA: NetworkProfile = NetworkProfile {
    name: "UniChain Sepolia",
    chain_id_hex: "0x515",
    chain_id_decimal: 1301,
    rpc_url: "https://sepolia.unichain.org",
    contract_address: "0x7ef52cF1f0D9EC7Fe5190d9f7CA976A633E0c0A7",
};

/// A network plus the check-in contract deployed on it.
///
/// The chain id is carried in both of its published encodings; an observed
/// id matching either is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: &'static str,
    /// Expected chain id in its hexadecimal form.
    pub chain_id_hex: &'static str,
    /// Expected chain id in its decimal form.
    pub chain_id_decimal: u64,
    /// Reference RPC endpoint. Not dialed directly; all traffic rides the
    /// injected provider's own connection.
    pub rpc_url: &'static str,
    pub contract_address: &'static str,
}

impl NetworkProfile {
    /// Whether an observed chain id matches this network, in either the hex
    /// or the decimal encoding of the expected value.
    pub fn accepts_chain_id(&self, observed: u64) -> bool {
        parse_chain_id(self.chain_id_hex) == Some(observed) || observed == self.chain_id_decimal
    }
}

/// Parses a chain id written either as a 0x-prefixed hex string or as a
/// decimal string.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::Address;

    #[test]
    fn hex_and_decimal_forms_agree() {
        assert_eq!(
            parse_chain_id(UNICHAIN_SEPOLIA.chain_id_hex),
            Some(UNICHAIN_SEPOLIA.chain_id_decimal)
        );
    }

    #[test]
    fn parses_both_encodings() {
        assert_eq!(parse_chain_id("0x515"), Some(1301));
        assert_eq!(parse_chain_id("1301"), Some(1301));
        assert_eq!(parse_chain_id("0X515"), Some(1301));
        assert_eq!(parse_chain_id("0x0"), Some(0));
        assert_eq!(parse_chain_id("banana"), None);
        assert_eq!(parse_chain_id(""), None);
        assert_eq!(parse_chain_id("0x"), None);
    }

    #[test]
    fn accepts_the_expected_chain_only() {
        assert!(UNICHAIN_SEPOLIA.accepts_chain_id(1301));
        // Ethereum Sepolia
        assert!(!UNICHAIN_SEPOLIA.accepts_chain_id(11155111));
        assert!(!UNICHAIN_SEPOLIA.accepts_chain_id(1));
        assert!(!UNICHAIN_SEPOLIA.accepts_chain_id(0));
    }

    #[test]
    fn contract_address_parses() {
        assert!(UNICHAIN_SEPOLIA.contract_address.parse::<Address>().is_ok());
    }
}
