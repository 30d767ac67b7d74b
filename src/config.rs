//! Policy knobs for OP_RETURN transaction assembly.

use core::fmt;

use bitcoin::{Amount, Network};

/// Outputs at or below this value are not created.
pub const DUST_LIMIT: Amount = Amount::from_sat(546);

/// Application ceiling for the OP_RETURN payload, in bytes.
pub const MAX_MESSAGE_LEN: usize = 80;

/// Fee used when a request does not set one.
pub const DEFAULT_FEE: Amount = Amount::from_sat(1000);

/// Represents the address kinds the sender's own key can be rendered as.
///
/// The sender's locking script is derived from the signing key, so the kind
/// decides both the input being spent and where change goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SenderKind {
    /// Pay-to-public-key-hash, the classic `1...`/`m...` address.
    #[default]
    Legacy,
    /// Pay-to-witness-public-key-hash, a `bc1q...`/`tb1q...` address.
    SegwitV0,
    /// Taproot key-path output, a `bc1p...`/`tb1p...` address.
    Taproot,
}

/// Configuration shared by every build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    pub dust_limit: Amount,
    pub max_message_len: usize,
    pub default_fee: Amount,
    pub network: Network,
    pub sender_kind: SenderKind,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dust_limit: DUST_LIMIT,
            max_message_len: MAX_MESSAGE_LEN,
            default_fee: DEFAULT_FEE,
            network: Network::Testnet,
            sender_kind: SenderKind::Legacy,
        }
    }
}

impl BuildConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    pub fn with_dust_limit(mut self, dust_limit: Amount) -> Self {
        self.dust_limit = dust_limit;
        self
    }

    pub fn with_max_message_len(mut self, max_message_len: usize) -> Self {
        self.max_message_len = max_message_len;
        self
    }

    pub fn with_default_fee(mut self, default_fee: Amount) -> Self {
        self.default_fee = default_fee;
        self
    }

    pub fn with_sender_kind(mut self, sender_kind: SenderKind) -> Self {
        self.sender_kind = sender_kind;
        self
    }
}

/// How much of the OP_RETURN byte budget a message uses.
///
/// Length is measured on the UTF-8 encoding, which is what ends up on-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageBudget {
    pub used: usize,
    pub max: usize,
}

impl MessageBudget {
    pub fn new(message: &str, max: usize) -> Self {
        Self {
            used: message.len(),
            max,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.used > self.max
    }
}

impl fmt::Display for MessageBudget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_exceeded() {
            write!(f, "Message too long: {} / {} bytes!", self.used, self.max)
        } else {
            write!(f, "{} / {} bytes", self.used, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_defaults_match_tool() {
        let config = BuildConfig::default();

        assert_eq!(config.dust_limit, Amount::from_sat(546));
        assert_eq!(config.max_message_len, 80);
        assert_eq!(config.default_fee, Amount::from_sat(1000));
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.sender_kind, SenderKind::Legacy);
    }

    #[test]
    fn test_builder_setters() {
        let config = BuildConfig::new(Network::Bitcoin)
            .with_dust_limit(Amount::from_sat(330))
            .with_max_message_len(40)
            .with_default_fee(Amount::from_sat(250))
            .with_sender_kind(SenderKind::Taproot);

        assert_eq!(config.network, Network::Bitcoin);
        assert_eq!(config.dust_limit, Amount::from_sat(330));
        assert_eq!(config.max_message_len, 40);
        assert_eq!(config.default_fee, Amount::from_sat(250));
        assert_eq!(config.sender_kind, SenderKind::Taproot);
    }

    #[test]
    fn test_message_budget_counts_utf8_bytes() {
        // "é" is two bytes in UTF-8
        let budget = MessageBudget::new("é", MAX_MESSAGE_LEN);

        assert_eq!(budget.used, 2);
        assert_eq!(budget.max, 80);
        assert!(!budget.is_exceeded());
        assert_eq!(budget.to_string(), "2 / 80 bytes");
    }

    #[test]
    fn test_message_budget_boundary() {
        let at_limit = "a".repeat(80);
        let budget = MessageBudget::new(&at_limit, MAX_MESSAGE_LEN);
        assert!(!budget.is_exceeded());
        assert_eq!(budget.to_string(), "80 / 80 bytes");

        let over_limit = "a".repeat(81);
        let budget = MessageBudget::new(&over_limit, MAX_MESSAGE_LEN);
        assert!(budget.is_exceeded());
        assert_eq!(budget.to_string(), "Message too long: 81 / 80 bytes!");
    }
}
