//! Error types for OP_RETURN transaction assembly.

use alloc::string::String;
use core::fmt;

use bitcoin::Amount;

/// Error types for building and signing an OP_RETURN transaction.
///
/// Every failure of the build pipeline maps to exactly one variant, so callers
/// can branch on the kind instead of inspecting the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The provided WIF private key could not be parsed
    InvalidKey,
    /// The address is malformed, unsupported or belongs to another network
    AddressResolution(String),
    /// The message exceeds the encodable range or the application ceiling
    MessageTooLong { len: usize, max: usize },
    /// The UTXO cannot cover the send amount plus the fee
    InsufficientFunds { available: Amount, required: Amount },
    /// The signer could not produce an unlocking script
    SigningFailure(String),
    /// The UTXO transaction id is not a 64 character hex string
    InvalidTxid(String),
    /// Writing the receipt to disk failed
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "Invalid private key"),
            Self::AddressResolution(e) => write!(f, "Unable to resolve address - {}", e),
            Self::MessageTooLong { len, max } => write!(
                f,
                "Message is too long: {} bytes, maximum allowed is {} bytes for OP_RETURN",
                len, max
            ),
            Self::InsufficientFunds {
                available,
                required,
            } => write!(
                f,
                "Insufficient funds to cover the amount and transaction fee: have {} sat, need {} sat",
                available.to_sat(),
                required.to_sat()
            ),
            Self::SigningFailure(e) => write!(f, "Signing failed - {}", e),
            Self::InvalidTxid(e) => write!(f, "Invalid UTXO transaction id {}", e),
            Self::Io(e) => write!(f, "I/O error - {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        use alloc::string::ToString;

        Self::Io(e.to_string())
    }
}
