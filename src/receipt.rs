//! Human readable record of a signed OP_RETURN transaction.

use alloc::string::{String, ToString};
use core::fmt;

use bitcoin::{hex::DisplayHex, Amount};

use crate::SignedOpReturnTx;

/// File name the record is conventionally saved under.
pub const RECEIPT_FILE_NAME: &str = "RawTX_OP_RETURN.txt";

/// What gets persisted after a successful build.
///
/// The [`Display`](fmt::Display) form is the file layout: the raw transaction
/// hex, a blank line, then the message, its UTF-8 hex and the change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub raw_tx_hex: String,
    pub message: String,
    pub sender_address: String,
    pub recipient_address: String,
    pub send_amount: Amount,
    pub fee: Amount,
    pub change: Amount,
}

impl Receipt {
    pub fn new(
        signed: &SignedOpReturnTx,
        message: &str,
        recipient_address: &str,
        send_amount: Amount,
        fee: Amount,
    ) -> Self {
        Self {
            raw_tx_hex: signed.to_hex(),
            message: message.into(),
            sender_address: signed.sender.to_string(),
            recipient_address: recipient_address.into(),
            send_amount,
            fee,
            change: signed.change,
        }
    }

    pub fn message_hex(&self) -> String {
        self.message.as_bytes().to_lower_hex_string()
    }

    /// Console summary of the transaction.
    pub fn summary(&self) -> String {
        format!(
            "Your BTC Address:         {}\n\
             Recipient Address:        {}\n\
             Send Amount:              {} satoshi\n\
             Transaction Fee:          {} satoshi\n\
             Change Returned:          {} satoshi\n\
             \n\
             OP_RETURN Message:        {}\n\
             \n\
             RawTX (Hex):\n\
             {}\n",
            self.sender_address,
            self.recipient_address,
            self.send_amount.to_sat(),
            self.fee.to_sat(),
            self.change.to_sat(),
            self.message,
            self.raw_tx_hex,
        )
    }

    #[cfg(feature = "std")]
    pub fn write_to<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), crate::Error> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.raw_tx_hex)?;
        writeln!(f)?;
        writeln!(f, "Message: {}", self.message)?;
        writeln!(f, "Hex: {}", self.message_hex())?;
        writeln!(f, "Change Returned: {} satoshi", self.change.to_sat())
    }
}
