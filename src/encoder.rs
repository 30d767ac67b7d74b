//! Encoding of arbitrary messages into OP_RETURN data-carrier scripts.

use alloc::vec::Vec;

use bitcoin::{
    opcodes::all::{OP_PUSHDATA1, OP_RETURN},
    ScriptBuf,
};

use crate::Error;

/// Largest payload a single direct push opcode can carry.
const MAX_DIRECT_PUSH: usize = 75;

/// Largest payload an `OP_PUSHDATA1` push can carry.
const MAX_PUSHDATA1: usize = 255;

/// Builds provably unspendable data-carrier scripts.
///
/// The layout is `OP_RETURN <len> <data>` for payloads up to 75 bytes and
/// `OP_RETURN OP_PUSHDATA1 <len> <data>` for payloads of 76 to 255 bytes.
/// Anything longer is rejected; the 80 byte application ceiling is enforced
/// separately by the builder.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpReturnEncoder;

impl OpReturnEncoder {
    pub fn encode(message: &[u8]) -> Result<ScriptBuf, Error> {
        let len = message.len();

        let mut script = Vec::with_capacity(len + 3);
        script.push(OP_RETURN.to_u8());

        if len <= MAX_DIRECT_PUSH {
            script.push(len as u8);
        } else if len <= MAX_PUSHDATA1 {
            script.push(OP_PUSHDATA1.to_u8());
            script.push(len as u8);
        } else {
            return Err(Error::MessageTooLong {
                len,
                max: MAX_PUSHDATA1,
            });
        }

        script.extend_from_slice(message);

        Ok(ScriptBuf::from_bytes(script))
    }
}
