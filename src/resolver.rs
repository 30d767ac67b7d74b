//! Address, key and outpoint parsing used ahead of transaction assembly.

use alloc::string::ToString;
use core::str::FromStr;

use bitcoin::{
    key::CompressedPublicKey, Address, Network, PrivateKey, ScriptBuf, Txid, XOnlyPublicKey,
};

use crate::{Error, SecpCtx, SenderKind};

/// Turns a human readable address into the locking script it stands for.
pub trait ScriptResolver {
    fn resolve(&self, address: &str) -> Result<ScriptBuf, Error>;
}

/// Resolves addresses with the `bitcoin` crate, pinned to one network.
#[derive(Clone, Copy, Debug)]
pub struct AddressResolver {
    network: Network,
}

impl AddressResolver {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl ScriptResolver for AddressResolver {
    fn resolve(&self, address: &str) -> Result<ScriptBuf, Error> {
        let address = Address::from_str(address.trim())
            .map_err(|e| Error::AddressResolution(e.to_string()))?
            .require_network(self.network)
            .map_err(|e| Error::AddressResolution(e.to_string()))?;

        Ok(address.script_pubkey())
    }
}

/// Parses a Wallet Import Format string into a private key.
pub fn parse_wif(wif: &str) -> Result<PrivateKey, Error> {
    PrivateKey::from_wif(wif.trim()).map_err(|_| Error::InvalidKey)
}

/// Parses a UTXO transaction id given in the usual big-endian hex form.
pub fn parse_txid(txid: &str) -> Result<Txid, Error> {
    let txid = txid.trim();
    if txid.len() != 64 {
        return Err(Error::InvalidTxid(txid.to_string()));
    }

    Txid::from_str(txid).map_err(|_| Error::InvalidTxid(txid.to_string()))
}

/// Derives the sender's own address from the signing key.
///
/// Segwit and taproot addresses require a compressed key.
pub fn sender_address(
    private_key: &PrivateKey,
    kind: SenderKind,
    network: Network,
) -> Result<Address, Error> {
    let secp = SecpCtx::new();
    let public_key = private_key.public_key(&secp);

    match kind {
        SenderKind::Legacy => Ok(Address::p2pkh(public_key.pubkey_hash(), network)),
        SenderKind::SegwitV0 => {
            let compressed =
                CompressedPublicKey::try_from(public_key).map_err(|_| Error::InvalidKey)?;
            Ok(Address::p2wpkh(&compressed, network))
        }
        SenderKind::Taproot => {
            if !public_key.compressed {
                return Err(Error::InvalidKey);
            }
            let internal_key = XOnlyPublicKey::from(public_key.inner);
            Ok(Address::p2tr(&secp, internal_key, None, network))
        }
    }
}
