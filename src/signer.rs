//! Signing of single-key inputs for the assembled transaction.

use alloc::{format, string::ToString};

use bitcoin::{
    ecdsa,
    hashes::Hash,
    key::{Keypair, TapTweak},
    script::Builder,
    secp256k1::Message,
    sighash::{Prevouts, SighashCache},
    taproot, CompressedPublicKey, EcdsaSighashType, PrivateKey, ScriptBuf, TapSighashType,
    Transaction, TxOut, Witness,
};
use log::{debug, trace};

use crate::{Error, SecpCtx};

/// Populates the unlocking data of one input.
///
/// `prevout` is the output being spent; its locking script decides which
/// sighash algorithm applies.
pub trait TransactionSigner {
    fn sign(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        prevout: &TxOut,
        private_key: &PrivateKey,
    ) -> Result<(), Error>;
}

/// Signs P2PKH, P2WPKH and P2TR key-path inputs.
pub struct Signer {
    secp: SecpCtx,
}

impl Default for Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer {
    pub fn new() -> Self {
        Self {
            secp: SecpCtx::new(),
        }
    }

    fn sign_legacy(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        prevout: &TxOut,
        private_key: &PrivateKey,
    ) -> Result<(), Error> {
        let public_key = private_key.public_key(&self.secp);
        ensure_key_matches(prevout, ScriptBuf::new_p2pkh(&public_key.pubkey_hash()))?;

        let sighash = SighashCache::new(&*tx)
            .legacy_signature_hash(
                input_index,
                &prevout.script_pubkey,
                EcdsaSighashType::All.to_u32(),
            )
            .map_err(|e| Error::SigningFailure(e.to_string()))?;

        let message = Message::from_digest(sighash.to_byte_array());
        let signature = ecdsa::Signature {
            signature: self.secp.sign_ecdsa(&message, &private_key.inner),
            sighash_type: EcdsaSighashType::All,
        };

        tx.input[input_index].script_sig = Builder::new()
            .push_slice(signature.serialize())
            .push_key(&public_key)
            .into_script();

        Ok(())
    }

    fn sign_p2wpkh(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        prevout: &TxOut,
        private_key: &PrivateKey,
    ) -> Result<(), Error> {
        let public_key = CompressedPublicKey::from_private_key(&self.secp, private_key)
            .map_err(|e| Error::SigningFailure(e.to_string()))?;
        ensure_key_matches(prevout, ScriptBuf::new_p2wpkh(&public_key.wpubkey_hash()))?;

        let sighash = SighashCache::new(&*tx)
            .p2wpkh_signature_hash(
                input_index,
                &prevout.script_pubkey,
                prevout.value,
                EcdsaSighashType::All,
            )
            .map_err(|e| Error::SigningFailure(e.to_string()))?;

        let message = Message::from_digest(sighash.to_byte_array());
        let signature = ecdsa::Signature {
            signature: self.secp.sign_ecdsa(&message, &private_key.inner),
            sighash_type: EcdsaSighashType::All,
        };

        tx.input[input_index].witness = Witness::p2wpkh(&signature, &public_key.0);

        Ok(())
    }

    fn sign_p2tr(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        prevout: &TxOut,
        private_key: &PrivateKey,
    ) -> Result<(), Error> {
        let untweaked = Keypair::from_secret_key(&self.secp, &private_key.inner);
        let (internal_key, _) = untweaked.x_only_public_key();
        ensure_key_matches(prevout, ScriptBuf::new_p2tr(&self.secp, internal_key, None))?;

        let prevouts = [prevout];
        let sighash = SighashCache::new(&*tx)
            .taproot_key_spend_signature_hash(
                input_index,
                &Prevouts::All(&prevouts),
                TapSighashType::Default,
            )
            .map_err(|e| Error::SigningFailure(e.to_string()))?;

        let keypair = untweaked.tap_tweak(&self.secp, None).to_inner();

        let message = Message::from_digest(sighash.to_byte_array());
        let signature = taproot::Signature {
            signature: self.secp.sign_schnorr_no_aux_rand(&message, &keypair),
            sighash_type: TapSighashType::Default,
        };

        tx.input[input_index].witness = Witness::p2tr_key_spend(&signature);

        Ok(())
    }
}

fn ensure_key_matches(prevout: &TxOut, expected: ScriptBuf) -> Result<(), Error> {
    if prevout.script_pubkey != expected {
        return Err(Error::SigningFailure(
            "private key does not control the spent output".to_string(),
        ));
    }
    Ok(())
}

impl TransactionSigner for Signer {
    fn sign(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        prevout: &TxOut,
        private_key: &PrivateKey,
    ) -> Result<(), Error> {
        if input_index >= tx.input.len() {
            return Err(Error::SigningFailure(format!(
                "input index {} out of range for {} inputs",
                input_index,
                tx.input.len()
            )));
        }

        let script_pubkey = &prevout.script_pubkey;
        if script_pubkey.is_p2pkh() {
            trace!("signing input {} with legacy sighash", input_index);
            self.sign_legacy(tx, input_index, prevout, private_key)?;
        } else if script_pubkey.is_p2wpkh() {
            trace!("signing input {} with segwit v0 sighash", input_index);
            self.sign_p2wpkh(tx, input_index, prevout, private_key)?;
        } else if script_pubkey.is_p2tr() {
            trace!("signing input {} with taproot key-spend sighash", input_index);
            self.sign_p2tr(tx, input_index, prevout, private_key)?;
        } else {
            return Err(Error::SigningFailure("unsupported locking script".to_string()));
        }

        debug!("signed input {} of {}", input_index, tx.compute_txid());

        Ok(())
    }
}
