//! Assembly of the single-input OP_RETURN transaction.
//!
//! Outputs always come in the same order: the data carrier first, the payment
//! second and the change last. Change is only created when it exceeds the
//! dust limit; smaller remainders are left to the miner.

use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

use bitcoin::{
    absolute::LockTime, consensus::encode, transaction::Version, Address, Amount, Network,
    OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};
use log::debug;

use crate::{
    parse_txid, parse_wif, sender_address, AddressResolver, BuildConfig, Error, OpReturnEncoder,
    ScriptResolver, TransactionSigner,
};

/// The output being spent, as referenced by the new transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    pub outpoint: OutPoint,
    pub value: Amount,
    pub script_pubkey: ScriptBuf,
}

impl Utxo {
    pub fn new(outpoint: OutPoint, value: Amount, script_pubkey: ScriptBuf) -> Self {
        Self {
            outpoint,
            value,
            script_pubkey,
        }
    }

    pub fn txout(&self) -> TxOut {
        TxOut {
            value: self.value,
            script_pubkey: self.script_pubkey.clone(),
        }
    }
}

/// Inputs to a single build.
///
/// `sender_address` is the address of the key that will sign; it locks the
/// spent output and receives any change.
#[derive(Clone, Debug)]
pub struct BuildRequest<'a> {
    pub outpoint: OutPoint,
    pub utxo_value: Amount,
    pub sender_address: &'a str,
    pub recipient_address: &'a str,
    pub send_amount: Amount,
    pub message: &'a [u8],
    /// Falls back to [`BuildConfig::default_fee`] when unset.
    pub fee: Option<Amount>,
}

/// End-to-end request, as entered by a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpReturnRequest {
    pub private_key_wif: String,
    pub utxo_txid: String,
    pub utxo_index: u32,
    pub utxo_value: Amount,
    pub recipient_address: String,
    pub send_amount: Amount,
    pub message: String,
    pub fee: Option<Amount>,
}

/// A fully assembled transaction whose input is not yet unlocked.
///
/// Only [`TransactionBuilder::build`] constructs it, so the data and payment
/// outputs are always present and never exceed the spent value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    tx: Transaction,
    /// The spent output, needed by the signer for sighash computation.
    utxo: Utxo,
    network: Network,
}

impl UnsignedTransaction {
    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn utxo(&self) -> &Utxo {
        &self.utxo
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn into_parts(self) -> (Transaction, Utxo) {
        (self.tx, self.utxo)
    }

    pub fn data_output(&self) -> &TxOut {
        &self.tx.output[0]
    }

    pub fn payment_output(&self) -> &TxOut {
        &self.tx.output[1]
    }

    pub fn change_output(&self) -> Option<&TxOut> {
        self.tx.output.get(2)
    }

    /// Fee actually paid, including any change absorbed as dust.
    pub fn effective_fee(&self) -> Amount {
        let spent: Amount = self.tx.output.iter().map(|output| output.value).sum();
        self.utxo.value - spent
    }

    pub fn serialize(&self) -> Vec<u8> {
        serialize(&self.tx)
    }
}

/// A signed transaction ready to be broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedOpReturnTx {
    pub tx: Transaction,
    pub sender: Address,
    /// Value of the change output, zero when none was created.
    pub change: Amount,
}

impl SignedOpReturnTx {
    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    pub fn serialize(&self) -> Vec<u8> {
        serialize(&self.tx)
    }

    pub fn to_hex(&self) -> String {
        serialize_hex(&self.tx)
    }
}

/// Canonical wire encoding of a transaction.
pub fn serialize(tx: &Transaction) -> Vec<u8> {
    encode::serialize(tx)
}

/// Lowercase hex of the canonical wire encoding.
pub fn serialize_hex(tx: &Transaction) -> String {
    encode::serialize_hex(tx)
}

/// Builds OP_RETURN transactions under one [`BuildConfig`].
pub struct TransactionBuilder<R = AddressResolver> {
    config: BuildConfig,
    resolver: R,
}

impl TransactionBuilder<AddressResolver> {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            resolver: AddressResolver::new(config.network),
        }
    }
}

impl<R: ScriptResolver> TransactionBuilder<R> {
    pub fn with_resolver(config: BuildConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Assembles the unsigned transaction and returns it with the change
    /// actually allocated to an output.
    pub fn build(&self, request: &BuildRequest) -> Result<(UnsignedTransaction, Amount), Error> {
        let sender_script = self.resolver.resolve(request.sender_address)?;

        let fee = request.fee.unwrap_or(self.config.default_fee);
        let required = request
            .send_amount
            .checked_add(fee)
            .ok_or(Error::InsufficientFunds {
                available: request.utxo_value,
                required: Amount::MAX,
            })?;
        let change = request
            .utxo_value
            .checked_sub(required)
            .ok_or(Error::InsufficientFunds {
                available: request.utxo_value,
                required,
            })?;

        if request.message.len() > self.config.max_message_len {
            return Err(Error::MessageTooLong {
                len: request.message.len(),
                max: self.config.max_message_len,
            });
        }
        let data_script = OpReturnEncoder::encode(request.message)?;

        let recipient_script = self.resolver.resolve(request.recipient_address)?;

        let utxo = Utxo::new(request.outpoint, request.utxo_value, sender_script);

        let mut output = vec![
            TxOut {
                value: Amount::ZERO,
                script_pubkey: data_script,
            },
            TxOut {
                value: request.send_amount,
                script_pubkey: recipient_script,
            },
        ];

        let change = if change > self.config.dust_limit {
            output.push(TxOut {
                value: change,
                script_pubkey: utxo.script_pubkey.clone(),
            });
            change
        } else {
            debug!(
                "change of {} sat is within dust limit of {} sat, leaving it to fee",
                change.to_sat(),
                self.config.dust_limit.to_sat()
            );
            Amount::ZERO
        };

        let tx = Transaction {
            version: Version::ONE,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: utxo.outpoint,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output,
        };

        debug!(
            "built OP_RETURN transaction spending {}: send {} sat, fee {} sat, change {} sat, {} outputs",
            utxo.outpoint,
            request.send_amount.to_sat(),
            fee.to_sat(),
            change.to_sat(),
            tx.output.len()
        );

        let unsigned = UnsignedTransaction {
            tx,
            utxo,
            network: self.config.network,
        };

        Ok((unsigned, change))
    }

    /// Parses the request, builds the transaction and hands it to `signer`.
    pub fn build_and_sign<S: TransactionSigner>(
        &self,
        request: &OpReturnRequest,
        signer: &S,
    ) -> Result<SignedOpReturnTx, Error> {
        let private_key = parse_wif(&request.private_key_wif)?;
        let sender = sender_address(&private_key, self.config.sender_kind, self.config.network)?;
        let outpoint = OutPoint {
            txid: parse_txid(&request.utxo_txid)?,
            vout: request.utxo_index,
        };
        let sender_str = sender.to_string();

        let build_request = BuildRequest {
            outpoint,
            utxo_value: request.utxo_value,
            sender_address: &sender_str,
            recipient_address: &request.recipient_address,
            send_amount: request.send_amount,
            message: request.message.as_bytes(),
            fee: request.fee,
        };
        let (unsigned, change) = self.build(&build_request)?;

        let (mut tx, utxo) = unsigned.into_parts();
        signer.sign(&mut tx, 0, &utxo.txout(), &private_key)?;

        Ok(SignedOpReturnTx { tx, sender, change })
    }
}
