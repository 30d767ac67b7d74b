use anyhow::Ok;
use bdk_opreturn::{
    BuildConfig, MessageBudget, OpReturnRequest, Receipt, SenderKind, Signer, TransactionBuilder,
    RECEIPT_FILE_NAME,
};
use bdk_wallet::{keys::DescriptorSecretKey, rusqlite::Connection, KeychainKind, Wallet};
use bitcoin::{Amount, Network, PrivateKey};

const NETWORK: Network = Network::Signet;
const EXTERNAL_DESC: &str = "wpkh(tprv8ZgxMBicQKsPdy6LMhUtFHAgpocR8GC6QmwMSFpZs7h6Eziw3SpThFfczTDh5rW2krkqffa11UpX3XkeTTB2FvzZKWXqPY54Y6Rq4AQ5R8L/84'/1'/0'/0/*)";
const INTERNAL_DESC: &str = "wpkh(tprv8ZgxMBicQKsPdy6LMhUtFHAgpocR8GC6QmwMSFpZs7h6Eziw3SpThFfczTDh5rW2krkqffa11UpX3XkeTTB2FvzZKWXqPY54Y6Rq4AQ5R8L/84'/1'/0'/1/*)";

// Recipient and funding outpoint are placeholders; swap in a real UTXO to broadcast.
const RECIPIENT: &str = "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx";
const UTXO_TXID: &str = "0437cd7f8525ceed2324359c2d0ba26006d92d856a9c20fa0241106ee5a597c9";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut conn = Connection::open_in_memory()?;
    let wallet = Wallet::create(EXTERNAL_DESC, INTERNAL_DESC)
        .network(NETWORK)
        .create_wallet(&mut conn)?;

    let private_key = wallet
        .get_signers(KeychainKind::External)
        .signers()
        .iter()
        .filter_map(|signer| signer.descriptor_secret_key())
        .find_map(|descriptor_secret| {
            if let DescriptorSecretKey::XPrv(single_priv) = descriptor_secret {
                Some(PrivateKey::new(single_priv.xkey.private_key, NETWORK))
            } else {
                None
            }
        })
        .ok_or_else(|| anyhow::anyhow!("wallet has no extended private key"))?;

    let request = OpReturnRequest {
        private_key_wif: private_key.to_wif(),
        utxo_txid: UTXO_TXID.to_string(),
        utxo_index: 0,
        utxo_value: Amount::from_sat(100_000),
        recipient_address: RECIPIENT.to_string(),
        send_amount: Amount::from_sat(20_000),
        message: "HELLO WORLD".to_string(),
        fee: None,
    };

    let config = BuildConfig::new(NETWORK).with_sender_kind(SenderKind::SegwitV0);

    let budget = MessageBudget::new(&request.message, config.max_message_len);
    println!("{}", budget);
    if budget.is_exceeded() {
        anyhow::bail!("message does not fit in an OP_RETURN output");
    }

    let builder = TransactionBuilder::new(config);
    let signed = builder.build_and_sign(&request, &Signer::new())?;

    let receipt = Receipt::new(
        &signed,
        &request.message,
        &request.recipient_address,
        request.send_amount,
        request.fee.unwrap_or(config.default_fee),
    );

    println!("===============================");
    println!(" BITCOIN TRANSACTION (OP_RETURN)");
    println!("===============================");
    print!("{}", receipt.summary());
    println!("Txid: {}", signed.txid());

    receipt.write_to(RECEIPT_FILE_NAME)?;
    println!("Saved to file: {}", RECEIPT_FILE_NAME);

    Ok(())
}
