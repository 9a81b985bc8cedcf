use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde_json::{json, Value};

use keepkey_terracoin::{
    callbacks::{KeepkeyCallbacks, UserPrompt},
    client::HwClient,
    error::AppError,
    transaction::{apply_settings, change_pin, prepare_transfer_tx, sign_message, WalletContext},
    tx_api::{RawTxSource, TxApi},
    types::{DeviceSettings, MessageSignature, PinMatrixRequest, SignedTx, TxInput, TxOutput, Utxo},
};

const DEST: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

#[derive(Default)]
struct Node {
    calls: AtomicUsize,
}

impl RawTxSource for Node {
    fn getrawtransaction(&self, txid: &str, _verbose: bool) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "txid": txid, "hex": "0100" }))
    }
}

struct Prompt(Option<&'static str>);

impl UserPrompt for Prompt {
    fn ask_for_pin(&self, _: &str) -> Option<String> {
        self.0.map(str::to_string)
    }

    fn ask_for_passphrase(&self, _: &str) -> Option<String> {
        self.0.map(str::to_string)
    }
}

/// 署名前に PIN を要求し、入力ごとに前トランザクションを参照するクライアント
struct FakeKeepkey {
    callbacks: KeepkeyCallbacks<Prompt>,
    tx_api: Option<Box<dyn TxApi>>,
    signed_inputs: Vec<TxInput>,
    signed_outputs: Vec<TxOutput>,
    settings: Option<DeviceSettings>,
    pin_removed: Option<bool>,
}

impl FakeKeepkey {
    fn new(pin: Option<&'static str>) -> Self {
        Self {
            callbacks: KeepkeyCallbacks::new(Prompt(pin)),
            tx_api: None,
            signed_inputs: vec![],
            signed_outputs: vec![],
            settings: None,
            pin_removed: None,
        }
    }
}

impl HwClient for FakeKeepkey {
    fn set_tx_api(&mut self, api: Box<dyn TxApi>) {
        self.tx_api = Some(api);
    }

    fn sign_tx(&mut self, coin_name: &str, inputs: &[TxInput], outputs: &[TxOutput]) -> Result<SignedTx, AppError> {
        assert_eq!(coin_name, "Terracoin");
        self.callbacks.on_pin_matrix_request(&PinMatrixRequest { request_type: None })?;

        let api = self.tx_api.as_ref().expect("tx api must be set before signing");
        for input in inputs {
            api.get_tx(&hex::encode(&input.prev_hash))?;
        }
        self.signed_inputs = inputs.to_vec();
        self.signed_outputs = outputs.to_vec();
        Ok(SignedTx { signatures: vec![vec![0x30]], serialized_tx: vec![0x01, 0x00, 0x00, 0x00] })
    }

    fn sign_message(&mut self, coin_name: &str, address_n: &[u32], message: &[u8]) -> Result<MessageSignature, AppError> {
        assert_eq!(coin_name, "Terracoin");
        self.callbacks.on_pin_matrix_request(&PinMatrixRequest { request_type: None })?;
        Ok(MessageSignature {
            address: format!("{:?}", address_n),
            signature: message.to_vec(),
        })
    }

    fn change_pin(&mut self, remove: bool) -> Result<(), AppError> {
        self.pin_removed = Some(remove);
        Ok(())
    }

    fn apply_settings(&mut self, settings: &DeviceSettings) -> Result<(), AppError> {
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn init_device(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

fn utxo(sats: u64) -> Utxo {
    Utxo {
        txid: TXID.to_string(),
        output_index: 1,
        satoshis: sats,
        bip32_path: Some("44'/83'/0'/0/0".to_string()),
    }
}

#[test]
fn transfer_is_signed_and_prev_txs_are_cached() {
    let dir = tempfile::tempdir().unwrap();
    let node = Arc::new(Node::default());
    let mut ctx = WalletContext::new(node.clone(), Some(dir.path().to_path_buf()));
    ctx.hw_client = Some(FakeKeepkey::new(Some("1234")));

    let signed = prepare_transfer_tx(&mut ctx, &[utxo(100_000)], DEST, 1_500).unwrap();
    assert_eq!(signed.amount, 98_500);
    assert_eq!(signed.serialized_tx, vec![0x01, 0x00, 0x00, 0x00]);

    let client = ctx.hw_client.as_ref().unwrap();
    assert_eq!(client.signed_outputs[0].amount, 98_500);
    assert_eq!(client.signed_inputs[0].prev_index, 1);
    assert_eq!(node.calls.load(Ordering::SeqCst), 1);
    assert!(dir.path().join(format!("insight_terracoin_tx_{}.json", TXID)).exists());

    // 2回目は前トランザクションをキャッシュから読む
    prepare_transfer_tx(&mut ctx, &[utxo(100_000)], DEST, 1_500).unwrap();
    assert_eq!(node.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_pin_cancels_signing() {
    let mut ctx = WalletContext::new(Arc::new(Node::default()), None);
    ctx.hw_client = Some(FakeKeepkey::new(Some("")));

    let err = prepare_transfer_tx(&mut ctx, &[utxo(10_000)], DEST, 100).unwrap_err();
    assert!(err.is_cancelled());

    let err = sign_message(&mut ctx, "44'/83'/0'/0/0", b"hello").unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn operations_require_client() {
    let mut ctx: WalletContext<FakeKeepkey> = WalletContext::new(Arc::new(Node::default()), None);

    assert!(matches!(prepare_transfer_tx(&mut ctx, &[utxo(10_000)], DEST, 100), Err(AppError::NoHwClient)));
    assert!(matches!(sign_message(&mut ctx, "44'/83'/0'/0/0", b"hi"), Err(AppError::NoHwClient)));
    assert!(matches!(change_pin(&mut ctx, false), Err(AppError::NoHwClient)));
    assert!(matches!(apply_settings(&mut ctx, &DeviceSettings::default()), Err(AppError::NoHwClient)));
}

#[test]
fn message_pin_and_settings_are_forwarded() {
    let mut ctx = WalletContext::new(Arc::new(Node::default()), None);
    ctx.hw_client = Some(FakeKeepkey::new(Some("1234")));

    let sig = sign_message(&mut ctx, "m/44'/83'/0'/0/7", b"hello").unwrap();
    assert_eq!(sig.signature, b"hello".to_vec());
    assert_eq!(sig.address, format!("{:?}", vec![0x8000_002Cu32, 0x8000_0053, 0x8000_0000, 0, 7]));

    change_pin(&mut ctx, true).unwrap();
    let settings = DeviceSettings { label: Some("terracoin".into()), use_passphrase: Some(true), ..Default::default() };
    apply_settings(&mut ctx, &settings).unwrap();

    let client = ctx.hw_client.as_ref().unwrap();
    assert_eq!(client.pin_removed, Some(true));
    assert_eq!(client.settings.as_ref(), Some(&settings));
}
