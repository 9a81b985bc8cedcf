use std::path::PathBuf;
use std::sync::Arc;
use bitcoin::base58;
use serde::Serialize;

use crate::{
    client::{HwClient, COIN_NAME},
    error::AppError,
    path::expand_path,
    tx_api::{CachedTxApi, RawTxSource, TERRACOIN_INSIGHT_NETWORK},
    types::{DeviceSettings, MessageSignature, OutputScriptType, TxInput, TxOutput, Utxo},
};

// base58check のペイロード長 (バージョン1バイト + hash160)
const ADDRESS_PAYLOAD_LEN: usize = 21;
const TXID_LEN: usize = 32;

/// ハードウェアウォレット操作に必要なウォレット側の状態
pub struct WalletContext<C> {
    pub hw_client: Option<C>,
    pub tx_source: Arc<dyn RawTxSource + Send + Sync>,
    pub cache_dir: Option<PathBuf>,
}

impl<C: HwClient> WalletContext<C> {
    pub fn new(tx_source: Arc<dyn RawTxSource + Send + Sync>, cache_dir: Option<PathBuf>) -> Self {
        Self { hw_client: None, tx_source, cache_dir }
    }

    fn client(&mut self) -> Result<&mut C, AppError> {
        self.hw_client.as_mut().ok_or(AppError::NoHwClient)
    }
}

/// デバイスに渡す前の入出力
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedTransfer {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub serialized_tx: Vec<u8>,
    pub amount: u64,
}

/// UTXOをすべて送金先へ送る入出力を組み立てる (送金額 = 入力合計 - 手数料)
pub fn build_transfer(utxos: &[Utxo], dest_address: &str, tx_fee: u64) -> Result<PreparedTransfer, AppError> {
    if utxos.is_empty() {
        return Err(AppError::InputValidation("送金するUTXOがありません".to_string()));
    }
    validate_address(dest_address)?;

    let mut inputs = Vec::with_capacity(utxos.len());
    let mut total_sats: u64 = 0;

    for utxo in utxos {
        let path = match utxo.bip32_path.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(AppError::MissingBip32Path { txid: utxo.txid.clone() }),
        };
        let address_n = expand_path(path)?;

        let prev_hash = hex::decode(&utxo.txid).map_err(|e| AppError::InvalidTxid {
            txid: utxo.txid.clone(),
            source: e,
        })?;
        if prev_hash.len() != TXID_LEN {
            return Err(AppError::InvalidTxid {
                txid: utxo.txid.clone(),
                source: hex::FromHexError::InvalidStringLength,
            });
        }

        inputs.push(TxInput {
            address_n,
            prev_hash,
            prev_index: utxo.output_index,
        });
        total_sats = total_sats
            .checked_add(utxo.satoshis)
            .ok_or_else(|| AppError::InputValidation("入力合計がオーバーフローしました".to_string()))?;
        log::debug!("入力追加: txid={}, index={}, value={}, path={}",
            utxo.txid, utxo.output_index, utxo.satoshis, path);
    }

    let amount = total_sats.checked_sub(tx_fee).ok_or(AppError::InsufficientFunds {
        available: total_sats,
        fee: tx_fee,
    })?;

    let script_type = OutputScriptType::for_address(dest_address);
    log::debug!("出力: address={}, amount={}, type={:?}", dest_address, amount, script_type);

    Ok(PreparedTransfer {
        inputs,
        outputs: vec![TxOutput {
            address: dest_address.to_string(),
            amount,
            script_type,
        }],
        amount,
    })
}

/// 送金トランザクションを作成し、デバイスで署名する
pub fn prepare_transfer_tx<C: HwClient>(
    ctx: &mut WalletContext<C>,
    utxos: &[Utxo],
    dest_address: &str,
    tx_fee: u64,
) -> Result<SignedTransfer, AppError> {
    log::info!("送金トランザクションの作成を開始します。");
    let tx_api = CachedTxApi::new(TERRACOIN_INSIGHT_NETWORK, ctx.tx_source.clone(), ctx.cache_dir.clone());
    let client = ctx.client()?;
    client.set_tx_api(Box::new(tx_api));

    let prepared = build_transfer(utxos, dest_address, tx_fee)?;
    let signed = client.sign_tx(COIN_NAME, &prepared.inputs, &prepared.outputs)?;
    log::info!("署名済みトランザクションを受け取りました ({} bytes, 送金額 {} sats)。",
        signed.serialized_tx.len(), prepared.amount);

    Ok(SignedTransfer {
        serialized_tx: signed.serialized_tx,
        amount: prepared.amount,
    })
}

pub fn sign_message<C: HwClient>(
    ctx: &mut WalletContext<C>,
    bip32_path: &str,
    message: &[u8],
) -> Result<MessageSignature, AppError> {
    let client = ctx.client()?;
    let address_n = expand_path(bip32_path)?;
    client.sign_message(COIN_NAME, &address_n, message)
}

pub fn change_pin<C: HwClient>(ctx: &mut WalletContext<C>, remove: bool) -> Result<(), AppError> {
    ctx.client()?.change_pin(remove)
}

pub fn apply_settings<C: HwClient>(ctx: &mut WalletContext<C>, settings: &DeviceSettings) -> Result<(), AppError> {
    ctx.client()?.apply_settings(settings)
}

/// base58check として正しく、ペイロードが21バイトであることを確認する
pub fn validate_address(address: &str) -> Result<(), AppError> {
    let payload = base58::decode_check(address)
        .map_err(|e| AppError::InvalidAddress(format!("{} ({})", address, e)))?;
    if payload.len() != ADDRESS_PAYLOAD_LEN {
        return Err(AppError::InvalidAddress(format!("{} (ペイロード長 {})", address, payload.len())));
    }
    Ok(())
}
