use std::fs;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppError;
use crate::types::Utxo;

/// ウォレット設定ファイル
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub rpc: RpcConfig,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RpcConfig {
    pub url: String, // 例: "http://127.0.0.1:13332"
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 送金リクエストファイル
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub utxos: Vec<Utxo>,
    pub dest_address: String,
    pub tx_fee: u64,
}

/// JSONファイルを読み込んでパースする
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        log::error!("ファイルの読み込みに失敗しました: {:?}", path);
        AppError::Io(e)
    })?;
    serde_json::from_str(&content).map_err(|e| {
        log::error!("JSONのパースに失敗しました: {:?}", path);
        AppError::JsonParse {
            file_path: path.to_path_buf(),
            source: e,
        }
    })
}
