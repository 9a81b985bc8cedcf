use std::path::PathBuf;
use bitcoin::bip32::Error as Bip32Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSONパースエラー ファイル: {file_path:?}, 詳細: {source}")]
    JsonParse {
        file_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// PIN/パスフレーズ入力でユーザーが取り消した
    #[error("ユーザーにより取り消されました")]
    Cancelled,

    #[error("UTXO {txid} にBIP32パスがありません")]
    MissingBip32Path { txid: String },

    #[error("ハードウェアウォレットのクライアントが設定されていません")]
    NoHwClient,

    #[error("無効なBIP32パス ({path}): {source}")]
    InvalidBip32Path {
        path: String,
        #[source]
        source: Bip32Error,
    },

    #[error("無効なTXID形式 ({txid}): {source}")]
    InvalidTxid {
        txid: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("無効な送金先アドレス: {0}")]
    InvalidAddress(String),

    #[error("資金不足: 利用可能な総額 {available} sats, 手数料 {fee} sats")]
    InsufficientFunds { available: u64, fee: u64 },

    #[error("デバイスエラー: {0}")]
    Device(String),

    #[error("terracoind RPCエラー: {0}")]
    Rpc(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("メインスレッドのイベントループが停止しています")]
    MainThreadUnavailable,

    #[error("入力検証エラー: {0}")]
    InputValidation(String),

    #[error("内部エラー: {0}")]
    Internal(String),
}

impl AppError {
    /// ユーザー操作による中断かどうか (汎用エラーと区別する)
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}
