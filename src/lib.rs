//! KeepKey ハードウェアウォレットで Terracoin の送金・メッセージ署名を行うためのアダプタ
//!
//! デバイスとの通信プロトコルそのものはベンダーのクライアント ([`client::HwClient`]) に任せ、
//! このクレートは接続、PIN/パスフレーズのコールバック、入出力の組み立て、
//! 前トランザクション取得のキャッシュを受け持つ。

pub mod callbacks;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod main_thread;
pub mod path;
pub mod rpc;
pub mod transaction;
pub mod tx_api;
pub mod types;

pub use error::AppError;
