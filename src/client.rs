//! KeepKey クライアントの抽象
//!
//! プロトコル処理 (HIDフレーミング、protobuf、デバイス上の署名) はベンダーの
//! クライアント実装が担う。このクレートはそのクライアントに対して入出力を組み立て、
//! PIN/パスフレーズのコールバックとTxApiを渡すだけ。

use crate::error::AppError;
use crate::tx_api::TxApi;
use crate::types::{DeviceSettings, MessageSignature, SignedTx, TxInput, TxOutput};

/// デバイスに送るコイン名
pub const COIN_NAME: &str = "Terracoin";

/// ベンダーのKeepKeyクライアントが提供する操作
pub trait HwClient {
    /// 署名時に前トランザクションを取得するAPIを設定する
    fn set_tx_api(&mut self, api: Box<dyn TxApi>);

    fn sign_tx(&mut self, coin_name: &str, inputs: &[TxInput], outputs: &[TxOutput]) -> Result<SignedTx, AppError>;

    fn sign_message(&mut self, coin_name: &str, address_n: &[u32], message: &[u8]) -> Result<MessageSignature, AppError>;

    /// `remove` が true なら PIN を削除する
    fn change_pin(&mut self, remove: bool) -> Result<(), AppError>;

    fn apply_settings(&mut self, settings: &DeviceSettings) -> Result<(), AppError>;

    /// Initialize を送り直してデバイス状態を取得し直す
    fn init_device(&mut self) -> Result<(), AppError>;
}

impl<C: HwClient + ?Sized> HwClient for Box<C> {
    fn set_tx_api(&mut self, api: Box<dyn TxApi>) {
        (**self).set_tx_api(api)
    }

    fn sign_tx(&mut self, coin_name: &str, inputs: &[TxInput], outputs: &[TxOutput]) -> Result<SignedTx, AppError> {
        (**self).sign_tx(coin_name, inputs, outputs)
    }

    fn sign_message(&mut self, coin_name: &str, address_n: &[u32], message: &[u8]) -> Result<MessageSignature, AppError> {
        (**self).sign_message(coin_name, address_n, message)
    }

    fn change_pin(&mut self, remove: bool) -> Result<(), AppError> {
        (**self).change_pin(remove)
    }

    fn apply_settings(&mut self, settings: &DeviceSettings) -> Result<(), AppError> {
        (**self).apply_settings(settings)
    }

    fn init_device(&mut self) -> Result<(), AppError> {
        (**self).init_device()
    }
}
