use serde::{Deserialize, Serialize};

/// ウォレットが保持する使用可能なUTXO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub txid: String,
    pub output_index: u32,
    pub satoshis: u64,
    #[serde(rename = "bip32_path", default)]
    pub bip32_path: Option<String>,
}

/// デバイスに渡す入力 (keepkey TxInputType 相当)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxInput {
    pub address_n: Vec<u32>,
    #[serde(with = "hex_bytes")]
    pub prev_hash: Vec<u8>,
    pub prev_index: u32,
}

/// デバイスに渡す出力 (keepkey TxOutputType 相当)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutput {
    pub address: String,
    pub amount: u64,
    pub script_type: OutputScriptType,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputScriptType {
    PayToAddress,
    PayToScriptHash,
}

impl OutputScriptType {
    /// アドレスの先頭文字から出力タイプを選ぶ。
    /// Terracoinのスクリプトハッシュアドレスは '3' で始まる (chainparams: base58 prefix 5)
    pub fn for_address(address: &str) -> Self {
        if address.starts_with('3') {
            OutputScriptType::PayToScriptHash
        } else {
            OutputScriptType::PayToAddress
        }
    }

    /// protobuf 上の値
    pub fn to_proto(self) -> i32 {
        match self {
            OutputScriptType::PayToAddress => 0,
            OutputScriptType::PayToScriptHash => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinMatrixRequestType {
    Current,
    NewFirst,
    NewSecond,
    Unknown(u32),
}

impl From<u32> for PinMatrixRequestType {
    fn from(code: u32) -> Self {
        match code {
            1 => PinMatrixRequestType::Current,
            2 => PinMatrixRequestType::NewFirst,
            3 => PinMatrixRequestType::NewSecond,
            other => PinMatrixRequestType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMatrixRequest {
    pub request_type: Option<PinMatrixRequestType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMatrixAck {
    pub pin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassphraseRequest {
    pub on_device: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassphraseAck {
    pub passphrase: String,
}

/// ApplySettings で変更する項目。None の項目はデバイス側で変更しない
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    pub label: Option<String>,
    pub language: Option<String>,
    pub use_passphrase: Option<bool>,
    pub homescreen: Option<Vec<u8>>,
}

/// sign_tx の結果: 入力ごとの署名とシリアライズ済みトランザクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub signatures: Vec<Vec<u8>>,
    pub serialized_tx: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSignature {
    pub address: String,
    pub signature: Vec<u8>,
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }
}
