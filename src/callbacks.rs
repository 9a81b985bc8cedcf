use crate::error::AppError;
use crate::types::{PassphraseAck, PassphraseRequest, PinMatrixAck, PinMatrixRequest, PinMatrixRequestType};

/// PIN/パスフレーズを利用者に尋ねるUI側の実装。
/// None を返すとユーザーによる取り消しとして扱う
pub trait UserPrompt {
    fn ask_for_pin(&self, description: &str) -> Option<String>;
    fn ask_for_passphrase(&self, description: &str) -> Option<String>;
}

impl<U: UserPrompt + ?Sized> UserPrompt for &U {
    fn ask_for_pin(&self, description: &str) -> Option<String> {
        (**self).ask_for_pin(description)
    }

    fn ask_for_passphrase(&self, description: &str) -> Option<String> {
        (**self).ask_for_passphrase(description)
    }
}

/// 署名中にクライアントから呼ばれるコールバック。
/// 応答が返るまで呼び出し元をブロックする
pub struct KeepkeyCallbacks<U> {
    prompt: U,
}

impl<U: UserPrompt> KeepkeyCallbacks<U> {
    pub fn new(prompt: U) -> Self {
        Self { prompt }
    }

    pub fn on_passphrase_request(&self, _msg: &PassphraseRequest) -> Result<PassphraseAck, AppError> {
        match self.prompt.ask_for_passphrase("Enter passphrase") {
            Some(passphrase) if !passphrase.is_empty() => Ok(PassphraseAck { passphrase }),
            _ => {
                log::info!("パスフレーズ入力が取り消されました。");
                Err(AppError::Cancelled)
            }
        }
    }

    pub fn on_pin_matrix_request(&self, msg: &PinMatrixRequest) -> Result<PinMatrixAck, AppError> {
        let desc = pin_request_description(msg.request_type);
        match self.prompt.ask_for_pin(desc) {
            Some(pin) if !pin.is_empty() => Ok(PinMatrixAck { pin }),
            _ => {
                log::info!("PIN入力が取り消されました。");
                Err(AppError::Cancelled)
            }
        }
    }
}

fn pin_request_description(request_type: Option<PinMatrixRequestType>) -> &'static str {
    match request_type {
        Some(PinMatrixRequestType::Current) => "Enter current PIN",
        Some(PinMatrixRequestType::NewFirst) => "Enter new PIN",
        Some(PinMatrixRequestType::NewSecond) => "Enter new PIN again",
        _ => "Enter PIN",
    }
}

/// 端末から入力を読むプロンプト。入力はエコーしない
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn ask_for_pin(&self, description: &str) -> Option<String> {
        // デバイス画面の数字配置に対応するキー位置
        eprintln!("{}", description);
        eprintln!("    7 8 9");
        eprintln!("    4 5 6");
        eprintln!("    1 2 3");
        match rpassword::prompt_password("PIN: ") {
            Ok(pin) => Some(pin.trim().to_string()),
            Err(e) => {
                log::error!("PINの読み込みに失敗しました: {}", e);
                None
            }
        }
    }

    fn ask_for_passphrase(&self, description: &str) -> Option<String> {
        match rpassword::prompt_password(format!("{}: ", description)) {
            Ok(passphrase) => Some(passphrase),
            Err(e) => {
                log::error!("パスフレーズの読み込みに失敗しました: {}", e);
                None
            }
        }
    }
}
