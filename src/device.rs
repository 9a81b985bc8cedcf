//! KeepKey デバイスの列挙と接続

use std::fmt::Debug;

use crate::callbacks::{KeepkeyCallbacks, UserPrompt};
use crate::client::HwClient;
use crate::error::AppError;
use crate::main_thread::MainThread;

#[cfg(feature = "hid")]
pub use hid::{HidEnumerator, HidTransport, KEEPKEY_PRODUCT_ID, KEEPKEY_VENDOR_ID};

/// 接続済みデバイスを列挙する
pub trait DeviceEnumerator: Clone + Send + 'static {
    type Transport: Debug + Send + 'static;

    fn enumerate(&self) -> Result<Vec<Self::Transport>, AppError>;
}

/// 最初に見つかったデバイスに接続し、コールバックを組み込んだクライアントを返す。
/// デバイスが無い場合や列挙に失敗した場合はログを残して `None` を返す
pub fn connect_keepkey<E, U, C, F>(
    main: &MainThread,
    enumerator: &E,
    prompt: U,
    make_client: F,
) -> Result<Option<C>, AppError>
where
    E: DeviceEnumerator,
    U: UserPrompt,
    F: FnOnce(E::Transport, KeepkeyCallbacks<U>) -> C,
{
    // 列挙はメインスレッドでのみ行う
    let e = enumerator.clone();
    let transport = main.call(move || first_transport(&e))?;

    match transport {
        Some(t) => {
            log::info!("KeepKeyに接続します: {:?}", t);
            Ok(Some(make_client(t, KeepkeyCallbacks::new(prompt))))
        }
        None => {
            log::warn!("KeepKeyのトランスポートがありません。");
            Ok(None)
        }
    }
}

/// デバイスを初期化し直してから再接続する
pub fn reconnect_keepkey<E, U, C, F>(
    client: &mut C,
    main: &MainThread,
    enumerator: &E,
    prompt: U,
    make_client: F,
) -> Result<Option<C>, AppError>
where
    E: DeviceEnumerator,
    U: UserPrompt,
    C: HwClient,
    F: FnOnce(E::Transport, KeepkeyCallbacks<U>) -> C,
{
    client.init_device().map_err(|e| {
        log::error!("デバイスの再初期化に失敗しました: {}", e);
        e
    })?;
    connect_keepkey(main, enumerator, prompt, make_client)
}

/// 接続中のデバイス一覧 (メインスレッドで列挙)
pub fn list_devices<E: DeviceEnumerator>(main: &MainThread, enumerator: &E) -> Result<Vec<E::Transport>, AppError> {
    let e = enumerator.clone();
    main.call(move || e.enumerate())?
}

fn first_transport<E: DeviceEnumerator>(enumerator: &E) -> Option<E::Transport> {
    match enumerator.enumerate() {
        Ok(devices) => {
            if devices.is_empty() {
                log::warn!("KeepKeyデバイス数: 0");
            }
            devices.into_iter().next()
        }
        Err(e) => {
            log::error!("デバイスの列挙に失敗しました: {}", e);
            None
        }
    }
}

#[cfg(feature = "hid")]
mod hid {
    use std::ffi::CString;
    use std::fmt;
    use hidapi::HidApi;

    use super::DeviceEnumerator;
    use crate::error::AppError;

    pub const KEEPKEY_VENDOR_ID: u16 = 0x2B24;
    pub const KEEPKEY_PRODUCT_ID: u16 = 0x0001;

    /// USB HID 上の KeepKey。オープンはクライアント側で `path` を使って行う
    #[derive(Debug, Clone)]
    pub struct HidTransport {
        pub path: CString,
        pub serial_number: Option<String>,
        pub product: Option<String>,
    }

    impl fmt::Display for HidTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{:16} (USB, {:04x}:{:04x}, {}, {})",
                self.product.as_deref().unwrap_or("KeepKey"),
                KEEPKEY_VENDOR_ID,
                KEEPKEY_PRODUCT_ID,
                self.serial_number.as_deref().unwrap_or("UNKNOWN"),
                self.path.to_string_lossy(),
            )
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct HidEnumerator;

    impl DeviceEnumerator for HidEnumerator {
        type Transport = HidTransport;

        fn enumerate(&self) -> Result<Vec<HidTransport>, AppError> {
            let api = HidApi::new().map_err(|e| AppError::Device(format!("HidApiの初期化に失敗: {}", e)))?;
            let devices: Vec<HidTransport> = api
                .device_list()
                .filter(|d| d.vendor_id() == KEEPKEY_VENDOR_ID && d.product_id() == KEEPKEY_PRODUCT_ID)
                // interface 1 はデバッグリンク
                .filter(|d| d.interface_number() <= 0)
                .map(|d| HidTransport {
                    path: d.path().to_owned(),
                    serial_number: d.serial_number().map(str::to_string),
                    product: d.product_string().map(str::to_string),
                })
                .collect();
            log::debug!("KeepKeyデバイスを {} 台検出しました。", devices.len());
            Ok(devices)
        }
    }
}
