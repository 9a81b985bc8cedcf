use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde_json::Value;

use crate::error::AppError;

/// キャッシュファイル名に使うネットワーク名
pub const TERRACOIN_INSIGHT_NETWORK: &str = "insight_terracoin";

/// 生トランザクションを取得できるデータソース (terracoind など)
pub trait RawTxSource {
    fn getrawtransaction(&self, txid: &str, verbose: bool) -> Result<Value, AppError>;
}

impl<S: RawTxSource + ?Sized> RawTxSource for Arc<S> {
    fn getrawtransaction(&self, txid: &str, verbose: bool) -> Result<Value, AppError> {
        (**self).getrawtransaction(txid, verbose)
    }
}

/// 署名時に前トランザクションを参照するためにクライアントへ渡すAPI
pub trait TxApi: Send {
    fn fetch_json(&self, resource: &str, resource_id: &str) -> Result<Value, AppError>;

    fn get_tx(&self, txid: &str) -> Result<Value, AppError> {
        self.fetch_json("tx", txid)
    }
}

/// ファイルキャッシュ付きのTxApi。
/// 読み書きの失敗は無視して、取得元からの結果をそのまま使う
pub struct CachedTxApi<S> {
    network: String,
    source: S,
    cache_dir: Option<PathBuf>,
}

impl<S: RawTxSource> CachedTxApi<S> {
    pub fn new(network: impl Into<String>, source: S, cache_dir: Option<PathBuf>) -> Self {
        Self { network: network.into(), source, cache_dir }
    }

    pub fn cache_file(&self, resource: &str, resource_id: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_{}_{}.json", self.network, resource, resource_id)))
    }
}

impl<S: RawTxSource + Send> TxApi for CachedTxApi<S> {
    fn fetch_json(&self, resource: &str, resource_id: &str) -> Result<Value, AppError> {
        let cache_file = self.cache_file(resource, resource_id);

        if let Some(path) = &cache_file {
            match read_cached(path) {
                Ok(v) => {
                    log::debug!("キャッシュから取得しました: {:?}", path);
                    return Ok(v);
                }
                Err(e) => log::debug!("キャッシュを使用できません ({:?}): {}", path, e),
            }
        }

        let v = self.source.getrawtransaction(resource_id, true)?;

        if let Some(path) = &cache_file {
            if let Err(e) = write_cached(path, &v) {
                log::debug!("キャッシュへの保存を省略します ({:?}): {}", path, e);
            }
        }
        Ok(v)
    }
}

fn read_cached(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| AppError::JsonParse {
        file_path: path.to_path_buf(),
        source: e,
    })
}

fn write_cached(path: &Path, v: &Value) -> Result<(), AppError> {
    let data = serde_json::to_vec(v).map_err(|e| AppError::JsonParse {
        file_path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, data)?;
    Ok(())
}
