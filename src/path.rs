use std::str::FromStr;
use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::error::AppError;

/// ユーザー入力のBIP32パスを正規化する。
/// 空白を除去し、先頭の "M"/"m" を "m/" に揃え、"h"/"H" の強化導出表記を "'" に置き換える
pub fn clean_bip32_path(path: &str) -> String {
    let compact: String = path.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact
        .strip_prefix("m/")
        .or_else(|| compact.strip_prefix("M/"))
        .or_else(|| if compact == "m" || compact == "M" { Some("") } else { None })
        .unwrap_or(&compact)
        .trim_matches('/');

    let normalized = body.replace(['h', 'H'], "'");
    if normalized.is_empty() {
        "m".to_string()
    } else {
        format!("m/{}", normalized)
    }
}

/// BIP32パスをデバイスに渡す address_n (強化導出はビット31を立てた u32) に展開する
pub fn expand_path(path: &str) -> Result<Vec<u32>, AppError> {
    let cleaned = clean_bip32_path(path);
    let derivation = DerivationPath::from_str(&cleaned).map_err(|e| AppError::InvalidBip32Path {
        path: path.to_string(),
        source: e,
    })?;
    let children: &[ChildNumber] = derivation.as_ref();
    Ok(children.iter().map(|child| u32::from(*child)).collect())
}
