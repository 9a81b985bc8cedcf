use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::RpcConfig;
use crate::error::AppError;
use crate::tx_api::RawTxSource;

/// terracoind の JSON-RPC クライアント (getrawtransaction のみ)
pub struct TerracoindRpc {
    url: String,
    user: Option<String>,
    password: Option<String>,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize, Debug)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl TerracoindRpc {
    pub fn new(config: &RpcConfig) -> Result<Self, AppError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            url: config.url.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            http,
        })
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, AppError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "keepkey-terracoin",
            "method": method,
            "params": params,
        });
        log::debug!("RPC呼び出し: {} {}", method, params);

        let mut req = self.http.post(&self.url).json(&body);
        if let Some(user) = &self.user {
            req = req.basic_auth(user, self.password.as_ref());
        }
        // terracoind はエラー時も JSON 本文付きで 500 を返すためステータスは見ない
        let resp: RpcResponse = req.send()?.json()?;
        parse_response(method, resp)
    }
}

fn parse_response(method: &str, resp: RpcResponse) -> Result<Value, AppError> {
    if let Some(err) = resp.error {
        return Err(AppError::Rpc(format!("{} 失敗 (code {}): {}", method, err.code, err.message)));
    }
    resp.result
        .ok_or_else(|| AppError::Rpc(format!("{} の応答に result がありません", method)))
}

impl RawTxSource for TerracoindRpc {
    fn getrawtransaction(&self, txid: &str, verbose: bool) -> Result<Value, AppError> {
        self.call("getrawtransaction", json!([txid, if verbose { 1 } else { 0 }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_body_is_reported() {
        let resp: RpcResponse = serde_json::from_str(
            r#"{"result":null,"error":{"code":-5,"message":"No such mempool or blockchain transaction"},"id":"x"}"#,
        )
        .unwrap();
        let err = parse_response("getrawtransaction", resp).unwrap_err();
        assert!(matches!(err, AppError::Rpc(ref m) if m.contains("-5")));
    }

    #[test]
    fn rpc_result_is_returned() {
        let resp: RpcResponse =
            serde_json::from_str(r#"{"result":{"txid":"ff"},"error":null,"id":"x"}"#).unwrap();
        assert_eq!(parse_response("getrawtransaction", resp).unwrap()["txid"], "ff");
    }
}
