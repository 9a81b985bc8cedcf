use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// ウォレット設定 (RPC接続先、キャッシュディレクトリ) のJSONファイル
    #[clap(short, long, value_parser, default_value = "wallet.json")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 接続されているKeepKeyを一覧表示する
    Devices,

    /// 送金リクエストから署名前の入出力を組み立てて表示する
    PrepareTx {
        /// 送金リクエスト (utxos, destAddress, txFee) のJSONファイル
        #[clap(short, long, value_parser)]
        input_file: PathBuf,
    },

    /// 生トランザクションをキャッシュ経由で取得する
    FetchTx {
        /// 取得するトランザクションID
        txid: String,
    },
}
