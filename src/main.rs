use clap::Parser;

use keepkey_terracoin::{
    config::{load_json, TransferRequest, WalletConfig},
    error::AppError,
    rpc::TerracoindRpc,
    transaction::build_transfer,
    tx_api::{CachedTxApi, TxApi, TERRACOIN_INSIGHT_NETWORK},
};

mod cli;

use cli::{CliArgs, Command};

fn main() -> Result<(), AppError> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    match args.command {
        Command::Devices => list_devices()?,
        Command::PrepareTx { input_file } => {
            let request: TransferRequest = load_json(&input_file)?;
            log::debug!("送金リクエストのパース成功: {:?}", request);

            let prepared = build_transfer(&request.utxos, &request.dest_address, request.tx_fee)?;
            print_json(&prepared)?;
        }
        Command::FetchTx { txid } => {
            let config: WalletConfig = load_json(&args.config)?;
            let rpc = TerracoindRpc::new(&config.rpc)?;
            let api = CachedTxApi::new(TERRACOIN_INSIGHT_NETWORK, rpc, config.cache_dir.clone());

            let tx = api.get_tx(&txid)?;
            print_json(&tx)?;
        }
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}

#[cfg(feature = "hid")]
fn list_devices() -> Result<(), AppError> {
    use keepkey_terracoin::device::{self, HidEnumerator};
    use keepkey_terracoin::main_thread::MainThread;

    let (main, _main_loop) = MainThread::register();
    let devices = device::list_devices(&main, &HidEnumerator)?;
    if devices.is_empty() {
        log::warn!("KeepKeyが見つかりません。");
    }
    for d in devices {
        println!("{}", d);
    }
    Ok(())
}

#[cfg(not(feature = "hid"))]
fn list_devices() -> Result<(), AppError> {
    Err(AppError::Device("HIDサポートなしでビルドされています (feature \"hid\")".to_string()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let s = serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.to_string()))?;
    println!("{}", s);
    Ok(())
}
