//! メインスレッドへの処理の受け渡し
//!
//! HIDデバイスの列挙はメインスレッド以外から呼ぶとプロセスが落ちるため、
//! バックグラウンドスレッドからの呼び出しはメインスレッドのループに送って実行する。

use std::thread::{self, ThreadId};
use crossbeam_channel::{Receiver, Sender};

use crate::error::AppError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// 任意のスレッドから処理をメインスレッドで実行させるハンドル
#[derive(Clone)]
pub struct MainThread {
    id: ThreadId,
    jobs: Sender<Job>,
}

/// メインスレッド側で保持し、送られてきた処理を実行するループ
pub struct MainLoop {
    jobs: Receiver<Job>,
}

impl MainThread {
    /// 呼び出したスレッドをメインスレッドとして登録する
    pub fn register() -> (MainThread, MainLoop) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            MainThread { id: thread::current().id(), jobs: tx },
            MainLoop { jobs: rx },
        )
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// `f` をメインスレッドで実行して結果を返す。
    /// メインスレッドから呼ばれた場合はその場で実行する
    pub fn call<R, F>(&self, f: F) -> Result<R, AppError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return Ok(f());
        }

        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move || {
            // 呼び出し側が先にいなくなっていても構わない
            let _ = reply_tx.send(f());
        });
        self.jobs.send(job).map_err(|_| AppError::MainThreadUnavailable)?;
        log::debug!("メインスレッドでの実行を待機します。");
        reply_rx.recv().map_err(|_| AppError::MainThreadUnavailable)
    }
}

impl MainLoop {
    /// 溜まっている処理をすべて実行し、実行した件数を返す
    pub fn run_pending(&self) -> usize {
        let mut n = 0;
        while let Ok(job) = self.jobs.try_recv() {
            job();
            n += 1;
        }
        n
    }

    /// 全ての `MainThread` ハンドルが破棄されるまで処理を実行し続ける
    pub fn run(self) {
        while let Ok(job) = self.jobs.recv() {
            job();
        }
    }
}
