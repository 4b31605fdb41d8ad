//! 計測表示ループモジュール

use crate::error::TimerError;
use crate::format::format_duration;

use chrono::{DateTime, Local};
use std::io::Write;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// キャンセルトークン
///
/// キャンセルされた時刻を保持し、待機中のスレッドをすぐに起こす。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<Option<DateTime<Local>>>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセル（2回目以降は最初の時刻を維持）
    pub fn cancel(&self) {
        let mut cancelled_at = self.lock();
        if cancelled_at.is_none() {
            *cancelled_at = Some(Local::now());
        }
        self.inner.1.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().is_some()
    }

    /// キャンセルされた時刻
    pub fn cancelled_at(&self) -> Option<DateTime<Local>> {
        *self.lock()
    }

    /// キャンセルされるか `timeout` が経過するまで待機し、キャンセル済みかを返す
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled_at = self.lock();

        while cancelled_at.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            cancelled_at = match self.inner.1.wait_timeout(cancelled_at, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<DateTime<Local>>> {
        self.inner.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// 経過時間を表示し続けるタイマー
pub struct Timer {
    interval: Duration,
    token: CancelToken,
}

impl Timer {
    /// 新しいTimerを作成
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            token: CancelToken::new(),
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// シグナルハンドラーをセットアップ（SIGINT / SIGTERM）
    pub fn setup_signal_handler(&self) -> Result<(), TimerError> {
        let token = self.token();

        ctrlc::set_handler(move || {
            info!("停止シグナルを受信しました");
            token.cancel();
        })
        .map_err(|e| TimerError::SignalHandlerError(e.to_string()))?;

        Ok(())
    }

    /// キャンセルされるまで経過時間を表示し、表示回数を返す
    pub fn run<W: Write>(&self, started_at: DateTime<Local>, out: &mut W) -> Result<u64, TimerError> {
        debug!("表示ループを開始します（間隔: {:?}）", self.interval);

        let mut ticks = 0;
        while !self.token.is_cancelled() {
            let elapsed = Local::now() - started_at;
            write!(out, "\rTime Elapsed: {}", format_duration(elapsed))?;
            out.flush()?;
            ticks += 1;

            if self.token.wait_timeout(self.interval) {
                break;
            }
        }

        debug!("表示ループを終了します（{}回表示）", ticks);
        Ok(ticks)
    }
}
