//! タスク操作モジュール
//!
//! 各操作はストア全体を読み込み、メモリ上で変更し、すぐに書き戻す。

use crate::error::TaskError;
use crate::model::Tasks;
use crate::store::TaskStore;
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// 現在時刻の取得元
pub type Clock = fn() -> DateTime<Local>;

/// タスク操作
pub struct Tracker {
    store: TaskStore,
    clock: Clock,
}

impl Tracker {
    /// 新しいTrackerを作成
    pub fn new(store: TaskStore) -> Self {
        Self::with_clock(store, Local::now)
    }

    pub fn with_clock(store: TaskStore, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// タスクを追加してIDを返す
    pub fn add(&self, title: String, description: String) -> Result<u64, TaskError> {
        let mut tasks = self.store.load()?;
        let id = tasks.add(title, description, (self.clock)())?;
        self.store.save(&tasks)?;
        info!("タスク {} を追加しました", id);
        Ok(id)
    }

    /// タイトル・説明を更新
    pub fn edit(
        &self,
        id: u64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<(), TaskError> {
        let mut tasks = self.store.load()?;
        tasks.get_mut(id)?.edit(title, description);
        self.store.save(&tasks)?;
        info!("タスク {} を更新しました", id);
        Ok(())
    }

    /// タスクを削除（存在しなければ何もしない）
    pub fn delete(&self, id: u64) -> Result<bool, TaskError> {
        let mut tasks = self.store.load()?;
        let removed = tasks.remove(id).is_some();
        self.store.save(&tasks)?;

        if removed {
            info!("タスク {} を削除しました", id);
        } else {
            info!("タスク {} は存在しないため削除をスキップしました", id);
        }
        Ok(removed)
    }

    /// 計測を開始し、開始時刻を返す
    pub fn start(&self, id: u64) -> Result<DateTime<Local>, TaskError> {
        let mut tasks = self.store.load()?;
        let now = (self.clock)();
        let task = tasks.get_mut(id)?;
        if task.is_running() {
            warn!("タスク {} は既に計測中です。新しいイベントを追加します", id);
        }
        task.start(now);
        self.store.save(&tasks)?;

        info!("タスク {} の計測を開始しました", id);
        Ok(now)
    }

    /// 計測中のイベントをすべて停止し、停止した件数を返す
    pub fn stop(&self, id: u64) -> Result<usize, TaskError> {
        self.stop_at(id, (self.clock)())
    }

    /// 指定時刻で計測を停止
    pub fn stop_at(&self, id: u64, stopped_at: DateTime<Local>) -> Result<usize, TaskError> {
        let mut tasks = self.store.load()?;
        let closed = tasks.get_mut(id)?.stop(stopped_at);
        self.store.save(&tasks)?;

        info!("タスク {} の計測を停止しました（{}件）", id, closed);
        Ok(closed)
    }

    /// 全タスクを取得
    pub fn list(&self) -> Result<Tasks, TaskError> {
        Ok(self.store.load()?)
    }
}
