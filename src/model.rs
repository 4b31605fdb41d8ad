//! タスク・イベントのデータモデル

use crate::error::TaskError;
use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};

/// 1回分の計測区間
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub start_time: DateTime<Local>,
    /// 未設定なら計測中
    #[serde(default, with = "zero_time")]
    pub end_time: Option<DateTime<Local>>,
}

impl Event {
    /// 計測中のイベントを作成
    pub fn open(start_time: DateTime<Local>) -> Self {
        Self {
            start_time,
            end_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// 経過時間（計測中は `now` までの時間）
    pub fn duration(&self, now: DateTime<Local>) -> TimeDelta {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

/// タスク
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub events: Vec<Event>,
    pub create_time: DateTime<Local>,
    /// 最初に開始した時刻
    #[serde(default, with = "zero_time")]
    pub start_time: Option<DateTime<Local>>,
    /// 最後に停止した時刻
    #[serde(default, with = "zero_time")]
    pub end_time: Option<DateTime<Local>>,
}

impl Task {
    /// 新しいTaskを作成（イベントなし）
    pub fn new(id: u64, title: String, description: String, now: DateTime<Local>) -> Self {
        Self {
            id,
            title,
            description,
            events: Vec::new(),
            create_time: now,
            start_time: None,
            end_time: None,
        }
    }

    /// 計測を開始
    ///
    /// 既に計測中のイベントがあっても新しいイベントを追加する。
    pub fn start(&mut self, now: DateTime<Local>) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
        self.events.push(Event::open(now));
    }

    /// 計測中のイベントをすべて閉じ、閉じた件数を返す
    pub fn stop(&mut self, now: DateTime<Local>) -> usize {
        let mut closed = 0;
        for event in self.events.iter_mut().filter(|e| e.is_open()) {
            event.end_time = Some(now);
            closed += 1;
        }

        if closed > 0 {
            self.end_time = Some(now);
        }

        closed
    }

    /// タイトル・説明を更新（指定されたものだけ）
    pub fn edit(&mut self, title: Option<String>, description: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }

    pub fn is_running(&self) -> bool {
        self.events.iter().any(Event::is_open)
    }

    /// 全イベントの合計時間
    pub fn time_spent(&self, now: DateTime<Local>) -> TimeDelta {
        self.events
            .iter()
            .map(|e| e.duration(now))
            .fold(TimeDelta::zero(), |acc, d| acc + d)
    }
}

/// タスク一覧（ストアのルート）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tasks {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Tasks {
    /// 次に割り当てるID（既存IDの最大値 + 1）
    pub fn next_id(&self) -> Result<u64, TaskError> {
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max.checked_add(1).ok_or(TaskError::IdExhausted(max))
    }

    /// タスクを追加してIDを返す
    pub fn add(
        &mut self,
        title: String,
        description: String,
        now: DateTime<Local>,
    ) -> Result<u64, TaskError> {
        let id = self.next_id()?;
        self.tasks.push(Task::new(id, title, description, now));
        Ok(id)
    }

    /// 最初に一致したタスクを削除（存在しなければ何もしない）
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    #[cfg(test)]
    pub fn get(&self, id: u64) -> Result<&Task, TaskError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: u64) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// 任意時刻のシリアライズ
///
/// 未設定はゼロ時刻 `0001-01-01T00:00:00Z` として書き出す。
/// 読み込み時はゼロ時刻と `null` のどちらも未設定として扱う。
mod zero_time {
    use chrono::{DateTime, Datelike, Local, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

    pub fn serialize<S>(time: &Option<DateTime<Local>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            None => serializer.serialize_str(ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let parsed =
            DateTime::parse_from_rfc3339(&raw).map_err(<D::Error as de::Error>::custom)?;
        if parsed.year() <= 1 {
            return Ok(None);
        }

        Ok(Some(parsed.with_timezone(&Local)))
    }
}
