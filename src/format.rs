//! 時間フォーマットモジュール

use chrono::{DateTime, Local, TimeDelta};

/// 時刻表示フォーマット（例: `Dec 30 10:00:00 2024`）
const TIME_FORMAT: &str = "%b %e %H:%M:%S %Y";

/// 経過時間を `HH:MM:SS` 形式にフォーマット
///
/// 時間は切り捨て、分・秒はそれぞれ60で割った余り。
/// 負の値は `00:00:00` として扱う。
pub fn format_duration(duration: TimeDelta) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// 時刻をフォーマット（未設定は空文字列）
pub fn format_time(time: Option<DateTime<Local>>) -> String {
    match time {
        Some(t) => t.format(TIME_FORMAT).to_string(),
        None => String::new(),
    }
}
