//! レポートモジュール

use crate::format::{format_duration, format_time};
use crate::model::{Task, Tasks};
use chrono::{DateTime, Local};

const SEPARATOR: &str = "------------------------------------------------";

/// 簡易一覧（ID・合計時間・タイトル）
pub fn render_short(tasks: &Tasks, now: DateTime<Local>) -> String {
    let mut out = String::from("\nId  TimeSpent Title\n");
    for task in &tasks.tasks {
        push_line(
            &mut out,
            format!(
                "{:<3} {}  {}",
                task.id,
                format_duration(task.time_spent(now)),
                task.title
            ),
        );
    }
    out.push('\n');
    out
}

/// 詳細一覧（説明・各時刻・イベント表）
pub fn render_verbose(tasks: &Tasks, now: DateTime<Local>) -> String {
    let mut out = String::new();
    for task in &tasks.tasks {
        render_task(&mut out, task, now);
    }
    out
}

fn render_task(out: &mut String, task: &Task, now: DateTime<Local>) {
    push_line(out, SEPARATOR);
    push_line(out, format!("[{}] {}", task.id, task.title));
    out.push('\n');
    push_line(out, &task.description);
    out.push('\n');
    push_line(out, format!("Time Created: {}", format_time(Some(task.create_time))));
    push_line(out, format!("Time Started: {}", format_time(task.start_time)));
    push_line(out, format!("Time Ended: {}", format_time(task.end_time)));
    push_line(out, format!("Time Spent: {}", format_duration(task.time_spent(now))));
    out.push('\n');
    push_line(out, "Elapsed  Start                End");
    for event in &task.events {
        push_line(
            out,
            format!(
                "{} {} {}",
                format_duration(event.duration(now)),
                format_time(Some(event.start_time)),
                format_time(event.end_time)
            ),
        );
    }
    out.push('\n');
}

fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

/// レポート出力
pub struct Report {
    tasks: Tasks,
}

impl Report {
    /// 新しいReportを作成
    pub fn new(tasks: Tasks) -> Self {
        Self { tasks }
    }

    /// 現在時刻でレンダリング
    pub fn render(&self, verbose: bool) -> String {
        let now = Local::now();
        if verbose {
            render_verbose(&self.tasks, now)
        } else {
            render_short(&self.tasks, now)
        }
    }

    /// レポートを標準出力に出力
    pub fn print(&self, verbose: bool) {
        print!("{}", self.render(verbose));
    }
}
