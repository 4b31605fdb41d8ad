//! CLIモジュール

use crate::config::{CliArgs, Config};
use crate::report::Report;
use crate::store::TaskStore;
use crate::timer::Timer;
use crate::tracker::Tracker;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// clerk - タスク時間計測ツール
#[derive(Parser, Debug)]
#[command(name = "clerk")]
#[command(about = "Track time spent on tasks", long_about = None)]
pub struct Cli {
    /// タスクストアのファイルパス
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// サブコマンド
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Edit an existing task
    Edit {
        /// Id of task to edit
        #[arg(short, long)]
        id: u64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task
    #[command(alias = "remove")]
    Delete {
        /// Id of task to delete
        #[arg(short, long)]
        id: u64,
    },
    /// Start tracking time on a task until interrupted
    Start {
        /// Id of task to start
        #[arg(short, long)]
        id: u64,
    },
    /// Stop tracking time on a task
    Stop {
        /// Id of task to stop
        #[arg(short, long)]
        id: u64,
    },
    /// List tasks and time spent
    List {
        /// Show descriptions, timestamps and events
        #[arg(short, long)]
        verbose: bool,
    },
}

/// CLIエントリポイント
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&CliArgs { store: cli.store })?;
    let store = TaskStore::new(config.store_path.clone());
    debug!("タスクストア: {}", store.path().display());
    let tracker = Tracker::new(store);

    match cli.command {
        Commands::Add { title, description } => {
            let id = tracker.add(title, description)?;
            println!("Created task {}", id);
        }
        Commands::Edit {
            id,
            title,
            description,
        } => {
            tracker.edit(id, title, description)?;
        }
        Commands::Delete { id } => {
            tracker.delete(id)?;
        }
        Commands::Start { id } => {
            let timer = Timer::new(Duration::from_secs(config.refresh_seconds));
            timer.setup_signal_handler()?;
            run_start(&tracker, &timer, id, &mut io::stdout())?;
        }
        Commands::Stop { id } => {
            tracker.stop(id)?;
        }
        Commands::List { verbose } => {
            let tasks = tracker.list()?;
            if tasks.is_empty() {
                debug!("タスクが登録されていません");
            }
            let report = Report::new(tasks);
            report.print(verbose);
        }
    }

    Ok(())
}

/// 計測を開始し、キャンセルされるまで経過時間を表示してから停止する
///
/// 表示に失敗しても停止は必ず記録し、その後で表示エラーを返す。
pub fn run_start<W: Write>(tracker: &Tracker, timer: &Timer, id: u64, out: &mut W) -> Result<usize> {
    let started_at = tracker.start(id)?;
    let shown = timer.run(started_at, out);

    // キャンセル時刻で停止する（開始前のシグナルや表示失敗時は現在時刻）
    let closed = match timer.token().cancelled_at() {
        Some(cancelled_at) if cancelled_at >= started_at => tracker.stop_at(id, cancelled_at)?,
        _ => tracker.stop(id)?,
    };

    shown?;
    writeln!(out)?;
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimerError;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_tracker() -> (Tracker, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path().join(".clerk-db"));
        (Tracker::new(store), temp_dir)
    }

    /// 常に書き込みに失敗するライター
    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_start_stops_task_after_cancel() {
        let (tracker, _temp_dir) = create_test_tracker();
        let id = tracker.add("Task A".into(), String::new()).unwrap();

        let timer = Timer::new(Duration::from_millis(10));
        let token = timer.token();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel();
        });

        let mut out = Vec::new();
        let closed = run_start(&tracker, &timer, id, &mut out).unwrap();
        canceller.join().unwrap();
        assert_eq!(closed, 1);

        let tasks = tracker.list().unwrap();
        let task = tasks.get(id).unwrap();
        assert_eq!(task.events.len(), 1);
        assert!(!task.is_running());
        // 停止時刻はシグナル受信時刻
        assert_eq!(task.events[0].end_time, timer.token().cancelled_at());
        assert!(task.events[0].start_time <= task.events[0].end_time.unwrap());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("\rTime Elapsed: 00:00:0"));
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn test_run_start_stops_task_when_terminal_write_fails() {
        let (tracker, _temp_dir) = create_test_tracker();
        let id = tracker.add("Task A".into(), String::new()).unwrap();
        let timer = Timer::new(Duration::from_millis(10));

        let err = run_start(&tracker, &timer, id, &mut ClosedTerminal).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimerError>(),
            Some(TimerError::OutputError(_))
        ));

        let tasks = tracker.list().unwrap();
        let task = tasks.get(id).unwrap();
        assert_eq!(task.events.len(), 1);
        assert!(!task.is_running());
        assert!(task.end_time.is_some());
    }

    #[test]
    fn test_run_start_unknown_task_fails_without_loop() {
        let (tracker, _temp_dir) = create_test_tracker();
        let timer = Timer::new(Duration::from_secs(60));

        let mut out = Vec::new();
        let err = run_start(&tracker, &timer, 7, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "Task 7 does not exist");
        assert!(out.is_empty());
    }

    #[test]
    fn test_add_command() {
        let cli = Cli::try_parse_from(["clerk", "add", "--title", "Task A", "-d", "notes"]).unwrap();

        if let Commands::Add { title, description } = cli.command {
            assert_eq!(title, "Task A");
            assert_eq!(description, "notes");
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_add_description_defaults_empty() {
        let cli = Cli::try_parse_from(["clerk", "add", "-t", "Task A"]).unwrap();

        if let Commands::Add { description, .. } = cli.command {
            assert_eq!(description, "");
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_add_requires_title() {
        assert!(Cli::try_parse_from(["clerk", "add"]).is_err());
    }

    #[test]
    fn test_edit_command() {
        let cli = Cli::try_parse_from(["clerk", "edit", "-i", "2", "-t", "renamed"]).unwrap();

        if let Commands::Edit {
            id,
            title,
            description,
        } = cli.command
        {
            assert_eq!(id, 2);
            assert_eq!(title, Some("renamed".to_string()));
            assert_eq!(description, None);
        } else {
            panic!("Expected Edit command");
        }
    }

    #[test]
    fn test_delete_and_remove_alias() {
        for name in ["delete", "remove"] {
            let cli = Cli::try_parse_from(["clerk", name, "--id", "3"]).unwrap();
            assert!(matches!(cli.command, Commands::Delete { id: 3 }));
        }
    }

    #[test]
    fn test_start_and_stop_require_id() {
        assert!(Cli::try_parse_from(["clerk", "start"]).is_err());
        assert!(Cli::try_parse_from(["clerk", "stop"]).is_err());

        let cli = Cli::try_parse_from(["clerk", "start", "-i", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::Start { id: 1 }));
        let cli = Cli::try_parse_from(["clerk", "stop", "-i", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::Stop { id: 1 }));
    }

    #[test]
    fn test_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["clerk", "start", "-i", "abc"]).is_err());
    }

    #[test]
    fn test_list_verbose() {
        let cli = Cli::try_parse_from(["clerk", "list", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::List { verbose: true }));

        let cli = Cli::try_parse_from(["clerk", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List { verbose: false }));
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::try_parse_from(["clerk", "list", "--store", "/tmp/db.json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/db.json")));
    }
}
