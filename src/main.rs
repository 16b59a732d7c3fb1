use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use choreboard::{
    app::Board,
    calendar::format_due_absolute,
    config::{config_dir, data_dir, AppConfig},
    model::{Snapshot, TaskId},
    sync::{
        feed::{EventFeed, EventKind, LocalFeed},
        timer::RefreshTimer,
    },
    tasks::{overdue, sort_by_due_date, Classifier, Grouper, SortDirection},
    theme::ThemeConfig,
    ui::{render_groups, render_history, RenderOptions},
};

#[derive(Parser)]
#[command(name = "chores", version, about = "Recurring chores, bucketed by when they are due")]
struct Cli {
    /// Config file (default: <config dir>/choreboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board from a snapshot file
    Board {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Replay JSON-lines feed events onto a snapshot, then print the board
    Apply {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        events: PathBuf,
    },
    /// Complete (or skip) a task and show when it is due next
    Next {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        id: TaskId,
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<FixedOffset>>,
        #[arg(long)]
        skip: bool,
    },
    /// Reprint the board on a timer until Ctrl-C
    Watch {
        #[command(flatten)]
        view: ViewArgs,
        /// Seconds between refreshes (default from config)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Args, Clone)]
struct ViewArgs {
    /// Snapshot JSON: {"tasks": [...], "labels": [...]}
    #[arg(long)]
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = GroupBy::Due)]
    by: GroupBy,
    /// Evaluate as of this RFC 3339 instant instead of the local clock
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<FixedOffset>>,
    #[arg(long)]
    no_color: bool,
    /// Include empty buckets
    #[arg(long)]
    all: bool,
    /// Order tasks by due date inside each bucket
    #[arg(long)]
    sort: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy { Due, Label }

fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected RFC 3339 time: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_dir = matches!(cli.command, Command::Watch { .. }).then(data_dir);
    let _guard  = init_logging(cli.verbose, log_dir.as_deref())?;
    let config  = load_config(cli.config.as_deref())?;
    let grouper = load_grouper(&config, cli.config.as_deref())?;

    match cli.command {
        Command::Board { view }          => cmd_board(&grouper, &view),
        Command::Apply { view, events }  => cmd_apply(&grouper, &view, &events),
        Command::Next { file, id, at, skip } => cmd_next(&grouper, &file, id, at, skip),
        Command::Watch { view, interval } => {
            cmd_watch(grouper, view, watch_period(interval, &config)).await
        }
    }
}

// ─── Setup ────────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level  = match verbose { 0 => "warn", 1 => "info", _ => "debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "choreboard.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            Ok(None)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load_file(p),
        None    => AppConfig::load(&config_dir()),
    }
}

fn load_grouper(cfg: &AppConfig, path: Option<&Path>) -> Result<Grouper> {
    let dir = match path.and_then(Path::parent) {
        Some(parent) => parent.to_path_buf(),
        None         => config_dir(),
    };
    let theme = ThemeConfig::load(&dir, cfg.theme_name())?;
    tracing::debug!(theme = %theme.name, "configuration loaded");
    Ok(Grouper::new(Classifier::new(cfg.week_start()?), theme))
}

/// `--interval` wins over `[refresh] interval_seconds`.
fn watch_period(interval: Option<u64>, cfg: &AppConfig) -> Duration {
    Duration::from_secs(interval.unwrap_or_else(|| cfg.refresh_seconds()))
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn resolve_now(fixed: Option<DateTime<FixedOffset>>) -> DateTime<FixedOffset> {
    fixed.unwrap_or_else(|| Local::now().into())
}

fn load_board(grouper: &Grouper, view: &ViewArgs) -> Result<Board> {
    let mut snapshot = read_snapshot(&view.file)?;
    if view.sort {
        sort_by_due_date(&mut snapshot.tasks, SortDirection::Ascending);
    }
    Ok(Board::new(snapshot, grouper.clone()))
}

fn print_board(board: &Board, view: &ViewArgs) {
    let now   = resolve_now(view.now);
    tracing::debug!(
        tasks = board.tasks().len(),
        overdue = overdue(board.tasks(), &now).len(),
        "rendering board"
    );
    let theme = &board.grouper.theme;
    let opts  = RenderOptions {
        color:      !view.no_color && std::io::stdout().is_terminal(),
        show_empty: view.all,
    };
    let text = match view.by {
        GroupBy::Due   => render_groups(board.by_due_date(&now).values(), &now, theme, opts),
        GroupBy::Label => render_groups(board.by_label().iter(), &now, theme, opts),
    };
    print!("{text}");
}

// ─── Commands ─────────────────────────────────────────────────────────────────

fn cmd_board(grouper: &Grouper, view: &ViewArgs) -> Result<()> {
    let board = load_board(grouper, view)?;
    print_board(&board, view);
    Ok(())
}

fn cmd_apply(grouper: &Grouper, view: &ViewArgs, events: &Path) -> Result<()> {
    let board = Arc::new(Mutex::new(load_board(grouper, view)?));
    let raw   = std::fs::read_to_string(events)
        .with_context(|| format!("reading {}", events.display()))?;

    let mut feed = LocalFeed::new();
    let target   = board.clone();
    feed.on(EventKind::Any, Box::new(move |event| {
        match target.lock() {
            Ok(mut b) => { b.apply(event); }
            Err(_)    => tracing::error!("board lock poisoned, event dropped"),
        }
    }));
    feed.connect()?;

    for (n, line) in raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        feed.emit_json(line)
            .with_context(|| format!("{} line {}", events.display(), n + 1))?;
    }
    feed.disconnect();

    let board = board.lock().map_err(|_| anyhow!("board lock poisoned"))?;
    print_board(&board, view);
    Ok(())
}

fn cmd_next(
    grouper: &Grouper,
    file:    &Path,
    id:      TaskId,
    at:      Option<DateTime<FixedOffset>>,
    skip:    bool,
) -> Result<()> {
    let mut board = Board::new(read_snapshot(file)?, grouper.clone());
    let at    = resolve_now(at);
    let title = board.task(id).map(|t| t.title.clone()).unwrap_or_default();
    if skip { board.skip(id, &at)?; } else { board.complete(id, &at)?; }

    match board.task(id).and_then(|t| t.next_due_date) {
        Some(next) => println!("{title}: next due {}", format_due_absolute(&next, &at)),
        None       => println!("{title}: no further occurrences"),
    }
    print!("{}", render_history(&board.history_for(id), &at));
    Ok(())
}

async fn cmd_watch(grouper: Grouper, view: ViewArgs, period: Duration) -> Result<()> {
    let refresh = move || -> Result<()> {
        let board = load_board(&grouper, &view)?;
        print_board(&board, &view);
        Ok(())
    };
    refresh()?;

    let _timer = RefreshTimer::start(period, move || {
        if let Err(e) = refresh() {
            tracing::warn!("refresh failed: {e:#}");
        }
    });
    tracing::info!(?period, "watching, Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("watch stopped");
    Ok(())
}
