//! `ticketdesk` command-line front end.
//!
//! # Responsibility
//! - Open the SQLite-backed desk, boot the view coordinator and run exactly
//!   one user action through it.
//! - Print the views the coordinator materialized for that action.

mod render;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use ticketdesk_core::{
    default_log_level, init_logging, DeskConfig, Panel, Priority, SortMode, SqliteKv, Status,
    SystemClock, TicketDraft, TicketId, TicketStore, ViewCoordinator,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "ticketdesk: local support ticket tracker", long_about = None)]
struct Cli {
    /// SQLite file holding the ticket blob.
    #[arg(long, env = "TICKETDESK_DB", default_value = "ticketdesk.db", global = true)]
    db: PathBuf,

    /// JSON config file (storage_key, recent_limit, default_actor, seed_samples).
    #[arg(long, env = "TICKETDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "TICKETDESK_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "TICKETDESK_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show status counts and the most recent tickets.
    Home,
    /// List tickets with optional filters and sort order.
    List(ListArgs),
    /// Show one ticket in detail.
    Show { id: String },
    /// Open a new ticket.
    Create(CreateArgs),
    /// Change a ticket's status from the list.
    SetStatus {
        id: String,
        #[arg(value_parser = parse_status)]
        status: Status,
    },
    /// Open a ticket and save a new status or priority from its detail view.
    Edit(EditArgs),
    /// Delete a ticket permanently.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,

    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,

    /// Case-insensitive title substring.
    #[arg(long)]
    search: Option<String>,

    #[arg(long, value_enum, default_value_t = SortArg::Created)]
    sort: SortArg,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(short, long)]
    title: String,

    #[arg(short, long)]
    description: String,

    #[arg(short, long, default_value = ticketdesk_core::model::ticket::DEFAULT_CATEGORY)]
    category: String,

    #[arg(short, long, value_parser = parse_priority, default_value = "Medium")]
    priority: Priority,

    #[arg(short, long, default_value = "")]
    requester: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,

    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,

    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,

    /// Delete from the detail view (returns to the list afterwards).
    #[arg(long)]
    from_detail: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SortArg {
    Created,
    Priority,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Created => SortMode::CreatedDesc,
            SortArg::Priority => SortMode::PriorityDesc,
        }
    }
}

fn parse_status(value: &str) -> Result<Status, String> {
    Status::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`; expected open|in-progress|closed"))
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value)
        .ok_or_else(|| format!("unknown priority `{value}`; expected low|medium|high"))
}

type Desk = ViewCoordinator<SqliteKv, SystemClock>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let config = match &cli.config {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => DeskConfig::default(),
    };

    let kv = SqliteKv::open(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = TicketStore::from_config(kv, SystemClock, &config);
    let mut desk = ViewCoordinator::with_config(store, &config);
    desk.bootstrap()?;

    let mut out = std::io::stdout().lock();
    run(&mut desk, cli.command, &mut out)
}

fn run(desk: &mut Desk, command: Commands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::Home => {
            render::home(out, desk.home())?;
        }
        Commands::List(args) => {
            desk.switch_panel(Panel::List);
            desk.set_status_filter(args.status);
            desk.set_priority_filter(args.priority);
            desk.set_search(args.search.unwrap_or_default());
            desk.set_sort(args.sort.into());
            render::list(out, desk.list())?;
        }
        Commands::Show { id } => {
            desk.open_ticket(&TicketId::new(id));
            render::detail(out, desk.detail())?;
        }
        Commands::Create(args) => {
            let draft = TicketDraft::new(args.title, args.description)
                .with_category(args.category)
                .with_priority(args.priority)
                .with_requester(args.requester.trim());
            let ticket = desk.create_ticket(draft)?;
            writeln!(out, "Created ticket {}", ticket.id)?;
            render::list(out, desk.list())?;
        }
        Commands::SetStatus { id, status } => {
            desk.switch_panel(Panel::List);
            let id = TicketId::new(id);
            if !desk.change_status_inline(&id, status)? {
                anyhow::bail!("ticket not found: {id}");
            }
            render::home(out, desk.home())?;
        }
        Commands::Edit(args) => {
            if args.status.is_none() && args.priority.is_none() {
                anyhow::bail!("nothing to edit; pass --status and/or --priority");
            }
            let id = TicketId::new(args.id);
            desk.open_ticket(&id);
            if desk.detail().is_placeholder() {
                anyhow::bail!("ticket not found: {id}");
            }
            if let Some(status) = args.status {
                desk.update_detail_status(status)?;
            }
            if let Some(priority) = args.priority {
                desk.update_detail_priority(priority)?;
            }
            render::detail(out, desk.detail())?;
        }
        Commands::Delete(args) => {
            let id = TicketId::new(args.id);
            let mut confirm = |prompt: &str| args.yes || prompt_yes_no(prompt);
            let deleted = if args.from_detail {
                desk.open_ticket(&id);
                if desk.detail().is_placeholder() {
                    anyhow::bail!("ticket not found: {id}");
                }
                desk.delete_from_detail(&mut confirm)?
            } else {
                desk.switch_panel(Panel::List);
                desk.delete_from_list(&id, &mut confirm)?
            };
            if deleted {
                writeln!(out, "Deleted ticket {id}")?;
                render::list(out, desk.list())?;
            } else {
                writeln!(out, "Nothing deleted")?;
            }
        }
    }
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(err) => {
            warn!("event=confirm_prompt module=cli status=error error={err}");
            false
        }
    }
}
