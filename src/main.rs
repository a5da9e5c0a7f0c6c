use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use periodr::app::App;
use periodr::logging::{self, FlashMessage};
use periodr::models::{Field, IdGenerator};
use periodr::storage::{
    Config, ConfigStorage, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
    RecordRepository, TomlConfigStorage, ensure_directories,
};
use periodr::store::{RecordStore, Submitted};
use periodr::ui::record_table::format_record_lines;

#[derive(Parser)]
#[command(name = "periodr")]
#[command(about = "Academic period registry", long_about = None)]
struct Cli {
    /// Keep records in memory only; the stored collection is neither read nor written
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered periods
    List,

    /// Register a new period
    Add {
        /// Period label (e.g. 2024.1)
        #[arg(short, long)]
        name: String,

        /// Coordinator email
        #[arg(short, long)]
        email: String,
    },

    /// Change a period's label and/or coordinator email
    Edit {
        /// Id of the period to change
        id: u64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },

    /// Delete a period
    Delete {
        /// Id of the period to delete
        id: u64,
    },

    /// Print the stored JSON blob
    Export,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => cmd_tui(cli.ephemeral),
        Some(command) => {
            env_logger::init();
            let (config, data_dir) = load_config()?;
            let (mut store, recovered) = open_store(&config, &data_dir, cli.ephemeral)?;
            if let Some(message) = recovered {
                eprintln!("warning: {}", message);
            }

            let mut out = io::stdout().lock();
            match command {
                Commands::List => cmd_list(&store, &mut out),
                Commands::Add { name, email } => cmd_add(&mut store, name, email, &mut out),
                Commands::Edit { id, name, email } => {
                    cmd_edit(&mut store, id, name, email, &mut out)
                }
                Commands::Delete { id } => cmd_delete(&mut store, id, &mut out),
                Commands::Export => cmd_export(&store, &mut out),
            }
        }
    }
}

/// Load config from the XDG config directory
/// Returns (config, data_dir)
fn load_config() -> Result<(Config, std::path::PathBuf)> {
    let (data_dir, config_dir) = ensure_directories()?;
    let config_storage = TomlConfigStorage::new(config_dir.join("periodr.toml"));
    let config = config_storage.load()?;
    Ok((config, data_dir))
}

/// Build and initialize the record store
/// Returns the store and a user-facing message if corrupt data was set aside
fn open_store(
    config: &Config,
    data_dir: &Path,
    ephemeral: bool,
) -> Result<(RecordStore, Option<String>)> {
    let kv: Box<dyn KeyValueStore> = if ephemeral {
        log::info!("Using in-memory storage, nothing will be saved");
        Box::new(MemoryKeyValueStore::new())
    } else {
        Box::new(FileKeyValueStore::new(data_dir.to_path_buf()))
    };

    let repo = RecordRepository::new(kv, config.storage.key.clone(), config.storage.on_corrupt);
    let mut store = RecordStore::new(repo, IdGenerator::new(config.storage.id_strategy));

    let recovered = store
        .initialize()
        .context("Failed to load stored periods")?
        .map(|backup| {
            format!(
                "Stored periods could not be read and were moved to '{}'. Starting with an empty list.",
                backup
            )
        });

    Ok((store, recovered))
}

/// Launch the terminal UI
fn cmd_tui(ephemeral: bool) -> Result<()> {
    let (config, data_dir) = load_config()?;

    let (flash_tx, flash_rx) = mpsc::channel::<FlashMessage>();
    logging::init_logger(
        &data_dir.join("periodr.log"),
        Some(flash_tx),
        &config.general.log_level,
        &config.general.flash_level,
    )?;
    log::info!("Starting periodr TUI");

    let (store, recovered) = open_store(&config, &data_dir, ephemeral)?;
    let mut app = App::new(store, config, Some(flash_rx), recovered);

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app);
    ratatui::restore();

    log::info!("Exiting periodr TUI");
    result
}

fn run_event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.poll_flash_messages();
        app.prune_flash_messages();

        terminal
            .draw(|frame| app.draw(frame))
            .context("Failed to draw frame")?;

        // Poll so flash messages expire without input
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }
    }
    Ok(())
}

fn cmd_list<S: KeyValueStore>(store: &RecordStore<S>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Registered periods ({}):", store.records().len())?;
    writeln!(out, "{}", "=".repeat(60))?;

    for line in format_record_lines(store.records(), 20) {
        writeln!(out, "{}", line)?;
    }

    if store.records().is_empty() {
        writeln!(out, "(empty - no periods registered yet)")?;
    }

    Ok(())
}

fn cmd_add<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    name: String,
    email: String,
    out: &mut impl Write,
) -> Result<()> {
    store.open_create_form();
    store.update_draft_field(Field::Name, name);
    store.update_draft_field(Field::Email, email);

    match store.submit()? {
        Submitted::Created(id) => writeln!(out, "Added period {}", id)?,
        other => log::warn!("Unexpected submit outcome {:?}", other),
    }
    Ok(())
}

fn cmd_edit<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    id: u64,
    name: Option<String>,
    email: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    if !store.open_edit_form(id) {
        bail!("No period with id {}", id);
    }
    if let Some(name) = name {
        store.update_draft_field(Field::Name, name);
    }
    if let Some(email) = email {
        store.update_draft_field(Field::Email, email);
    }

    match store.submit()? {
        Submitted::Updated(id) => writeln!(out, "Updated period {}", id)?,
        other => log::warn!("Unexpected submit outcome {:?}", other),
    }
    Ok(())
}

fn cmd_delete<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    id: u64,
    out: &mut impl Write,
) -> Result<()> {
    match store.delete(id)? {
        Some(record) => writeln!(out, "Deleted period {} ({})", record.id, record.name)?,
        None => writeln!(out, "No period with id {}", id)?,
    }
    Ok(())
}

fn cmd_export<S: KeyValueStore>(store: &RecordStore<S>, out: &mut impl Write) -> Result<()> {
    let blob = store.repository().raw()?;
    writeln!(out, "{}", blob.unwrap_or_else(|| "[]".to_string()))?;
    Ok(())
}
