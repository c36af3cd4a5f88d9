use at_people::config::{JsonSettingsStore, Settings};
use at_people::editor::{Editor, EditorPosition, TextBuffer};
use at_people::vault::{FsVault, VaultWatcher};
use at_people::{logger, AtPeople, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "at-people")]
#[command(about = "Index @person notes in an Obsidian vault and insert links to them")]
struct Cli {
    #[arg(short, long, default_value = "at-people.toml")]
    config: String,

    /// Overrides `vault.path` from the config file
    #[arg(short, long)]
    vault_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every indexed person and the note backing it
    People {
        #[arg(long)]
        json: bool,
    },
    /// Show the @ menu for a query
    Suggest { query: String },
    /// Complete the @mention at a cursor position inside a note
    Link {
        file: PathBuf,
        /// 1-based line number
        #[arg(long)]
        line: usize,
        /// Characters left of the cursor; defaults to the end of the line
        #[arg(long)]
        ch: Option<usize>,
        /// Index of the suggestion to pick
        #[arg(long, default_value_t = 0)]
        pick: usize,
    },
    /// Keep the index live while the vault changes
    Watch,
    /// Show or edit the persisted people settings
    Config {
        #[arg(long)]
        people_folder: Option<String>,
        #[arg(long)]
        explicit_links: Option<bool>,
        #[arg(long)]
        last_name_folder: Option<bool>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::load(&cli.config)?;
    if let Some(vault_path) = cli.vault_path {
        settings.vault.path = vault_path;
    }

    // Initialize logging
    logger::init(&settings.logging)?;

    info!("Starting at-people v{}", env!("CARGO_PKG_VERSION"));
    info!("Vault: {}", settings.vault.path.display());

    let vault = Arc::new(FsVault::new(settings.vault.path.clone()));
    let settings_store = Arc::new(JsonSettingsStore::new(settings.vault.data_file_path()));
    let mut session = AtPeople::load(vault, settings_store).await?;

    match cli.command {
        Command::People { json } => {
            session.initialize().await;
            print_people(&session, json)?;
        }
        Command::Suggest { query } => {
            session.initialize().await;
            let context = at_people::people::TriggerContext {
                start: EditorPosition::default(),
                end: EditorPosition::default(),
                query,
            };
            for suggestion in session.suggestions(&context) {
                println!("{}", suggestion);
            }
        }
        Command::Link { file, line, ch, pick } => {
            session.initialize().await;
            run_link(&session, file, line, ch, pick).await?;
        }
        Command::Watch => run_watch(&mut session, &settings).await?,
        Command::Config {
            people_folder,
            explicit_links,
            last_name_folder,
        } => {
            if let Some(folder) = people_folder {
                session.set_people_folder(folder).await?;
            }
            if let Some(enabled) = explicit_links {
                session.set_use_explicit_links(enabled).await?;
            }
            if let Some(enabled) = last_name_folder {
                session.set_use_last_name_folder(enabled).await?;
            }
            println!("{}", serde_json::to_string_pretty(session.settings())?);
        }
    }

    Ok(())
}

fn print_people(session: &AtPeople, json: bool) -> Result<()> {
    let index = session.index();
    if json {
        println!("{}", serde_json::to_string_pretty(&*index)?);
    } else {
        for (name, path) in index.iter() {
            println!("{}\t{}", name, path);
        }
    }
    Ok(())
}

async fn run_link(
    session: &AtPeople,
    file: PathBuf,
    line: usize,
    ch: Option<usize>,
    pick: usize,
) -> Result<()> {
    let mut buffer = TextBuffer::open(&file).await?;
    let line = line.saturating_sub(1);
    match ch {
        Some(ch) => buffer.set_cursor(EditorPosition::new(line, ch)),
        None => buffer.set_cursor_to_line_end(line),
    }

    let Some(context) = session.on_trigger(&buffer) else {
        warn!("No @mention at line {} of {}", line + 1, file.display());
        return Ok(());
    };

    let suggestions = session.suggestions(&context);
    let Some(suggestion) = suggestions.get(pick) else {
        return Err(format!("Only {} suggestions for {:?}", suggestions.len(), context.query).into());
    };

    let resolution = session.select(suggestion, &context, &mut buffer).await;
    buffer.save(&file).await?;

    println!("{}", resolution.link);
    info!(
        "Note {} (folder: {:?}, file: {:?}); cursor now at {:?}",
        resolution.path,
        resolution.folder,
        resolution.document,
        buffer.cursor()
    );
    Ok(())
}

async fn run_watch(session: &mut AtPeople, settings: &Settings) -> Result<()> {
    // Start watching before the initial listing so nothing slips in between
    let (_watcher, mut events) = VaultWatcher::spawn(&settings.vault.path)?;
    session.initialize().await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if session.handle_event(&event) {
                        info!("{:?} -> {} people", event, session.index().len());
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
