use blockpad::config::Config;
use blockpad::document::Document;
use blockpad::keymap::KeyEvent;
use blockpad::segmenter::segment;
use blockpad::serializer::serialize;
use blockpad::session::EditSession;
use blockpad::store::NoteStore;
use clap::{Parser, Subcommand};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process::Command;
use std::time::SystemTime;

type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "blockpad")]
#[command(about = "Block-based notes with code and math fences", long_about = None)]
struct Args {
    /// Notes directory (overrides the config file)
    #[arg(short, long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all notes
    Ls,
    /// Print a note
    View {
        /// Name of the note to view
        name: String,
    },
    /// Print the blocks a note is made of
    Blocks {
        /// Name of the note
        name: String,
    },
    /// Find blocks containing a term
    Search {
        /// Name of the note
        name: String,
        /// Case-insensitive search term (at least two characters)
        term: String,
    },
    /// Verify that notes survive a load/save cycle unchanged
    Check {
        /// Note to check; all notes when omitted
        name: Option<String>,
    },
    /// Check or uncheck the task at a block index
    Task {
        /// Name of the note
        name: String,
        /// Block index of the task
        index: usize,
    },
    /// Replay key presses such as "Enter" or "Ctrl+Shift+K" on a note
    Keys {
        /// Name of the note
        name: String,
        /// Keys to press, in order
        #[arg(required = true)]
        keys: Vec<String>,
        /// Print the result instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit a note in $VISUAL or $EDITOR
    Edit {
        /// Name of the note to edit
        name: String,
    },
}

fn get_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| "vim".to_string())
}

/// Flush a session as if the editor lost focus
fn close(mut session: EditSession<'_>) -> CmdResult {
    if session.blur()? {
        println!("{}", session.status_text());
    }
    Ok(())
}

fn cmd_ls(store: &NoteStore) -> CmdResult {
    for name in store.list_all()? {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_view(store: &NoteStore, name: &str) -> CmdResult {
    let note = store.load(name)?;
    if note.content.is_empty() {
        println!("(empty)");
    } else {
        print!("{}", note.content);
    }
    Ok(())
}

fn cmd_blocks(store: &NoteStore, name: &str) -> CmdResult {
    let note = store.load(name)?;
    println!("{}", Document::from_text(&note.content));
    Ok(())
}

fn cmd_search(store: &NoteStore, name: &str, term: &str) -> CmdResult {
    let note = store.load(name)?;
    let mut doc = Document::from_text(&note.content);
    doc.search(term);

    let matches = doc.search_state().matches().to_vec();
    if matches.is_empty() {
        println!("no matches for '{}'", term);
    }
    for index in matches {
        if let Some(block) = doc.block(index) {
            println!("[{}] {}", index, block);
        }
    }
    Ok(())
}

fn cmd_check(store: &NoteStore, name: Option<String>) -> CmdResult {
    let names = match name {
        Some(name) => vec![name],
        None => store.list_all()?,
    };

    let mut failed = 0;
    for name in &names {
        let note = store.load(name)?;
        if serialize(&segment(&note.content)) == note.content {
            println!("ok       {}", name);
        } else {
            println!("changed  {}", name);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} notes would change when saved", failed, names.len()).into());
    }
    Ok(())
}

fn cmd_task(store: &NoteStore, config: &Config, name: &str, index: usize) -> CmdResult {
    let mut session = EditSession::open(store, name, config)?;
    let toggled = session.edit(|doc| {
        doc.set_active(index)?;
        doc.toggle_task()
    })?;
    if !toggled {
        return Err(format!("block {} of '{}' is not a task", index, name).into());
    }
    println!("{}", session.document().active_block());
    close(session)
}

fn cmd_keys(store: &NoteStore, config: &Config, name: &str, keys: &[String], dry_run: bool) -> CmdResult {
    let mut session = EditSession::open(store, name, config)?;

    for description in keys {
        let event: KeyEvent = description.parse()?;
        session.press(event)?;
        if !dry_run {
            session.tick(SystemTime::now())?;
        }
    }

    if dry_run {
        let doc = session.document();
        println!("{}", doc);
        println!("---");
        println!("{}", doc.to_text());
        return Ok(());
    }
    close(session)
}

fn cmd_edit(store: &NoteStore, name: &str) -> CmdResult {
    let note = store.load(name)?;
    let editor = get_editor();

    let status = Command::new(&editor)
        .arg(&note.path)
        .current_dir(store.base_path())
        .status()
        .map_err(|e| format!("Failed to open editor '{}': {}", editor, e))?;

    if !status.success() {
        return Err(format!("Editor exited with status: {}", status).into());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::load();
    let notes_dir = args.directory.clone().unwrap_or_else(|| config.notes_dir());
    let store = NoteStore::new(notes_dir);

    let result = match args.command {
        Commands::Ls => cmd_ls(&store),
        Commands::View { name } => cmd_view(&store, &name),
        Commands::Blocks { name } => cmd_blocks(&store, &name),
        Commands::Search { name, term } => cmd_search(&store, &name, &term),
        Commands::Check { name } => cmd_check(&store, name),
        Commands::Task { name, index } => cmd_task(&store, &config, &name, index),
        Commands::Keys { name, keys, dry_run } => cmd_keys(&store, &config, &name, &keys, dry_run),
        Commands::Edit { name } => cmd_edit(&store, &name),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
