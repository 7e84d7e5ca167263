use clap::{Parser, Subcommand};
use keepnotes::config::Config;
use keepnotes::identity::{IdentityProvider, LocalIdentity, UserId};
use keepnotes::logging;
use keepnotes::note::{Note, NoteDraft, NotePatch, TextFormat};
use keepnotes::richtext::{InlineFormat, Selection, apply_format, detect_formats};
use keepnotes::search::{SearchDebouncer, filter_notes};
use keepnotes::store::{LocalNoteStore, NoteStore};
use keepnotes::view::render_note;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "keep")]
#[command(about = "Sticky notes with inline formatting", long_about = None)]
struct Args {
    /// Directory containing note files (default: platform data directory)
    #[arg(short = 'd', long = "directory", value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Act as this user instead of the configured or login name
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a note
    Add {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Background color name
        #[arg(long)]
        color: Option<String>,
        /// Whole-note text format (normal, h1, h2)
        #[arg(long, default_value = "normal")]
        format: TextFormat,
    },
    /// List notes, optionally only those matching a search query
    Ls {
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Read queries from standard input, one per line, and list the matching
    /// notes once no new query has arrived for the search delay
    Search,
    /// Render a note as markup, highlighting an optional query
    Show {
        id: String,
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Toggle an inline format (bold, italic, underline, clear) on a range
    Format {
        id: String,
        /// Selection start (UTF-16 offset into the content)
        start: usize,
        /// Selection end (exclusive)
        end: usize,
        format: InlineFormat,
    },
    /// Report the inline formats of a range
    Detect { id: String, start: usize, end: usize },
    /// Set the whole-note text format
    Heading { id: String, format: TextFormat },
    /// Delete a note
    Rm { id: String },
}

fn cmd_add(
    store: &mut dyn NoteStore,
    owner: &UserId,
    title: String,
    content: String,
    color: Option<String>,
    format: TextFormat,
) -> Result<(), String> {
    let mut draft = NoteDraft::new(title, content);
    draft.text_format = format;
    if let Some(color) = color {
        draft.bg_color = color;
    }
    let id = store.create(draft, owner).map_err(|e| e.to_string())?;
    println!("{}", id);
    Ok(())
}

fn print_matches(notes: &[Note], query: &str) {
    for note in filter_notes(notes, query) {
        let title = if note.title.is_empty() {
            "(untitled)"
        } else {
            note.title.as_str()
        };
        println!(
            "{}  {}  {}",
            note.id,
            note.created_at.format("%Y-%m-%d %H:%M"),
            title
        );
    }
}

fn cmd_ls(store: &dyn NoteStore, owner: &UserId, query: Option<String>) -> Result<(), String> {
    let notes = store.list(owner).map_err(|e| e.to_string())?;
    print_matches(&notes, &query.unwrap_or_default());
    Ok(())
}

fn cmd_search(store: &dyn NoteStore, owner: &UserId, delay: Duration) -> Result<(), String> {
    let notes = store.list(owner).map_err(|e| e.to_string())?;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut debouncer = SearchDebouncer::new(delay);
    loop {
        let received = match debouncer.deadline() {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(query) => debouncer.push(query, Instant::now()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // Input ended: whatever was typed last still gets answered
                if let Some(query) = debouncer.flush() {
                    println!("-- {}", query);
                    print_matches(&notes, &query);
                }
                return Ok(());
            }
        }

        if let Some(query) = debouncer.poll(Instant::now()) {
            println!("-- {}", query);
            print_matches(&notes, &query);
        }
    }
}

fn cmd_show(store: &dyn NoteStore, id: &str, query: &str) -> Result<(), String> {
    let note = store.get(id).map_err(|e| e.to_string())?;
    let view = render_note(&note, query);
    println!(r#"<h1 class="{}">{}</h1>"#, view.text_format_class, view.title_html);
    println!("<p>{}</p>", view.body_html);
    Ok(())
}

fn cmd_format(
    store: &mut dyn NoteStore,
    id: &str,
    selection: Selection,
    format: InlineFormat,
) -> Result<(), String> {
    let note = store.get(id).map_err(|e| e.to_string())?;
    let formatted = apply_format(&note.content, selection, format).map_err(|e| e.to_string())?;
    store
        .update(id, NotePatch::content(formatted.content.clone()))
        .map_err(|e| e.to_string())?;

    println!("{}", formatted.content);
    println!(
        "selection {}..{}  bold={} italic={} underline={}",
        formatted.selection.start,
        formatted.selection.end,
        formatted.formats.bold,
        formatted.formats.italic,
        formatted.formats.underline
    );
    Ok(())
}

fn cmd_detect(store: &dyn NoteStore, id: &str, selection: Selection) -> Result<(), String> {
    let note = store.get(id).map_err(|e| e.to_string())?;
    let formats = detect_formats(&note.content, selection);
    println!(
        "bold={} italic={} underline={}",
        formats.bold, formats.italic, formats.underline
    );
    Ok(())
}

fn cmd_heading(store: &mut dyn NoteStore, id: &str, format: TextFormat) -> Result<(), String> {
    store
        .update(id, NotePatch::text_format(format))
        .map_err(|e| e.to_string())
}

fn cmd_rm(store: &mut dyn NoteStore, id: &str) -> Result<(), String> {
    store.delete(id).map_err(|e| e.to_string())
}

fn run(args: Args, config: Config) -> Result<(), String> {
    let identity = LocalIdentity::new(args.user.or(config.user.clone()));
    let owner = identity.sign_in().map_err(|e| e.user_message().to_string())?;

    let notes_dir = args.directory.unwrap_or_else(|| config.notes_dir());
    let mut store = LocalNoteStore::new(notes_dir);

    match args.command {
        Commands::Add {
            title,
            content,
            color,
            format,
        } => cmd_add(&mut store, &owner, title, content, color, format),
        Commands::Ls { query } => cmd_ls(&store, &owner, query),
        Commands::Search => cmd_search(&store, &owner, config.search_delay()),
        Commands::Show { id, query } => cmd_show(&store, &id, &query),
        Commands::Format {
            id,
            start,
            end,
            format,
        } => cmd_format(&mut store, &id, Selection::new(start, end), format),
        Commands::Detect { id, start, end } => cmd_detect(&store, &id, Selection::new(start, end)),
        Commands::Heading { id, format } => cmd_heading(&mut store, &id, format),
        Commands::Rm { id } => cmd_rm(&mut store, &id),
    }
}

fn main() {
    logging::init();
    let config = Config::load();
    let args = Args::parse();

    if let Err(e) = run(args, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
