use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr};
use quillmark_core::{ContentState, HandleResult, MarkdownShortcuts, PlainHost, decorate_block};

mod config;

#[derive(Parser)]
#[command(
    version,
    about = "Quillmark - replay text through live markdown shortcuts",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a KDL config file (defaults to <config dir>/quillmark/config.kdl)
    #[arg(long, global = true, env = "QUILLMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for the resulting document
    #[arg(long, global = true, value_enum, default_value_t = Format::Outline)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a file one keystroke at a time
    Type {
        /// Input file, `-` for stdin
        file: PathBuf,
    },
    /// Replay a file as a single plain-text paste
    Paste {
        /// Input file, `-` for stdin
        file: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line per block with style and entity ranges
    Outline,
    /// The full document as JSON
    Json,
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Type { file } => {
            let plugin = MarkdownShortcuts::try_new(config)?;
            let text = read_input(&file)?;
            let mut host = PlainHost::default();
            host.type_text(&plugin, &text);
            print_document(&plugin, host.state().content(), cli.format)?;
        }
        Commands::Paste { file } => {
            let plugin = MarkdownShortcuts::try_new(config)?;
            let text = read_input(&file)?;
            let mut host = PlainHost::default();
            if host.paste(&plugin, &text) == HandleResult::NotHandled {
                tracing::warn!("paste changed nothing");
            }
            print_document(&plugin, host.state().content(), cli.format)?;
        }
        Commands::Config => {
            let json = serde_json::to_string_pretty(&config).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).into_diagnostic()?
    } else {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path.display()))?
    };
    Ok(text)
}

fn print_document(
    plugin: &MarkdownShortcuts,
    content: &ContentState,
    format: Format,
) -> Result<()> {
    match format {
        Format::Outline => {
            println!("{content}");
            let decorators = plugin.decorators();
            for block in content.blocks() {
                for decoration in decorate_block(&decorators, block, content) {
                    println!(
                        "{} {}..{} {:?}",
                        block.key(),
                        decoration.range.start,
                        decoration.range.end,
                        decoration.target
                    );
                }
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(content).into_diagnostic()?;
            println!("{json}");
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
