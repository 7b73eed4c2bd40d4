use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use appconf::config::Config;
use appconf::diagnostics::{render_error, ConfError};
use appconf::lexer::Lexer;
use appconf::session::Session;
use appconf::source_map::SourceMap;

#[derive(Parser)]
#[command(name = "appconf", version, about = "Front end for application configuration files")]
struct Cli {
    /// Path to an appconf.toml manifest (defaults to ./appconf.toml if present)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Configuration root directory; includes resolve under it
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the configuration and print a summary
    Parse {
        /// Entry file, relative to the root
        entry: Option<PathBuf>,
        /// Print the declaration tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the token stream of a single file (includes are not followed)
    Tokens {
        /// File to tokenize
        file: PathBuf,
    },
    /// Parse, then check route dependencies and dialog layouts
    Check {
        /// Entry file, relative to the root
        entry: Option<PathBuf>,
    },
    /// Re-parse whenever a file under the root changes
    Watch {
        /// Entry file, relative to the root
        entry: Option<PathBuf>,
        /// Don't clear terminal between runs
        #[arg(long)]
        no_clear: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(manifest: Option<&Path>, root: Option<PathBuf>, entry: Option<PathBuf>) -> Result<Config, ConfError> {
    let config = match manifest {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };
    Ok(config.with_overrides(root, entry))
}

fn fail(err: &ConfError, sources: &SourceMap) -> ! {
    render_error(err, sources);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let entry = match &cli.command {
        Commands::Parse { entry, .. } | Commands::Check { entry } | Commands::Watch { entry, .. } => entry.clone(),
        Commands::Tokens { .. } => None,
    };
    let config = match load_config(cli.manifest.as_deref(), cli.root.clone(), entry) {
        Ok(config) => config,
        Err(err) => fail(&err, &SourceMap::new()),
    };

    match cli.command {
        Commands::Parse { json, .. } => {
            let mut session = Session::new(&config.root);
            let app = match appconf::parse_file(&mut session, &config.entry) {
                Ok(app) => app,
                Err(err) => fail(&err, session.sources()),
            };
            if json {
                match serde_json::to_string_pretty(&app) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("error: failed to serialize declaration tree: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                appconf::watch::print_summary(&app);
            }
        }
        Commands::Tokens { file } => {
            let text = match std::fs::read_to_string(&file) {
                Ok(text) => text,
                Err(e) => fail(&ConfError::io(&file, e), &SourceMap::new()),
            };
            let mut sources = SourceMap::new();
            let (file_id, source) = sources.add_file(file.clone(), text);
            let mut lexer = Lexer::new(Rc::clone(&source), file_id);
            match lexer.tokenize() {
                Ok(tokens) => {
                    for tok in tokens {
                        let (line, column) = source.line_col(tok.span.start);
                        println!("{line}:{column}\t{:?}\t{}", tok.node.kind(), tok.node);
                    }
                }
                Err(err) => fail(&err, &sources),
            }
        }
        Commands::Check { .. } => {
            let mut session = Session::new(&config.root);
            let app = match appconf::parse_file(&mut session, &config.entry) {
                Ok(app) => app,
                Err(err) => fail(&err, session.sources()),
            };
            if let Err(err) = appconf::check::check_app(&app) {
                fail(&err, session.sources());
            }
            eprintln!("{}: ok", config.entry_path().display());
        }
        Commands::Watch { no_clear, .. } => {
            if let Err(err) = appconf::watch::watch(&config, no_clear) {
                fail(&err, &SourceMap::new());
            }
        }
    }
}
