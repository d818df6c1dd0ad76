use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use unistyle::icons::{ICON_GROUPS, bulletize_lines};
use unistyle::richtext::{StyleDimension, StyleSet, style_str, unstyle_str};
use unistyle::{Config, compile_markdown, read_input};

#[derive(Parser, Debug)]
#[command(name = "unistyle")]
#[command(about = "Styled text for plain-text fields", long_about = None)]
struct Args {
    /// Config file (default: config.toml in the platform config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log editing decisions to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile markdown to Unicode-styled text
    Compile {
        /// Markdown file (default: standard input)
        file: Option<PathBuf>,
        /// Also print character and grapheme counts to stderr
        #[arg(long)]
        count: bool,
    },
    /// Map text through one style (bold, italic, mono, script)
    Style {
        dimension: StyleDimension,
        /// Text to style (default: standard input)
        text: Option<String>,
    },
    /// Turn styled text back into plain ASCII
    Plain {
        /// Input file (default: standard input)
        file: Option<PathBuf>,
    },
    /// List the icon palette
    Icons,
    /// Put a bullet in front of every non-empty line
    Bulletize {
        /// Input file (default: standard input)
        file: Option<PathBuf>,
        /// Bullet to use (default: the configured bullet)
        #[arg(short = 'p', long = "prefix")]
        prefix: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(Config::default_path) else {
        return Config::default();
    };
    Config::load(&path).unwrap_or_else(|err| {
        warn!(%err, "using default settings");
        Config::default()
    })
}

fn input_text(file: Option<&Path>) -> unistyle::Result<String> {
    let text = read_input(file)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

fn run(command: Commands, config: &Config) -> unistyle::Result<()> {
    match command {
        Commands::Compile { file, count } => {
            let markdown = read_input(file.as_deref())?;
            let output = compile_markdown(&markdown, &config.compile_options());
            println!("{}", output.text);
            if count {
                eprintln!(
                    "{} characters, {} graphemes",
                    output.char_count, output.grapheme_count
                );
            }
        }
        Commands::Style { dimension, text } => {
            let text = match text {
                Some(text) => text,
                None => input_text(None)?,
            };
            println!("{}", style_str(&text, StyleSet::from(dimension)));
        }
        Commands::Plain { file } => {
            println!("{}", unstyle_str(&input_text(file.as_deref())?));
        }
        Commands::Icons => {
            for (group, icons) in ICON_GROUPS {
                println!("{group}: {}", icons.join(" "));
            }
        }
        Commands::Bulletize { file, prefix } => {
            let prefix = prefix.unwrap_or_else(|| config.bullet.clone());
            println!(
                "{}",
                bulletize_lines(&input_text(file.as_deref())?, &prefix)
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(args.config.as_deref());

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
