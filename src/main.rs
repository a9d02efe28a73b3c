//! Deniable Container - seal and open deniable backup containers.
//!
//! A container holds a primary payload and, optionally, a hidden one. Each
//! opens with its own password; nothing in the file reveals how many there are.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use deniable_container::{
    generate_salt, ContainerEngine, ContainerExporter, EngineConfig, SecretPayload,
};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "deniable-container")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Deniable encryption containers for wallet backups",
    long_about = "Seals one or two password-protected payloads into a single container whose length and contents reveal neither payload count nor size."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh random salt as hex
    Salt,

    /// Seal payloads into a new container
    Seal {
        /// Output container file
        output: PathBuf,

        /// File holding the primary payload
        #[arg(long, conflicts_with = "data")]
        input: Option<PathBuf>,

        /// Primary payload as a string
        #[arg(long, conflicts_with = "input")]
        data: Option<String>,

        /// File holding the hidden payload
        #[arg(long, conflicts_with = "hidden_data")]
        hidden_input: Option<PathBuf>,

        /// Hidden payload as a string
        #[arg(long, conflicts_with = "hidden_input")]
        hidden_data: Option<String>,

        /// Maximum sealing attempts (default: scaled to payload size)
        #[arg(long)]
        attempts: Option<u32>,

        /// JSON engine configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Open a container with one password
    Open {
        /// Container file
        container: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// JSON engine configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Salt => {
            println!("{}", hex::encode(generate_salt()));
            Ok(())
        }

        Commands::Seal {
            output,
            input,
            data,
            hidden_input,
            hidden_data,
            attempts,
            config,
        } => cmd_seal(
            &output,
            input,
            data,
            hidden_input,
            hidden_data,
            attempts,
            config.as_deref(),
        ),

        Commands::Open {
            container,
            output,
            config,
        } => cmd_open(&container, output, config.as_deref()),
    }
}

fn load_engine(config: Option<&Path>) -> anyhow::Result<ContainerEngine> {
    let config = match config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(ContainerEngine::new(config))
}

fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Ok(password),
        Err(_) => {
            eprint!("{}", prompt);
            io::stderr().flush()?;
            read_password_line(&mut io::stdin().lock())
        }
    }
}

/// Read one password line, failing instead of returning an empty password at EOF.
fn read_password_line(reader: &mut impl BufRead) -> anyhow::Result<String> {
    let mut password = String::new();
    if reader.read_line(&mut password)? == 0 {
        bail!("No password provided: no terminal and stdin is exhausted");
    }
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_new_password(label: &str) -> anyhow::Result<String> {
    let password = prompt_password(&format!("{} password: ", label))?;
    let confirm = prompt_password(&format!("Confirm {} password: ", label.to_lowercase()))?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

fn read_payload(input: Option<PathBuf>, data: Option<String>) -> anyhow::Result<Option<Vec<u8>>> {
    match (input, data) {
        (Some(path), None) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            Ok(Some(bytes))
        }
        (None, Some(s)) => Ok(Some(s.into_bytes())),
        (None, None) => Ok(None),
        (Some(_), Some(_)) => unreachable!(),
    }
}

fn cmd_seal(
    output: &Path,
    input: Option<PathBuf>,
    data: Option<String>,
    hidden_input: Option<PathBuf>,
    hidden_data: Option<String>,
    attempts: Option<u32>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let engine = load_engine(config)?;

    let primary = match read_payload(input, data)? {
        Some(bytes) => bytes,
        None => {
            // Read from stdin
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };
    let hidden = read_payload(hidden_input, hidden_data)?;

    let primary_password = prompt_new_password("Primary")?;
    let hidden_password = match hidden {
        Some(_) => Some(prompt_new_password("Hidden")?),
        None => None,
    };

    if hidden_password.as_deref() == Some(primary_password.as_str()) {
        bail!("The hidden payload needs a different password than the primary one");
    }

    let mut exporter = ContainerExporter::new(engine);
    if let Some(attempts) = attempts {
        exporter = exporter.with_max_attempts(attempts);
    }

    let hidden_payload = match (&hidden, &hidden_password) {
        (Some(message), Some(password)) => Some(SecretPayload::new(message, password)),
        _ => None,
    };
    let container =
        exporter.seal(SecretPayload::new(&primary, &primary_password), hidden_payload)?;

    std::fs::write(output, &container)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} byte container to {}", container.len(), output.display());

    Ok(())
}

fn cmd_open(
    container: &Path,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let engine = load_engine(config)?;
    let bytes =
        std::fs::read(container).with_context(|| format!("reading {}", container.display()))?;
    let password = prompt_password("Password: ")?;

    let Some(data) = engine.extract_message_from_bytes(&bytes, &password) else {
        bail!("Incorrect password or unreadable file");
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &data)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            io::stdout().write_all(&data)?;
        }
    }

    Ok(())
}
