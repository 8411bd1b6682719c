// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! `envprefs`: inspect and edit environment-scoped preferences from a shell.
//!
//! Operates on the same JSON store file the desktop app uses. Writes made here
//! are not announced to a running app instance; it picks them up on next read.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use envprefs_core::{EnvPrefs, HistoryRecord, KvStore, NullStore, DEFAULT_MAX_HISTORY};
use envprefs_fs::FsKvStore;
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "envprefs", version, about = "Environment-scoped preference store")]
struct Cli {
    /// Store file to use instead of the platform config directory.
    #[arg(long, global = true, env = "ENVPREFS_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a preference value as JSON.
    Get {
        /// Environment ID.
        env: String,
        /// Preference key (without the `env:{id}:` prefix).
        key: String,
    },
    /// Store a JSON value as a preference.
    Set {
        /// Environment ID.
        env: String,
        /// Preference key (without the `env:{id}:` prefix).
        key: String,
        /// JSON-encoded value.
        value: String,
    },
    /// List every stored key of an environment.
    Keys {
        /// Environment ID.
        env: String,
    },
    /// Delete every preference of an environment.
    Cleanup {
        /// Environment ID.
        env: String,
    },
    /// Recently used values.
    #[command(subcommand)]
    Recent(RecentCommand),
    /// Gadget run history.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Subcommand)]
enum RecentCommand {
    /// Print the list, most recent first.
    List(RecentTarget),
    /// Record a value as most recent.
    Add {
        #[command(flatten)]
        target: RecentTarget,
        /// Value to record.
        value: String,
    },
    /// Empty the list.
    Clear(RecentTarget),
}

#[derive(Args)]
struct RecentTarget {
    /// Environment ID.
    env: String,
    /// Kubernetes resource type (`namespace`, `pod`, `container`, ...).
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    k8s: Option<String>,
    /// Use the gadget URL list.
    #[arg(long)]
    url: bool,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Print the history as JSON, most recent first.
    List {
        /// Environment ID.
        env: String,
    },
    /// Record a gadget run.
    Add {
        /// Environment ID.
        env: String,
        /// Gadget image reference.
        #[arg(long)]
        image: String,
        /// Run parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
        /// Milliseconds since the Unix epoch (defaults to now).
        #[arg(long)]
        timestamp: Option<i64>,
        /// Maximum number of entries to keep.
        #[arg(long, default_value_t = DEFAULT_MAX_HISTORY)]
        max: usize,
    },
    /// Drop the history.
    Clear {
        /// Environment ID.
        env: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let prefs = EnvPrefs::new(open_store(cli.store));
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Get { env, key } => {
            let Some(value) = prefs.get::<Value>(&env, &key) else {
                bail!("`{key}` is not set for environment `{env}`");
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        Commands::Set { env, key, value } => {
            let value: Value = serde_json::from_str(&value).context("value must be valid JSON")?;
            prefs.set(&env, &key, &value)?;
        }
        Commands::Keys { env } => {
            for key in prefs.env_keys(&env) {
                writeln!(out, "{key}")?;
            }
        }
        Commands::Cleanup { env } => {
            let removed = prefs.cleanup_environment(&env);
            writeln!(out, "removed {removed} keys for environment {env}")?;
        }
        Commands::Recent(cmd) => run_recent(&prefs, cmd, &mut out)?,
        Commands::History(cmd) => run_history(&prefs, cmd, &mut out)?,
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Box<dyn KvStore> {
    let opened = match path {
        Some(path) => FsKvStore::open(path),
        None => FsKvStore::new(),
    };
    match opened {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(%err, "store unavailable; changes will not persist");
            Box::new(NullStore)
        }
    }
}

fn run_recent<S: KvStore>(
    prefs: &EnvPrefs<S>,
    cmd: RecentCommand,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        RecentCommand::List(target) => {
            let list = match &target.k8s {
                Some(kind) => prefs.get_k8s_recents(&target.env, kind),
                None => prefs.get_gadget_url_recents(&target.env),
            };
            for value in list {
                writeln!(out, "{value}")?;
            }
        }
        RecentCommand::Add { target, value } => match &target.k8s {
            Some(kind) => prefs.save_k8s_recent(&target.env, kind, &value)?,
            None => prefs.save_gadget_url_recent(&target.env, &value)?,
        },
        RecentCommand::Clear(target) => match &target.k8s {
            Some(kind) => prefs.clear_k8s_recents(&target.env, kind)?,
            None => prefs.clear_gadget_url_recents(&target.env)?,
        },
    }
    Ok(())
}

fn run_history<S: KvStore>(
    prefs: &EnvPrefs<S>,
    cmd: HistoryCommand,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        HistoryCommand::List { env } => {
            let history = prefs.get_gadget_history(&env);
            writeln!(out, "{}", serde_json::to_string_pretty(&history)?)?;
        }
        HistoryCommand::Add {
            env,
            image,
            params,
            timestamp,
            max,
        } => {
            let params: Value =
                serde_json::from_str(&params).context("--params must be valid JSON")?;
            let timestamp = match timestamp {
                Some(ts) => ts,
                None => now_millis()?,
            };
            prefs.add_gadget_to_history(&env, HistoryRecord::new(image, params, timestamp), max)?;
        }
        HistoryCommand::Clear { env } => prefs.clear_gadget_history(&env)?,
    }
    Ok(())
}

fn now_millis() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    i64::try_from(elapsed.as_millis()).context("timestamp out of range")
}
