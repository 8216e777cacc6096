//! `pathconf` command-line tool
//!
//! Reads and edits an overlay file the same way a session-bound store does:
//! values equal to their default are dropped, and server entries can be
//! listed and removed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pathconf_store::{
    Defaults, MemorySessionStore, PathConfigStore, SessionStore, StaticSettings, StoreOptions,
};
use pathconf_tree::{ConfigTree, ConfigValue};
use tracing_subscriber::EnvFilter;

const DEFAULT_OVERLAY: &str = "pathconf-overlay.json";

fn cli() -> Command {
    Command::new("pathconf")
        .version(pathconf_store::VERSION)
        .about("Inspect and edit path-addressed configuration overlays")
        .subcommand_required(true)
        .arg(
            Arg::new("overlay")
                .long("overlay")
                .global(true)
                .default_value(DEFAULT_OVERLAY)
                .value_parser(value_parser!(PathBuf))
                .help("Overlay file (JSON object), created on first write"),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings document (JSON, YAML or TOML); builtin defaults when omitted"),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Base configuration (JSON object); setup mode when omitted"),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .global(true)
                .default_value("1")
                .value_parser(value_parser!(u32))
                .help("Server index selecting the session slot"),
        )
        .arg(
            Arg::new("persist")
                .long("persist")
                .global(true)
                .action(ArgAction::Append)
                .help("Path always written and exported, even at its default"),
        )
        .arg(
            Arg::new("map")
                .long("map")
                .global(true)
                .action(ArgAction::Append)
                .help("Path mapping as external=internal"),
        )
        .subcommand(
            Command::new("show")
                .about("Print the overlay")
                .arg(
                    Arg::new("nested")
                        .long("nested")
                        .action(ArgAction::SetTrue)
                        .help("Print as nested tree instead of flat paths"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Print the effective value of a path")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(
            Command::new("set")
                .about("Set a value (parsed as JSON, else taken as a string)")
                .arg(Arg::new("path").required(true))
                .arg(Arg::new("value").required(true)),
        )
        .subcommand(Command::new("servers").about("List servers with name and DSN"))
        .subcommand(
            Command::new("remove-server")
                .about("Remove a server and shift the ones above it down")
                .arg(
                    Arg::new("index")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(Command::new("reset").about("Clear the overlay"))
        .subcommand(Command::new("defaults").about("Print the flattened defaults"))
}

/// Store bound to an overlay file
struct Workspace {
    store: PathConfigStore,
    overlay_path: PathBuf,
}

impl Workspace {
    fn open(matches: &ArgMatches) -> Result<Self> {
        let settings = match matches.get_one::<PathBuf>("settings") {
            Some(path) => StaticSettings::from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => StaticSettings::builtin().context("loading builtin settings")?,
        };
        let base = matches
            .get_one::<PathBuf>("base")
            .map(|path| read_tree(path))
            .transpose()?;
        let options =
            StoreOptions::new().with_server_index(matches.get_one::<u32>("server").copied().unwrap_or(1));

        let overlay_path = matches
            .get_one::<PathBuf>("overlay")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERLAY));
        let session = MemorySessionStore::new();
        if overlay_path.exists() {
            session.write(&options.session_key(), read_tree(&overlay_path)?);
        }

        let mut store = PathConfigStore::new(
            Arc::new(Defaults::load(&settings)),
            Arc::new(session),
            base,
            &options,
        );
        if let Some(keys) = matches.get_many::<String>("persist") {
            store.set_persist_keys(keys.cloned());
        }
        let mapping = matches
            .get_many::<String>("map")
            .into_iter()
            .flatten()
            .map(|raw| parse_mapping(raw))
            .collect::<Result<Vec<_>>>()?;
        store.set_read_write_mapping(mapping);

        Ok(Self {
            store,
            overlay_path,
        })
    }

    fn save(&self) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.store.config_data())?;
        json.push('\n');
        fs::write(&self.overlay_path, json)
            .with_context(|| format!("writing overlay to {}", self.overlay_path.display()))?;
        tracing::debug!(path = %self.overlay_path.display(), "overlay saved");
        Ok(())
    }
}

fn read_tree(path: &Path) -> Result<ConfigTree> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    ConfigTree::try_from(value).map_err(|_| anyhow!("{} does not hold a JSON object", path.display()))
}

fn parse_value(raw: &str) -> ConfigValue {
    serde_json::from_str::<serde_json::Value>(raw).map_or_else(|_| ConfigValue::from(raw), ConfigValue::from)
}

fn parse_mapping(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((external, internal)) if !external.is_empty() && !internal.is_empty() => {
            Ok((external.to_string(), internal.to_string()))
        }
        _ => bail!("mapping must look like external=internal, got '{raw}'"),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))
}

fn run(matches: &ArgMatches) -> Result<String> {
    let workspace = Workspace::open(matches)?;
    let store = &workspace.store;

    let output = match matches.subcommand() {
        Some(("show", args)) => {
            if args.get_flag("nested") {
                serde_json::to_string_pretty(&store.config())?
            } else {
                serde_json::to_string_pretty(&store.flat_config())?
            }
        }
        Some(("get", args)) => {
            let path = required(args, "path")?;
            let value = store.get_value(path).unwrap_or_default();
            serde_json::to_string(&value)?
        }
        Some(("set", args)) => {
            let path = required(args, "path")?;
            store.set(path, parse_value(required(args, "value")?));
            workspace.save()?;
            match store.get(path) {
                Some(value) => format!("{path} = {}", serde_json::to_string(&value)?),
                None => format!("{path} reset to default"),
            }
        }
        Some(("servers", _)) => {
            let mut lines = Vec::new();
            for key in store.servers().keys() {
                let Ok(index) = key.parse::<u32>() else {
                    continue;
                };
                lines.push(format!(
                    "{index}\t{}\t{}",
                    store.server_name(index),
                    store.server_dsn(index)
                ));
            }
            lines.join("\n")
        }
        Some(("remove-server", args)) => {
            let index = args
                .get_one::<u32>("index")
                .copied()
                .ok_or_else(|| anyhow!("missing argument <index>"))?;
            store.remove_server(index);
            workspace.save()?;
            format!("{} server(s) left", store.server_count())
        }
        Some(("reset", _)) => {
            store.reset_config_data();
            workspace.save()?;
            "overlay cleared".to_string()
        }
        Some(("defaults", _)) => serde_json::to_string_pretty(&store.flat_default_config())?,
        _ => bail!("unknown subcommand"),
    };
    Ok(output)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let output = run(&matches)?;
    println!("{output}");
    Ok(())
}
