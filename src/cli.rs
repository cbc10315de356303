//! CLI struct definitions and dispatch for the confman command surface.
//!
//! All clap-derived types live here. The commands are a thin veneer over
//! [`crate::core::store::ConfigManager`]; no logic beyond argument parsing
//! and output rendering belongs in this module.

use crate::core::document::Document;
use crate::core::error::ConfmanError;
use crate::core::name::Version;
use crate::core::store::ConfigManager;
use crate::core::time;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "confman",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage versioned YAML configuration files: modules, experiment records, and per-project usage history."
)]
pub struct Cli {
    /// Project name; also the default experiment name.
    #[clap(long, short = 'p')]
    pub project: String,
    /// Root path the project directory lives under. Must exist.
    #[clap(long)]
    pub path: PathBuf,
    /// Output format for command results.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage module directories.
    Module {
        #[clap(subcommand)]
        command: ModuleCommand,
    },
    /// Manage configuration documents.
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },
    /// Manage the experiment record table.
    Exp {
        #[clap(subcommand)]
        command: ExpCommand,
    },
    /// Show recently used documents for this project.
    History,
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommand {
    /// Create a module directory (no error if it already exists).
    Create { module: String },
    /// Delete a module directory, its documents, and their experiment records.
    Delete { module: String },
    /// List existing modules.
    List,
}

#[derive(clap::Args, Debug)]
pub struct KeyArgs {
    pub module: String,
    pub version: f64,
    /// Experiment name; defaults to the project name.
    #[clap(long, short = 'e')]
    pub experiment: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a new document, optionally seeded from inline YAML.
    Create {
        #[clap(flatten)]
        key: KeyArgs,
        /// Inline YAML mapping, e.g. '{lr: 0.1, layers: [64, 32]}'.
        #[clap(long)]
        data: Option<String>,
    },
    /// Replace a document's contents wholesale.
    Update {
        #[clap(flatten)]
        key: KeyArgs,
        #[clap(long)]
        data: String,
    },
    /// Overlay keys onto a document, keeping the rest.
    Merge {
        #[clap(flatten)]
        key: KeyArgs,
        #[clap(long)]
        data: String,
    },
    /// Print a document.
    Get {
        #[clap(flatten)]
        key: KeyArgs,
    },
    /// Delete a document and its experiment records.
    Delete {
        #[clap(flatten)]
        key: KeyArgs,
    },
    /// List the documents of one module.
    Show { module: String },
    /// List the documents of every module.
    ShowAll,
}

#[derive(Subcommand, Debug)]
pub enum ExpCommand {
    /// Record an existing document in the experiment table.
    Save {
        #[clap(flatten)]
        key: KeyArgs,
        #[clap(long)]
        note: Option<String>,
    },
    /// List experiment records in row id order.
    List,
    /// Print the document referenced by a record.
    Load { row_id: i64 },
    /// Delete one record; the referenced document is untouched.
    Delete { row_id: i64 },
}

fn parse_data(raw: &str) -> Result<Document, ConfmanError> {
    let doc: Document = serde_yaml::from_str(raw)?;
    Ok(doc)
}

fn print_document(doc: &Document, format: OutputFormat) -> Result<(), ConfmanError> {
    match format {
        OutputFormat::Text => print!("{}", serde_yaml::to_string(doc)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(doc)?),
    }
    Ok(())
}

fn print_ok(cmd: &str, format: OutputFormat, extra: serde_json::Value) {
    match format {
        OutputFormat::Text => {
            if let Some(msg) = extra.get("message").and_then(|v| v.as_str()) {
                println!("{} {}", "ok:".green().bold(), msg);
            }
        }
        OutputFormat::Json => {
            let mut envelope = serde_json::json!({
                "ts": time::now_epoch_z(),
                "cmd": cmd,
                "status": "ok",
            });
            if let (Some(base), Some(extra)) = (envelope.as_object_mut(), extra.as_object()) {
                for (k, v) in extra {
                    base.insert(k.clone(), v.clone());
                }
            }
            println!("{}", envelope);
        }
    }
}

pub fn run(cli: Cli) -> Result<(), ConfmanError> {
    let mgr = ConfigManager::new(&cli.project, &cli.path)?;
    let format = cli.format;

    match cli.command {
        Command::Module { command } => run_module(&mgr, command, format),
        Command::Config { command } => run_config(&mgr, command, format),
        Command::Exp { command } => run_exp(&mgr, command, format),
        Command::History => {
            let entries = mgr.show_history()?;
            match format {
                OutputFormat::Text => {
                    for e in &entries {
                        println!("{}  {}", e.accessed_at.dimmed(), e.file_name);
                    }
                }
                OutputFormat::Json => print_ok(
                    "history.show",
                    format,
                    serde_json::json!({ "entries": entries }),
                ),
            }
            Ok(())
        }
    }
}

fn run_module(
    mgr: &ConfigManager,
    command: ModuleCommand,
    format: OutputFormat,
) -> Result<(), ConfmanError> {
    match command {
        ModuleCommand::Create { module } => {
            mgr.create_module(&module)?;
            print_ok(
                "module.create",
                format,
                serde_json::json!({ "message": format!("module '{}' ready", module), "module": module }),
            );
        }
        ModuleCommand::Delete { module } => {
            mgr.delete_module(&module)?;
            print_ok(
                "module.delete",
                format,
                serde_json::json!({ "message": format!("module '{}' deleted", module), "module": module }),
            );
        }
        ModuleCommand::List => {
            let modules = mgr.modules()?;
            match format {
                OutputFormat::Text => {
                    for m in &modules {
                        println!("{}", m);
                    }
                }
                OutputFormat::Json => print_ok(
                    "module.list",
                    format,
                    serde_json::json!({ "modules": modules }),
                ),
            }
        }
    }
    Ok(())
}

fn run_config(
    mgr: &ConfigManager,
    command: ConfigCommand,
    format: OutputFormat,
) -> Result<(), ConfmanError> {
    match command {
        ConfigCommand::Create { key, data } => {
            let initial = data.as_deref().map(parse_data).transpose()?;
            let version = Version::new(key.version)?;
            mgr.create(&key.module, key.experiment.as_deref(), version, initial.as_ref())?;
            let name = mgr
                .resolve_key(&key.module, key.experiment.as_deref(), version)?
                .file_name()?;
            print_ok(
                "config.create",
                format,
                serde_json::json!({ "message": format!("'{}' created", name), "file_name": name }),
            );
        }
        ConfigCommand::Update { key, data } => {
            let doc = parse_data(&data)?;
            let version = Version::new(key.version)?;
            mgr.update(&key.module, key.experiment.as_deref(), version, &doc)?;
            print_ok(
                "config.update",
                format,
                serde_json::json!({ "message": "document replaced" }),
            );
        }
        ConfigCommand::Merge { key, data } => {
            let doc = parse_data(&data)?;
            let version = Version::new(key.version)?;
            mgr.merge(&key.module, key.experiment.as_deref(), version, &doc)?;
            print_ok(
                "config.merge",
                format,
                serde_json::json!({ "message": "document merged" }),
            );
        }
        ConfigCommand::Get { key } => {
            let version = Version::new(key.version)?;
            let doc = mgr.get(&key.module, key.experiment.as_deref(), version)?;
            print_document(&doc, format)?;
        }
        ConfigCommand::Delete { key } => {
            let version = Version::new(key.version)?;
            mgr.delete(&key.module, key.experiment.as_deref(), version)?;
            print_ok(
                "config.delete",
                format,
                serde_json::json!({ "message": "document deleted" }),
            );
        }
        ConfigCommand::Show { module } => {
            let files = mgr.show(&module)?;
            match format {
                OutputFormat::Text => {
                    for f in &files {
                        println!("{}", f);
                    }
                }
                OutputFormat::Json => print_ok(
                    "config.show",
                    format,
                    serde_json::json!({ "module": module, "files": files }),
                ),
            }
        }
        ConfigCommand::ShowAll => {
            let all = mgr.show_all()?;
            match format {
                OutputFormat::Text => {
                    for (module, files) in &all {
                        println!("{}", module.bold());
                        for f in files {
                            println!("  {}", f);
                        }
                    }
                }
                OutputFormat::Json => {
                    print_ok("config.show_all", format, serde_json::json!({ "modules": all }))
                }
            }
        }
    }
    Ok(())
}

fn run_exp(
    mgr: &ConfigManager,
    command: ExpCommand,
    format: OutputFormat,
) -> Result<(), ConfmanError> {
    match command {
        ExpCommand::Save { key, note } => {
            let version = Version::new(key.version)?;
            let record = mgr.save_experiment(
                &key.module,
                version,
                key.experiment.as_deref(),
                note.as_deref(),
            )?;
            print_ok(
                "exp.save",
                format,
                serde_json::json!({
                    "message": format!("record {} saved for '{}'", record.row_id, record.file_name),
                    "record": record,
                }),
            );
        }
        ExpCommand::List => {
            let records = mgr.show_experiment()?;
            match format {
                OutputFormat::Text => {
                    for r in &records {
                        println!(
                            "{:>5}  {}  {}  {}",
                            r.row_id.to_string().bold(),
                            r.saved_at.dimmed(),
                            r.file_name,
                            r.note.as_deref().unwrap_or("")
                        );
                    }
                }
                OutputFormat::Json => print_ok(
                    "exp.list",
                    format,
                    serde_json::json!({ "records": records }),
                ),
            }
        }
        ExpCommand::Load { row_id } => {
            let doc = mgr.load_experiment(row_id)?;
            print_document(&doc, format)?;
        }
        ExpCommand::Delete { row_id } => {
            mgr.delete_experiment(row_id)?;
            print_ok(
                "exp.delete",
                format,
                serde_json::json!({ "message": format!("record {} deleted", row_id) }),
            );
        }
    }
    Ok(())
}
