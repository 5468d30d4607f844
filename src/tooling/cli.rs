//! CLI Tooling
//!
//! Command-line interface over a sled-backed comment store. Every command
//! returns its rendered output as a string; the binary prints it.

use crate::auth::Principal;
use crate::config::{ConfigLoader, RemarkConfig};
use crate::error::ApiError;
use crate::reconcile::PurgeReport;
use crate::service::CommentService;
use crate::store::persistence::SledCommentStore;
use crate::store::CommentNode;
use crate::types::{CommentId, ItemId, WriterId};
use crate::views::{CommentView, ThreadView, REMOVED_PLACEHOLDER};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Remark CLI - comment threads with tombstone reconciliation
#[derive(Parser)]
#[command(name = "remark")]
#[command(about = "Post, reply to and remove comments on content items")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.path from config)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load configuration and apply the logging flags on top of it.
    pub fn load_config(&self) -> Result<RemarkConfig, ApiError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage content items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Manage writers
    Writer {
        #[command(subcommand)]
        command: WriterCommands,
    },
    /// Post, edit, delete and inspect comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },
    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show all comments on an item
    Thread {
        /// Item id
        item: ItemId,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Register a content item
    Add {
        /// Item title
        title: String,
    },
}

#[derive(Subcommand)]
pub enum WriterCommands {
    /// Register a writer
    Add {
        /// Display name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Post a root comment on an item
    Post {
        item: ItemId,
        content: String,
        /// Acting writer id
        #[arg(long = "as")]
        writer: WriterId,
    },
    /// Reply to a root comment
    Reply {
        item: ItemId,
        parent: CommentId,
        content: String,
        /// Acting writer id
        #[arg(long = "as")]
        writer: WriterId,
    },
    /// Replace a comment's content
    Edit {
        id: CommentId,
        content: String,
        /// Acting writer id
        #[arg(long = "as")]
        writer: WriterId,
    },
    /// Delete a comment, purging whatever becomes eligible
    Delete {
        id: CommentId,
        /// Acting writer id
        #[arg(long = "as")]
        writer: WriterId,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a single comment, tombstones included
    Show {
        id: CommentId,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context holding the opened store
pub struct CliContext {
    service: CommentService,
    config: RemarkConfig,
}

impl CliContext {
    /// Open the store configured by `config`, or `store_override` when given.
    pub fn new(config: &RemarkConfig, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = match store_override {
            Some(path) => path,
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|e| ApiError::StorageError(crate::error::StorageError::IoError(e)))?;
                config.storage.resolve_path(&cwd)?
            }
        };
        Self::open_with_config(&store_path, config.clone())
    }

    /// Open (or create) a store at `store_path` with default configuration.
    pub fn open(store_path: &Path) -> Result<Self, ApiError> {
        Self::open_with_config(store_path, RemarkConfig::default())
    }

    fn open_with_config(store_path: &Path, config: RemarkConfig) -> Result<Self, ApiError> {
        std::fs::create_dir_all(store_path)
            .map_err(|e| ApiError::StorageError(crate::error::StorageError::IoError(e)))?;
        let store = Arc::new(SledCommentStore::new(store_path)?);
        info!(store_path = %store_path.display(), "store opened");
        Ok(Self {
            service: CommentService::from_store(store),
            config,
        })
    }

    pub fn service(&self) -> &CommentService {
        &self.service
    }

    /// Execute a command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Item {
                command: ItemCommands::Add { title },
            } => {
                let item = self.service.directory().put_item(title)?;
                Ok(format!("Created item {}: {}", item.id, item.title))
            }
            Commands::Writer {
                command: WriterCommands::Add { name },
            } => {
                let writer = self.service.directory().put_writer(name)?;
                Ok(format!("Created writer {}: {}", writer.id, writer.name))
            }
            Commands::Comment { command } => self.handle_comment_command(command),
            Commands::Config {
                command: ConfigCommands::Show,
            } => self.config.to_toml(),
            Commands::Thread { item, format } => {
                let thread = self.service.thread(*item)?;
                match parse_output_format(format)? {
                    OutputFormat::Json => to_json(&thread),
                    OutputFormat::Text => Ok(format_thread_text(&thread)),
                }
            }
        }
    }

    fn handle_comment_command(&self, command: &CommentCommands) -> Result<String, ApiError> {
        match command {
            CommentCommands::Post {
                item,
                content,
                writer,
            } => {
                let node =
                    self.service
                        .create_root_comment(&Principal::new(*writer), *item, content)?;
                Ok(format!("Created comment {}", node.id))
            }
            CommentCommands::Reply {
                item,
                parent,
                content,
                writer,
            } => {
                let node =
                    self.service
                        .create_reply(&Principal::new(*writer), *item, *parent, content)?;
                Ok(format!("Created reply {} to comment {}", node.id, parent))
            }
            CommentCommands::Edit {
                id,
                content,
                writer,
            } => {
                self.service
                    .update_content(&Principal::new(*writer), *id, content)?;
                Ok(format!("Updated comment {}", id))
            }
            CommentCommands::Delete { id, writer, format } => {
                let output_format = parse_output_format(format)?;
                let report = self.service.delete(&Principal::new(*writer), *id)?;
                match output_format {
                    OutputFormat::Json => to_json(&json!({
                        "comment_id": report.comment_id,
                        "newly_removed": report.newly_removed,
                        "purged": report.purged_ids(),
                    })),
                    OutputFormat::Text => Ok(format_purge_report_text(&report)),
                }
            }
            CommentCommands::Show { id, format } => {
                let output_format = parse_output_format(format)?;
                let node = self.service.get(*id)?;
                match output_format {
                    OutputFormat::Json => to_json(&node),
                    OutputFormat::Text => Ok(format_comment_text(&node)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::OutputError(format!("Failed to serialize output: {}", e)))
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_purge_report_text(report: &PurgeReport) -> String {
    let mut out = if report.newly_removed {
        format!("Removed comment {}", report.comment_id)
    } else {
        format!("Comment {} was already removed", report.comment_id)
    };
    let purged = report.purged_ids();
    if purged.is_empty() {
        if report.newly_removed {
            out.push_str(&format!("\n{}", "Kept as tombstone".dimmed()));
        }
    } else {
        let ids: Vec<String> = purged.iter().map(|id| id.to_string()).collect();
        out.push_str(&format!(
            "\nPurged {} comment(s): {}",
            purged.len(),
            ids.join(", ")
        ));
    }
    out
}

fn format_comment_text(node: &CommentNode) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), node.id.to_string()]);
    table.add_row(vec!["Item".to_string(), node.item.to_string()]);
    table.add_row(vec!["Writer".to_string(), node.writer.to_string()]);
    table.add_row(vec![
        "Parent".to_string(),
        node.parent.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
    ]);
    let replies: Vec<String> = node.children.iter().map(|c| c.to_string()).collect();
    table.add_row(vec![
        "Replies".to_string(),
        if replies.is_empty() {
            "-".to_string()
        } else {
            replies.join(", ")
        },
    ]);
    table.add_row(vec!["State".to_string(), format!("{:?}", node.state())]);
    table.add_row(vec!["Created".to_string(), node.created_at.to_rfc3339()]);
    table.add_row(vec![
        "Content".to_string(),
        if node.is_removed() {
            REMOVED_PLACEHOLDER.to_string()
        } else {
            node.content.clone()
        },
    ]);
    format!("{}\n{}", format_section_heading(&format!("Comment {}", node.id)), table)
}

fn format_thread_text(thread: &ThreadView) -> String {
    let mut out = format!(
        "{}\n",
        format_section_heading(&format!(
            "Item {} ({} comments)",
            thread.item,
            thread.len()
        ))
    );
    if thread.is_empty() {
        out.push_str("No comments yet.\n");
        return out;
    }
    for comment in &thread.comments {
        out.push_str(&format_thread_line(comment, ""));
        for reply in &comment.replies {
            out.push_str(&format_thread_line(reply, "  ↳ "));
        }
    }
    out
}

fn format_thread_line(comment: &CommentView, prefix: &str) -> String {
    let line = format!(
        "{}#{} writer {} at {}: {}",
        prefix,
        comment.id,
        comment.writer,
        comment.created_at.format("%Y-%m-%d %H:%M:%S"),
        comment.display_content()
    );
    if comment.removed {
        format!("{}\n", line.dimmed())
    } else {
        format!("{}\n", line)
    }
}
