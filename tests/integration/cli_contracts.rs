use remark::config::{RemarkConfig, StorageConfig};
use remark::error::ApiError;
use remark::tooling::cli::{
    CliContext, CommentCommands, Commands, ConfigCommands, ItemCommands, WriterCommands,
};
use tempfile::TempDir;

fn open() -> (CliContext, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliContext::open(&temp_dir.path().join("store")).unwrap();
    (cli, temp_dir)
}

fn seed(cli: &CliContext) {
    let out = cli
        .execute(&Commands::Item {
            command: ItemCommands::Add {
                title: "Release notes".to_string(),
            },
        })
        .unwrap();
    assert!(out.starts_with("Created item 1"));
    let out = cli
        .execute(&Commands::Writer {
            command: WriterCommands::Add {
                name: "ada".to_string(),
            },
        })
        .unwrap();
    assert!(out.starts_with("Created writer 2"));
}

fn comment(cli: &CliContext, command: CommentCommands) -> Result<String, ApiError> {
    cli.execute(&Commands::Comment { command })
}

#[test]
fn delete_json_contract_reports_purge_set() {
    let (cli, _temp_dir) = open();
    seed(&cli);
    comment(
        &cli,
        CommentCommands::Post {
            item: 1,
            content: "first".to_string(),
            writer: 2,
        },
    )
    .unwrap();

    let output = comment(
        &cli,
        CommentCommands::Delete {
            id: 3,
            writer: 2,
            format: "json".to_string(),
        },
    )
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.get("comment_id").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(parsed.get("newly_removed").and_then(|v| v.as_bool()), Some(true));
    let purged = parsed.get("purged").and_then(|v| v.as_array()).unwrap();
    assert_eq!(purged.len(), 1);
}

#[test]
fn thread_json_contract_hides_tombstone_content() {
    let (cli, _temp_dir) = open();
    seed(&cli);
    comment(
        &cli,
        CommentCommands::Post {
            item: 1,
            content: "secret".to_string(),
            writer: 2,
        },
    )
    .unwrap();
    comment(
        &cli,
        CommentCommands::Reply {
            item: 1,
            parent: 3,
            content: "answer".to_string(),
            writer: 2,
        },
    )
    .unwrap();
    comment(
        &cli,
        CommentCommands::Delete {
            id: 3,
            writer: 2,
            format: "text".to_string(),
        },
    )
    .unwrap();

    let output = cli
        .execute(&Commands::Thread {
            item: 1,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let root = &parsed["comments"][0];
    assert_eq!(root["removed"].as_bool(), Some(true));
    assert!(root["content"].is_null());
    assert_eq!(root["replies"][0]["content"].as_str(), Some("answer"));
    assert!(!output.contains("secret"));

    let text = cli
        .execute(&Commands::Thread {
            item: 1,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("[removed]"));
    assert!(text.contains("answer"));
}

#[test]
fn show_text_lists_fields() {
    let (cli, _temp_dir) = open();
    seed(&cli);
    comment(
        &cli,
        CommentCommands::Post {
            item: 1,
            content: "hello".to_string(),
            writer: 2,
        },
    )
    .unwrap();

    let output = comment(
        &cli,
        CommentCommands::Show {
            id: 3,
            format: "text".to_string(),
        },
    )
    .unwrap();
    assert!(output.contains("Writer"));
    assert!(output.contains("hello"));
    assert!(output.contains("Live"));
}

#[test]
fn foreign_writer_cannot_delete() {
    let (cli, _temp_dir) = open();
    seed(&cli);
    cli.execute(&Commands::Writer {
        command: WriterCommands::Add {
            name: "grace".to_string(),
        },
    })
    .unwrap();
    comment(
        &cli,
        CommentCommands::Post {
            item: 1,
            content: "mine".to_string(),
            writer: 2,
        },
    )
    .unwrap();

    let err = comment(
        &cli,
        CommentCommands::Delete {
            id: 4,
            writer: 3,
            format: "text".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { writer: 3, comment: 4 }));
}

#[test]
fn invalid_format_is_rejected_before_deleting() {
    let (cli, _temp_dir) = open();
    seed(&cli);
    comment(
        &cli,
        CommentCommands::Post {
            item: 1,
            content: "keep me".to_string(),
            writer: 2,
        },
    )
    .unwrap();

    let err = comment(
        &cli,
        CommentCommands::Delete {
            id: 3,
            writer: 2,
            format: "xml".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
    assert!(!cli.service().get(3).unwrap().is_removed());
}

#[test]
fn config_show_prints_effective_config_as_toml() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");
    let mut config = RemarkConfig {
        storage: StorageConfig {
            path: Some(store_path.clone()),
        },
        ..RemarkConfig::default()
    };
    config.logging.level = "debug".to_string();
    let cli = CliContext::new(&config, None).unwrap();

    let output = cli
        .execute(&Commands::Config {
            command: ConfigCommands::Show,
        })
        .unwrap();

    assert!(output.contains("[storage]"));
    assert!(output.contains("[logging]"));
    let parsed: RemarkConfig = toml::from_str(&output).unwrap();
    assert_eq!(parsed.storage.path, Some(store_path));
    assert_eq!(parsed.logging.level, "debug");
    assert_eq!(parsed.logging.output, "file");
}
