use anyhow::{Context, Result};
use clap::Parser;
use colored::control as color_control;
use sediment::cli::commands::sync::{SyncCommand, SyncCommandHandler};
use sediment::cli::commands::validate::{ValidateCommand, ValidateCommandHandler};
use sediment::cli::{Cli, Commands};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    sqlx::any::install_default_drivers();

    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // 非同期ランタイムを作成して実行
    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create Tokio runtime")
        .unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        });

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// ログ出力を初期化する
///
/// --verbose 指定時は debug、それ以外は RUST_LOG（未設定なら warn）に従います。
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sediment=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    // --config フラグの処理（絶対パスに変換）
    let config_path: Option<PathBuf> = cli.config.map(|p| {
        if p.is_absolute() {
            p
        } else {
            project_path.join(p)
        }
    });

    match cli.command {
        Commands::Sync {
            env,
            dry_run,
            schema_dir,
        } => {
            let handler = SyncCommandHandler::new();
            let command = SyncCommand {
                project_path,
                config_path,
                env,
                dry_run,
                schema_dir,
                format: cli.format,
            };
            handler.execute(&command).await
        }

        Commands::Validate { schema_dir } => {
            let handler = ValidateCommandHandler::new();
            let command = ValidateCommand {
                project_path,
                config_path,
                schema_dir,
                format: cli.format,
            };
            handler.execute(&command)
        }
    }
}
