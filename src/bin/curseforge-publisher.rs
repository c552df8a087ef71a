//! CurseForge Publisher CLI
//!
//! Publishes build artifacts to CurseForge from a manifest file

use anyhow::Result;
use clap::{Parser, Subcommand};
use curseforge_publisher::{
    ConfigLoader, EnvHintSource, PublishConfig, PublishManifest, PublishOrchestrator,
    SecureTokenManager,
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process;

/// CurseForge artifact publishing assistant
#[derive(Parser)]
#[command(name = "curseforge-publisher")]
#[command(version = "0.1.0")]
#[command(about = "CurseForge artifact publishing assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the artifacts described by a manifest
    Publish {
        /// Manifest path (discovered in the current directory by default)
        #[arg(value_name = "MANIFEST")]
        manifest: Option<PathBuf>,

        /// API token (falls back to CURSEFORGE_API_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Override the game API endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Disable environment version detection
        #[arg(long)]
        no_detection: bool,
    },

    /// Validate a manifest without uploading anything
    Check {
        /// Manifest path (discovered in the current directory by default)
        #[arg(value_name = "MANIFEST")]
        manifest: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            manifest,
            token,
            endpoint,
            no_detection,
        } => publish_command(manifest, token, endpoint, no_detection).await,
        Commands::Check { manifest } => check_command(manifest).await,
    }
}

async fn load_manifest(path: Option<PathBuf>) -> Result<(PathBuf, PublishManifest)> {
    let path = match path {
        Some(path) => path,
        None => ConfigLoader::discover(&PathBuf::from("."))
            .await
            .ok_or_else(|| anyhow::anyhow!("マニフェストファイルが見つかりません"))?,
    };

    let manifest = ConfigLoader::load(&path).await?;
    Ok((path, manifest))
}

async fn publish_command(
    manifest_path: Option<PathBuf>,
    token: Option<String>,
    endpoint: Option<String>,
    no_detection: bool,
) -> Result<i32> {
    println!("\n📦 curseforge-publisher\n");

    let (path, manifest) = load_manifest(manifest_path).await?;
    println!("マニフェスト: {}", path.display());

    let mut config = PublishConfig::default();

    if let Some(endpoint) = endpoint {
        config.api_endpoint = endpoint;
    } else if let Some(endpoint) = &manifest.api_endpoint {
        config.api_endpoint = endpoint.clone();
    }

    if no_detection {
        config.version_detection = false;
    } else if let Some(detection) = manifest.version_detection {
        config.version_detection = detection;
    }

    config.api_token = match token {
        Some(token) => Some(SecretString::new(token.into())),
        None => SecureTokenManager::new().get_token(),
    };

    let mut orchestrator = PublishOrchestrator::new(config)?
        .with_hint_source(Box::new(EnvHintSource::default()));
    let warnings = orchestrator.add_manifest(&manifest)?;
    print_warnings(&warnings);

    match orchestrator.publish().await {
        Ok(report) => {
            print_warnings(&report.warnings);

            println!("\n✅ 公開が完了しました！ ({}ms)", report.duration);
            for file in &report.uploaded {
                match file.parent_file_id {
                    Some(parent) => println!(
                        "  - {} (ファイルID: {}, 親: {})",
                        file.file_name, file.file_id, parent
                    ),
                    None => println!("  - {} (ファイルID: {})", file.file_name, file.file_id),
                }
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("\n❌ 公開に失敗しました: {}", e);
            for action in e.suggested_actions() {
                eprintln!("  💡 {}", action);
            }
            Ok(1)
        }
    }
}

async fn check_command(manifest_path: Option<PathBuf>) -> Result<i32> {
    println!("\n🔍 マニフェストチェック\n");

    let (path, manifest) = load_manifest(manifest_path).await?;
    println!("マニフェスト: {}", path.display());

    // Upload-free validation: coercion, nesting, and relation checks all
    // happen while the artifact tree is being configured.
    let mut orchestrator = PublishOrchestrator::new(PublishConfig::default())?;
    match orchestrator.add_manifest(&manifest) {
        Ok(warnings) => {
            if warnings.is_empty() {
                println!("\n✅ マニフェストは有効です");
            } else {
                println!("\n✅ マニフェストは有効です (警告あり)");
                print_warnings(&warnings);
            }

            if !SecureTokenManager::new().has_token() {
                println!("⚠️  APIトークンが環境変数に設定されていません");
            }

            Ok(0)
        }
        Err(e) => {
            eprintln!("\n❌ マニフェストが無効です: {}", e);
            for action in e.suggested_actions() {
                eprintln!("  💡 {}", action);
            }
            Ok(1)
        }
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("  ⚠️  {}", warning);
    }
}
