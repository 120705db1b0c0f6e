//! # Filegate CLI
//!
//! Gatewayから署名付きURLを取得し、ストレージと直接ファイルを転送する。
//!
//! ## サブコマンド
//! - `upload <path>` — アップロードURLを取得してPUT
//! - `download <key>` — ダウンロードURLを取得してGET
//! - `url upload|download` — URLを発行して表示のみ

mod client;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::client::{default_output_name, GatewayClient};

#[derive(Parser, Debug)]
#[command(name = "filegate-cli", version, about = "Filegate CLI")]
struct Cli {
    /// GatewayのベースURL
    #[arg(
        long,
        global = true,
        env = "FILEGATE_URL",
        default_value = "http://localhost:3000"
    )]
    gateway: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ファイルをアップロードする
    Upload {
        /// アップロードするファイル
        path: PathBuf,
        /// オブジェクトキー（省略時はファイル名）
        #[arg(long)]
        key: Option<String>,
        /// Content-Type（省略時は拡張子から推定）
        #[arg(long)]
        content_type: Option<String>,
    },
    /// オブジェクトをダウンロードする
    Download {
        /// オブジェクトキー
        key: String,
        /// 出力先（省略時はキーの最後の要素）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 署名付きURLを発行して表示する
    Url {
        #[command(subcommand)]
        target: UrlTarget,
    },
}

#[derive(Subcommand, Debug)]
enum UrlTarget {
    /// アップロードURL
    Upload {
        file_name: String,
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
    },
    /// ダウンロードURL
    Download { file_key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.gateway);

    match cli.command {
        Command::Upload {
            path,
            key,
            content_type,
        } => {
            let key = client
                .upload_file(&path, key.as_deref(), content_type.as_deref())
                .await?;
            println!("uploaded {} -> {key}", path.display());
        }
        Command::Download { key, output } => {
            let output = match output {
                Some(output) => output,
                None => default_output_name(&key)
                    .map(PathBuf::from)
                    .with_context(|| format!("出力先を決定できません: {key}"))?,
            };
            let bytes = client.download_file(&key, &output).await?;
            println!("downloaded {key} -> {} ({bytes} bytes)", output.display());
        }
        Command::Url { target } => match target {
            UrlTarget::Upload {
                file_name,
                content_type,
            } => {
                let issued = client.upload_url(&file_name, &content_type).await?;
                tracing::info!(expires_in = issued.expires_in, "アップロードURLを取得しました");
                println!("{}", issued.upload_url);
            }
            UrlTarget::Download { file_key } => {
                let issued = client.download_url(&file_key).await?;
                tracing::info!(expires_in = issued.expires_in, "ダウンロードURLを取得しました");
                println!("{}", issued.download_url);
            }
        },
    }

    Ok(())
}
