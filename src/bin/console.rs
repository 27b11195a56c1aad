//! Mini KV - interactive console
//!
//! Reads `PUT` / `GET` / `EXIT` commands from stdin and prints replies to
//! stdout. Logs go to stderr.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_kv::console::{handle_line, Outcome};
use mini_kv::{Config, KvStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_kv=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let store = KvStore::from_config(&config).context("failed to create store")?;
    info!("Console started with max_entries={}", config.max_entries);

    println!("In-Memory Key-Value Store started.");
    println!("Available commands: PUT, GET, EXIT");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match handle_line(&store, &line) {
            Outcome::Reply(text) => println!("{}", text),
            Outcome::Exit(text) => {
                println!("{}", text);
                break;
            }
            Outcome::Empty => {}
        }
    }

    store.shutdown().await;
    Ok(())
}
