//! Command handlers
//!
//! Thin glue between parsed arguments and the client: each handler makes its
//! calls and renders the result to stdout.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use nacos_cli_client::{ConfigChange, ConfigPage, ConfigWatcher, NacosClient};
use tokio::sync::watch;
use tracing::info;

pub async fn list(
    client: &NacosClient,
    data_id: &str,
    group: &str,
    namespace: &str,
    page: u32,
    size: u32,
    json: bool,
) -> anyhow::Result<()> {
    let result = client
        .list_configs(data_id, group, namespace, page, size)
        .await
        .context("list configs failed")?;

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        write_page(&mut out, &result)?;
    }
    Ok(())
}

fn write_page(out: &mut impl Write, page: &ConfigPage) -> std::io::Result<()> {
    if page.page_items.is_empty() {
        return writeln!(out, "No configurations found.");
    }

    let id_width = page
        .page_items
        .iter()
        .map(|item| item.data_id.len())
        .max()
        .unwrap_or(0)
        .max("DATA ID".len());
    let group_width = page
        .page_items
        .iter()
        .map(|item| item.group().len())
        .max()
        .unwrap_or(0)
        .max("GROUP".len());

    writeln!(
        out,
        "{:<id_width$}  {:<group_width$}  TYPE",
        "DATA ID", "GROUP"
    )?;
    for item in &page.page_items {
        writeln!(
            out,
            "{:<id_width$}  {:<group_width$}  {}",
            item.data_id,
            item.group(),
            item.r#type
        )?;
    }
    writeln!(
        out,
        "\nTotal: {}  Page: {}/{}",
        page.total_count, page.page_number, page.pages_available
    )
}

pub async fn get(client: &NacosClient, data_id: &str, group: &str) -> anyhow::Result<()> {
    let content = client
        .get_config(data_id, group)
        .await
        .with_context(|| format!("get config {}@{} failed", data_id, group))?;
    println!("{}", content);
    Ok(())
}

pub async fn publish(
    client: &NacosClient,
    data_id: &str,
    group: &str,
    content: Option<&str>,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let content = match (content, file) {
        (Some(content), _) => content.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --content or --file is required"),
    };

    client
        .publish_config(data_id, group, &content)
        .await
        .with_context(|| format!("publish config {}@{} failed", data_id, group))?;
    println!("Published {}@{}", data_id, group);
    Ok(())
}

/// Poll until Ctrl-C, printing the content each time it changes.
pub async fn watch(
    client: NacosClient,
    data_id: &str,
    group: &str,
    interval_secs: u64,
) -> anyhow::Result<()> {
    let watcher = ConfigWatcher::new(
        Arc::new(client),
        data_id,
        group,
        Duration::from_secs(interval_secs.max(1)),
        |change: ConfigChange| {
            println!(
                "--- {}@{} (md5 {}) ---\n{}",
                change.data_id, change.group, change.md5, change.content
            );
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(watcher.run(shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Stopping watcher");
    // The watcher exits either way once the sender is gone
    let _ = shutdown_tx.send(true);
    handle.await.context("watcher task failed")?;
    Ok(())
}
