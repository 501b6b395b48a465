// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FloorSketch CLI - replay an edit script and report the plan.
//!
//! ```text
//! floorsketch room.json --draw
//! floorsketch room.json --json
//! FLOORSKETCH_EXPORT_URL=https://... floorsketch room.json --export
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use floorsketch_core::{PlanConfig, Session};
use floorsketch_export::{ExportClient, ExportPayload};
use serde_json::json;

mod ascii;
mod config;
mod script;

use ascii::AsciiRenderer;
use config::ExportConfig;
use script::Script;

#[derive(Parser, Debug)]
#[command(name = "floorsketch", version, about = "Replay floor-plan edit scripts")]
struct Cli {
    /// JSON edit script
    script: PathBuf,

    /// Plan configuration JSON; overrides the script's `config`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the step reports and metrics as JSON
    #[arg(long)]
    json: bool,

    /// Draw the final plan as text
    #[arg(long)]
    draw: bool,

    /// Send the metrics to the engineer handoff endpoint
    #[arg(long)]
    export: bool,

    /// Handoff endpoint; defaults to FLOORSKETCH_EXPORT_URL
    #[arg(long)]
    url: Option<String>,
}

fn load_config(cli: &Cli, script: &Script) -> Result<PlanConfig> {
    match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Ok(PlanConfig::from_json(&text)?)
        }
        None => Ok(script.config.clone().unwrap_or_default()),
    }
}

async fn export(session: &mut Session, cli: &Cli) -> Result<()> {
    let env = ExportConfig::from_env();
    let url = cli.url.clone().or(env.url).unwrap_or_default();
    let payload = ExportPayload::from_metrics(session.metrics(), chrono::Utc::now().to_rfc3339());

    let client = match ExportClient::new(&url) {
        Ok(client) => client.with_poll_delay(env.poll_delay),
        Err(err) => bail!(err.status_text()),
    };
    tracing::info!(url = client.url(), "Sending metrics");

    match client.send_and_poll(&payload).await {
        Ok(receipt) => {
            println!("{}", receipt.message);
            if let Some(document) = receipt.document_url {
                println!("{document}");
            }
            Ok(())
        }
        Err(err) => bail!(err.status_text()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,floorsketch_core=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script {}", cli.script.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("parsing script {}", cli.script.display()))?;

    let mut session = Session::with_config(load_config(&cli, &script)?)?;
    let reports = script::run(&mut session, &script.actions);
    let refused = reports.iter().filter(|r| !r.success).count();
    tracing::info!(steps = reports.len(), refused, "Script finished");

    if cli.json {
        let out = json!({ "steps": reports, "metrics": session.metrics() });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for report in reports.iter().filter(|r| !r.success) {
            println!(
                "step {} ({}) refused: {}",
                report.step,
                report.action,
                report.reason.unwrap_or("unknown")
            );
        }
        let metrics = session.metrics();
        println!("Walls:         {}", metrics.wall_count);
        println!("Total length:  {}", metrics.total_length_label());
        println!("Enclosed area: {}", metrics.enclosed_area_label());
        if let Some(last) = metrics.last_wall_length_label() {
            println!("Last wall:     {last}");
        }
        println!("Doors:         {}", metrics.door_count);
        println!("Windows:       {}", metrics.window_count);
    }

    if cli.draw {
        let mut renderer = AsciiRenderer::default();
        session.render(&mut renderer);
        print!("{}", renderer.output);
    }

    if cli.export {
        export(&mut session, &cli).await?;
    }

    Ok(())
}
