//! `leadscout search` command handler.
//!
//! Builds the campaign from CLI arguments and config, streams leads to the
//! chosen output as they arrive, and turns Ctrl-C into a session stop so the
//! leads gathered so far are kept.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};

use anyhow::Context;
use leadscout_core::{AppConfig, CategoryCatalog, Geography, MAX_CATEGORY_CAP};
use leadscout_places::PlacesClient;
use leadscout_search::{Campaign, CampaignRequest, DelayPolicy, SearchSession};

use crate::output::JsonlSink;
use crate::SearchArgs;

pub(crate) async fn run_search(
    config: &AppConfig,
    catalog: &CategoryCatalog,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let api_key = config
        .places_api_key
        .as_deref()
        .context("GOOGLE_PLACES_API_KEY must be set to run a search")?;
    let request = build_request(args, catalog, config.category_cap, api_key)?;

    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };
    let mut sink = JsonlSink::new(writer);

    let client = PlacesClient::from_app_config(config)?;
    let campaign = Campaign::new(&client, DelayPolicy::from_app_config(config));
    let session = SearchSession::new();

    let stop_on_interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("interrupt received, stopping search");
                session.stop();
            }
            Err(e) => tracing::warn!(error = %e, "failed to listen for ctrl-c"),
        }
    };

    let outcome = {
        let run = campaign.run(&session, &request, Some(&mut sink));
        tokio::pin!(run);
        tokio::select! {
            outcome = &mut run => outcome,
            () = stop_on_interrupt => run.await,
        }
    };

    tracing::info!(
        written = sink.written(),
        total_found = outcome.total_found,
        was_stopped = outcome.was_stopped,
        "search finished"
    );

    if !outcome.success {
        anyhow::bail!(outcome.message);
    }
    if args.output.is_some() {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    Ok(())
}

/// Resolves CLI arguments against the catalog and configured defaults.
///
/// Blank city or state is passed through unchanged: the campaign rejects it
/// with its own message.
pub(crate) fn build_request(
    args: &SearchArgs,
    catalog: &CategoryCatalog,
    default_cap: usize,
    api_key: &str,
) -> anyhow::Result<CampaignRequest> {
    let cap = args.cap.unwrap_or(default_cap);
    if !(1..=MAX_CATEGORY_CAP).contains(&cap) {
        anyhow::bail!("--cap must be between 1 and {MAX_CATEGORY_CAP}, got {cap}");
    }

    let categories = catalog.select(args.category.as_deref())?;

    Ok(CampaignRequest {
        geography: Geography::new(args.state.trim(), args.city.trim()),
        categories,
        target_category_id: None,
        areas: args.areas.clone(),
        per_category_cap: cap,
        credential: api_key.to_string(),
    })
}
