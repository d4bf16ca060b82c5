//! `webpilot search` - site-aware search flow

use std::path::Path;

use anyhow::Context;

use site_handlers::SearchConstraints;

use crate::config::EngineConfig;
use crate::session::Session;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config_path: Option<&Path>,
    query: &str,
    url: &str,
    limit: Option<usize>,
    min_rating: Option<f64>,
    max_price: Option<f64>,
    stealth: bool,
) -> anyhow::Result<()> {
    let config = EngineConfig::load(config_path)?;
    let mut session = Session::start(config, stealth)
        .await
        .context("starting browser session")?;

    let result = async {
        // Land on the site first so detection picks the right strategy.
        session.navigate(url).await?;
        session
            .search(
                query,
                &SearchConstraints {
                    limit,
                    min_rating,
                    max_price,
                },
            )
            .await
    }
    .await;

    session.close().await.ok();

    let report = result.map_err(|err| anyhow::anyhow!("search failed: {err}"))?;
    println!("{}", serde_json::to_string_pretty(&report.records)?);
    eprintln!(
        "{} record(s); containers found: {}",
        report.count, report.diagnostic.containers_found
    );
    Ok(())
}
