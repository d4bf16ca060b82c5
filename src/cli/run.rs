//! `webpilot run` - execute an action plan

use std::path::Path;

use anyhow::Context;
use tracing::info;

use webpilot_core_types::ActionStatus;

use crate::cli::OutputFormat;
use crate::config::EngineConfig;
use crate::executor::ActionExecutor;
use crate::plan::load_plan;
use crate::progress::TracingSink;
use crate::session::Session;

pub async fn execute(
    config_path: Option<&Path>,
    plan_path: &Path,
    stealth: bool,
    headed: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = EngineConfig::load(config_path)?;
    if headed {
        config.browser.headless = false;
    }

    let actions = load_plan(plan_path)?;
    info!(actions = actions.len(), plan = %plan_path.display(), "plan loaded");

    let mut session = Session::start(config, stealth)
        .await
        .context("starting browser session")?;

    let sink = TracingSink;
    let summary = ActionExecutor::new(&mut session, &sink).run(&actions).await;

    // Teardown before reporting so a printing failure never leaks a browser.
    session.close().await.ok();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary.reports)?);
        }
        OutputFormat::Text => {
            for report in &summary.reports {
                let status = match report.status {
                    ActionStatus::Success => "ok",
                    ActionStatus::Error => "error",
                    ActionStatus::Blocked => "blocked",
                };
                println!(
                    "[{}] {} {} ({}ms)",
                    report.index,
                    report.action.kind(),
                    status,
                    report.latency_ms
                );
                if let Some(failure) = &report.failure {
                    println!("    {}", failure.message);
                    for suggestion in &failure.suggestions {
                        println!("    suggestion: {}", suggestion.selector);
                    }
                    for alternative in &failure.alternatives {
                        println!("    alternative: {alternative}");
                    }
                }
            }
            if summary.stopped_early {
                println!("stopped early: remaining actions were not executed");
            }
        }
    }

    if summary.reports.iter().any(|r| r.is_terminal()) {
        anyhow::bail!("plan did not complete successfully");
    }
    Ok(())
}
