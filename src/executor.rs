//! Sequential action execution
//!
//! Consumes planner-issued actions one at a time, emits progress before and
//! after each, and stops the run on the first error or block. All failures
//! cross this boundary as structured report values.

use chrono::Utc;
use tracing::{debug, warn};

use extract_pipeline::{ExtractOptions, Extractor};
use selector_engine::{ResolveAct, SelectorResolver};
use site_handlers::HandlerRegistry;
use site_registry::table_for;
use webpilot_core_types::{
    Action, ActionReport, ActionResult, FailureKind, Resolution, SelectorRole,
};

use crate::errors::EngineError;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::session::Session;

/// Outcome of one run
#[derive(Debug)]
pub struct ExecutionSummary {
    pub reports: Vec<ActionReport>,

    /// True when an error/blocked report stopped the remaining actions
    pub stopped_early: bool,
}

/// Drives one session through an action plan
pub struct ActionExecutor<'a> {
    session: &'a mut Session,
    sink: &'a dyn ProgressSink,
    handlers: HandlerRegistry,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(session: &'a mut Session, sink: &'a dyn ProgressSink) -> Self {
        let handlers = HandlerRegistry::new(session.config().handlers.clone());
        Self {
            session,
            sink,
            handlers,
        }
    }

    /// Execute the plan strictly in order; stop at the first terminal report
    pub async fn run(&mut self, actions: &[Action]) -> ExecutionSummary {
        let mut reports = Vec::with_capacity(actions.len());
        let mut stopped_early = false;

        for (index, action) in actions.iter().enumerate() {
            self.sink.emit(ProgressEvent::ActionStarted {
                index,
                kind: action.kind(),
            });

            let started_at = Utc::now();
            let report = match self.execute(action).await {
                Ok(result) => ActionReport::success(index, action.clone(), started_at, result),
                Err(err) => {
                    warn!(index, kind = action.kind(), "action failed: {err}");
                    let failure = err.into_failure(self.session.site());
                    ActionReport::failed(index, action.clone(), started_at, failure)
                }
            };

            self.sink.emit(ProgressEvent::ActionFinished {
                index,
                kind: action.kind(),
                status: report.status,
                latency_ms: report.latency_ms,
                failure: report.failure.as_ref().map(|f| f.kind),
            });

            let terminal = report.is_terminal();
            reports.push(report);
            if terminal {
                stopped_early = index + 1 < actions.len();
                break;
            }
        }

        self.sink.emit(ProgressEvent::RunFinished {
            executed: reports.len(),
            total: actions.len(),
            stopped_early,
        });

        ExecutionSummary {
            reports,
            stopped_early,
        }
    }

    async fn execute(&mut self, action: &Action) -> Result<ActionResult, EngineError> {
        match action {
            Action::Navigate { url } => {
                let (landed, site, retries) = self.session.navigate(url).await?;
                Ok(ActionResult::Navigated {
                    url: landed,
                    site,
                    retries,
                })
            }

            Action::Click { selector, role } => {
                let resolution = self
                    .resolve(Some(selector), *role, ResolveAct::Click)
                    .await?;
                Ok(ActionResult::Clicked { resolution })
            }

            Action::Type {
                selector,
                text,
                role,
                submit,
            } => {
                // Typing targets the search input in this domain unless the
                // planner says otherwise; the role unlocks site fallbacks.
                let role = role.unwrap_or(SelectorRole::SearchInput);
                let resolution = self
                    .resolve(
                        Some(selector),
                        Some(role),
                        ResolveAct::Fill {
                            text,
                            submit: *submit,
                        },
                    )
                    .await?;
                Ok(ActionResult::Typed {
                    resolution,
                    submitted: *submit,
                })
            }

            Action::WaitFor {
                selector,
                timeout_ms,
            } => {
                let timeout = std::time::Duration::from_millis(*timeout_ms);
                let started = std::time::Instant::now();
                let waited = self
                    .session
                    .driver()
                    .wait_for_visible(selector, timeout)
                    .await;
                match waited {
                    Ok(()) => Ok(ActionResult::WaitSatisfied {
                        selector: selector.clone(),
                        waited_ms: started.elapsed().as_millis() as u64,
                    }),
                    Err(err) => Err(self.disambiguate(EngineError::Driver(err)).await),
                }
            }

            Action::Extract { schema, limit } => {
                // Specialized handlers own extraction where generic polling
                // fails, but an explicit schema always wins.
                if schema.is_empty() {
                    if let Some(handler) = self.handlers.handler_for(self.session.site()) {
                        debug!(site = %self.session.site(), "extracting via site handler");
                        let report = handler.extract(self.session.driver(), *limit).await?;
                        return Ok(ActionResult::Extracted {
                            records: report.records,
                            diagnostic: report.diagnostic,
                        });
                    }
                }

                let table = table_for(self.session.site());
                let options = ExtractOptions {
                    limit: *limit,
                    skip_variant_filters: self.session.config().extraction.skip_variant_filters,
                };
                let outcome = Extractor::new(self.session.driver())
                    .extract(table, schema, &options)
                    .await
                    .map_err(EngineError::Driver)?;
                Ok(ActionResult::Extracted {
                    records: outcome.records,
                    diagnostic: outcome.diagnostic,
                })
            }
        }
    }

    async fn resolve(
        &self,
        explicit: Option<&str>,
        role: Option<SelectorRole>,
        act: ResolveAct<'_>,
    ) -> Result<Resolution, EngineError> {
        let table = table_for(self.session.site());
        let resolver = SelectorResolver::with_config(
            self.session.driver(),
            self.session.config().resolver.to_resolver_config(),
        );
        match resolver.resolve_and_act(explicit, role, table, act).await {
            Ok(resolution) => Ok(resolution),
            Err(err) => Err(self.disambiguate(EngineError::Locator(err)).await),
        }
    }

    /// A failed wait on a page that will never show the element looks like
    /// a slow page; re-run block detection to tell the two apart.
    async fn disambiguate(&self, err: EngineError) -> EngineError {
        if !matches!(
            err.failure_kind(),
            FailureKind::Timeout | FailureKind::SelectorNotFound
        ) {
            return err;
        }
        match self.session.check_blocked().await {
            Ok(status) if status.blocked => EngineError::Blocked(status),
            _ => err,
        }
    }
}
