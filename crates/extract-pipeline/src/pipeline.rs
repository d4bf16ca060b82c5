//! Container discovery and record assembly

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use page_driver::{
    ContainerHits, DriverError, FieldProbe, PageDriver, ProbeRequest, ProbeResponse,
};
use site_registry::{generic_table, SelectorTable};
use webpilot_core_types::{
    ExtractionDiagnostic, ExtractionRecord, ExtractionSchema, FieldValue, SelectorRole,
};

use crate::normalize::{field_kind, normalize_field, FieldKind};

/// Schema field names treated as variant/filter data
static VARIANT_FIELDS: &[&str] = &["color", "colour", "variant", "size", "style"];

/// Structural fallbacks appended after site alternates
static NAME_FALLBACKS: &[&str] = &["h1", "h2", "h3", "h4", "[role=heading]"];
static URL_FALLBACKS: &[&str] = &["a[href]"];

/// Per-extraction options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Record cap; unset extracts every discovered container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Drop variant/filter fields (color, size) from the schema before
    /// extracting. Intentional product behavior carried over from the
    /// original flows; configurable rather than hard-coded.
    #[serde(default = "default_skip_variant_filters")]
    pub skip_variant_filters: bool,
}

fn default_skip_variant_filters() -> bool {
    true
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            limit: None,
            skip_variant_filters: true,
        }
    }
}

/// Records plus the diagnostic snapshot; always a success shape
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub records: Vec<ExtractionRecord>,
    pub diagnostic: ExtractionDiagnostic,
}

/// Extraction pipeline bound to one driver
pub struct Extractor<'d> {
    driver: &'d dyn PageDriver,
}

impl<'d> Extractor<'d> {
    pub fn new(driver: &'d dyn PageDriver) -> Self {
        Self { driver }
    }

    /// Run `schema` against the current page
    pub async fn extract(
        &self,
        table: &SelectorTable,
        schema: &ExtractionSchema,
        options: &ExtractOptions,
    ) -> Result<ExtractionOutcome, DriverError> {
        let mut diagnostic = ExtractionDiagnostic::default();

        let effective = self.effective_schema(schema, options, &mut diagnostic);
        if effective.is_empty() {
            diagnostic.notes.push("schema has no fields".to_string());
            return Ok(ExtractionOutcome {
                records: Vec::new(),
                diagnostic,
            });
        }

        let page_url = self.driver.current_url().await.unwrap_or_default();
        let field_probes = build_field_probes(&effective, table);

        // Table-driven container discovery: first selector with matches wins.
        let mut container_chain: Vec<&str> = table.result_container.to_vec();
        for generic in generic_table().result_container {
            if !container_chain.contains(generic) {
                container_chain.push(generic);
            }
        }

        let mut hits: Vec<ContainerHits> = Vec::new();
        for container_selector in &container_chain {
            let response = self
                .driver
                .probe(ProbeRequest::ContainerFields {
                    container_selector: container_selector.to_string(),
                    fields: field_probes.clone(),
                    limit: None,
                })
                .await?;
            if let ProbeResponse::ContainerFields { containers } = response {
                if !containers.is_empty() {
                    debug!(
                        selector = *container_selector,
                        count = containers.len(),
                        "containers discovered"
                    );
                    diagnostic.container_selector = Some(container_selector.to_string());
                    hits = containers;
                    break;
                }
            }
        }

        // Heuristic fallback: containers owning a heading and a rating.
        if hits.is_empty() {
            let response = self
                .driver
                .probe(ProbeRequest::HeuristicContainerFields {
                    fields: field_probes.clone(),
                    limit: None,
                })
                .await?;
            if let ProbeResponse::ContainerFields { containers } = response {
                if !containers.is_empty() {
                    diagnostic
                        .notes
                        .push("heuristic container discovery engaged".to_string());
                    hits = containers;
                }
            }
        }

        diagnostic.containers_found = hits.len();
        for selector in &container_chain {
            diagnostic.selector_hits.entry((*selector).to_string()).or_insert(0);
        }
        if let Some(found) = &diagnostic.container_selector {
            diagnostic
                .selector_hits
                .insert(found.clone(), hits.len());
        }

        let records = self.assemble_records(&effective, hits, &page_url, options, &mut diagnostic);

        if records.is_empty() {
            diagnostic
                .notes
                .push("no records extracted; see selector hit counts".to_string());
        }
        info!(
            records = records.len(),
            dropped = diagnostic.containers_dropped,
            "extraction finished"
        );

        Ok(ExtractionOutcome {
            records,
            diagnostic,
        })
    }

    fn effective_schema(
        &self,
        schema: &ExtractionSchema,
        options: &ExtractOptions,
        diagnostic: &mut ExtractionDiagnostic,
    ) -> ExtractionSchema {
        if !options.skip_variant_filters {
            return schema.clone();
        }
        let mut effective = ExtractionSchema::new();
        for field in &schema.fields {
            let lowered = field.name.to_ascii_lowercase();
            if VARIANT_FIELDS.contains(&lowered.as_str()) {
                diagnostic
                    .notes
                    .push(format!("variant field '{}' skipped", field.name));
                continue;
            }
            effective = effective.with_field(field.name.clone(), field.selector.clone());
        }
        effective
    }

    fn assemble_records(
        &self,
        schema: &ExtractionSchema,
        hits: Vec<ContainerHits>,
        page_url: &str,
        options: &ExtractOptions,
        diagnostic: &mut ExtractionDiagnostic,
    ) -> Vec<ExtractionRecord> {
        let identity_fields: Vec<&str> = schema
            .fields
            .iter()
            .filter(|f| matches!(field_kind(&f.name), FieldKind::Name | FieldKind::Url))
            .map(|f| f.name.as_str())
            .collect();

        let mut records = Vec::new();
        for container in hits {
            let mut values = BTreeMap::new();
            for field in &schema.fields {
                let hit = container.fields.get(&field.name).cloned().unwrap_or_default();
                if let Some(matched) = &hit.matched_selector {
                    *diagnostic.selector_hits.entry(matched.clone()).or_insert(0) += 1;
                }
                values.insert(
                    field.name.clone(),
                    normalize_field(&field.name, &hit, page_url),
                );
            }

            // A container with neither a name nor a link is navigation
            // chrome, not a result.
            let is_anonymous = !identity_fields.is_empty()
                && identity_fields
                    .iter()
                    .all(|name| matches!(values.get(*name), Some(FieldValue::Null) | None));
            if is_anonymous {
                diagnostic.containers_dropped += 1;
                continue;
            }

            records.push(ExtractionRecord { values });
            if let Some(limit) = options.limit {
                if records.len() >= limit {
                    break;
                }
            }
        }
        records
    }
}

/// Build the per-field selector chains: caller's selector, site alternates,
/// structural fallbacks; deduplicated, first occurrence wins
fn build_field_probes(schema: &ExtractionSchema, table: &SelectorTable) -> Vec<FieldProbe> {
    schema
        .fields
        .iter()
        .map(|field| {
            let kind = field_kind(&field.name);
            let mut selectors: Vec<String> = Vec::new();
            let mut push = |selector: &str| {
                if !selector.is_empty() && !selectors.iter().any(|s| s == selector) {
                    selectors.push(selector.to_string());
                }
            };

            push(&field.selector);
            if let Some(role) = role_for_kind(kind, &field.name) {
                for alternate in table.candidates(role) {
                    push(alternate);
                }
            }
            match kind {
                FieldKind::Name => {
                    for fallback in NAME_FALLBACKS {
                        push(fallback);
                    }
                }
                FieldKind::Url => {
                    for fallback in URL_FALLBACKS {
                        push(fallback);
                    }
                }
                _ => {}
            }

            if kind == FieldKind::Url {
                FieldProbe::attribute(field.name.clone(), selectors, "href")
            } else {
                FieldProbe::text(field.name.clone(), selectors)
            }
        })
        .collect()
}

fn role_for_kind(kind: FieldKind, field_name: &str) -> Option<SelectorRole> {
    match kind {
        FieldKind::Name => Some(SelectorRole::ResultName),
        FieldKind::Price => Some(SelectorRole::ResultPrice),
        FieldKind::Rating => Some(SelectorRole::ResultRating),
        FieldKind::Url => Some(SelectorRole::ResultLink),
        FieldKind::Generic => {
            let lowered = field_name.to_ascii_lowercase();
            (lowered.contains("location") || lowered.contains("address"))
                .then_some(SelectorRole::ResultLocation)
        }
    }
}
