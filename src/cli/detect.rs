//! `webpilot detect` - offline site classification

use site_registry::{detect_site, table_for};
use webpilot_core_types::SelectorRole;

pub fn execute(url: &str) -> anyhow::Result<()> {
    let site = detect_site(url);
    let table = table_for(site);

    println!("site: {site}");
    if let Some(template) = table.search_url_template {
        println!("search url: {template}");
    }
    println!("submit with enter: {}", table.submit_with_enter);

    for role in [
        SelectorRole::SearchInput,
        SelectorRole::SearchButton,
        SelectorRole::ResultContainer,
        SelectorRole::ResultName,
        SelectorRole::ResultPrice,
        SelectorRole::ResultRating,
        SelectorRole::ResultLink,
        SelectorRole::ResultLocation,
    ] {
        let candidates = table.candidates(role);
        if candidates.is_empty() {
            continue;
        }
        println!("{role}:");
        for candidate in candidates {
            println!("  {candidate}");
        }
    }
    Ok(())
}
