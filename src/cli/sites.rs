//! `webpilot sites` - list known sites

use site_handlers::HandlerRegistry;
use site_registry::table_for;
use webpilot_core_types::SiteId;

pub fn execute() -> anyhow::Result<()> {
    let registry = HandlerRegistry::default();
    for site in SiteId::known() {
        let table = table_for(*site);
        let handler = if registry.handler_for(*site).is_some() {
            "specialized handler"
        } else {
            "generic strategy"
        };
        let deep_link = table
            .search_url_template
            .map(|_| "deep link")
            .unwrap_or("no deep link");
        println!("{site:<12} {handler}, {deep_link}");
    }
    println!("{:<12} generic strategy, fallback for unknown hosts", SiteId::Generic);
    Ok(())
}
