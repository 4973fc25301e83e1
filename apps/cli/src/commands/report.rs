//! Inventory report export.

use std::path::PathBuf;

use chrono::Utc;
use stockroom_billing::{render_inventory_report, report_file_name, DocumentStyle, FileInvoiceSink, InvoiceSink};
use stockroom_core::{CatalogItem, SearchFilter, SearchScope};
use tracing::info;

use crate::console::Console;
use crate::context::AppContext;

pub async fn run(
    ctx: &AppContext,
    console: &mut Console,
    search: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;
    let items = ctx.backend.fetch_items(ctx.scope(&session)).await?;

    let filter = SearchFilter::new(search.as_deref().unwrap_or(""), SearchScope::NameOrDescription);
    let rows: Vec<&CatalogItem> = filter.apply(&items);

    let generated_at = Utc::now();
    let style = DocumentStyle::from(&ctx.config.invoice);
    let pdf = render_inventory_report(&rows, generated_at, &style)?;

    let sink = FileInvoiceSink::new(out.unwrap_or_else(|| ctx.config.invoice.output_dir.clone()));
    let location = sink.save(&report_file_name(generated_at), &pdf).await?;

    info!(rows = rows.len(), "Inventory report exported");
    println!("Inventory report saved to {location}");
    Ok(())
}
