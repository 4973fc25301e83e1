//! Inventory item commands.

use anyhow::Context;
use stockroom_core::{
    is_low_stock, CatalogItem, InventorySummary, ItemDraft, Money, SearchScope, TableState,
    LOW_STOCK_THRESHOLD,
};
use tracing::debug;

use crate::cli::{ItemsCommand, ListArgs};
use crate::console::{page_footer, render_table, Console};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, console: &mut Console, command: ItemsCommand) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;

    match command {
        ItemsCommand::List(args) => {
            let items = ctx.backend.fetch_items(ctx.scope(&session)).await?;
            print_items(&items, &args, ctx.config.table.per_page);
        }

        ItemsCommand::Add {
            name,
            price,
            quantity,
            description,
            category,
            image,
        } => {
            let draft = ItemDraft {
                name,
                description,
                quantity,
                price: Money::parse_major(&price)?,
                category,
                image,
            };
            let message = ctx.backend.add_item(&draft).await?;
            println!("{message}");
        }

        ItemsCommand::Edit {
            id,
            name,
            price,
            quantity,
            description,
            category,
        } => {
            let items = ctx.backend.fetch_items(ctx.scope(&session)).await?;
            let mut item = items
                .into_iter()
                .find(|item| item.id == id)
                .with_context(|| format!("No item with id {id}"))?;

            if let Some(name) = name {
                item.name = name;
            }
            if let Some(price) = price {
                item.price = Money::parse_major(&price)?;
            }
            if let Some(quantity) = quantity {
                item.quantity = quantity;
            }
            if let Some(description) = description {
                item.description = description;
            }
            if let Some(category) = category {
                item.category = category;
            }

            debug!(item_id = %item.id, "Submitting item edit");
            let message = ctx.backend.edit_item(&item).await?;
            println!("{message}");
        }

        ItemsCommand::Delete { id } => {
            let message = ctx.backend.delete_item(&id).await?;
            println!("{message}");
        }

        ItemsCommand::Summary => {
            let items = ctx.backend.fetch_items(ctx.scope(&session)).await?;
            println!("{}", format_summary(&InventorySummary::from_items(&items), &ctx.config.invoice.currency));

            let low: Vec<Vec<String>> = items
                .iter()
                .filter(|item| is_low_stock(item))
                .map(|item| vec![item.name.clone(), item.quantity.to_string()])
                .collect();
            if !low.is_empty() {
                println!();
                println!("{}", render_table(&["Low stock", "Quantity"], &low));
            }
        }
    }

    Ok(())
}

fn print_items(items: &[CatalogItem], args: &ListArgs, per_page: usize) {
    let mut table = TableState::new(SearchScope::NameOrDescription, per_page);
    table.set_search(args.search.as_deref().unwrap_or(""));
    let total = table.filtered_len(items);
    table.paginator_mut().go_to(args.page, total);

    let page = table.view(items);
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|item| {
            vec![
                item.id.clone(),
                item.name.clone(),
                item.quantity.to_string(),
                item.price.to_string(),
                item.category.clone(),
                item.description.clone(),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["Id", "Name", "Quantity", "Price", "Category", "Description"], &rows)
    );
    println!("{}", page_footer(page.number, page.total_pages, page.total_rows));
}

fn format_summary(summary: &InventorySummary, currency: &str) -> String {
    let value = if currency.trim().is_empty() {
        summary.total_value.to_string()
    } else {
        format!("{} {}", currency.trim(), summary.total_value)
    };
    format!(
        "Items:           {}\nUnits in stock:  {}\nStock value:     {value}\nLow stock (<{LOW_STOCK_THRESHOLD}):  {}",
        summary.item_count, summary.total_units, summary.low_stock_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let items = vec![
            CatalogItem::new("a", "Blue Pen", 30, Money::from_cents(500)),
            CatalogItem::new("b", "Ink", 2, Money::from_cents(250)),
        ];
        let text = format_summary(&InventorySummary::from_items(&items), "PKR");

        assert!(text.contains("Units in stock:  32"));
        assert!(text.contains("Stock value:     PKR 155.00"));
        assert!(text.ends_with("Low stock (<20):  1"));
    }
}
