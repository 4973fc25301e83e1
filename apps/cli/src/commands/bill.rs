//! # Interactive Bill
//!
//! ```text
//! bill> search pen          filter the catalog by name
//! bill> add 1               add row 1 of the view (or an item id)
//! bill> qty 1 3             set line 1 to 3 units
//! bill> rm 2                drop line 2
//! bill> show                print the bill
//! bill> finalize            commit stock, save the invoice
//! bill> cancel              empty the bill
//! bill> quit
//! ```

use std::sync::Arc;

use stockroom_billing::{BillFinalizer, FileInvoiceSink, FinalizerOptions};
use stockroom_client::InventoryApi;
use stockroom_core::{CartAggregator, Catalog, CatalogItem, SearchScope, TableState};
use tracing::{debug, warn};

use crate::console::{page_footer, render_table, Console, TerminalNotifier};
use crate::context::AppContext;

const HELP: &str = "\
search [TERM]    filter items by name (no term clears the filter)
next | prev      page through the item list
add N|ID         add row N of the list, or the item with that id
qty LINE VALUE   set the quantity of a bill line
rm LINE          remove a bill line
show             print the bill
finalize         commit the bill and save the invoice
cancel           empty the bill
quit             leave";

// =============================================================================
// Input Parsing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum BillInput {
    Search(String),
    Next,
    Previous,
    Add(String),
    Quantity { line: usize, raw: String },
    Remove(usize),
    Show,
    Finalize,
    Cancel,
    Help,
    Quit,
}

impl BillInput {
    fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (verb, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();

        let parsed = match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => BillInput::Search(rest.to_string()),
            "next" | "n" => BillInput::Next,
            "prev" | "p" => BillInput::Previous,
            "add" | "a" if !rest.is_empty() => BillInput::Add(rest.to_string()),
            "qty" | "q" => {
                let (line, raw) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: qty LINE VALUE".to_string())?;
                BillInput::Quantity {
                    line: parse_line_number(line)?,
                    raw: raw.trim().to_string(),
                }
            }
            "rm" | "remove" => BillInput::Remove(parse_line_number(rest)?),
            "show" | "ls" => BillInput::Show,
            "finalize" | "done" => BillInput::Finalize,
            "cancel" => BillInput::Cancel,
            "help" | "?" => BillInput::Help,
            "quit" | "exit" => BillInput::Quit,
            _ => return Err(format!("unknown command '{input}' (try 'help')")),
        };
        Ok(parsed)
    }
}

fn parse_line_number(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{raw}' is not a line number")),
    }
}

// =============================================================================
// Loop
// =============================================================================

pub async fn run(ctx: &AppContext, console: &mut Console) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;
    println!("Welcome, {}. Type 'help' for commands.", session.display_name());

    let mut catalog = Catalog::new(ctx.backend.fetch_catalog(ctx.scope(&session)).await?);
    let mut cart = CartAggregator::new();
    cart.subscribe(|change, cart| {
        debug!(?change, lines = cart.len(), total = %cart.total(), "Bill changed");
    });

    let api: Arc<dyn InventoryApi> = ctx.backend.clone();
    let finalizer = BillFinalizer::new(
        api,
        Arc::new(FileInvoiceSink::new(ctx.config.invoice.output_dir.clone())),
        Arc::new(TerminalNotifier),
        FinalizerOptions::from_config(&ctx.config),
    )
    .on_bill_finalized(|report| match &report.invoice_location {
        Some(location) => println!("Invoice {} saved to {location}", report.invoice.number()),
        None => println!("Invoice {} was not saved", report.invoice.number()),
    });

    let mut table = TableState::new(SearchScope::Name, ctx.config.table.per_page);
    print_catalog(&catalog, &table);

    while let Some(line) = console.prompt("bill> ").await? {
        if line.is_empty() {
            continue;
        }
        let input = match BillInput::parse(&line) {
            Ok(input) => input,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match input {
            BillInput::Search(term) => {
                table.set_search(&term);
                print_catalog(&catalog, &table);
            }
            BillInput::Next => {
                let total = table.filtered_len(catalog.items());
                if table.paginator_mut().next(total) {
                    print_catalog(&catalog, &table);
                }
            }
            BillInput::Previous => {
                if table.paginator_mut().previous() {
                    print_catalog(&catalog, &table);
                }
            }
            BillInput::Add(selector) => match select_item(&catalog, &table, &selector) {
                Some(item) => match cart.try_add_to_bill(&item) {
                    Ok(()) => print_cart(&cart, &ctx.config.invoice.currency),
                    Err(err) => eprintln!("{err}"),
                },
                None => eprintln!("No item matches '{selector}'"),
            },
            BillInput::Quantity { line, raw } => match line_id(&cart, line) {
                Some(id) => {
                    if cart.apply_quantity_input(&id, &raw) {
                        print_cart(&cart, &ctx.config.invoice.currency);
                    } else {
                        eprintln!("'{raw}' is not a valid quantity; keeping the previous value");
                    }
                }
                None => eprintln!("The bill has no line {line}"),
            },
            BillInput::Remove(line) => match line_id(&cart, line) {
                Some(id) => {
                    cart.remove_bill_item(&id);
                    print_cart(&cart, &ctx.config.invoice.currency);
                }
                None => eprintln!("The bill has no line {line}"),
            },
            BillInput::Show => print_cart(&cart, &ctx.config.invoice.currency),
            BillInput::Finalize => {
                if !finalizer.can_finalize(&cart) {
                    eprintln!("Nothing to finalize");
                    continue;
                }
                match finalizer.finalize(&mut cart, &session, &mut catalog).await {
                    Ok(report) => {
                        println!("Total: {}", report.total);
                        print_catalog(&catalog, &table);
                    }
                    Err(err) if err.is_guard() => eprintln!("{err}"),
                    Err(err) => {
                        if err.is_partial_commit() {
                            eprintln!("Stock already updated for: {}", err.committed_ids().join(", "));
                        }
                        debug!(error = ?err, "Finalize failed");
                    }
                }
            }
            BillInput::Cancel => {
                cart.clear();
                println!("Bill cleared");
            }
            BillInput::Help => println!("{HELP}"),
            BillInput::Quit => break,
        }
    }

    if !cart.is_empty() {
        println!("Discarding unfinished bill ({} lines)", cart.len());
    }
    if let Err(err) = ctx.backend.logout().await {
        warn!(error = %err, "Logout failed");
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Row number of the current view, else an item id.
fn select_item(catalog: &Catalog, table: &TableState, selector: &str) -> Option<CatalogItem> {
    if let Ok(n) = selector.parse::<usize>() {
        let page = table.view(catalog.items());
        if let Some(item) = n.checked_sub(1).and_then(|i| page.rows.get(i)) {
            return Some((*item).clone());
        }
    }
    catalog.get(selector).cloned()
}

fn line_id(cart: &CartAggregator, line: usize) -> Option<String> {
    cart.lines().get(line.checked_sub(1)?).map(|l| l.id().to_string())
}

fn print_catalog(catalog: &Catalog, table: &TableState) {
    let page = table.view(catalog.items());
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                item.name.clone(),
                item.quantity.to_string(),
                item.price.to_string(),
            ]
        })
        .collect();

    println!("{}", render_table(&["#", "Name", "In stock", "Price"], &rows));
    println!("{}", page_footer(page.number, page.total_pages, page.total_rows));
}

fn print_cart(cart: &CartAggregator, currency: &str) {
    if cart.is_empty() {
        println!("The bill is empty");
        return;
    }

    let rows: Vec<Vec<String>> = cart
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            vec![
                (i + 1).to_string(),
                line.name().to_string(),
                line.bill_quantity.to_string(),
                line.unit_price().to_string(),
                line.line_total().to_string(),
            ]
        })
        .collect();

    println!("{}", render_table(&["#", "Item", "Quantity", "Price", "Total"], &rows));
    let label = if currency.is_empty() {
        String::new()
    } else {
        format!("{currency} ")
    };
    println!("Total: {label}{}", cart.calculate_total());
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Money;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BillInput::parse("search blue pen"), Ok(BillInput::Search("blue pen".into())));
        assert_eq!(BillInput::parse("s"), Ok(BillInput::Search(String::new())));
        assert_eq!(BillInput::parse("ADD 3"), Ok(BillInput::Add("3".into())));
        assert_eq!(
            BillInput::parse("qty 2  5"),
            Ok(BillInput::Quantity {
                line: 2,
                raw: "5".into()
            })
        );
        assert_eq!(BillInput::parse("rm 1"), Ok(BillInput::Remove(1)));
        assert_eq!(BillInput::parse("finalize"), Ok(BillInput::Finalize));
        assert_eq!(BillInput::parse("quit"), Ok(BillInput::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(BillInput::parse("add").is_err());
        assert!(BillInput::parse("qty 1").is_err());
        assert!(BillInput::parse("rm 0").is_err());
        assert!(BillInput::parse("rm x").is_err());
        assert!(BillInput::parse("dance").is_err());
    }

    #[test]
    fn test_quantity_text_passes_through_unparsed() {
        // The aggregator decides what a bad quantity means.
        assert_eq!(
            BillInput::parse("qty 1 abc"),
            Ok(BillInput::Quantity {
                line: 1,
                raw: "abc".into()
            })
        );
    }

    #[test]
    fn test_select_item_by_row_or_id() {
        let catalog = Catalog::new(vec![
            CatalogItem::new("a1", "Blue Pen", 10, Money::from_cents(500)),
            CatalogItem::new("b2", "Notebook", 4, Money::from_cents(2000)),
        ]);
        let mut table = TableState::new(SearchScope::Name, 5);

        assert_eq!(select_item(&catalog, &table, "2").map(|i| i.id), Some("b2".into()));
        assert_eq!(select_item(&catalog, &table, "a1").map(|i| i.id), Some("a1".into()));
        assert!(select_item(&catalog, &table, "9").is_none());

        table.set_search("note");
        assert_eq!(select_item(&catalog, &table, "1").map(|i| i.id), Some("b2".into()));
    }

    #[test]
    fn test_line_id() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&CatalogItem::new("a1", "Blue Pen", 10, Money::from_cents(500)));

        assert_eq!(line_id(&cart, 1), Some("a1".into()));
        assert_eq!(line_id(&cart, 0), None);
        assert_eq!(line_id(&cart, 2), None);
    }
}
