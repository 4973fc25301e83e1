//! Recent orders, newest minute first.

use stockroom_core::{group_orders_by_minute, OrderGroup, Paginator, ORDER_GROUPS_PER_PAGE};

use crate::console::{page_footer, render_table, Console};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, console: &mut Console, page: usize) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;
    let orders = ctx.backend.fetch_orders(ctx.scope(&session)).await?;

    let groups = group_orders_by_minute(&orders);
    let refs: Vec<&OrderGroup> = groups.iter().collect();

    let mut paginator = Paginator::new(ORDER_GROUPS_PER_PAGE);
    paginator.go_to(page, refs.len());
    let view = paginator.page(&refs);

    if view.rows.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for group in &view.rows {
        println!("{}    total {}", group.label(), group.total());
        let rows: Vec<Vec<String>> = group
            .orders
            .iter()
            .map(|order| {
                vec![
                    order.name.clone(),
                    order.category.clone(),
                    order.bill_quantity.to_string(),
                    order.price.to_string(),
                    order.line_total().to_string(),
                ]
            })
            .collect();
        println!("{}\n", render_table(&["Item", "Category", "Quantity", "Price", "Total"], &rows));
    }
    println!("{}", page_footer(view.number, view.total_pages, view.total_rows));
    Ok(())
}
