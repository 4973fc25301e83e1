//! Admin product catalogue commands.

use stockroom_core::{ProductDraft, SearchScope, TableState};

use crate::cli::ProductsCommand;
use crate::console::{page_footer, render_table, Console};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, console: &mut Console, command: ProductsCommand) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;
    if !session.is_admin {
        tracing::warn!(user_id = %session.user_id, "Product catalogue used by a non-admin account");
    }

    match command {
        ProductsCommand::List(args) => {
            let products = ctx.backend.fetch_products().await?;

            let mut table = TableState::new(SearchScope::Name, ctx.config.table.per_page);
            table.set_search(args.search.as_deref().unwrap_or(""));
            let total = table.filtered_len(&products);
            table.paginator_mut().go_to(args.page, total);

            let page = table.view(&products);
            let rows: Vec<Vec<String>> = page
                .rows
                .iter()
                .map(|product| {
                    vec![
                        product.id.clone(),
                        product.name.clone(),
                        product.category.clone(),
                        product.image.clone().unwrap_or_default(),
                    ]
                })
                .collect();

            println!("{}", render_table(&["Id", "Name", "Category", "Image"], &rows));
            println!("{}", page_footer(page.number, page.total_pages, page.total_rows));
        }

        ProductsCommand::Add { name, category, image } => {
            let message = ctx
                .backend
                .add_product(&ProductDraft { name, category, image })
                .await?;
            println!("{message}");
        }

        ProductsCommand::Delete { id } => {
            let message = ctx.backend.delete_product(&id).await?;
            println!("{message}");
        }
    }

    Ok(())
}
