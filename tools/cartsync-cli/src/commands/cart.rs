//! Cart commands: show, add, set, remove, clear and totals.

use anyhow::{bail, Context as _, Result};
use cartsync_client::StorefrontApi;
use cartsync_commerce::cart::{Cart, CartTotals, LineItemUpdate, NewItem, StockLimit};
use cartsync_commerce::ids::ProductId;
use cartsync_commerce::money::{Currency, Money};
use cartsync_commerce::search::parse_price_input;
use dialoguer::Confirm;
use serde::Serialize;

use super::{AddArgs, ClearArgs, SetArgs};
use crate::context::Context;
use crate::output::format_row;

#[derive(Serialize)]
struct CartView<'a> {
    items: &'a Cart,
    item_count: u64,
    totals: CartTotals,
}

pub async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let totals = store.totals(&ctx.config.shipping.policy());

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            items: store.cart(),
            item_count: store.item_count(),
            totals,
        });
        return Ok(());
    }

    if store.is_empty() {
        ctx.output.info("Cart is empty");
        return Ok(());
    }

    ctx.output.header("Cart");
    for line in render_cart(store.cart(), ctx.config.display.currency) {
        println!("  {line}");
    }
    print_totals(ctx, &totals);
    Ok(())
}

pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let id = ProductId::new(args.id);

    let update = if args.catalog {
        let client = ctx.client()?;
        let spinner = ctx.output.spinner("Fetching catalog...");
        let catalog = client.fetch_catalog(args.pages).await;
        spinner.finish_and_clear();
        let catalog = catalog.context("Failed to fetch catalog")?;
        store.add_from_catalog(&catalog, id, args.qty)?
    } else {
        let (Some(name), Some(price)) = (args.name, args.price) else {
            bail!("--name and --price are required unless --catalog is given");
        };
        let Some(price) = parse_price_input(&price) else {
            bail!("Invalid price: {price}");
        };
        let mut item = NewItem::new(id, name, price);
        if let Some(image) = args.image {
            item = item.with_image(image);
        }
        store.add_item(item, args.qty, stock_limit(args.stock))?
    };

    if ctx.output.is_json() {
        ctx.output.json(&update);
    } else {
        ctx.output.success(&describe_update(&update));
    }
    Ok(())
}

pub async fn set(args: SetArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let id = ProductId::new(args.id);
    if args.qty > 0 && store.get(id).is_none() {
        ctx.output.warn(&format!("Product {id} is not in the cart"));
        return Ok(());
    }

    store.set_quantity(id, args.qty, stock_limit(args.stock))?;

    let quantity = store.get(id).map_or(0, |line| line.quantity);
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "product_id": id, "quantity": quantity }));
    } else if quantity == 0 {
        ctx.output.success(&format!("Removed product {id}"));
    } else {
        ctx.output.success(&format!("Set product {id} to {quantity}"));
    }
    Ok(())
}

pub async fn remove(id: u64, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let id = ProductId::new(id);
    let present = store.get(id).is_some();
    store.remove_item(id)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "product_id": id, "removed": present }));
    } else if present {
        ctx.output.success(&format!("Removed product {id}"));
    } else {
        ctx.output.info(&format!("Product {id} was not in the cart"));
    }
    Ok(())
}

pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    if !args.yes && !ctx.output.is_json() && !store.is_empty() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", store.item_count()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    store.clear()?;
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cleared": true }));
    } else {
        ctx.output.success("Cart cleared");
    }
    Ok(())
}

pub async fn totals(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let totals = store.totals(&ctx.config.shipping.policy());
    if ctx.output.is_json() {
        ctx.output.json(&totals);
    } else {
        print_totals(ctx, &totals);
    }
    Ok(())
}

fn stock_limit(stock: Option<i64>) -> StockLimit {
    stock.map_or(StockLimit::Unlimited, StockLimit::from_stock_count)
}

fn describe_update(update: &LineItemUpdate) -> String {
    let mut msg = if update.is_new {
        format!("Added product {} (quantity {})", update.product_id, update.quantity)
    } else {
        format!(
            "Product {} quantity increased to {}",
            update.product_id, update.quantity
        )
    };
    if update.clamped {
        msg.push_str(" - limited by stock");
    }
    msg
}

fn print_totals(ctx: &Context, totals: &CartTotals) {
    let currency = ctx.config.display.currency;
    ctx.output.kv("subtotal", &totals.subtotal_money(currency).display());
    let shipping = if totals.has_free_shipping() {
        "free".to_string()
    } else {
        totals.shipping_money(currency).display()
    };
    ctx.output.kv("shipping", &shipping);
    ctx.output.kv("total", &totals.total_money(currency).display());
}

/// Text table of the cart lines.
pub fn render_cart(cart: &Cart, currency: Currency) -> Vec<String> {
    let rows: Vec<[String; 5]> = cart
        .items()
        .iter()
        .map(|line| {
            [
                line.id.to_string(),
                line.name.clone(),
                line.quantity.to_string(),
                Money::new(line.unit_price, currency).display(),
                Money::new(line.line_total(), currency).display(),
            ]
        })
        .collect();

    let header = ["ID", "Name", "Qty", "Price", "Total"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, col) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(col.chars().count());
        }
    }

    std::iter::once(format_row(&header, &widths))
        .chain(rows.iter().map(|row| {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            format_row(&cols, &widths)
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_cart() {
        let mut cart = Cart::new();
        cart.add_item(
            NewItem::new(ProductId::new(12), "Lipstick", 125_000),
            2,
            StockLimit::Unlimited,
        )
        .unwrap();

        let lines = render_cart(&cart, Currency::IRT);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("12  Lipstick"));
        assert!(lines[1].ends_with("250,000 تومان"));
    }

    #[test]
    fn test_describe_update() {
        let update = LineItemUpdate {
            product_id: ProductId::new(3),
            quantity: 5,
            is_new: false,
            clamped: true,
        };
        assert_eq!(
            describe_update(&update),
            "Product 3 quantity increased to 5 - limited by stock"
        );
    }
}
