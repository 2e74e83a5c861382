//! Storefront commands: products, cities and wishlist.

use anyhow::{bail, Context as _, Result};
use cartsync_client::{toggle_wishlist, StorefrontApi};
use cartsync_commerce::ids::{ProductId, ProvinceId};
use cartsync_commerce::money::Money;
use cartsync_commerce::search::{
    parse_price_input, ProductFilter, ProductQuery, QuickFilter, SortOrder,
};

use super::ProductsArgs;
use crate::context::Context;

pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let query = build_query(&args)?;
    let client = ctx.client()?;

    let spinner = ctx.output.spinner("Fetching catalog...");
    let catalog = client.fetch_catalog(args.pages).await;
    spinner.finish_and_clear();
    let catalog = catalog.context("Failed to fetch catalog")?;

    let matches = query.apply(&catalog);
    if ctx.output.is_json() {
        ctx.output.json(&matches);
        return Ok(());
    }

    ctx.output.header(&format!("{} of {} products", matches.len(), catalog.len()));
    let currency = ctx.config.display.currency;
    let widths = [6, 32, 16, 8];
    ctx.output.table_row(&["ID", "Name", "Price", "Stock"], &widths);
    for product in matches {
        let id = product.id.to_string();
        let price = Money::new(product.price, currency).display();
        let stock = product.stock_quantity.max(0).to_string();
        ctx.output.table_row(
            &[id.as_str(), product.name.as_str(), price.as_str(), stock.as_str()],
            &widths,
        );
    }
    Ok(())
}

fn build_query(args: &ProductsArgs) -> Result<ProductQuery> {
    let mut filter = ProductFilter::new();
    if let Some(search) = &args.search {
        filter = filter.search(search.as_str());
    }
    filter.category = args.category.clone();
    filter.brand = args.brand.clone();
    filter.min_price = parse_bound("--min-price", args.min_price.as_deref())?;
    filter.max_price = parse_bound("--max-price", args.max_price.as_deref())?;
    if let Some(quick) = &args.quick {
        let Some(quick) = QuickFilter::parse(quick) else {
            bail!("Unknown quick filter: {quick}");
        };
        filter.quick = Some(quick);
    }
    let Some(sort) = SortOrder::parse(&args.sort) else {
        bail!("Unknown sort order: {}", args.sort);
    };
    Ok(ProductQuery::new(filter, sort))
}

fn parse_bound(flag: &str, value: Option<&str>) -> Result<Option<u64>> {
    match value {
        None => Ok(None),
        Some(raw) => match parse_price_input(raw) {
            Some(price) => Ok(Some(price)),
            None => bail!("Invalid {flag}: {raw}"),
        },
    }
}

pub async fn cities(province: u64, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let cities = client
        .cities(ProvinceId::new(province))
        .await
        .context("Failed to fetch cities")?;

    if ctx.output.is_json() {
        ctx.output.json(&cities);
        return Ok(());
    }
    for city in &cities {
        ctx.output.kv(&city.id.to_string(), &city.name);
    }
    Ok(())
}

pub async fn wishlist(id: u64, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let toggle = toggle_wishlist(&client, ProductId::new(id), &ctx.output).await?;
    if ctx.output.is_json() {
        ctx.output.json(&toggle);
    }
    Ok(())
}
