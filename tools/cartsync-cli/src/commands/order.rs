//! Place the cart as an order.

use anyhow::Result;
use cartsync_client::place_order;
use cartsync_commerce::checkout::ShippingForm;
use cartsync_commerce::ids::{CityId, ProvinceId};
use dialoguer::Confirm;

use super::OrderArgs;
use crate::context::Context;

pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let client = ctx.client()?;

    if !args.yes && !ctx.output.is_json() && !store.is_empty() {
        let totals = store.totals(&ctx.config.shipping.policy());
        let total = totals.total_money(ctx.config.display.currency);
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {total}?"))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let form = ShippingForm {
        full_name: args.full_name,
        phone: args.phone,
        province: Some(ProvinceId::new(args.province)),
        city: Some(CityId::new(args.city)),
        address: args.address,
        postal_code: args.postal_code,
        notes: args.notes,
    };

    let spinner = ctx.output.spinner("Submitting order...");
    let result = place_order(&client, &mut store, &form, &ctx.output).await;
    spinner.finish_and_clear();
    let confirmation = result?;

    if ctx.output.is_json() {
        ctx.output.json(&confirmation);
    } else if let Some(url) = &confirmation.redirect_url {
        ctx.output.kv("order", url);
    }
    Ok(())
}
