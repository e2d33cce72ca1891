mod actor_framework;
mod app_system;
mod bulk_purchase;
mod cart;
mod catalog;
mod clients;
mod domain;
mod quote_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

use std::time::Duration;
use tracing::{info, warn, Instrument};
use crate::app_system::{setup_tracing, MarketConfig, MarketSystem, NotificationLevel};
use crate::bulk_purchase::{BulkQuoteSession, NegotiationState};
use crate::catalog::{CatalogRepository, PriceSort, ProductQuery, ProductSort};
use crate::domain::CartItem;

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Polls the session until `done` holds or `limit` passes.
async fn wait_for(
    session: &BulkQuoteSession,
    limit: Duration,
    done: impl Fn(&NegotiationState) -> bool,
) -> DemoResult<NegotiationState> {
    let poll = async {
        loop {
            let state = session.state().await?;
            if done(&state) {
                return Ok::<_, Box<dyn std::error::Error>>(state);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    };
    tokio::time::timeout(limit, poll).await?
}

#[tokio::main]
async fn main() -> DemoResult<()> {
    setup_tracing();

    let config = MarketConfig::from_env()?;
    let limit = config.timings.store_response_delay + config.timings.counter_accept_delay + Duration::from_secs(5);
    info!(?config, "Starting marketplace demo");

    let mut system = MarketSystem::start(config)?;

    // Toasts are rendered as log lines
    let mut feed = system.take_notifications().ok_or("notification feed already taken")?;
    let toasts = tokio::spawn(async move {
        while let Some(toast) = feed.recv().await {
            match toast.level {
                NotificationLevel::Error => warn!(title = %toast.title, "{}", toast.description),
                _ => info!(title = %toast.title, "{}", toast.description),
            }
        }
    });

    // Browse
    async {
        for card in system.catalog.featured(4) {
            info!(id = %card.id, name = %card.name, price = %card.price, saved = ?card.savings().map(|s| s.to_string()), "Featured");
        }
        let laptops = system.catalog.search_products(
            &ProductQuery::default().in_category("Laptops").in_stock().sorted_by(ProductSort::PriceLowToHigh),
        );
        info!(count = laptops.len(), "Laptops in stock");
    }
    .instrument(tracing::info_span!("browse"))
    .await;

    // Compare and add a charger from the cheapest store
    let rows = system.catalog.compare_prices("prod-4", PriceSort::Price, true)?;
    if let (Some(best), Some(charger)) = (rows.first(), system.catalog.product("prod-4")) {
        info!(store = %best.store.name, price = %best.price, "Cheapest charger");
        let item = CartItem { unit_price: best.price, ..CartItem::from_product(&charger, 2) }.with_store(&best.store.id);
        system.cart_client.add_item(item).await?;
    }

    // Bulk quote: 12 laptops from Acme, countered once
    let mut session = system.new_session();
    let final_state = async {
        session.select_store("store-1")?;
        session.select_product("prod-1")?;
        session.set_quantity(12)?;
        session.set_message("Office refresh, invoice per unit please")?;
        let quote_id = session.submit().await?;
        info!(quote_id = %quote_id, "Waiting for the store");

        let offer = match wait_for(&session, limit, |s| matches!(s, NegotiationState::StoreResponded { .. })).await? {
            NegotiationState::StoreResponded { offer } => offer,
            other => return Err(format!("unexpected state {}", other.name()).into()),
        };
        let counter = offer.marked_down(5).unwrap_or(offer);
        session.counter(&counter.units().to_string()).await?;

        let state = wait_for(&session, limit, |s| matches!(s, NegotiationState::Confirmed { .. })).await?;
        session.proceed_to_checkout().await?;
        Ok::<_, Box<dyn std::error::Error>>(state)
    }
    .instrument(tracing::info_span!("bulk_quote"))
    .await?;
    info!(state = ?final_state, "Bulk quote settled; proceeding to checkout");

    let summary = system.cart_client.summary().await?;
    info!(lines = summary.line_count, items = summary.item_count, subtotal = %summary.subtotal, "Cart");

    drop(session);
    system.shutdown().await?;
    let _ = toasts.await;

    info!("Demo completed successfully");
    Ok(())
}
