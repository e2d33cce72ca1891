#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use crate::actor_framework::FrameworkError;
    use crate::app_system::{MarketConfig, MarketSystem, NegotiationTimings, NotificationLevel};
    use crate::bulk_purchase::{CheckoutHandoff, NegotiationState};
    use crate::catalog::{CatalogRepository, InMemoryCatalog, PriceSort};
    use crate::clients::{QuoteClient, QuoteRequest};
    use crate::domain::{AcceptancePath, BulkQuote, CartItem, Money, NegotiationStage};
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get};
    use crate::quote_actor::{QuoteAction, QuoteError};

    fn catalog() -> Arc<dyn CatalogRepository> {
        Arc::new(InMemoryCatalog::bundled().unwrap())
    }

    fn request(store_id: &str, product_id: &str, quantity: u32) -> QuoteRequest {
        QuoteRequest {
            store_id: store_id.into(),
            product_id: product_id.into(),
            quantity,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_quote_request_resolves_catalog_before_create() {
        let (inner, mut quote_rx) = create_mock_client::<BulkQuote>(10);
        let client = QuoteClient::new(inner, catalog());

        let task = tokio::spawn(async move { client.request_quote(request("store-1", "prod-2", 10)).await });

        let (payload, responder) = expect_create(&mut quote_rx).await.expect("Expected Quote Create");
        assert_eq!(payload.store.name, "Acme Electronics");
        assert!(payload.store.is_verified);
        assert_eq!(payload.product.unit_price, Money::new(50_000));
        assert_eq!(payload.quantity, 10);
        responder.send(Ok("quote_7".to_string())).unwrap();

        assert_eq!(task.await.unwrap(), Ok("quote_7".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_requests_never_reach_the_actor() {
        let (inner, mut quote_rx) = create_mock_client::<BulkQuote>(10);
        let client = QuoteClient::new(inner, catalog());

        assert_eq!(
            client.request_quote(request("store-404", "prod-2", 10)).await,
            Err(QuoteError::UnknownStore("store-404".into()))
        );
        assert_eq!(
            client.request_quote(request("store-1", "prod-404", 10)).await,
            Err(QuoteError::UnknownProduct("prod-404".into()))
        );
        assert_eq!(
            client.request_quote(request("store-1", "prod-2", 3)).await,
            Err(QuoteError::QuantityBelowMinimum { quantity: 3, minimum: 5 })
        );
        assert!(quote_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_actor_errors_map_to_quote_errors() {
        let (inner, mut quote_rx) = create_mock_client::<BulkQuote>(10);
        let client = QuoteClient::new(inner, catalog());

        let accepting = client.clone();
        let task = tokio::spawn(async move { accepting.accept("quote_1".into()).await });
        let (id, action, responder) = expect_action(&mut quote_rx).await.expect("Expected Quote Action");
        assert_eq!(id, "quote_1");
        assert_eq!(action, QuoteAction::Accept);
        let refusal = QuoteError::InvalidTransition { stage: "requested".into(), action: "accept".into() };
        responder.send(Err(FrameworkError::Entity(refusal.clone()))).unwrap();
        assert_eq!(task.await.unwrap(), Err(refusal));

        let looking = client.clone();
        let task = tokio::spawn(async move { looking.store_respond("quote_9".into()).await });
        let (_, _, responder) = expect_action(&mut quote_rx).await.expect("Expected Quote Action");
        responder.send(Err(FrameworkError::NotFound("quote_9".into()))).unwrap();
        assert_eq!(task.await.unwrap(), Err(QuoteError::NotFound("quote_9".into())));

        let getting = client.clone();
        let task = tokio::spawn(async move { getting.get_quote("quote_2".into()).await });
        let (id, responder) = expect_get(&mut quote_rx).await.expect("Expected Quote Get");
        assert_eq!(id, "quote_2");
        drop(responder);
        assert!(matches!(task.await.unwrap(), Err(QuoteError::ActorCommunicationError(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_market_system_end_to_end() {
        let config = MarketConfig {
            timings: NegotiationTimings {
                store_response_delay: Duration::from_millis(200),
                counter_accept_delay: Duration::from_millis(300),
            },
            ..MarketConfig::default()
        };
        let mut system = MarketSystem::start(config).unwrap();
        let mut feed = system.take_notifications().expect("feed available");
        assert!(system.take_notifications().is_none());

        // Browse and compare
        let rows = system.catalog.compare_prices("prod-2", PriceSort::Price, true).unwrap();
        assert_eq!(rows[0].store.name, "Circuit Corner");

        // Bulk quote at Acme, accept as offered
        let mut session = system.new_session();
        session.select_store("store-1").unwrap();
        session.select_product("prod-2").unwrap();
        session.set_quantity(10).unwrap();
        session.submit().await.unwrap();

        loop {
            let n = feed.recv().await.expect("feed open");
            if n.title == "Store responded" {
                assert_eq!(n.level, NotificationLevel::Success);
                break;
            }
        }
        assert_eq!(session.accept().await, Ok(Money::new(427_500)));
        assert_eq!(
            session.state().await.unwrap(),
            NegotiationState::Confirmed { final_price: Money::new(427_500), path: AcceptancePath::AsOffered }
        );
        assert_eq!(session.proceed_to_checkout().await, Ok(CheckoutHandoff));

        let quote = session.quote().await.unwrap().unwrap();
        assert_eq!(quote.stage, NegotiationStage::Accepted { final_price: Money::new(427_500), path: AcceptancePath::AsOffered });

        // Cart sits alongside
        let product = system.catalog.product("prod-4").unwrap();
        system.cart_client.add_item(CartItem::from_product(&product, 2).with_store("store-1")).await.unwrap();
        assert_eq!(system.cart_client.summary().await.unwrap().subtotal, Money::new(5_000));

        drop(session);
        system.shutdown().await.unwrap();
    }
}
