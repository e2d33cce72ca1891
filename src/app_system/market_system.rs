use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};
use crate::actor_framework::ResourceActor;
use crate::bulk_purchase::BulkQuoteSession;
use crate::cart::CartService;
use crate::catalog::{CatalogRepository, InMemoryCatalog};
use crate::clients::{CartClient, QuoteClient};
use crate::domain::BulkQuote;
use super::{MarketConfig, Notification, Notifier, SystemError};

/// Starts the actors, wires their clients together and owns shutdown.
pub struct MarketSystem {
    pub quote_client: QuoteClient,
    pub cart_client: CartClient,
    pub catalog: Arc<dyn CatalogRepository>,
    config: MarketConfig,
    notifier: Notifier,
    notifications: Option<mpsc::Receiver<Notification>>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketSystem {
    /// Starts the system on the bundled catalog.
    pub fn start(config: MarketConfig) -> Result<Self, SystemError> {
        let catalog = InMemoryCatalog::bundled()?;
        Ok(Self::with_catalog(config, Arc::new(catalog)))
    }

    #[instrument(name = "market_system", skip_all)]
    pub fn with_catalog(config: MarketConfig, catalog: Arc<dyn CatalogRepository>) -> Self {
        info!("Starting market system");

        // 1. Quote actor
        let quote_id_counter = Arc::new(AtomicU64::new(1));
        let next_quote_id = move || {
            let id = quote_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("quote_{}", id)
        };
        let (quote_actor, quote_resource_client) = ResourceActor::<BulkQuote>::new(config.actor_buffer, next_quote_id);
        let quote_client = QuoteClient::new(quote_resource_client, catalog.clone());
        let quote_handle = tokio::spawn(quote_actor.run());

        // 2. Cart service
        let (cart_service, cart_client) = CartService::new(config.actor_buffer);
        let cart_handle = tokio::spawn(cart_service.run());

        // 3. Notification feed
        let (notifier, notifications) = Notifier::channel(config.notification_buffer);

        info!("Market system started");
        Self {
            quote_client,
            cart_client,
            catalog,
            config,
            notifier,
            notifications: Some(notifications),
            handles: vec![quote_handle, cart_handle],
        }
    }

    /// The receiving end of the notification feed. Available once.
    pub fn take_notifications(&mut self) -> Option<mpsc::Receiver<Notification>> {
        self.notifications.take()
    }

    /// A fresh bulk quote session in `Idle`.
    pub fn new_session(&self) -> BulkQuoteSession {
        BulkQuoteSession::new(self.quote_client.clone(), self.notifier.clone(), self.config.timings)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down market system");

        let _ = self.quote_client.shutdown().await;
        let _ = self.cart_client.shutdown().await;

        let mut failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor shutdown error");
                failure.get_or_insert(SystemError::ActorFailed(e.to_string()));
            }
        }

        match failure {
            Some(e) => Err(e),
            None => {
                info!("Market system shutdown complete");
                Ok(())
            }
        }
    }
}
