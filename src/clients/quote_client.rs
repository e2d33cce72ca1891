use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use crate::actor_framework::ResourceClient;
use crate::catalog::CatalogRepository;
use crate::domain::{BulkQuote, BulkQuoteCreate, Money, NegotiationStage};
use crate::quote_actor::{pricing, QuoteAction, QuoteError};

/// A validated request form, ready to be resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub store_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub message: Option<String>,
}

/// Client for the bulk quote actor.
///
/// Resolves store and product against the catalog before a quote is opened,
/// and exposes one method per negotiation action.
#[derive(Clone)]
pub struct QuoteClient {
    inner: ResourceClient<BulkQuote>,
    catalog: Arc<dyn CatalogRepository>,
}

impl QuoteClient {
    pub fn new(inner: ResourceClient<BulkQuote>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { inner, catalog }
    }

    #[instrument(skip(self, request), fields(store_id = %request.store_id, product_id = %request.product_id, quantity = request.quantity))]
    pub async fn request_quote(&self, request: QuoteRequest) -> Result<String, QuoteError> {
        info!("Processing request_quote");

        // Step 1: quantity gate, before touching the catalog
        pricing::tier_discount(request.quantity)?;

        // Step 2: resolve store
        let store = match self.catalog.store(&request.store_id) {
            Some(store) => store,
            None => {
                error!("Store not found");
                return Err(QuoteError::UnknownStore(request.store_id));
            }
        };

        // Step 3: resolve product
        let product = match self.catalog.product(&request.product_id) {
            Some(product) => product,
            None => {
                error!("Product not found");
                return Err(QuoteError::UnknownProduct(request.product_id));
            }
        };
        debug!(store_name = %store.name, product_name = %product.name, "Catalog lookups successful");

        // Step 4: open the quote
        let payload = BulkQuoteCreate {
            store: store.summary(),
            product: product.summary(),
            quantity: request.quantity,
            message: request.message,
        };
        let id = self.inner.create(payload).await?;
        info!(quote_id = %id, "Quote opened");
        Ok(id)
    }

    async fn act(&self, id: String, action: QuoteAction) -> Result<NegotiationStage, QuoteError> {
        debug!(quote_id = %id, action = action.name(), "Sending request");
        Ok(self.inner.perform_action(id, action).await?)
    }

    #[instrument(skip(self))]
    pub async fn store_respond(&self, id: String) -> Result<NegotiationStage, QuoteError> {
        self.act(id, QuoteAction::StoreRespond).await
    }

    #[instrument(skip(self))]
    pub async fn accept(&self, id: String) -> Result<NegotiationStage, QuoteError> {
        self.act(id, QuoteAction::Accept).await
    }

    #[instrument(skip(self))]
    pub async fn counter(&self, id: String, price: Money) -> Result<NegotiationStage, QuoteError> {
        self.act(id, QuoteAction::Counter(price)).await
    }

    #[instrument(skip(self))]
    pub async fn store_accept_counter(&self, id: String) -> Result<NegotiationStage, QuoteError> {
        self.act(id, QuoteAction::StoreAcceptCounter).await
    }

    #[instrument(skip(self))]
    pub async fn decline(&self, id: String) -> Result<NegotiationStage, QuoteError> {
        self.act(id, QuoteAction::Decline).await
    }

    pub async fn shutdown(&self) -> Result<(), QuoteError> {
        Ok(self.inner.shutdown().await?)
    }
}

impl_client_methods!(QuoteClient, BulkQuote, QuoteError, quote);
