use tracing::{debug, info, instrument, warn};
use crate::app_system::{NegotiationTimings, Notifier};
use crate::clients::QuoteClient;
use crate::domain::{AcceptancePath, BulkQuote, Money, NegotiationStage, Party};
use crate::quote_actor::{pricing, QuoteError};
use super::form::QuoteForm;
use super::scheduler::ScheduledReply;

/// What the buyer sees, derived from the active quote (if any).
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationState {
    Idle,
    Requested,
    StoreResponded { offer: Money },
    Negotiating { offer: Money, counter: Money },
    Confirmed { final_price: Money, path: AcceptancePath },
    Declined,
}

impl NegotiationState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::StoreResponded { .. } => "store_responded",
            Self::Negotiating { .. } => "negotiating",
            Self::Confirmed { .. } => "confirmed",
            Self::Declined => "declined",
        }
    }

    fn of(quote: &BulkQuote) -> Self {
        match &quote.stage {
            NegotiationStage::Requested => Self::Requested,
            NegotiationStage::CounterOffered { by: Party::Store, price } => Self::StoreResponded { offer: *price },
            NegotiationStage::CounterOffered { by: Party::Buyer, price } => Self::Negotiating {
                offer: pricing::store_offer(quote.base_price),
                counter: *price,
            },
            NegotiationStage::Accepted { final_price, path } => Self::Confirmed { final_price: *final_price, path: *path },
            NegotiationStage::Declined => Self::Declined,
        }
    }
}

/// Marker returned once a confirmed quote can move on to checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutHandoff;

struct ActiveQuote {
    id: String,
    pending: Option<ScheduledReply>,
}

/// One buyer's bulk quote workflow: form editing, submission, the simulated
/// store replies and the buyer's responses.
///
/// Validation failures are returned to the caller and announced on the
/// notification feed; they never change state. Store replies run as
/// [`ScheduledReply`] tasks owned by the session, so resetting or dropping the
/// session cancels them.
pub struct BulkQuoteSession {
    client: QuoteClient,
    notifier: Notifier,
    timings: NegotiationTimings,
    form: QuoteForm,
    active: Option<ActiveQuote>,
}

impl BulkQuoteSession {
    pub fn new(client: QuoteClient, notifier: Notifier, timings: NegotiationTimings) -> Self {
        Self {
            client,
            notifier,
            timings,
            form: QuoteForm::default(),
            active: None,
        }
    }

    pub fn form(&self) -> &QuoteForm {
        &self.form
    }

    pub fn active_quote_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    // --- Form editing (Idle only) ---

    fn editable_form(&mut self) -> Result<&mut QuoteForm, QuoteError> {
        if self.active.is_some() {
            return Err(QuoteError::FormLocked);
        }
        Ok(&mut self.form)
    }

    pub fn select_store(&mut self, store_id: impl Into<String>) -> Result<(), QuoteError> {
        self.editable_form()?.store_id = Some(store_id.into());
        Ok(())
    }

    pub fn select_product(&mut self, product_id: impl Into<String>) -> Result<(), QuoteError> {
        self.editable_form()?.product_id = Some(product_id.into());
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), QuoteError> {
        self.editable_form()?.quantity = quantity;
        Ok(())
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), QuoteError> {
        self.editable_form()?.message = message.into();
        Ok(())
    }

    // --- Transitions ---

    /// `Idle → Requested`, scheduling the store's reply.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<String, QuoteError> {
        if self.active.is_some() {
            return Err(self.reject(QuoteError::FormLocked));
        }
        let request = self.form.validate().map_err(|e| self.reject(e))?;
        let id = self.client.request_quote(request).await.map_err(|e| self.reject(e))?;

        self.notifier.success(
            "Bulk quote requested",
            format!("Waiting for the store to respond to {} units", self.form.quantity),
        );
        let pending = self.schedule_store_response(id.clone());
        self.active = Some(ActiveQuote { id: id.clone(), pending: Some(pending) });
        info!(quote_id = %id, "Quote submitted");
        Ok(id)
    }

    fn schedule_store_response(&self, id: String) -> ScheduledReply {
        let client = self.client.clone();
        let notifier = self.notifier.clone();
        ScheduledReply::after(self.timings.store_response_delay, "store_response", async move {
            match client.store_respond(id.clone()).await {
                Ok(NegotiationStage::CounterOffered { price, .. }) => notifier.success(
                    "Store responded",
                    format!("The store offers {} for the whole order", price),
                ),
                Ok(stage) => debug!(quote_id = %id, %stage, "Store reply produced unexpected stage"),
                Err(e) => debug!(quote_id = %id, error = %e, "Store reply dropped"),
            }
        })
    }

    fn schedule_counter_acceptance(&self, id: String) -> ScheduledReply {
        let client = self.client.clone();
        let notifier = self.notifier.clone();
        ScheduledReply::after(self.timings.counter_accept_delay, "counter_acceptance", async move {
            match client.store_accept_counter(id.clone()).await {
                Ok(NegotiationStage::Accepted { final_price, .. }) => notifier.success(
                    "Counter-offer accepted",
                    format!("Order confirmed at {}", final_price),
                ),
                Ok(stage) => debug!(quote_id = %id, %stage, "Counter acceptance produced unexpected stage"),
                Err(e) => debug!(quote_id = %id, error = %e, "Counter acceptance dropped"),
            }
        })
    }

    /// `StoreResponded → Confirmed` at the store's offer.
    #[instrument(skip(self))]
    pub async fn accept(&mut self) -> Result<Money, QuoteError> {
        let id = self.active_id()?;
        match self.client.accept(id).await.map_err(|e| self.reject(e))? {
            NegotiationStage::Accepted { final_price, .. } => {
                self.notifier.success("Order confirmed", format!("Final price {}", final_price));
                Ok(final_price)
            }
            stage => Err(self.unexpected(stage, "accept")),
        }
    }

    /// `StoreResponded → Negotiating`. `raw` is the buyer's input as typed.
    #[instrument(skip(self))]
    pub async fn counter(&mut self, raw: &str) -> Result<Money, QuoteError> {
        let id = self.active_id()?;
        let price = Money::parse_positive(raw)
            .ok_or_else(|| self.reject(QuoteError::InvalidCounterOffer(raw.to_string())))?;

        match self.client.counter(id.clone(), price).await.map_err(|e| self.reject(e))? {
            NegotiationStage::CounterOffered { by: Party::Buyer, .. } => {
                self.notifier.info("Counter-offer sent", format!("You proposed {}", price));
                let pending = self.schedule_counter_acceptance(id);
                if let Some(active) = self.active.as_mut() {
                    active.pending = Some(pending);
                }
                Ok(price)
            }
            stage => Err(self.unexpected(stage, "counter")),
        }
    }

    /// `StoreResponded → Declined`.
    #[instrument(skip(self))]
    pub async fn decline(&mut self) -> Result<(), QuoteError> {
        let id = self.active_id()?;
        match self.client.decline(id).await.map_err(|e| self.reject(e))? {
            NegotiationStage::Declined => {
                self.notifier.info("Offer declined", "You can start a new request at any time");
                Ok(())
            }
            stage => Err(self.unexpected(stage, "decline")),
        }
    }

    /// Back to `Idle` from anywhere, discarding the quote and the form.
    #[instrument(skip(self))]
    pub async fn start_new_request(&mut self) {
        if let Some(active) = self.active.take() {
            drop(active.pending);
            match self.client.delete_quote(active.id.clone()).await {
                Ok(()) | Err(QuoteError::NotFound(_)) => {}
                Err(e) => warn!(quote_id = %active.id, error = %e, "Failed to discard quote"),
            }
        }
        self.form = QuoteForm::default();
        self.notifier.info("New request", "Fill in the form to request a bulk quote");
    }

    /// Checkout hand-off, available once the quote is confirmed.
    pub async fn proceed_to_checkout(&self) -> Result<CheckoutHandoff, QuoteError> {
        match self.state().await? {
            NegotiationState::Confirmed { .. } => Ok(CheckoutHandoff),
            other => Err(QuoteError::InvalidTransition {
                stage: other.name().to_string(),
                action: "checkout".to_string(),
            }),
        }
    }

    // --- Queries ---

    pub async fn quote(&self) -> Result<Option<BulkQuote>, QuoteError> {
        match &self.active {
            Some(active) => self.client.get_quote(active.id.clone()).await,
            None => Ok(None),
        }
    }

    pub async fn state(&self) -> Result<NegotiationState, QuoteError> {
        Ok(self.quote().await?.as_ref().map_or(NegotiationState::Idle, NegotiationState::of))
    }

    // --- Helpers ---

    fn active_id(&self) -> Result<String, QuoteError> {
        match &self.active {
            Some(active) => Ok(active.id.clone()),
            None => Err(self.reject(QuoteError::NoActiveQuote)),
        }
    }

    /// Announces a buyer-facing failure and hands the error back.
    fn reject(&self, error: QuoteError) -> QuoteError {
        let title = if error.is_validation() { "Check your request" } else { "Action not available" };
        self.notifier.error(title, error.to_string());
        error
    }

    fn unexpected(&self, stage: NegotiationStage, action: &str) -> QuoteError {
        self.reject(QuoteError::InvalidTransition { stage: stage.to_string(), action: action.to_string() })
    }
}

impl Drop for BulkQuoteSession {
    fn drop(&mut self) {
        let Some(active) = self.active.take() else { return };
        drop(active.pending);
        // Actor state outlives the session; clean up in the background if we can.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            runtime.spawn(async move {
                let _ = client.delete_quote(active.id).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use crate::actor_framework::ResourceActor;
    use crate::app_system::{Notification, NotificationLevel};
    use crate::catalog::InMemoryCatalog;

    struct Harness {
        session: BulkQuoteSession,
        client: QuoteClient,
        feed: mpsc::Receiver<Notification>,
    }

    fn harness() -> Harness {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("quote_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, inner) = ResourceActor::<BulkQuote>::new(16, next_id);
        tokio::spawn(actor.run());

        let catalog = Arc::new(InMemoryCatalog::bundled().unwrap());
        let client = QuoteClient::new(inner, catalog);
        let (notifier, feed) = Notifier::channel(64);
        let session = BulkQuoteSession::new(client.clone(), notifier, NegotiationTimings::default());
        Harness { session, client, feed }
    }

    fn fill(session: &mut BulkQuoteSession, product_id: &str, quantity: u32) {
        session.select_store("store-1").unwrap();
        session.select_product(product_id).unwrap();
        session.set_quantity(quantity).unwrap();
    }

    async fn next_titled(feed: &mut mpsc::Receiver<Notification>, title: &str) -> Notification {
        loop {
            let notification = feed.recv().await.expect("feed open");
            if notification.title == title {
                return notification;
            }
        }
    }

    fn drain(feed: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(n) = feed.try_recv() {
            seen.push(n);
        }
        seen
    }

    async fn responded(h: &mut Harness, product_id: &str, quantity: u32) {
        fill(&mut h.session, product_id, quantity);
        h.session.submit().await.unwrap();
        next_titled(&mut h.feed, "Store responded").await;
    }

    #[tokio::test(start_paused = true)]
    async fn accept_path_end_to_end() {
        let mut h = harness();
        fill(&mut h.session, "prod-2", 10);
        h.session.set_message("for the office").unwrap();

        h.session.submit().await.unwrap();
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Requested);
        let quote = h.session.quote().await.unwrap().unwrap();
        assert_eq!(quote.store.name, "Acme Electronics");
        assert_eq!(quote.base_price, Money::new(450_000));
        assert_eq!(quote.per_unit_price(), Some(Money::new(45_000)));
        assert_eq!(quote.message.as_deref(), Some("for the office"));

        let reply = next_titled(&mut h.feed, "Store responded").await;
        assert_eq!(reply.level, NotificationLevel::Success);
        assert_eq!(
            h.session.state().await.unwrap(),
            NegotiationState::StoreResponded { offer: Money::new(427_500) }
        );

        assert_eq!(h.session.accept().await, Ok(Money::new(427_500)));
        assert_eq!(
            h.session.state().await.unwrap(),
            NegotiationState::Confirmed { final_price: Money::new(427_500), path: AcceptancePath::AsOffered }
        );
        assert_eq!(h.session.proceed_to_checkout().await, Ok(CheckoutHandoff));
    }

    #[tokio::test(start_paused = true)]
    async fn counter_path_end_to_end() {
        let mut h = harness();
        responded(&mut h, "prod-1", 12).await;

        assert_eq!(h.session.counter("780000").await, Ok(Money::new(780_000)));
        assert_eq!(
            h.session.state().await.unwrap(),
            NegotiationState::Negotiating { offer: Money::new(820_800), counter: Money::new(780_000) }
        );
        assert!(h.session.proceed_to_checkout().await.is_err());

        next_titled(&mut h.feed, "Counter-offer accepted").await;
        assert_eq!(
            h.session.state().await.unwrap(),
            NegotiationState::Confirmed { final_price: Money::new(804_384), path: AcceptancePath::AfterCounter }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn store_reply_waits_for_the_delay() {
        let mut h = harness();
        fill(&mut h.session, "prod-1", 12);
        h.session.submit().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Requested);
        assert!(matches!(h.session.accept().await, Err(QuoteError::InvalidTransition { .. })));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(matches!(h.session.state().await.unwrap(), NegotiationState::StoreResponded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn below_minimum_never_leaves_idle() {
        let mut h = harness();
        for quantity in [0, 1, 4] {
            fill(&mut h.session, "prod-1", quantity);
            assert_eq!(
                h.session.submit().await,
                Err(QuoteError::QuantityBelowMinimum { quantity, minimum: 5 })
            );
            assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);
            assert_eq!(h.session.active_quote_id(), None);
        }

        let notices = drain(&mut h.feed);
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.level == NotificationLevel::Error));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_selections_are_rejected() {
        let mut h = harness();
        assert_eq!(h.session.submit().await, Err(QuoteError::MissingStore));

        h.session.select_store("store-1").unwrap();
        assert_eq!(h.session.submit().await, Err(QuoteError::MissingProduct));

        h.session.select_product("prod-404").unwrap();
        assert_eq!(h.session.submit().await, Err(QuoteError::UnknownProduct("prod-404".into())));
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_counter_offers_change_nothing() {
        let mut h = harness();
        responded(&mut h, "prod-1", 12).await;
        let before = h.session.state().await.unwrap();

        for raw in ["0", "-5", "abc", "", "0.3"] {
            assert_eq!(
                h.session.counter(raw).await,
                Err(QuoteError::InvalidCounterOffer(raw.to_string()))
            );
            assert_eq!(h.session.state().await.unwrap(), before);
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(h.session.state().await.unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn form_is_locked_while_active() {
        let mut h = harness();
        fill(&mut h.session, "prod-1", 12);
        h.session.submit().await.unwrap();

        assert_eq!(h.session.set_quantity(50), Err(QuoteError::FormLocked));
        assert_eq!(h.session.select_store("store-2"), Err(QuoteError::FormLocked));
        assert_eq!(h.session.submit().await, Err(QuoteError::FormLocked));
        assert_eq!(h.session.form().quantity, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn second_counter_is_rejected() {
        let mut h = harness();
        responded(&mut h, "prod-1", 12).await;
        h.session.counter("800000").await.unwrap();

        assert!(matches!(
            h.session.counter("790000").await,
            Err(QuoteError::InvalidTransition { .. })
        ));
        assert!(matches!(h.session.state().await.unwrap(), NegotiationState::Negotiating { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn decline_ends_negotiation() {
        let mut h = harness();
        responded(&mut h, "prod-2", 20).await;
        h.session.decline().await.unwrap();
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Declined);
        assert!(h.session.accept().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn actions_without_a_quote() {
        let mut h = harness();
        assert_eq!(h.session.accept().await, Err(QuoteError::NoActiveQuote));
        assert_eq!(h.session.counter("100").await, Err(QuoteError::NoActiveQuote));
        assert_eq!(h.session.decline().await, Err(QuoteError::NoActiveQuote));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_returns_to_idle_from_every_state() {
        let mut h = harness();

        // Idle
        h.session.start_new_request().await;
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);

        // Requested: the pending store reply must not fire afterwards
        fill(&mut h.session, "prod-1", 12);
        let requested_id = h.session.submit().await.unwrap();
        h.session.start_new_request().await;
        drain(&mut h.feed);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut h.feed).iter().all(|n| n.title != "Store responded"));
        assert_eq!(h.client.get_quote(requested_id).await, Ok(None));

        // StoreResponded
        responded(&mut h, "prod-1", 12).await;
        h.session.start_new_request().await;
        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);

        // Negotiating: the pending acceptance must not fire afterwards
        responded(&mut h, "prod-1", 12).await;
        h.session.counter("800000").await.unwrap();
        h.session.start_new_request().await;
        drain(&mut h.feed);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut h.feed).iter().all(|n| n.title != "Counter-offer accepted"));

        // Confirmed
        responded(&mut h, "prod-1", 12).await;
        h.session.accept().await.unwrap();
        h.session.start_new_request().await;

        assert_eq!(h.session.state().await.unwrap(), NegotiationState::Idle);
        assert_eq!(h.session.form(), &QuoteForm::default());
        assert_eq!(h.session.active_quote_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_cancels_and_cleans_up() {
        let mut h = harness();
        fill(&mut h.session, "prod-1", 12);
        let id = h.session.submit().await.unwrap();
        drain(&mut h.feed);

        drop(h.session);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(drain(&mut h.feed).is_empty());
        assert_eq!(h.client.get_quote(id).await, Ok(None));
    }
}
