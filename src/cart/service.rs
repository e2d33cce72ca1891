use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use crate::clients::CartClient;
use crate::domain::{CartItem, CartSummary};
use super::messages::{CartRequest, ServiceResponse};
use super::CartError;

/// Holds the buyer's cart, one line per product id.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    items: HashMap<String, CartItem>,
}

impl CartService {
    pub fn new(buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            items: HashMap::new(),
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddItem { item, respond_to } => {
                    self.handle_add_item(item, respond_to);
                }
                CartRequest::UpdateQuantity { product_id, quantity, respond_to } => {
                    self.handle_update_quantity(product_id, quantity, respond_to);
                }
                CartRequest::RemoveItem { product_id, respond_to } => {
                    self.handle_remove_item(product_id, respond_to);
                }
                CartRequest::ListItems { respond_to } => {
                    self.handle_list_items(respond_to);
                }
                CartRequest::Summary { respond_to } => {
                    let _ = respond_to.send(self.summary());
                }
                CartRequest::Clear { respond_to } => {
                    info!(lines = self.items.len(), "Cart cleared");
                    self.items.clear();
                    let _ = respond_to.send(Ok(()));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }
        info!("CartService stopped");
    }

    #[instrument(fields(product_id = %item.product_id, quantity = item.quantity), skip(self, item, respond_to))]
    fn handle_add_item(&mut self, item: CartItem, respond_to: ServiceResponse<u32, CartError>) {
        debug!("Processing add_item request");
        if item.quantity == 0 {
            warn!("Rejected zero quantity");
            let _ = respond_to.send(Err(CartError::InvalidQuantity(0)));
            return;
        }

        let result = match self.items.get_mut(&item.product_id) {
            Some(line) => match line.quantity.checked_add(item.quantity) {
                Some(total) => {
                    line.quantity = total;
                    Ok(total)
                }
                None => Err(CartError::InvalidQuantity(item.quantity)),
            },
            None => {
                let quantity = item.quantity;
                self.items.insert(item.product_id.clone(), item);
                Ok(quantity)
            }
        };
        if let Ok(total) = &result {
            info!(line_quantity = total, "Item added to cart");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %product_id), skip(self, product_id, respond_to))]
    fn handle_update_quantity(&mut self, product_id: String, quantity: u32, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing update_quantity request");
        let result = if quantity == 0 {
            self.items.remove(&product_id).map(|_| ()).ok_or(CartError::NotFound(product_id))
        } else {
            match self.items.get_mut(&product_id) {
                Some(line) => {
                    line.quantity = quantity;
                    Ok(())
                }
                None => Err(CartError::NotFound(product_id)),
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %product_id), skip(self, product_id, respond_to))]
    fn handle_remove_item(&mut self, product_id: String, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing remove_item request");
        let result = match self.items.remove(&product_id) {
            Some(_) => {
                info!("Item removed from cart");
                Ok(())
            }
            None => Err(CartError::NotFound(product_id)),
        };
        let _ = respond_to.send(result);
    }

    fn handle_list_items(&self, respond_to: ServiceResponse<Vec<CartItem>, CartError>) {
        let mut items: Vec<CartItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        let _ = respond_to.send(Ok(items));
    }

    fn summary(&self) -> Result<CartSummary, CartError> {
        let mut summary = CartSummary { line_count: self.items.len(), ..CartSummary::default() };
        for item in self.items.values() {
            summary.item_count = summary.item_count.checked_add(item.quantity).ok_or(CartError::Overflow)?;
            summary.subtotal = item
                .line_total()
                .and_then(|line| summary.subtotal.checked_add(line))
                .ok_or(CartError::Overflow)?;
        }
        debug!(lines = summary.line_count, subtotal = %summary.subtotal, "Cart summary");
        Ok(summary)
    }
}
