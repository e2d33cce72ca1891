use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::cart::messages::CartRequest;
use crate::cart::CartError;
use crate::domain::{CartItem, CartSummary};

/// Client for the cart service.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CartClient => fn add_item(item: CartItem) -> u32 as CartRequest::AddItem, Error = CartError);
client_method!(CartClient => fn update_quantity(product_id: String, quantity: u32) -> () as CartRequest::UpdateQuantity, Error = CartError);
client_method!(CartClient => fn remove_item(product_id: String) -> () as CartRequest::RemoveItem, Error = CartError);
client_method!(CartClient => fn list_items() -> Vec<CartItem> as CartRequest::ListItems, Error = CartError);
client_method!(CartClient => fn summary() -> CartSummary as CartRequest::Summary, Error = CartError);
client_method!(CartClient => fn clear() -> () as CartRequest::Clear, Error = CartError);
