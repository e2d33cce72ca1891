use tokio::sync::oneshot;
use crate::domain::{CartItem, CartSummary};
use super::CartError;

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests understood by [`super::CartService`]. Each carries its responder.
#[derive(Debug)]
pub enum CartRequest {
    AddItem {
        item: CartItem,
        respond_to: ServiceResponse<u32, CartError>,
    },
    UpdateQuantity {
        product_id: String,
        quantity: u32,
        respond_to: ServiceResponse<(), CartError>,
    },
    RemoveItem {
        product_id: String,
        respond_to: ServiceResponse<(), CartError>,
    },
    ListItems {
        respond_to: ServiceResponse<Vec<CartItem>, CartError>,
    },
    Summary {
        respond_to: ServiceResponse<CartSummary, CartError>,
    },
    Clear {
        respond_to: ServiceResponse<(), CartError>,
    },
    Shutdown,
}
