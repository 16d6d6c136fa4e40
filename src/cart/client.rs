use tokio::sync::mpsc;
use tracing::{debug, instrument};

use super::CartError;
use crate::domain::CartLine;
use crate::messages::CartRequest;
use crate::signals::{Notifier, Subscription};

/// Handle to the [`CartService`](super::CartService).
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    notifier: Notifier,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>, notifier: Notifier) -> Self {
        Self { sender, notifier }
    }

    /// Cart-changed signal. Fires after every successful mutation.
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Adds one unit of `code`.
    pub async fn add_to_cart(&self, code: String) -> Result<u32, CartError> {
        self.add_or_increment(code, 1).await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| CartError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(CartClient => fn get_cart() -> Vec<CartLine> as CartRequest::GetCart, CartError);
client_method!(CartClient => fn available_stock(code: String) -> u32 as CartRequest::AvailableStock, CartError);
client_method!(CartClient => fn check_available(code: String, quantity: u32) -> bool as CartRequest::CheckAvailable, CartError);
client_method!(CartClient => fn add_or_increment(code: String, delta: u32) -> u32 as CartRequest::AddOrIncrement, CartError);
client_method!(CartClient => fn set_quantity(code: String, quantity: u32) -> u32 as CartRequest::SetQuantity, CartError);
client_method!(CartClient => fn remove_line(code: String) -> bool as CartRequest::RemoveLine, CartError);
client_method!(CartClient => fn clear() -> () as CartRequest::Clear, CartError);
