use std::collections::BTreeSet;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{CartClient, CartError};
use crate::clients::ProductClient;
use crate::domain::{CartLine, Product};
use crate::messages::{CartRequest, ServiceResponse};
use crate::product_actor::ProductError;
use crate::signals::Notifier;
use crate::store::{keys, LocalStore};

/// Owns the device cart. Lines live in the store under [`keys::CART`]; every
/// mutation is persisted, mirrored into the products' reserved stock and then
/// announced on the cart-changed signal.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    store: LocalStore,
    products: ProductClient,
    notifier: Notifier,
}

impl CartService {
    pub fn new(buffer_size: usize, store: LocalStore, products: ProductClient) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let notifier = Notifier::new("cart-changed");
        let service = Self {
            receiver,
            store,
            products,
            notifier: notifier.clone(),
        };
        (service, CartClient::new(sender, notifier))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(Ok(self.lines()));
                }
                CartRequest::AvailableStock { code, respond_to } => {
                    let result = self.stock_of(&code).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::CheckAvailable {
                    code,
                    quantity,
                    respond_to,
                } => {
                    let result = self
                        .products
                        .check_available(code, quantity)
                        .await
                        .map_err(CartError::from);
                    let _ = respond_to.send(result);
                }
                CartRequest::AddOrIncrement {
                    code,
                    delta,
                    respond_to,
                } => self.handle_add_or_increment(code, delta, respond_to).await,
                CartRequest::SetQuantity {
                    code,
                    quantity,
                    respond_to,
                } => self.handle_set_quantity(code, quantity, respond_to).await,
                CartRequest::RemoveLine { code, respond_to } => {
                    self.handle_remove_line(code, respond_to).await
                }
                CartRequest::Clear { respond_to } => self.handle_clear(respond_to).await,
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    fn lines(&self) -> Vec<CartLine> {
        self.store.load(keys::CART).unwrap_or_default()
    }

    async fn product(&self, code: &str) -> Result<Product, CartError> {
        self.products
            .get_product(code.to_string())
            .await?
            .ok_or_else(|| CartError::ProductNotFound(code.to_string()))
    }

    async fn stock_of(&self, code: &str) -> Result<u32, CartError> {
        Ok(self.products.available_stock(code.to_string()).await?)
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_add_or_increment(
        &mut self,
        code: String,
        delta: u32,
        respond_to: ServiceResponse<u32, CartError>,
    ) {
        let result = self.add_or_increment(code, delta).await;
        let _ = respond_to.send(result);
    }

    async fn add_or_increment(&mut self, code: String, delta: u32) -> Result<u32, CartError> {
        if delta == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let product = self.product(&code).await?;
        let previous = self.lines();
        let mut lines = previous.clone();

        let current = lines
            .iter()
            .find(|line| line.product_code == code)
            .map_or(0, |line| line.quantity);
        let requested = current.saturating_add(delta);
        if requested > product.stock {
            warn!(requested, available = product.stock, "Not enough stock to add");
            return Err(CartError::InsufficientStock {
                code,
                requested,
                available: product.stock,
            });
        }

        match lines.iter_mut().find(|line| line.product_code == code) {
            Some(line) => line.quantity = requested,
            None => lines.push(CartLine {
                product_code: product.code.clone(),
                name: product.name.clone(),
                quantity: requested,
                price_at_add: product.price,
            }),
        }

        self.commit(&previous, lines).await?;
        info!(quantity = requested, "Cart line updated");
        Ok(requested)
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_set_quantity(
        &mut self,
        code: String,
        quantity: u32,
        respond_to: ServiceResponse<u32, CartError>,
    ) {
        let result = self.set_quantity(code, quantity).await;
        let _ = respond_to.send(result);
    }

    /// Clamps to `[0, stock]`. Zero drops the line.
    async fn set_quantity(&mut self, code: String, quantity: u32) -> Result<u32, CartError> {
        let product = self.product(&code).await?;
        let clamped = quantity.min(product.stock);
        if clamped < quantity {
            debug!(requested = quantity, clamped, "Quantity clamped to stock");
        }

        let previous = self.lines();
        let mut lines = previous.clone();
        if clamped == 0 {
            lines.retain(|line| line.product_code != code);
        } else if let Some(line) = lines.iter_mut().find(|line| line.product_code == code) {
            line.quantity = clamped;
        } else {
            lines.push(CartLine {
                product_code: product.code.clone(),
                name: product.name.clone(),
                quantity: clamped,
                price_at_add: product.price,
            });
        }

        self.commit(&previous, lines).await?;
        Ok(clamped)
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_remove_line(&mut self, code: String, respond_to: ServiceResponse<bool, CartError>) {
        let previous = self.lines();
        let mut lines = previous.clone();
        lines.retain(|line| line.product_code != code);
        let removed = lines.len() != previous.len();

        let result = self.commit(&previous, lines).await.map(|()| removed);
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_clear(&mut self, respond_to: ServiceResponse<(), CartError>) {
        let previous = self.lines();
        let result = self.commit(&previous, Vec::new()).await;
        if result.is_ok() {
            info!(cleared = previous.len(), "Cart cleared");
        }
        let _ = respond_to.send(result);
    }

    /// Persists `lines`, refreshes reservations for every product that was or
    /// is in the cart, then signals listeners.
    async fn commit(&self, previous: &[CartLine], lines: Vec<CartLine>) -> Result<(), CartError> {
        if !self.store.save(keys::CART, &lines) {
            return Err(CartError::StorageError);
        }

        let touched: BTreeSet<&str> = previous
            .iter()
            .chain(lines.iter())
            .map(|line| line.product_code.as_str())
            .collect();
        for code in touched {
            let reserved = lines
                .iter()
                .find(|line| line.product_code == code)
                .map_or(0, |line| line.quantity);
            match self.products.set_reserved(code.to_string(), reserved).await {
                Ok(_) | Err(ProductError::NotFound(_)) => {}
                Err(e) => warn!(code, error = %e, "Failed to update reserved stock"),
            }
        }

        self.notifier.notify();
        Ok(())
    }
}
