use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for the product repository actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_repository_client!(ProductClient, Product, ProductPatch, ProductError, product, products);

impl ProductClient {
    /// Committed, sellable units. Reservations do not reduce it.
    #[instrument(skip(self))]
    pub async fn available_stock(&self, code: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(code, ProductAction::CheckStock).await? {
            ProductActionResult::StockLevel(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_available(&self, code: String, quantity: u32) -> Result<bool, ProductError> {
        Ok(quantity <= self.available_stock(code).await?)
    }

    /// Removes sold units from stock and returns what is left.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, code: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(code.clone(), ProductAction::DecrementStock(quantity))
            .await?
        {
            ProductActionResult::Decremented { remaining } => Ok(remaining),
            ProductActionResult::Insufficient { available } => {
                warn!(available, "Stock decrement refused");
                Err(ProductError::InsufficientStock {
                    code,
                    requested: quantity,
                    available,
                })
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_reserved(&self, code: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(code, ProductAction::SetReserved(quantity))
            .await?
        {
            ProductActionResult::Reserved(reserved) => Ok(reserved),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category: String) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        Ok(self.inner.find(move |p| p.category == category).await?)
    }

    /// Products at or below their critical threshold.
    #[instrument(skip(self))]
    pub async fn critical_stock(&self) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        Ok(self.inner.find(Product::is_critical).await?)
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
