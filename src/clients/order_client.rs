use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Order, OrderPatch, ShippingStatus};
use crate::order_actor::OrderError;

/// Client for the order repository actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl_repository_client!(OrderClient, Order, OrderPatch, OrderError, order, orders);

impl OrderClient {
    /// Persists a freshly built order. A number collision is reported as
    /// [`OrderError::DuplicateOrder`], never overwritten.
    #[instrument(skip(self, order), fields(order_number = %order.order_number, total = order.total))]
    pub async fn save_order(&self, order: Order) -> Result<Order, OrderError> {
        let saved = self.add_order(order).await?;
        info!("Order saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn orders_by_user(&self, run: String) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        Ok(self.inner.find(move |o| o.user_run == run).await?)
    }

    #[instrument(skip(self))]
    pub async fn orders_by_status(&self, status: ShippingStatus) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        Ok(self.inner.find(move |o| o.shipping_status == status).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_shipping_status(
        &self,
        order_number: String,
        status: ShippingStatus,
    ) -> Result<Option<Order>, OrderError> {
        self.update_order(
            order_number,
            OrderPatch {
                shipping_status: Some(status),
            },
        )
        .await
    }
}
