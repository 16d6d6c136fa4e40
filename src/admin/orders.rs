use serde::Serialize;
use tracing::{info, instrument};

use super::{contains_ci, AdminError};
use crate::clients::OrderClient;
use crate::domain::{Order, ShippingStatus};

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<ShippingStatus>,
    pub user_run: Option<String>,
    pub order_number: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| s == order.shipping_status)
            && contains_ci(&order.user_run, self.user_run.as_deref())
            && contains_ci(&order.order_number, self.order_number.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
    /// Sum of totals, cancelled orders excluded.
    pub revenue: u64,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut stats, order| {
            stats.total += 1;
            match order.shipping_status {
                ShippingStatus::Pending => stats.pending += 1,
                ShippingStatus::Processing => stats.processing += 1,
                ShippingStatus::Shipped => stats.shipped += 1,
                ShippingStatus::Delivered => stats.delivered += 1,
                ShippingStatus::Cancelled => stats.cancelled += 1,
            }
            if order.shipping_status != ShippingStatus::Cancelled {
                stats.revenue += order.total;
            }
            stats
        })
    }
}

#[derive(Clone)]
pub struct OrderAdmin {
    orders: OrderClient,
}

impl OrderAdmin {
    pub fn new(orders: OrderClient) -> Self {
        Self { orders }
    }

    /// Matching orders, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, AdminError> {
        let mut orders = self.orders.list_orders().await?;
        orders.retain(|order| filter.matches(order));
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, order_number: String, status: ShippingStatus) -> Result<Order, AdminError> {
        let order = self
            .orders
            .update_shipping_status(order_number.clone(), status)
            .await?
            .ok_or(AdminError::OrderNotFound(order_number))?;
        info!(%status, "Shipping status updated");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, order_number: String) -> Result<(), AdminError> {
        if !self.orders.remove_order(order_number.clone()).await? {
            return Err(AdminError::OrderNotFound(order_number));
        }
        info!("Order deleted");
        Ok(())
    }

    pub async fn stats(&self) -> Result<OrderStats, AdminError> {
        Ok(OrderStats::from_orders(&self.orders.list_orders().await?))
    }
}
