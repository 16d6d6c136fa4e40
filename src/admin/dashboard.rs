use serde::Serialize;
use tracing::instrument;

use super::{AdminError, OrderStats};
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Order, Product};

/// Whole-number percentage of delivered orders. Zero when there are none.
pub fn delivery_rate(delivered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((delivered as f64 / total as f64) * 100.0).round() as u32
}

/// Most recent orders first, at most `limit`.
pub fn latest_orders(mut orders: Vec<Order>, limit: usize) -> Vec<Order> {
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    orders.truncate(limit);
    orders
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_users: usize,
    pub orders: OrderStats,
    pub delivery_rate: u32,
    pub critical_products: Vec<Product>,
    pub latest_orders: Vec<Order>,
}

#[derive(Clone)]
pub struct DashboardService {
    products: ProductClient,
    users: UserClient,
    orders: OrderClient,
    latest_limit: usize,
}

impl DashboardService {
    pub fn new(products: ProductClient, users: UserClient, orders: OrderClient, latest_limit: usize) -> Self {
        Self {
            products,
            users,
            orders,
            latest_limit,
        }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        let products = self.products.list_products().await?;
        let users = self.users.list_users().await?;
        let orders = self.orders.list_orders().await?;

        let order_stats = OrderStats::from_orders(&orders);
        Ok(DashboardStats {
            total_products: products.len(),
            total_users: users.len(),
            delivery_rate: delivery_rate(order_stats.delivered, order_stats.total),
            orders: order_stats,
            critical_products: products.into_iter().filter(Product::is_critical).collect(),
            latest_orders: latest_orders(orders, self.latest_limit),
        })
    }
}
