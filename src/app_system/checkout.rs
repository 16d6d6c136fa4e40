use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::auth::AuthService;
use crate::cart::pricing::summarize;
use crate::cart::{find_shortages, CartClient, CartError, CartTotals, ShippingPolicy, StockShortage};
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::Order;
use crate::order_actor::{create_order, OrderError};
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Debes iniciar sesión para comprar")]
    NotAuthenticated,
    #[error("No account found for RUN {0}")]
    UnknownUser(String),
    #[error("El carrito está vacío")]
    EmptyCart,
    #[error("Stock insuficiente para {} producto(s)", .0.len())]
    InsufficientStock(Vec<StockShortage>),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Order(#[from] OrderError),
    /// The order is saved but stock for these products was not decremented.
    #[error("Order {order_number} saved but stock was not updated for {failed:?}")]
    StockNotCommitted {
        order_number: String,
        failed: Vec<String>,
    },
    /// The order is saved and stock updated, but the cart still holds the lines.
    #[error("Order {order_number} saved but the cart could not be cleared: {source}")]
    CartNotCleared {
        order_number: String,
        source: CartError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub discount_code: Option<String>,
    pub payment_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order: Order,
    pub totals: CartTotals,
}

/// Turns the signed-in user's cart into an order.
#[derive(Clone)]
pub struct CheckoutService {
    auth: AuthService,
    users: UserClient,
    products: ProductClient,
    orders: OrderClient,
    cart: CartClient,
    shipping: ShippingPolicy,
}

impl CheckoutService {
    pub fn new(
        auth: AuthService,
        users: UserClient,
        products: ProductClient,
        orders: OrderClient,
        cart: CartClient,
        shipping: ShippingPolicy,
    ) -> Self {
        Self {
            auth,
            users,
            products,
            orders,
            cart,
            shipping,
        }
    }

    /// Runs the ordered checkout steps. The order is saved before stock is
    /// decremented and the cart cleared; failures after the save are
    /// reported with the order number and never rolled back.
    #[instrument(skip(self, request))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Receipt, CheckoutError> {
        let session = self.auth.current_user().ok_or(CheckoutError::NotAuthenticated)?;
        let user = self
            .users
            .get_user(session.id.clone())
            .await?
            .ok_or(CheckoutError::UnknownUser(session.id))?;

        let lines = self.cart.get_cart().await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let shortages = find_shortages(&lines, &self.products.list_products().await?);
        if !shortages.is_empty() {
            warn!(count = shortages.len(), "Cart exceeds available stock");
            return Err(CheckoutError::InsufficientStock(shortages));
        }

        let totals = summarize(&lines, Some(&user), &self.shipping);
        let order = create_order(&user, &lines, totals.total, request.discount_code, request.payment_ref);
        let order = self.orders.save_order(order).await?;
        let order_number = order.order_number.clone();

        let mut failed = Vec::new();
        for line in &lines {
            if let Err(e) = self
                .products
                .decrement_stock(line.product_code.clone(), line.quantity)
                .await
            {
                error!(%order_number, product_code = %line.product_code, error = %e, "Stock decrement failed after order was saved");
                failed.push(line.product_code.clone());
            }
        }

        // cleared even when some decrements failed
        let cleared = self.cart.clear().await;

        if !failed.is_empty() {
            return Err(CheckoutError::StockNotCommitted { order_number, failed });
        }
        if let Err(source) = cleared {
            error!(%order_number, error = %source, "Cart not cleared after order was saved");
            return Err(CheckoutError::CartNotCleared { order_number, source });
        }

        info!(%order_number, total = totals.total, "Checkout complete");
        Ok(Receipt { order, totals })
    }
}
