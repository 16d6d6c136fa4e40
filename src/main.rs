use chrono::Local;
use tracing::{error, info, warn, Instrument};

use junimo_store::admin::OrderFilter;
use junimo_store::app_system::{setup_tracing, CheckoutRequest, StoreConfig, StoreSystem};
use junimo_store::report::{export_orders, ReportFormat};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StoreConfig::load().map_err(|e| e.to_string())?;
    info!(data_dir = %config.data_dir.display(), in_memory = config.in_memory, "Starting Junimo Store");

    let system = match StoreSystem::start(config).await {
        Ok(system) => system,
        Err(e) => {
            // nothing usable is running; the caller has to restart the process
            error!(error = %e, "Store could not be initialized, reload required");
            return Err(e.to_string());
        }
    };

    let span = tracing::info_span!("storefront");
    async {
        let outcome = system
            .auth
            .login("abigail@duocuc.cl", "espada123")
            .await
            .map_err(|e| e.to_string())?;
        info!(user = %outcome.session.name, redirect = outcome.redirect.path(), "Signed in");

        for code in ["PL001", "TZ001", "TZ001"] {
            match system.cart.add_to_cart(code.to_string()).await {
                Ok(quantity) => info!(code, quantity, "Added to cart"),
                Err(e) => warn!(code, error = %e, "Could not add to cart"),
            }
        }

        match system.checkout.checkout(CheckoutRequest::default()).await {
            Ok(receipt) => info!(
                order_number = %receipt.order.order_number,
                subtotal = receipt.totals.subtotal,
                discount = receipt.totals.discount,
                shipping = receipt.totals.shipping,
                total = receipt.totals.total,
                "Order placed"
            ),
            Err(e) => error!(error = %e, "Checkout failed"),
        }

        let redirect = system.auth.logout().map_err(|e| e.to_string())?;
        info!(redirect = redirect.path(), "Signed out");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("back_office");
    async {
        system
            .auth
            .login("admin@duoc.cl", "admin123")
            .await
            .map_err(|e| e.to_string())?;

        let stats = system.dashboard.stats().await.map_err(|e| e.to_string())?;
        info!(
            products = stats.total_products,
            users = stats.total_users,
            orders = stats.orders.total,
            revenue = stats.orders.revenue,
            delivery_rate = stats.delivery_rate,
            critical = stats.critical_products.len(),
            "Dashboard"
        );

        let orders = system
            .order_admin
            .list(&OrderFilter::default())
            .await
            .map_err(|e| e.to_string())?;
        let order_stats = system.order_admin.stats().await.map_err(|e| e.to_string())?;
        let report = export_orders(&orders, &order_stats, ReportFormat::Json, Local::now().date_naive())
            .map_err(|e| e.to_string())?;
        info!(file = %report.file_name, bytes = report.contents.len(), "Order report ready");

        system.auth.logout().map_err(|e| e.to_string())?;
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Junimo Store stopped");
    Ok(())
}
