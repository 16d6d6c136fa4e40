use crate::actor_framework::Entity;
use crate::domain::{Order, OrderPatch};
use crate::store::keys;

impl Entity for Order {
    type Key = String;
    type Patch = OrderPatch;
    type Action = ();
    type ActionResult = ();

    const COLLECTION: &'static str = keys::ORDERS;

    fn key(&self) -> &String {
        &self.order_number
    }

    fn on_create(&mut self) -> Result<(), String> {
        if self.order_number.trim().is_empty() {
            return Err("order number is required".to_string());
        }
        Ok(())
    }

    /// Orders are immutable apart from their shipping status.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        if let Some(status) = patch.shipping_status {
            self.shipping_status = status;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
