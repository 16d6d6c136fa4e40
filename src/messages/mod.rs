use tokio::sync::oneshot;

use crate::cart::CartError;
use crate::domain::CartLine;

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by the cart service. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum CartRequest {
    GetCart {
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    },
    AvailableStock {
        code: String,
        respond_to: ServiceResponse<u32, CartError>,
    },
    CheckAvailable {
        code: String,
        quantity: u32,
        respond_to: ServiceResponse<bool, CartError>,
    },
    AddOrIncrement {
        code: String,
        delta: u32,
        respond_to: ServiceResponse<u32, CartError>,
    },
    SetQuantity {
        code: String,
        quantity: u32,
        respond_to: ServiceResponse<u32, CartError>,
    },
    RemoveLine {
        code: String,
        respond_to: ServiceResponse<bool, CartError>,
    },
    Clear {
        respond_to: ServiceResponse<(), CartError>,
    },
    Shutdown,
}
