/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the committed stock level without modifying it.
    CheckStock,
    /// Commits a sale by removing units from stock.
    ///
    /// Leaves the product untouched when the quantity exceeds stock.
    DecrementStock(u32),
    /// Records how many units sit in the cart. Clamped to stock.
    SetReserved(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductActionResult {
    StockLevel(u32),
    Decremented { remaining: u32 },
    Insufficient { available: u32 },
    Reserved(u32),
}
