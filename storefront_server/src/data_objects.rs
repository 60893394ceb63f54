use std::fmt::Display;

use serde::{Deserialize, Serialize};
use storefront_engine::db_types::{CartItems, Money, NewAddress, OrderId, OrderStatusType, ProductId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The full desired contents of the cart. Entries with a quantity of zero or less are removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub cart_items: CartItems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAddressRequest {
    pub address: NewAddress,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub id: ProductId,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub id: ProductId,
    pub price: Money,
    #[serde(default)]
    pub offer_price: Option<Money>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: OrderId,
    pub status: OrderStatusType,
}
