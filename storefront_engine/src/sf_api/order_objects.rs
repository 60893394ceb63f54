use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    db_types::{ActorId, Address, AddressId, CartItems, LineItem, Money, NewOrder, PaymentType, Product, ProductId},
    sf_api::errors::OrderFlowError,
};

/// Body of a cash-on-delivery checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodOrderRequest {
    pub address_id: AddressId,
    /// Client-chosen token. Repeating a request with the same key returns the original order.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl CodOrderRequest {
    pub fn new(address_id: AddressId) -> Self {
        Self { address_id, idempotency_key: None }
    }

    pub fn with_idempotency_key<S: Into<String>>(mut self, key: S) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Prices every cart entry at the product's current unit price.
///
/// Line items come out in product id order. A product missing from `catalog` yields `ProductNotFound`, and one that is
/// not in stock yields `OutOfStock`.
pub fn price_cart(items: &CartItems, catalog: &HashMap<ProductId, Product>) -> Result<Vec<LineItem>, OrderFlowError> {
    items
        .iter()
        .map(|(id, &quantity)| {
            let product = catalog.get(id).ok_or(OrderFlowError::ProductNotFound(*id))?;
            if !product.in_stock {
                return Err(OrderFlowError::OutOfStock { id: *id, name: product.name.clone() });
            }
            Ok(LineItem { product_id: *id, name: product.name.clone(), quantity, unit_price: product.unit_price() })
        })
        .collect()
}

/// Sums `unit_price × quantity` over the line items.
pub fn order_total(items: &[LineItem]) -> Result<Money, OrderFlowError> {
    items.iter().try_fold(Money::default(), |total, item| {
        item.unit_price
            .checked_mul(item.quantity)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| OrderFlowError::PricingError(format!("The total overflowed at product {}", item.product_id)))
    })
}

/// Builds a priced, unsaved COD order from the buyer's cart and delivery address.
pub fn new_cod_order(
    buyer: &ActorId,
    items: &CartItems,
    catalog: &HashMap<ProductId, Product>,
    address: &Address,
    idempotency_key: Option<String>,
) -> Result<NewOrder, OrderFlowError> {
    let items = price_cart(items, catalog)?;
    let amount = order_total(&items)?;
    Ok(NewOrder {
        buyer_id: buyer.clone(),
        items,
        amount,
        address_id: address.id,
        address: address.snapshot(),
        payment_type: PaymentType::Cod,
        idempotency_key,
    })
}
