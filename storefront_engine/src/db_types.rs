use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
pub use storefront_common::Money;
use storefront_common::helpers::is_blank;
use thiserror::Error;

use crate::sf_api::errors::AuthApiError;

//--------------------------------------     Identifiers     ---------------------------------------------------------
macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

int_id!(
    /// Catalog identifier for a product.
    ProductId
);
int_id!(AddressId);
int_id!(OrderId);

/// The identity of an authenticated caller. Identities are issued outside this system and are opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------        Roles        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Buyer => write!(f, "buyer"),
            Role::Seller => write!(f, "seller"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleConversionError(String);

impl FromStr for Role {
    type Err = RoleConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" | "user" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            _ => Err(RoleConversionError(s.to_string())),
        }
    }
}

/// An authenticated caller, tagged with the single role it acts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: ActorId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn buyer<S: Into<String>>(id: S) -> Self {
        Self::new(ActorId::new(id), Role::Buyer)
    }

    pub fn seller<S: Into<String>>(id: S) -> Self {
        Self::new(ActorId::new(id), Role::Seller)
    }

    pub fn require_role(&self, role: Role) -> Result<&Self, AuthApiError> {
        self.require_any_role(&[role])
    }

    pub fn require_any_role(&self, roles: &[Role]) -> Result<&Self, AuthApiError> {
        if roles.contains(&self.role) {
            Ok(self)
        } else {
            Err(AuthApiError::RoleNotAllowed { required: roles.to_vec(), actual: self.role })
        }
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: Vec<String>,
    pub price: Money,
    pub offer_price: Option<Money>,
    pub images: Vec<String>,
    pub in_stock: bool,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer pays for one unit: the offer price when there is one, the list price otherwise.
    pub fn unit_price(&self) -> Money {
        self.offer_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Vec<String>,
    pub price: Money,
    #[serde(default)]
    pub offer_price: Option<Money>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub rating: i64,
}

fn default_in_stock() -> bool {
    true
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, category: S, price: Money) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: Vec::new(),
            price,
            offer_price: None,
            images: Vec::new(),
            in_stock: true,
            rating: 0,
        }
    }

    pub fn with_offer_price(mut self, offer_price: Money) -> Self {
        self.offer_price = Some(offer_price);
        self
    }

    pub fn with_description<S: Into<String>>(mut self, line: S) -> Self {
        self.description.push(line.into());
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.name) {
            return Err("Product name cannot be empty".into());
        }
        if !self.price.is_positive() {
            return Err(format!("Product price must be positive, got {}", self.price));
        }
        if let Some(offer) = self.offer_price {
            if !offer.is_positive() || offer > self.price {
                return Err(format!("Offer price {offer} must be positive and no more than the price {}", self.price));
            }
        }
        if !(0..=5).contains(&self.rating) {
            return Err(format!("Rating must be between 0 and 5, got {}", self.rating));
        }
        Ok(())
    }
}

//--------------------------------------        Cart         ---------------------------------------------------------
/// The desired quantity of each product, keyed by product id.
pub type CartItems = BTreeMap<ProductId, i64>;

/// The largest quantity of a single product a cart may hold.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Drops entries with a non-positive quantity.
pub fn normalize_cart_items(items: CartItems) -> CartItems {
    items.into_iter().filter(|(_, qty)| *qty > 0).collect()
}

pub fn check_cart_quantities(items: &CartItems) -> Result<(), String> {
    match items.iter().find(|(_, qty)| **qty > MAX_LINE_QUANTITY) {
        Some((id, qty)) => Err(format!("Quantity {qty} of product {id} exceeds the limit of {MAX_LINE_QUANTITY}")),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub buyer_id: ActorId,
    pub items: CartItems,
    /// Increments on every write.
    pub version: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn empty(buyer_id: ActorId) -> Self {
        Self { buyer_id, items: CartItems::new(), version: 0, updated_at: None }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//--------------------------------------       Address       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub buyer_id: ActorId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Address {
    pub fn snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

impl NewAddress {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        let missing = required.iter().filter(|(_, v)| is_blank(v)).map(|(k, _)| *k).collect::<Vec<_>>();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("Missing address fields: {}", missing.join(", ")))
        }
    }
}

/// A copy of a delivery address, frozen into an order when it is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

impl AddressSnapshot {
    pub fn recipient(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl LineItem {
    pub fn total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "COD")]
    Cod,
}

impl Display for PaymentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Cod => write!(f, "COD"),
        }
    }
}

impl FromStr for PaymentType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(PaymentType::Cod),
            s => Err(ConversionError(format!("Invalid payment type: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatusType {
    #[serde(rename = "Order Placed")]
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!((self, next), (Placed, Shipped) | (Placed, Cancelled) | (Shipped, Delivered) | (Shipped, Cancelled))
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Placed => write!(f, "Order Placed"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Delivered => write!(f, "Delivered"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Order Placed" => Ok(Self::Placed),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: ActorId,
    pub items: Vec<LineItem>,
    pub amount: Money,
    pub address_id: AddressId,
    pub address: AddressSnapshot,
    pub payment_type: PaymentType,
    pub status: OrderStatusType,
    pub is_paid: bool,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order that has been priced but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub buyer_id: ActorId,
    pub items: Vec<LineItem>,
    pub amount: Money,
    pub address_id: AddressId,
    pub address: AddressSnapshot,
    pub payment_type: PaymentType,
    pub idempotency_key: Option<String>,
}
