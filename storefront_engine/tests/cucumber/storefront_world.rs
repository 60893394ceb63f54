use std::{collections::HashMap, fmt::Debug};

use cucumber::World;
use storefront_engine::db_types::{ActorId, AddressId, Order, ProductId};

use crate::support::Storefront;

#[derive(Default, Debug, World)]
pub struct StorefrontWorld {
    pub system: Option<StorefrontSystem>,
    pub products: HashMap<String, ProductId>,
    pub addresses: HashMap<String, AddressId>,
    pub last_order: Option<Order>,
    pub last_error: Option<String>,
}

pub struct StorefrontSystem {
    pub store: Storefront,
}

impl Debug for StorefrontSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorefrontSystem ({})", self.store.url)
    }
}

impl StorefrontWorld {
    pub fn store(&self) -> &Storefront {
        &self.system.as_ref().expect("Storefront not initialised").store
    }

    pub fn product(&self, name: &str) -> ProductId {
        *self.products.get(name).unwrap_or_else(|| panic!("Unknown product {name}"))
    }

    pub fn address(&self, buyer: &ActorId) -> AddressId {
        *self.addresses.get(buyer.as_str()).unwrap_or_else(|| panic!("{buyer} has no address"))
    }

    pub fn last_order(&self) -> &Order {
        self.last_order.as_ref().unwrap_or_else(|| panic!("No order was placed. Last error: {:?}", self.last_error))
    }
}
