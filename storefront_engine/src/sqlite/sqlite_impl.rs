//! `SqliteDatabase` is the concrete storefront backend.
//!
//! It implements every trait in [`crate::traits`]. Each trait method takes a connection from the pool, or opens a
//! transaction when it needs to read and then write, and delegates to the functions in [`super::db`]. Dropping a
//! transaction without committing rolls it back, so an early `?` return never leaves a partial write behind.
use std::{fmt::Debug, time::Duration};

use log::*;
use sqlx::{migrate, SqlitePool};

use super::{
    db::{addresses, carts, new_pool, orders, products},
    errors::SqliteDatabaseError,
};
use crate::{
    db_types::{
        ActorId,
        Address,
        AddressId,
        Cart,
        CartItems,
        Money,
        NewAddress,
        NewProduct,
        Order,
        OrderId,
        OrderStatusType,
        Product,
        ProductId,
    },
    order_objects::{new_cod_order, CodOrderRequest},
    sf_api::errors::{AddressApiError, CartApiError, CatalogApiError, OrderFlowError},
    traits::{AddressManagement, CartManagement, CatalogManagement, OrderManagement, PlaceOrderResult},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32, timeout: Duration) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections, timeout).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Already-applied migrations are skipped.
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_products(&mut conn).await?)
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_product(id, &mut conn).await?)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::insert_product(product, &mut conn).await?)
    }

    async fn update_stock(&self, id: ProductId, in_stock: bool) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_stock(id, in_stock, &mut conn).await?.ok_or(CatalogApiError::ProductNotFound(id))
    }

    async fn update_price(
        &self,
        id: ProductId,
        price: Money,
        offer_price: Option<Money>,
    ) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_price(id, price, offer_price, &mut conn).await?.ok_or(CatalogApiError::ProductNotFound(id))
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_cart(&self, buyer: &ActorId) -> Result<Cart, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(carts::fetch_cart(buyer, &mut conn).await?)
    }

    async fn replace_cart(&self, buyer: &ActorId, items: CartItems) -> Result<Cart, CartApiError> {
        let mut tx = self.pool.begin().await?;
        carts::ensure_cart(buyer, &mut tx).await?;
        let ids = items.keys().copied().collect::<Vec<_>>();
        let known = products::fetch_products_by_ids(&ids, &mut tx).await?;
        if let Some(missing) = ids.iter().find(|id| !known.contains_key(id)) {
            debug!("🗃️ Rejecting cart update for {buyer}: product {missing} does not exist");
            return Err(CartApiError::ProductNotFound(*missing));
        }
        let current = carts::fetch_cart(buyer, &mut tx).await?;
        carts::replace_items(buyer, &items, &mut tx).await?;
        if !carts::bump_version(buyer, current.version, &mut tx).await? {
            return Err(CartApiError::DatabaseError(format!("The cart of {buyer} changed inside its own transaction")));
        }
        let cart = carts::fetch_cart(buyer, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }
}

impl AddressManagement for SqliteDatabase {
    async fn insert_address(&self, buyer: &ActorId, address: NewAddress) -> Result<Address, AddressApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(addresses::insert_address(buyer, address, &mut conn).await?)
    }

    async fn fetch_addresses(&self, buyer: &ActorId) -> Result<Vec<Address>, AddressApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(addresses::fetch_addresses_for_buyer(buyer, &mut conn).await?)
    }

    async fn fetch_address(&self, buyer: &ActorId, id: AddressId) -> Result<Option<Address>, AddressApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(addresses::fetch_address(buyer, id, &mut conn).await?)
    }

    async fn delete_address(&self, buyer: &ActorId, id: AddressId) -> Result<(), AddressApiError> {
        let mut tx = self.pool.begin().await?;
        if addresses::fetch_address(buyer, id, &mut tx).await?.is_none() {
            return Err(AddressApiError::AddressNotFound(id));
        }
        if addresses::order_count_for_address(id, &mut tx).await? > 0 {
            return Err(AddressApiError::AddressInUse(id));
        }
        addresses::delete_address(id, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn place_cod_order(
        &self,
        buyer: &ActorId,
        request: CodOrderRequest,
    ) -> Result<PlaceOrderResult, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        carts::ensure_cart(buyer, &mut tx).await?;
        if let Some(key) = request.idempotency_key.as_deref() {
            if let Some(order) = orders::fetch_order_by_idempotency_key(buyer, key, &mut tx).await? {
                tx.rollback().await?;
                return Ok(PlaceOrderResult::AlreadyPlaced(order));
            }
        }
        let cart = carts::fetch_cart(buyer, &mut tx).await?;
        if cart.is_empty() {
            return Err(OrderFlowError::EmptyCart);
        }
        let address = addresses::fetch_address(buyer, request.address_id, &mut tx)
            .await?
            .ok_or(OrderFlowError::AddressNotFound(request.address_id))?;
        let ids = cart.items.keys().copied().collect::<Vec<_>>();
        let catalog = products::fetch_products_by_ids(&ids, &mut tx).await?;
        let new_order = new_cod_order(buyer, &cart.items, &catalog, &address, request.idempotency_key)?;
        let order = orders::insert_order(new_order, &mut tx).await?;
        carts::clear_items(buyer, &mut tx).await?;
        if !carts::bump_version(buyer, cart.version, &mut tx).await? {
            warn!("🗃️ The cart of {buyer} changed during checkout. Rolling back order #{}", order.id);
            return Err(OrderFlowError::CartChanged);
        }
        tx.commit().await?;
        Ok(PlaceOrderResult::Placed(order))
    }

    async fn fetch_orders_for_buyer(&self, buyer: &ActorId) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_buyer(buyer, &mut conn).await?)
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_all_orders(&mut conn).await?)
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(id, &mut conn).await?)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatusType,
    ) -> Result<(Order, Order), OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let old = orders::fetch_order(id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        if !old.status.can_transition_to(status) {
            return Err(OrderFlowError::InvalidStatusTransition { from: old.status, to: status });
        }
        // Cash is collected on delivery.
        let is_paid = old.is_paid || status == OrderStatusType::Delivered;
        let new = orders::update_status(id, status, is_paid, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        tx.commit().await?;
        Ok((old, new))
    }
}

