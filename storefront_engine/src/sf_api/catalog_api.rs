use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Money, NewProduct, Product, ProductId},
    sf_api::errors::CatalogApiError,
    traits::CatalogManagement,
};

/// Read access to the product catalog for everyone, and write access for sellers.
///
/// Role checks happen at the edge of the system. By the time a call reaches this API the caller is allowed to make it.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products().await
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogApiError> {
        self.db.fetch_product(id).await?.ok_or(CatalogApiError::ProductNotFound(id))
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        product.validate().map_err(CatalogApiError::InvalidProduct)?;
        let product = self.db.insert_product(product).await?;
        info!("🗃️ Product #{} ({}) added to the catalog", product.id, product.name);
        Ok(product)
    }

    pub async fn set_stock(&self, id: ProductId, in_stock: bool) -> Result<Product, CatalogApiError> {
        let product = self.db.update_stock(id, in_stock).await?;
        debug!("🗃️ Product #{id} is now {}", if in_stock { "in stock" } else { "out of stock" });
        Ok(product)
    }

    /// Changes the list and offer price of a product. Orders that were already placed keep the price they were placed
    /// at.
    pub async fn set_price(
        &self,
        id: ProductId,
        price: Money,
        offer_price: Option<Money>,
    ) -> Result<Product, CatalogApiError> {
        if !price.is_positive() {
            return Err(CatalogApiError::InvalidProduct(format!("Price must be positive, got {price}")));
        }
        if let Some(offer) = offer_price {
            if !offer.is_positive() || offer > price {
                return Err(CatalogApiError::InvalidProduct(format!(
                    "Offer price {offer} must be positive and no more than the price {price}"
                )));
            }
        }
        let product = self.db.update_price(id, price, offer_price).await?;
        debug!("🗃️ Product #{id} repriced to {price} (offer: {offer_price:?})");
        Ok(product)
    }
}
