use crate::{
    db_types::{Money, NewProduct, Product, ProductId},
    sf_api::errors::CatalogApiError,
};

#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// All products, in catalog order (oldest first).
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CatalogApiError>;

    /// Stores a new product. The product has already been validated.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    async fn update_stock(&self, id: ProductId, in_stock: bool) -> Result<Product, CatalogApiError>;

    async fn update_price(
        &self,
        id: ProductId,
        price: Money,
        offer_price: Option<Money>,
    ) -> Result<Product, CatalogApiError>;
}
