use mockall::mock;
use storefront_engine::{
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
    order_objects::CodOrderRequest,
    traits::{AddressManagement, CartManagement, CatalogManagement, OrderManagement, PlaceOrderResult},
    AddressApiError,
    CartApiError,
    CatalogApiError,
    OrderFlowError,
};

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CatalogApiError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn update_stock(&self, id: ProductId, in_stock: bool) -> Result<Product, CatalogApiError>;
        async fn update_price(&self, id: ProductId, price: Money, offer_price: Option<Money>) -> Result<Product, CatalogApiError>;
    }
}

mock! {
    pub CartManager {}
    impl CartManagement for CartManager {
        async fn fetch_cart(&self, buyer: &ActorId) -> Result<Cart, CartApiError>;
        async fn replace_cart(&self, buyer: &ActorId, items: CartItems) -> Result<Cart, CartApiError>;
    }
}

mock! {
    pub AddressManager {}
    impl AddressManagement for AddressManager {
        async fn insert_address(&self, buyer: &ActorId, address: NewAddress) -> Result<Address, AddressApiError>;
        async fn fetch_addresses(&self, buyer: &ActorId) -> Result<Vec<Address>, AddressApiError>;
        async fn fetch_address(&self, buyer: &ActorId, id: AddressId) -> Result<Option<Address>, AddressApiError>;
        async fn delete_address(&self, buyer: &ActorId, id: AddressId) -> Result<(), AddressApiError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn place_cod_order(&self, buyer: &ActorId, request: CodOrderRequest) -> Result<PlaceOrderResult, OrderFlowError>;
        async fn fetch_orders_for_buyer(&self, buyer: &ActorId) -> Result<Vec<Order>, OrderFlowError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError>;
        async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError>;
        async fn update_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<(Order, Order), OrderFlowError>;
    }
}
