//! Request handler definitions
//!
//! Define each route and its handler here. Handlers are thin: they pull the caller's identity out of the claims, hand
//! the request to the matching engine API and turn the result into JSON. Anything more involved belongs in the engine.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every database call in this module is async for that reason.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    db_types::{AddressId, NewProduct, ProductId, Role},
    order_objects::CodOrderRequest,
    traits::{AddressManagement, CartManagement, CatalogManagement, OrderManagement},
    AddressApi,
    CartApi,
    CatalogApi,
    OrderFlowApi,
};

use crate::{
    auth::JwtClaims,
    data_objects::{AddAddressRequest, JsonResponse, PriceUpdate, StatusUpdate, StockUpdate, UpdateCartRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(check_token => Get "/auth/check" requires [Role::Buyer, Role::Seller]);
/// Returns the identity carried by the caller's access token. Clients use this to find out whether their cookie is
/// still good and which role it grants.
pub async fn check_token(claims: JwtClaims) -> HttpResponse {
    debug!("💻️ GET check_token for {}", claims.sub);
    HttpResponse::Ok().json(claims.actor())
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(product_list => Get "/product/list" impl CatalogManagement);
pub async fn product_list<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET product list");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/product/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductId::from(path.into_inner());
    trace!("💻️ GET product #{id}");
    let product = api.product(id).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(add_product => Post "/product/add" impl CatalogManagement where requires [Role::Seller]);
pub async fn add_product<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST add_product from {}", claims.sub);
    let product = api.add_product(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_stock => Post "/product/stock" impl CatalogManagement where requires [Role::Seller]);
pub async fn update_stock<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<StockUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let StockUpdate { id, in_stock } = body.into_inner();
    debug!("💻️ POST update_stock for #{id} from {}", claims.sub);
    let product = api.set_stock(id, in_stock).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_price => Post "/product/price" impl CatalogManagement where requires [Role::Seller]);
/// Reprices a product. Orders that have already been placed keep the prices they were placed at.
pub async fn update_price<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<PriceUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let PriceUpdate { id, price, offer_price } = body.into_inner();
    debug!("💻️ POST update_price for #{id} from {}", claims.sub);
    let product = api.set_price(id, price, offer_price).await?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(my_cart => Get "/cart" impl CartManagement where requires [Role::Buyer]);
pub async fn my_cart<B: CartManagement>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_cart for {}", claims.sub);
    let cart = api.cart(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(update_cart => Post "/cart/update" impl CartManagement where requires [Role::Buyer]);
/// Replaces the caller's cart with the one in the request body. This is not a merge: products missing from
/// `cartItems` are removed from the cart.
pub async fn update_cart<B: CartManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST update_cart for {}", claims.sub);
    let cart = api.update_cart(&claims.sub, body.into_inner().cart_items).await?;
    Ok(HttpResponse::Ok().json(cart))
}

//----------------------------------------------   Addresses  ----------------------------------------------------
route!(add_address => Post "/address/add" impl AddressManagement where requires [Role::Buyer]);
pub async fn add_address<B: AddressManagement>(
    claims: JwtClaims,
    body: web::Json<AddAddressRequest>,
    api: web::Data<AddressApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST add_address for {}", claims.sub);
    let address = api.add_address(&claims.sub, body.into_inner().address).await?;
    Ok(HttpResponse::Ok().json(address))
}

route!(my_addresses => Get "/address/get" impl AddressManagement where requires [Role::Buyer]);
pub async fn my_addresses<B: AddressManagement>(
    claims: JwtClaims,
    api: web::Data<AddressApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_addresses for {}", claims.sub);
    let addresses = api.addresses(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(addresses))
}

route!(delete_address => Delete "/address/{id}" impl AddressManagement where requires [Role::Buyer]);
/// Removes an address from the caller's address book. Addresses that are referenced by an order cannot be removed.
pub async fn delete_address<B: AddressManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<AddressApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = AddressId::from(path.into_inner());
    debug!("💻️ DELETE address #{id} for {}", claims.sub);
    api.delete_address(&claims.sub, id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Address {id} deleted"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(place_cod_order => Post "/order/cod" impl OrderManagement where requires [Role::Buyer]);
/// Places a cash-on-delivery order for everything in the caller's cart, and empties the cart.
///
/// Clients that may retry should send an `idempotencyKey`. A retry with the same key returns the original order
/// instead of failing on the now empty cart.
pub async fn place_cod_order<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<CodOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST place_cod_order for {}", claims.sub);
    let order = api.place_order_cod(&claims.sub, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(my_orders => Get "/order/user" impl OrderManagement where requires [Role::Buyer]);
pub async fn my_orders<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for {}", claims.sub);
    let orders = api.orders_for_buyer(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/order/seller" impl OrderManagement where requires [Role::Seller]);
pub async fn all_orders<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all_orders for {}", claims.sub);
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_order_status => Post "/order/status" impl OrderManagement where requires [Role::Seller]);
pub async fn update_order_status<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<StatusUpdate>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let StatusUpdate { order_id, status } = body.into_inner();
    info!("💻️ {} is moving order #{order_id} to {status}", claims.sub);
    let order = api.update_order_status(order_id, status).await?;
    Ok(HttpResponse::Ok().json(order))
}
