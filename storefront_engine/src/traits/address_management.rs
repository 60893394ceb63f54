use crate::{
    db_types::{ActorId, Address, AddressId, NewAddress},
    sf_api::errors::AddressApiError,
};

#[allow(async_fn_in_trait)]
pub trait AddressManagement {
    async fn insert_address(&self, buyer: &ActorId, address: NewAddress) -> Result<Address, AddressApiError>;

    async fn fetch_addresses(&self, buyer: &ActorId) -> Result<Vec<Address>, AddressApiError>;

    /// Fetches an address only if it belongs to `buyer`.
    async fn fetch_address(&self, buyer: &ActorId, id: AddressId) -> Result<Option<Address>, AddressApiError>;

    /// Deletes one of the buyer's addresses.
    ///
    /// Fails with [`AddressApiError::AddressNotFound`] if the address does not exist or belongs to someone else, and with
    /// [`AddressApiError::AddressInUse`] if any order was delivered to it.
    async fn delete_address(&self, buyer: &ActorId, id: AddressId) -> Result<(), AddressApiError>;
}
