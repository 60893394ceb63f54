use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{ActorId, Address, AddressId, NewAddress},
    sf_api::errors::AddressApiError,
    traits::AddressManagement,
};

pub struct AddressApi<B> {
    db: B,
}

impl<B> Debug for AddressApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AddressApi")
    }
}

impl<B> AddressApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AddressApi<B>
where B: AddressManagement
{
    pub async fn add_address(&self, buyer: &ActorId, address: NewAddress) -> Result<Address, AddressApiError> {
        address.validate().map_err(AddressApiError::InvalidAddress)?;
        let address = self.db.insert_address(buyer, address).await?;
        debug!("🏠️ Address #{} saved for {buyer}", address.id);
        Ok(address)
    }

    pub async fn addresses(&self, buyer: &ActorId) -> Result<Vec<Address>, AddressApiError> {
        self.db.fetch_addresses(buyer).await
    }

    pub async fn address(&self, buyer: &ActorId, id: AddressId) -> Result<Address, AddressApiError> {
        self.db.fetch_address(buyer, id).await?.ok_or(AddressApiError::AddressNotFound(id))
    }

    pub async fn delete_address(&self, buyer: &ActorId, id: AddressId) -> Result<(), AddressApiError> {
        self.db.delete_address(buyer, id).await?;
        debug!("🏠️ Address #{id} deleted by {buyer}");
        Ok(())
    }
}
