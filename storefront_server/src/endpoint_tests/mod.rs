mod addresses;
mod auth;
mod mocks;
mod orders;
