pub mod delivery;
pub mod proxy_service;
pub mod store;
