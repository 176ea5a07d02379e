pub mod roles;
pub mod store;
