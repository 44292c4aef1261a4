//! Request authentication

pub mod admin_key;

pub use admin_key::admin_auth_middleware;
