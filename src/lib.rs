//! Core logic of the Junimo Store: catalog, users and orders persisted in a
//! local key-value store, the stock-aware cart, checkout, authentication,
//! registration and the admin back office.
//!
//! Every collection is owned by a [`ResourceActor`](actor_framework::ResourceActor)
//! and reached through a typed client. [`app_system::StoreSystem`] wires them
//! together.

pub mod actor_framework;
// `client_method!` is used by `cart`
#[macro_use]
pub mod clients;

pub mod admin;
pub mod app_system;
pub mod auth;
pub mod cart;
pub mod domain;
pub mod messages;
pub mod order_actor;
pub mod product_actor;
pub mod profile;
pub mod registration;
pub mod report;
pub mod seed;
pub mod signals;
pub mod store;
pub mod user_actor;
pub mod validation;

#[cfg(test)]
mod mock_framework;
