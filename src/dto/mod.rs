pub mod admin;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod news;
pub mod orders;
pub mod products;
pub mod uploads;
