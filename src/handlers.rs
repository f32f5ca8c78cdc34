// src/handlers.rs

pub mod auth;
pub mod broadcasts;
pub mod client;
pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod messaging;
pub mod products;
pub mod projects;
pub mod reports;
pub mod staff;
pub mod uploads;
