pub mod auth;
pub mod broadcast;
pub mod conversation;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod otp;
pub mod product;
pub mod project;
pub mod report;
pub mod staff;
