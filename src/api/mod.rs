//! API handlers for Biblioteca REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod members;
pub mod openapi;
pub mod reservations;
pub mod stats;
