pub mod health_route;
pub mod label;
pub mod search;
