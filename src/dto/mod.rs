pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod members;
pub mod pos;
pub mod preorders;
pub mod prescriptions;
pub mod products;
pub mod transactions;
