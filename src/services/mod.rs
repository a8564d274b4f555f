pub mod auth_service;
pub mod branch_service;
pub mod dashboard_service;
pub mod member_service;
pub mod pos_service;
pub mod preorder_service;
pub mod prescription_service;
pub mod product_service;
pub mod transaction_service;
