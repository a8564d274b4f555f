use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, SessionUser},
        branches::{BranchList, CreateTransferRequest, TransferList, UpdateBranchRequest},
        dashboard::DashboardSummary,
        members::{CreateMemberRequest, MemberList, PurchaseHistory, UpdateMemberRequest},
        pos::CheckoutRequest,
        preorders::{CreatePreOrderRequest, PreOrderList},
        prescriptions::{CreatePrescriptionRequest, PrescriptionList},
        products::{CreateProductRequest, ProductList, StockAdjustmentRequest},
        transactions::{TransactionList, TransactionStats},
    },
    models::{
        AuditEntry, Branch, Member, PreOrder, Prescription, Product, StockTransfer, Transaction,
        UserAccount,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, branches, dashboard, health, members, params, pos, preorders, prescriptions,
        products, transactions,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        auth::logout,
        products::list_products,
        products::list_low_stock,
        products::list_expiring,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::adjust_stock,
        members::list_members,
        members::search_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        members::purchase_history,
        pos::checkout,
        transactions::list_transactions,
        transactions::transaction_stats,
        transactions::get_transaction,
        transactions::void_transaction,
        prescriptions::list_prescriptions,
        prescriptions::get_prescription,
        prescriptions::create_prescription,
        prescriptions::update_prescription_status,
        preorders::list_preorders,
        preorders::get_preorder,
        preorders::create_preorder,
        preorders::update_preorder_status,
        preorders::delete_preorder,
        branches::list_branches,
        branches::get_branch,
        branches::update_branch,
        branches::list_transfers,
        branches::get_transfer,
        branches::create_transfer,
        branches::update_transfer_status,
        dashboard::summary,
        admin::list_audit
    ),
    components(
        schemas(
            UserAccount,
            Product,
            Member,
            Transaction,
            Prescription,
            PreOrder,
            Branch,
            StockTransfer,
            AuditEntry,
            LoginRequest,
            LoginResponse,
            SessionUser,
            CreateProductRequest,
            StockAdjustmentRequest,
            ProductList,
            CreateMemberRequest,
            UpdateMemberRequest,
            MemberList,
            PurchaseHistory,
            CheckoutRequest,
            TransactionList,
            TransactionStats,
            CreatePrescriptionRequest,
            PrescriptionList,
            CreatePreOrderRequest,
            PreOrderList,
            UpdateBranchRequest,
            CreateTransferRequest,
            BranchList,
            TransferList,
            DashboardSummary,
            admin::AuditList,
            params::Pagination,
            params::ProductQuery,
            params::TransactionQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Transaction>,
            ApiResponse<TransactionList>,
            ApiResponse<MemberList>,
            ApiResponse<DashboardSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product and inventory endpoints"),
        (name = "Members", description = "Membership endpoints"),
        (name = "POS", description = "Point of sale endpoints"),
        (name = "Transactions", description = "Sales history endpoints"),
        (name = "Prescriptions", description = "Prescription review endpoints"),
        (name = "PreOrders", description = "Pre-order endpoints"),
        (name = "Branches", description = "Branch and stock transfer endpoints"),
        (name = "Dashboard", description = "Overview statistics"),
        (name = "Admin", description = "Administrative endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
