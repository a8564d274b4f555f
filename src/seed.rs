use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Branch, Member, MembershipType, PaymentMethod, PreOrder, PreOrderItem, PreOrderPriority,
    PreOrderStatus, Prescription, PrescriptionMedication, PrescriptionStatus, Product,
    PurchaseRecord, Role, StockTransfer, Transaction, TransactionItem, TransactionStatus,
    TransferItem, TransferStatus, UserAccount,
};
use crate::store::{Tables, document_code};

/// The entire working data set. Built once at startup; every screen's
/// mutations edit these rows in place until the process exits.
pub fn fixtures() -> anyhow::Result<Tables> {
    let mut tables = Tables::default();

    tables.users = vec![
        staff("Sarah Mitchell", "admin@pharmacy.com", "admin123", Role::SuperAdmin)?,
        staff(
            "Budi Hartono",
            "pharmacist@pharmacy.com",
            "pharmacist123",
            Role::Pharmacist,
        )?,
        staff("Dewi Lestari", "cashier@pharmacy.com", "cashier123", Role::Cashier)?,
    ];

    tables.products = vec![
        product("PC-0001", "Paracetamol 500mg", "Analgesic", "strip", 1_200, 800, 240, 50, 500, 420, false),
        product("PC-0002", "Ibuprofen 400mg", "Analgesic", "strip", 1_500, 950, 35, 40, 300, 300, false),
        product("PC-0003", "Amoxicillin 500mg", "Antibiotic", "strip", 2_800, 1_900, 120, 30, 250, 540, true),
        product("PC-0004", "Cetirizine 10mg", "Allergy", "strip", 1_800, 1_100, 80, 25, 200, 365, false),
        product("PC-0005", "Vitamin C 1000mg", "Vitamins & Supplements", "bottle", 5_500, 3_600, 150, 20, 200, 600, false),
        product("PC-0006", "Cough Syrup 60ml", "Cold & Flu", "bottle", 3_200, 2_000, 18, 20, 150, 45, false),
        product("PC-0007", "Metformin 500mg", "Diabetes", "strip", 2_100, 1_400, 95, 30, 250, 480, true),
        product("PC-0008", "Amlodipine 5mg", "Hypertension", "strip", 2_400, 1_500, 60, 25, 200, 20, true),
        product("PC-0009", "Antacid Suspension 120ml", "Digestive", "bottle", 2_700, 1_700, 45, 15, 120, 75, false),
        product("PC-0010", "Salbutamol Inhaler", "Respiratory", "unit", 9_800, 6_500, 22, 10, 80, 270, true),
        product("PC-0011", "Povidone Iodine 60ml", "First Aid", "bottle", 2_000, 1_200, 70, 15, 100, 700, false),
        product("PC-0012", "Insulin Glargine", "Diabetes", "vial", 28_500, 21_000, 8, 10, 60, 150, true),
    ];

    tables.members = vec![
        member(
            "Rina Kusuma",
            "0812-5501-2234",
            Some("rina.kusuma@mail.com"),
            MembershipType::Gold,
            &["Penicillin"],
            &["Hypertension"],
            &[("Amlodipine 5mg x2", 4_800, 32), ("Paracetamol 500mg x1", 1_200, 11)],
        ),
        member(
            "Agus Wibowo",
            "0813-7788-9901",
            Some("agus.w@mail.com"),
            MembershipType::Silver,
            &[],
            &["Type 2 Diabetes"],
            &[("Metformin 500mg x3", 6_300, 18)],
        ),
        member(
            "Maya Putri",
            "0811-2233-4455",
            None,
            MembershipType::Regular,
            &["Sulfa drugs", "Aspirin"],
            &["Asthma"],
            &[("Salbutamol Inhaler x1", 9_800, 25)],
        ),
        member(
            "Hendra Gunawan",
            "0815-6677-1122",
            Some("hendra.g@mail.com"),
            MembershipType::Regular,
            &[],
            &[],
            &[],
        ),
    ];

    let cashier = &tables.users[2];
    let pharmacist = &tables.users[1];

    tables.transactions = vec![
        sale(
            cashier,
            Some(tables.members[0].id),
            &[(&tables.products[0], 2), (&tables.products[4], 1)],
            PaymentMethod::Cash,
            10_000,
            0,
        ),
        sale(
            cashier,
            None,
            &[(&tables.products[5], 1)],
            PaymentMethod::Qris,
            3_552,
            0,
        ),
        sale(
            pharmacist,
            Some(tables.members[1].id),
            &[(&tables.products[6], 3)],
            PaymentMethod::Debit,
            6_993,
            26,
        ),
    ];

    tables.prescriptions = vec![
        prescription(
            "RX-20260815-0001",
            "Rina Kusuma",
            Some(tables.members[0].id),
            "dr. Santoso",
            &[("Amlodipine 5mg", "1x daily", 30, "Take in the morning")],
            PrescriptionStatus::Dispensed,
            Some("Budi Hartono"),
            6,
        ),
        prescription(
            "RX-20260819-0002",
            "Agus Wibowo",
            Some(tables.members[1].id),
            "dr. Pratiwi",
            &[
                ("Metformin 500mg", "2x daily", 60, "With meals"),
                ("Insulin Glargine", "10 units at night", 1, "Subcutaneous injection"),
            ],
            PrescriptionStatus::Approved,
            Some("Budi Hartono"),
            2,
        ),
        prescription(
            "RX-20260821-0003",
            "Tono Prasetyo",
            None,
            "dr. Santoso",
            &[("Amoxicillin 500mg", "3x daily", 15, "Finish the full course")],
            PrescriptionStatus::PendingReview,
            None,
            0,
        ),
    ];

    tables.preorders = vec![
        preorder(
            "Maya Putri",
            Some(tables.members[2].id),
            "0811-2233-4455",
            &[(&tables.products[9], 2)],
            7,
            PreOrderPriority::High,
            PreOrderStatus::Confirmed,
            Some("Waiting for restock"),
        ),
        preorder(
            "Hendra Gunawan",
            Some(tables.members[3].id),
            "0815-6677-1122",
            &[(&tables.products[4], 3), (&tables.products[10], 1)],
            2,
            PreOrderPriority::Normal,
            PreOrderStatus::Ready,
            None,
        ),
        preorder(
            "Siti Aminah",
            None,
            "0812-9911-0088",
            &[(&tables.products[11], 1)],
            14,
            PreOrderPriority::Urgent,
            PreOrderStatus::Pending,
            Some("Cold-chain item, call before pickup"),
        ),
    ];

    tables.branches = vec![
        branch("BR-001", "PharmaCare Central", "Jl. Sudirman No. 12", "021-555-0101", "Sarah Mitchell", 4_250_000, 95_000_000, 7),
        branch("BR-002", "PharmaCare Westside", "Jl. Kebon Jeruk No. 88", "021-555-0202", "Rudi Hermawan", 2_780_000, 60_000_000, 12),
        branch("BR-003", "PharmaCare Harbor", "Jl. Pelabuhan Raya No. 3", "021-555-0303", "Lia Anggraini", 1_940_000, 45_000_000, 4),
    ];

    tables.transfers = vec![
        transfer(
            &tables.branches[0],
            &tables.branches[1],
            &[(&tables.products[0], 50), (&tables.products[3], 20)],
            "Sarah Mitchell",
            TransferStatus::InTransit,
            Some("Weekly rebalance"),
        ),
        transfer(
            &tables.branches[2],
            &tables.branches[0],
            &[(&tables.products[11], 4)],
            "Lia Anggraini",
            TransferStatus::Pending,
            None,
        ),
    ];

    Ok(tables)
}

fn staff(name: &str, email: &str, password: &str, role: Role) -> anyhow::Result<UserAccount> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    Ok(UserAccount {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
        role,
        created_at: Utc::now(),
    })
}

#[allow(clippy::too_many_arguments)]
fn product(
    sku: &str,
    name: &str,
    category: &str,
    unit: &str,
    price: i64,
    cost: i64,
    stock: i32,
    min_stock: i32,
    max_stock: i32,
    days_to_expiry: i64,
    prescription_required: bool,
) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        unit: unit.to_string(),
        price,
        cost,
        stock,
        min_stock,
        max_stock,
        expiry_date: now.date_naive() + Duration::days(days_to_expiry),
        prescription_required,
        created_at: now,
        updated_at: now,
    }
}

fn member(
    name: &str,
    phone: &str,
    email: Option<&str>,
    membership_type: MembershipType,
    allergies: &[&str],
    conditions: &[&str],
    history: &[(&str, i64, i64)],
) -> Member {
    Member {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.map(str::to_string),
        membership_type,
        allergies: allergies.iter().map(|s| s.to_string()).collect(),
        medical_conditions: conditions.iter().map(|s| s.to_string()).collect(),
        purchase_history: history
            .iter()
            .map(|(description, total, days_ago)| PurchaseRecord {
                date: past_date(*days_ago),
                description: description.to_string(),
                total: *total,
            })
            .collect(),
        created_at: Utc::now(),
    }
}

fn sale(
    cashier: &UserAccount,
    member_id: Option<Uuid>,
    lines: &[(&Product, i32)],
    payment_method: PaymentMethod,
    amount_paid: i64,
    minutes_ago: i64,
) -> Transaction {
    let items: Vec<TransactionItem> = lines
        .iter()
        .map(|(p, quantity)| TransactionItem {
            product_id: p.id,
            name: p.name.clone(),
            unit_price: p.price,
            quantity: *quantity,
            line_total: p.price * i64::from(*quantity),
        })
        .collect();
    let subtotal: i64 = items.iter().map(|i| i.line_total).sum();
    let tax = crate::services::pos_service::tax_on(subtotal);
    let total = subtotal + tax;
    let id = Uuid::new_v4();

    Transaction {
        id,
        receipt_number: document_code("RCP", id),
        items,
        member_id,
        cashier_id: cashier.id,
        cashier_name: cashier.name.clone(),
        subtotal,
        tax,
        total,
        payment_method,
        amount_paid,
        change_due: (amount_paid - total).max(0),
        status: TransactionStatus::Completed,
        note: None,
        voided_by: None,
        voided_at: None,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[allow(clippy::too_many_arguments)]
fn prescription(
    rx_number: &str,
    patient_name: &str,
    member_id: Option<Uuid>,
    doctor_name: &str,
    medications: &[(&str, &str, i32, &str)],
    status: PrescriptionStatus,
    reviewed_by: Option<&str>,
    days_ago: i64,
) -> Prescription {
    let created = Utc::now() - Duration::days(days_ago);
    Prescription {
        id: Uuid::new_v4(),
        rx_number: rx_number.to_string(),
        patient_name: patient_name.to_string(),
        member_id,
        doctor_name: doctor_name.to_string(),
        medications: medications
            .iter()
            .map(|(name, dosage, quantity, instructions)| PrescriptionMedication {
                name: name.to_string(),
                dosage: dosage.to_string(),
                quantity: *quantity,
                instructions: instructions.to_string(),
            })
            .collect(),
        status,
        reviewed_by: reviewed_by.map(str::to_string),
        reviewed_at: reviewed_by.map(|_| created + Duration::hours(2)),
        notes: None,
        created_at: created,
        updated_at: created,
    }
}

#[allow(clippy::too_many_arguments)]
fn preorder(
    customer_name: &str,
    member_id: Option<Uuid>,
    phone: &str,
    lines: &[(&Product, i32)],
    days_to_pickup: i64,
    priority: PreOrderPriority,
    status: PreOrderStatus,
    notes: Option<&str>,
) -> PreOrder {
    let now = Utc::now();
    let id = Uuid::new_v4();
    PreOrder {
        id,
        code: document_code("PO", id),
        customer_name: customer_name.to_string(),
        member_id,
        phone: phone.to_string(),
        items: lines
            .iter()
            .map(|(p, quantity)| PreOrderItem {
                product_id: p.id,
                name: p.name.clone(),
                quantity: *quantity,
            })
            .collect(),
        pickup_date: now.date_naive() + Duration::days(days_to_pickup),
        priority,
        status,
        notes: notes.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

#[allow(clippy::too_many_arguments)]
fn branch(
    code: &str,
    name: &str,
    address: &str,
    phone: &str,
    manager: &str,
    daily_sales: i64,
    monthly_target: i64,
    low_stock_items: i32,
) -> Branch {
    Branch {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        manager: manager.to_string(),
        daily_sales,
        monthly_target,
        low_stock_items,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn transfer(
    from: &Branch,
    to: &Branch,
    lines: &[(&Product, i32)],
    requested_by: &str,
    status: TransferStatus,
    notes: Option<&str>,
) -> StockTransfer {
    let now = Utc::now();
    let id = Uuid::new_v4();
    StockTransfer {
        id,
        code: document_code("TRF", id),
        from_branch_id: from.id,
        to_branch_id: to.id,
        items: lines
            .iter()
            .map(|(p, quantity)| TransferItem {
                product_id: p.id,
                name: p.name.clone(),
                quantity: *quantity,
            })
            .collect(),
        status,
        requested_by: requested_by.to_string(),
        notes: notes.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

fn past_date(days_ago: i64) -> NaiveDate {
    (Utc::now() - Duration::days(days_ago)).date_naive()
}
