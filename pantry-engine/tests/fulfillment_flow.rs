//! End-to-end flow over the redb-backed store: intake, cart pre-check,
//! submission, fulfillment, cooldown, analytics.

use pantry_engine::eligibility::{self, Denial};
use pantry_engine::orders::{OrderError, OrderLifecycle, OrderLineInput};
use pantry_engine::repository::{
    InventoryRepository, LedgerRepository, OrderRepository, TransactionLog,
};
use pantry_engine::{Config, Intake, PantryStorage, analytics};
use shared::models::{ItemCreate, OrderStatus, TransactionKind, Unit};

const MINUTE_MS: i64 = 60 * 1000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("pantry_engine=debug")
        .try_init();
}

fn open_storage(dir: &tempfile::TempDir) -> PantryStorage {
    PantryStorage::open(dir.path().join("pantry.redb")).unwrap()
}

fn line(item_id: &str, name: &str, quantity: f64) -> OrderLineInput {
    OrderLineInput {
        item_id: item_id.into(),
        item_name: name.into(),
        quantity,
    }
}

#[test]
fn full_checkout_flow() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let storage = open_storage(&dir);

    // Staff intake: one weighed item with a 30-minute cooldown, one counted
    let intake = Intake::new(&storage, "admin");
    let rice = intake
        .add_item(
            ItemCreate {
                name: "Rice".into(),
                category: "grains".into(),
                quantity: 50.0,
                student_limit: 1.0,
                limit_duration_days: 0,
                limit_duration_minutes: 30,
                unit: Some(Unit::Kg),
                is_weighed: Some(true),
                barcode: Some("0001".into()),
            },
            0,
        )
        .unwrap();
    let beans = intake
        .add_item(
            ItemCreate {
                name: "Beans".into(),
                category: "essentials".into(),
                quantity: 30.0,
                student_limit: 2.0,
                limit_duration_days: 7,
                limit_duration_minutes: 0,
                unit: None,
                is_weighed: None,
                barcode: None,
            },
            0,
        )
        .unwrap();

    // Barcode lookup resolves the weighed item
    assert_eq!(storage.find_by_barcode("0001").unwrap().unwrap().id, rice.id);

    // Cart pre-check passes for a within-limits cart
    let cart = vec![(rice.id.clone(), 1.0), (beans.id.clone(), 2.0)];
    let denials = eligibility::precheck_cart(&storage, "student1", &cart, MINUTE_MS).unwrap();
    assert!(denials.is_empty());

    // Submission creates a pending order with no stock effect
    let lifecycle = OrderLifecycle::with_window(&storage, 30);
    let order = lifecycle
        .create_order(
            "student1",
            vec![
                line(&rice.id, "Rice", 1.0),
                line(&beans.id, "Beans", 2.0),
            ],
            MINUTE_MS,
        )
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(storage.get_item(&rice.id).unwrap().unwrap().quantity, 50.0);

    // Staff fulfillment decrements stock and writes ledger + audit records
    let fulfill_at = 5 * MINUTE_MS;
    let fulfilled = lifecycle.fulfill_order(&order.id, fulfill_at).unwrap();
    assert_eq!(fulfilled.status, OrderStatus::Fulfilled);
    assert_eq!(fulfilled.fulfilled_at, Some(fulfill_at));
    assert_eq!(storage.get_item(&rice.id).unwrap().unwrap().quantity, 49.0);
    assert_eq!(storage.get_item(&beans.id).unwrap().unwrap().quantity, 28.0);

    let ledger = storage.checkouts_for("student1", &rice.id).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].timestamp, fulfill_at);

    let outbound: Vec<_> = storage
        .all_transactions()
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TransactionKind::Out)
        .collect();
    assert_eq!(outbound.len(), 2);

    // Cooldown now blocks the rice for this student, reporting remaining time
    let item = storage.get_item(&rice.id).unwrap();
    let ledger = storage.checkouts_for("student1", &rice.id).unwrap();
    let err = eligibility::check_eligibility(
        "student1",
        &rice.id,
        1.0,
        item.as_ref(),
        &ledger,
        fulfill_at + 10 * MINUTE_MS,
    )
    .unwrap_err();
    assert_eq!(err, Denial::CooldownActive { remaining_minutes: 20 });

    // ...but not for another student
    let other_ledger = storage.checkouts_for("student2", &rice.id).unwrap();
    assert!(
        eligibility::check_eligibility(
            "student2",
            &rice.id,
            1.0,
            item.as_ref(),
            &other_ledger,
            fulfill_at + 10 * MINUTE_MS,
        )
        .is_ok()
    );

    // A second submission inside the window is rate limited
    let err = lifecycle
        .create_order("student1", vec![line(&beans.id, "Beans", 1.0)], 11 * MINUTE_MS)
        .unwrap_err();
    assert!(matches!(err, OrderError::RateLimited { remaining_minutes: 20 }));

    // Analytics reflect the movements
    let stats = analytics::product_stats(&storage, fulfill_at).unwrap();
    let rice_stats = stats.iter().find(|s| s.item_id == rice.id).unwrap();
    assert_eq!(rice_stats.total_restocked, 50.0);
    assert_eq!(rice_stats.total_taken, 1.0);
    assert_eq!(rice_stats.current_stock, 49.0);
}

#[test]
fn fulfillment_failure_leaves_database_untouched() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let storage = open_storage(&dir);

    let intake = Intake::new(&storage, "admin");
    let bread = intake
        .add_item(
            ItemCreate {
                name: "Bread".into(),
                category: "essentials".into(),
                quantity: 10.0,
                student_limit: 1.0,
                limit_duration_days: 3,
                limit_duration_minutes: 0,
                unit: None,
                is_weighed: None,
                barcode: None,
            },
            0,
        )
        .unwrap();
    let eggs = intake
        .add_item(
            ItemCreate {
                name: "Eggs".into(),
                category: "dairy".into(),
                quantity: 1.0,
                student_limit: 1.0,
                limit_duration_days: 7,
                limit_duration_minutes: 0,
                unit: None,
                is_weighed: None,
                barcode: None,
            },
            0,
        )
        .unwrap();

    // Default configuration carries the 30-minute submission window
    let config = Config::default();
    let lifecycle = OrderLifecycle::new(&storage, &config);
    let order = lifecycle
        .create_order(
            "student1",
            vec![line(&bread.id, "Bread", 1.0), line(&eggs.id, "Eggs", 1.0)],
            0,
        )
        .unwrap();

    // Eggs run out before staff get to the order
    storage.set_item_quantity(&eggs.id, 0.0).unwrap();

    let err = lifecycle.fulfill_order(&order.id, MINUTE_MS).unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock { ref item_name, .. } if item_name == "Eggs"
    ));

    // First line untouched, order still pending, no outbound records
    assert_eq!(storage.get_item(&bread.id).unwrap().unwrap().quantity, 10.0);
    assert_eq!(
        storage.get_order(&order.id).unwrap().unwrap().status,
        OrderStatus::Pending
    );
    assert!(storage.checkouts_for("student1", &bread.id).unwrap().is_empty());
    assert!(
        storage
            .all_transactions()
            .unwrap()
            .iter()
            .all(|t| t.kind == TransactionKind::In)
    );
}
