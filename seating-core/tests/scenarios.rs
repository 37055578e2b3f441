//! End-to-end seating scenarios over a file database

use chrono::NaiveDate;
use seating_core::{
    DbService, ErrorCode, PlacementCheck, PlacementOutcome, PlacementPolicy, PlacementViolation,
    ReservationCheck, ReservationOutcome, SeatingService, TableEffect, TransitionOutcome,
    TransitionRejection,
};
use shared::models::{
    Booking, BookingCreate, BookingReschedule, BookingStatus, DiningTable, DiningTableCreate,
    DiningTableUpdate, GridPoint, Order, OrderCreate, OrderStatus, OrderType, OrderUpdate,
    ReservationCandidate, Restaurant, RestaurantCreate, TablePlacement, TimeSlot,
};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    db: DbService,
    service: SeatingService,
}

async fn setup(policy: PlacementPolicy) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seating.db");
    let url = path.to_str().unwrap();
    let db = DbService::new(url, 4, 5000).await.unwrap();
    let service = SeatingService::new(db.clone(), policy).await.unwrap();
    Fixture {
        _dir: dir,
        db,
        service,
    }
}

fn slot(s: &str) -> TimeSlot {
    s.parse().unwrap()
}

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

async fn restaurant(service: &SeatingService) -> Restaurant {
    service
        .create_restaurant(RestaurantCreate {
            name: "Main Hall".into(),
            max_x: 10,
            max_y: 10,
        })
        .await
        .unwrap()
}

fn table_at(
    restaurant_id: i64,
    number: i32,
    start: (i32, i32),
    end: (i32, i32),
) -> DiningTableCreate {
    DiningTableCreate {
        restaurant_id,
        number,
        capacity: Some(4),
        start_x: start.0,
        start_y: start.1,
        end_x: end.0,
        end_y: end.1,
    }
}

async fn place(service: &SeatingService, data: DiningTableCreate) -> DiningTable {
    match service.place_table(data).await.unwrap() {
        PlacementOutcome::Placed(table) => table,
        PlacementOutcome::Rejected(v) => panic!("placement rejected: {v}"),
    }
}

fn booking(table_id: i64, start: &str, end: &str) -> BookingCreate {
    BookingCreate {
        table_id,
        customer_id: 42,
        booking_date: may_first(),
        start_slot: slot(start),
        end_slot: slot(end),
    }
}

async fn reserve(service: &SeatingService, data: BookingCreate) -> ReservationOutcome {
    service.reserve(data).await.unwrap()
}

fn booked(outcome: ReservationOutcome) -> Booking {
    match outcome {
        ReservationOutcome::Booked(b) => b,
        ReservationOutcome::Conflict(c) => panic!("unexpected conflict with {}", c.booking_id),
    }
}

fn dine_in_order(table_id: i64) -> OrderCreate {
    OrderCreate {
        order_type: OrderType::DineIn,
        table_id: Some(table_id),
        status: None,
    }
}

fn status_change(status: OrderStatus) -> OrderUpdate {
    OrderUpdate {
        status: Some(status),
        ..Default::default()
    }
}

fn applied_order(outcome: TransitionOutcome) -> Order {
    match outcome {
        TransitionOutcome::Applied(applied) => applied.order,
        TransitionOutcome::Rejected(r) => panic!("transition rejected: {r}"),
    }
}

async fn dine_in(service: &SeatingService, table_id: i64) -> Order {
    let outcome = service.create_order(dine_in_order(table_id)).await;
    applied_order(outcome.unwrap())
}

async fn is_available(service: &SeatingService, table_id: i64) -> bool {
    service.find_table(table_id).await.unwrap().available
}

async fn row_count(db: &DbService, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(&db.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_booking_conflicts_and_adjacency() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;

    let first = booked(reserve(&f.service, booking(t.id, "10:00", "11:00")).await);

    match reserve(&f.service, booking(t.id, "10:30", "11:30")).await {
        ReservationOutcome::Conflict(c) => assert_eq!(c.booking_id, first.id),
        ReservationOutcome::Booked(_) => panic!("overlapping booking accepted"),
    }

    let adjacent = reserve(&f.service, booking(t.id, "11:00", "12:00")).await;
    assert!(matches!(adjacent, ReservationOutcome::Booked(_)));

    let bookings = f.service.find_bookings(t.id, may_first()).await.unwrap();
    assert_eq!(bookings.len(), 2);
}

#[tokio::test]
async fn test_check_reservation_writes_nothing() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;
    let existing = booked(reserve(&f.service, booking(t.id, "10:00", "11:00")).await);

    let candidate = ReservationCandidate::from(&booking(t.id, "10:30", "11:30"));
    match f.service.check_reservation(&candidate).await.unwrap() {
        ReservationCheck::Conflict(c) => assert_eq!(c.booking_id, existing.id),
        ReservationCheck::Clear => panic!("overlapping candidate reported clear"),
    }

    let candidate = ReservationCandidate::from(&booking(t.id, "11:00", "12:00"));
    let check = f.service.check_reservation(&candidate).await.unwrap();
    assert!(check.is_clear());

    let candidate = ReservationCandidate::from(&booking(t.id, "12:00", "11:00"));
    let err = f.service.check_reservation(&candidate).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingInvalidSlotRange);

    // 只检查不落库
    assert_eq!(row_count(&f.db, "booking").await, 1);
}

#[tokio::test]
async fn test_invalid_range_and_unknown_table_are_errors() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 1, (0, 0), (1, 1))).await;

    let data = booking(t.id, "12:00", "12:00");
    let err = f.service.reserve(data).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingInvalidSlotRange);

    let data = booking(9999, "12:00", "13:00");
    let err = f.service.reserve(data).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);
}

#[tokio::test]
async fn test_reschedule_excludes_itself() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;

    let b = booked(reserve(&f.service, booking(t.id, "18:00", "20:00")).await);
    booked(reserve(&f.service, booking(t.id, "20:00", "21:00")).await);

    // 原时段重新校验不冲突
    let same = f
        .service
        .reschedule_booking(b.id, BookingReschedule::default())
        .await
        .unwrap();
    assert!(matches!(same, ReservationOutcome::Booked(_)));

    let shifted = f
        .service
        .reschedule_booking(
            b.id,
            BookingReschedule {
                start_slot: Some(slot("18:30")),
                end_slot: Some(slot("20:30")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(matches!(shifted, ReservationOutcome::Conflict(_)));

    let stored = f.service.find_booking(b.id).await.unwrap();
    assert_eq!(stored.start_slot, slot("18:00"));
    assert_eq!(stored.end_slot, slot("20:00"));
}

#[tokio::test]
async fn test_cancelled_booking_frees_slots() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;

    let b = booked(reserve(&f.service, booking(t.id, "12:00", "13:00")).await);
    f.service.cancel_booking(b.id).await.unwrap();
    let again = reserve(&f.service, booking(t.id, "12:00", "13:00")).await;
    assert!(matches!(again, ReservationOutcome::Booked(_)));

    let err = f.service.cancel_booking(b.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingAlreadyCancelled);
    let err = f.service.complete_booking(b.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingAlreadyCancelled);
}

#[tokio::test]
async fn test_completed_booking_is_closed() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;

    let b = booked(reserve(&f.service, booking(t.id, "12:00", "13:00")).await);
    let done = f.service.complete_booking(b.id).await.unwrap();
    assert_eq!(done.status, BookingStatus::Completed);

    let err = f.service.cancel_booking(b.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingAlreadyCompleted);
    let err = f.service.complete_booking(b.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingAlreadyCompleted);

    let moved = BookingReschedule {
        start_slot: Some(slot("14:00")),
        end_slot: Some(slot("15:00")),
        ..Default::default()
    };
    let err = f.service.reschedule_booking(b.id, moved).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingAlreadyCompleted);

    let stored = f.service.find_booking(b.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Completed);
    assert_eq!(stored.start_slot, slot("12:00"));
}

#[tokio::test]
async fn test_start_corner_taken_then_free_placement() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    place(&f.service, table_at(r.id, 1, (1, 1), (2, 2))).await;

    let data = table_at(r.id, 2, (1, 1), (4, 4));
    match f.service.place_table(data).await.unwrap() {
        PlacementOutcome::Rejected(v) => {
            let expected = PlacementViolation::StartCornerTaken {
                corner: GridPoint::new(1, 1),
            };
            assert_eq!(v, expected);
            assert_eq!(v.to_string(), "start position (1, 1) taken");
            assert_eq!(v.error_code(), ErrorCode::TableStartPositionTaken);
        }
        PlacementOutcome::Placed(_) => panic!("shared start corner accepted"),
    }

    place(&f.service, table_at(r.id, 2, (5, 5), (6, 6))).await;
    assert_eq!(f.service.list_tables(r.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_check_table_placement_writes_nothing() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    place(&f.service, table_at(r.id, 1, (1, 1), (2, 2))).await;

    let taken = TablePlacement::from(&table_at(r.id, 2, (1, 1), (4, 4)));
    let check = f.service.check_table_placement(&taken).await.unwrap();
    let expected = PlacementViolation::StartCornerTaken {
        corner: GridPoint::new(1, 1),
    };
    assert_eq!(check, PlacementCheck::Rejected(expected));

    let outside = TablePlacement::from(&table_at(r.id, 2, (8, 8), (10, 9)));
    let check = f.service.check_table_placement(&outside).await.unwrap();
    assert!(matches!(
        check,
        PlacementCheck::Rejected(PlacementViolation::OutOfBounds { .. })
    ));

    let free = TablePlacement::from(&table_at(r.id, 2, (5, 5), (6, 6)));
    let check = f.service.check_table_placement(&free).await.unwrap();
    assert!(check.is_clear());

    // 检查通过也不会新增桌台
    assert_eq!(f.service.list_tables(r.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_overlapping_rectangles_follow_policy() {
    let corner = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&corner.service).await;
    place(&corner.service, table_at(r.id, 1, (0, 0), (2, 2))).await;
    place(&corner.service, table_at(r.id, 2, (1, 1), (3, 3))).await;

    let strict = setup(PlacementPolicy::Intersection).await;
    let r = restaurant(&strict.service).await;
    let first = place(&strict.service, table_at(r.id, 1, (0, 0), (2, 2))).await;
    let data = table_at(r.id, 2, (1, 1), (3, 3));
    match strict.service.place_table(data).await.unwrap() {
        PlacementOutcome::Rejected(PlacementViolation::Overlaps { table_id, .. }) => {
            assert_eq!(table_id, first.id)
        }
        other => panic!("expected overlap rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_out_of_bounds_and_missing_restaurant() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;

    let data = table_at(r.id, 1, (8, 8), (10, 9));
    let outcome = f.service.place_table(data).await.unwrap();
    assert!(matches!(
        outcome,
        PlacementOutcome::Rejected(PlacementViolation::OutOfBounds { .. })
    ));

    let data = table_at(777, 1, (0, 0), (1, 1));
    let err = f.service.place_table(data).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RestaurantNotFound);
}

#[tokio::test]
async fn test_move_table_keeps_occupancy() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 1, (0, 0), (1, 1))).await;
    dine_in(&f.service, t.id).await;

    let moved = f
        .service
        .move_table(
            t.id,
            DiningTableUpdate {
                start_x: Some(4),
                start_y: Some(4),
                end_x: Some(5),
                end_y: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let PlacementOutcome::Placed(moved) = moved else {
        panic!("move rejected");
    };
    assert_eq!(moved.rect().start, GridPoint::new(4, 4));
    assert!(!moved.available);
    assert!(!is_available(&f.service, t.id).await);
}

#[tokio::test]
async fn test_dine_in_lifecycle_frees_and_reoccupies_table() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;
    assert!(is_available(&f.service, t.id).await);

    let o1 = dine_in(&f.service, t.id).await;
    assert!(!is_available(&f.service, t.id).await);
    assert_eq!(f.service.active_order_for_table(t.id), Some(o1.id));

    let outcome = f
        .service
        .update_order(o1.id, status_change(OrderStatus::Completed))
        .await
        .unwrap();
    match outcome {
        TransitionOutcome::Applied(applied) => {
            assert_eq!(applied.effect, TableEffect::Release { table_id: t.id })
        }
        TransitionOutcome::Rejected(r) => panic!("completion rejected: {r}"),
    }
    assert!(is_available(&f.service, t.id).await);
    assert_eq!(f.service.active_order_for_table(t.id), None);

    let o2 = dine_in(&f.service, t.id).await;
    assert!(!is_available(&f.service, t.id).await);
    assert_eq!(f.service.active_order_for_table(t.id), Some(o2.id));

    let err = f
        .service
        .update_order(o1.id, OrderUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
}

#[tokio::test]
async fn test_delivery_orders_leave_tables_alone() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t1 = place(&f.service, table_at(r.id, 1, (0, 0), (1, 1))).await;
    let t2 = place(&f.service, table_at(r.id, 2, (3, 3), (4, 4))).await;
    let held = dine_in(&f.service, t2.id).await;

    let delivery = applied_order(
        f.service
            .create_order(OrderCreate {
                order_type: OrderType::Delivery,
                table_id: Some(t1.id),
                status: None,
            })
            .await
            .unwrap(),
    );
    assert_eq!(delivery.table_id, None);

    for status in [OrderStatus::Preparing, OrderStatus::Completed] {
        f.service
            .update_order(delivery.id, status_change(status))
            .await
            .unwrap();
    }

    assert!(is_available(&f.service, t1.id).await);
    assert!(!is_available(&f.service, t2.id).await);
    assert_eq!(f.service.active_order_for_table(t2.id), Some(held.id));
}

#[tokio::test]
async fn test_occupied_table_rejects_second_dine_in() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;
    let o1 = dine_in(&f.service, t.id).await;

    let outcome = f.service.create_order(dine_in_order(t.id)).await.unwrap();
    match outcome {
        TransitionOutcome::Rejected(rejection) => {
            assert_eq!(
                rejection,
                TransitionRejection::TableOccupied {
                    table_id: t.id,
                    order_id: o1.id,
                }
            );
            assert_eq!(rejection.error_code(), ErrorCode::TableOccupied);
        }
        TransitionOutcome::Applied(_) => panic!("second dine-in order accepted"),
    }

    assert_eq!(row_count(&f.db, "orders").await, 1);
}

#[tokio::test]
async fn test_failed_order_insert_rolls_back_table() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;

    // 桌台先写，订单写入失败时整笔事务回滚
    sqlx::query(
        "CREATE TRIGGER reject_orders BEFORE INSERT ON orders BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&f.db.pool)
    .await
    .unwrap();

    let err = f
        .service
        .create_order(dine_in_order(t.id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    assert!(is_available(&f.service, t.id).await);
    assert_eq!(f.service.active_order_for_table(t.id), None);
    assert_eq!(row_count(&f.db, "orders").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_keep_index_in_step_with_store() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let mut tables = Vec::new();
    for n in 0..4 {
        let data = table_at(r.id, n + 1, (n * 2, 0), (n * 2 + 1, 1));
        tables.push(place(&f.service, data).await.id);
    }

    let mut handles = Vec::new();
    for round in 0..6 {
        for &table_id in &tables {
            let service = f.service.clone();
            handles.push(tokio::spawn(async move {
                // 同一桌台并发开单和结单，失败的调用直接忽略
                let outcome = service.create_order(dine_in_order(table_id)).await;
                let Ok(TransitionOutcome::Applied(applied)) = outcome else {
                    return;
                };
                let status = if round % 2 == 0 {
                    OrderStatus::Completed
                } else {
                    OrderStatus::Cancelled
                };
                let order_id = applied.order.id;
                let _ = service.update_order(order_id, status_change(status)).await;
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let rebuilt = SeatingService::new(f.db.clone(), PlacementPolicy::CornerMatch)
        .await
        .unwrap();
    assert_eq!(f.service.occupied_tables(), rebuilt.occupied_tables());
    for &table_id in &tables {
        assert_eq!(
            f.service.active_order_for_table(table_id),
            rebuilt.active_order_for_table(table_id)
        );
    }
}

#[tokio::test]
async fn test_occupancy_index_survives_restart() {
    let f = setup(PlacementPolicy::CornerMatch).await;
    let r = restaurant(&f.service).await;
    let t = place(&f.service, table_at(r.id, 5, (1, 1), (3, 3))).await;
    let order = dine_in(&f.service, t.id).await;

    let restarted = SeatingService::new(f.db.clone(), PlacementPolicy::CornerMatch)
        .await
        .unwrap();
    assert_eq!(restarted.active_order_for_table(t.id), Some(order.id));
    assert_eq!(restarted.occupied_tables(), vec![t.id]);
}
