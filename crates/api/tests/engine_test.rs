
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use agenda_api::engine::{BookingOutcome, NotificationDispatch, SchedulingEngine};
use agenda_core::errors::{AgendaError, ErrorKind};
use agenda_core::models::{Appointment, AppointmentFilter, NewAppointment, TimeWindow};
use agenda_core::notifier::NotificationReceipt;
use agenda_core::time::parse_timezone;
use agenda_db::memory::MemoryStore;
use agenda_db::mock::store::MockStore;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::{
    at, engine_with, memory_engine, quiet_notifier, slot, ChannelNotifier, MockNotify,
};

fn appointment(id: i64, slot_id: i64) -> Appointment {
    Appointment {
        id,
        client_id: 7,
        slot_id,
        professional_id: 1,
    }
}

#[tokio::test]
async fn test_booking_walkthrough() {
    let (_store, engine) = memory_engine();

    let slot = engine
        .create_slot(1, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap();
    assert_eq!(slot.id, 1);
    assert!(slot.available);

    let available = engine.list_available_slots(1, "2025-03-10").await.unwrap();
    assert_eq!(available, vec![slot.clone()]);

    let outcome = engine.book_appointment(7, slot.id).await.unwrap();
    assert_eq!(
        outcome,
        BookingOutcome::Booked(Appointment {
            id: 1,
            client_id: 7,
            slot_id: 1,
            professional_id: 1,
        })
    );

    let available = engine.list_available_slots(1, "2025-03-10").await.unwrap();
    assert!(available.is_empty());
}

#[tokio::test]
async fn test_create_slot_assigns_fresh_ids() {
    let (_store, engine) = memory_engine();

    let mut ids = HashSet::new();
    for hour in 8..12 {
        let start = format!("2025-03-10T{:02}:00:00Z", hour);
        let end = format!("2025-03-10T{:02}:30:00Z", hour);
        let slot = engine.create_slot(1, &start, &end).await.unwrap();
        assert!(slot.available);
        ids.insert(slot.id);
    }

    assert_eq!(ids.len(), 4);
}

#[rstest]
#[case("10:00", "2025-03-10T10:30:00Z")]
#[case("2025-03-10T10:00:00Z", "2025-03-10 10:30")]
#[case("", "")]
#[tokio::test]
async fn test_create_slot_rejects_malformed_instants(#[case] start: &str, #[case] end: &str) {
    // The mock has no expectations: touching the store would panic.
    let engine = engine_with(Arc::new(MockStore::new()), MockNotify::new());

    let error = engine.create_slot(1, start, end).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidInput);
    assert!(matches!(error, AgendaError::InvalidFormat { .. }));
}

#[rstest]
#[case("2025-03-10T10:30:00Z", "2025-03-10T10:00:00Z")]
#[case("2025-03-10T10:00:00Z", "2025-03-10T10:00:00Z")]
#[case("2025-03-10T12:00:00+02:00", "2025-03-10T10:00:00Z")]
#[tokio::test]
async fn test_create_slot_rejects_empty_range(#[case] start: &str, #[case] end: &str) {
    let engine = engine_with(Arc::new(MockStore::new()), MockNotify::new());

    let error = engine.create_slot(1, start, end).await.unwrap_err();

    assert!(matches!(error, AgendaError::InvalidRange { .. }));
}

#[tokio::test]
async fn test_create_slot_storage_failure() {
    let mut store = MockStore::new();
    store.expect_create_slot().times(1).returning(|_| {
        Err(AgendaError::Storage(
            eyre::eyre!("connection reset by peer").wrap_err("Error creating slot"),
        ))
    });
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let error = engine
        .create_slot(1, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Storage);
    assert_eq!(error.to_string(), "Error creating slot");
}

#[tokio::test]
async fn test_list_available_slots_queries_the_utc_day() {
    let mut store = MockStore::new();
    store
        .expect_list_available_slots()
        .with(
            predicate::eq(1),
            predicate::eq(TimeWindow {
                start: at(10, 0, 0),
                end: at(11, 0, 0),
            }),
        )
        .times(1)
        .returning(|_, _| Ok(vec![]));
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let slots = engine.list_available_slots(1, "2025-03-10").await.unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_list_available_slots_uses_configured_timezone() {
    let mut store = MockStore::new();
    store
        .expect_list_available_slots()
        .with(
            predicate::eq(1),
            predicate::eq(TimeWindow {
                start: at(10, 5, 0),
                end: at(11, 5, 0),
            }),
        )
        .times(1)
        .returning(|_, _| Ok(vec![]));
    let engine = engine_with(Arc::new(store), MockNotify::new())
        .with_timezone(parse_timezone("America/Bogota").unwrap());

    engine.list_available_slots(1, "2025-03-10").await.unwrap();
}

#[tokio::test]
async fn test_list_available_slots_matches_exactly_the_day() {
    let (_store, engine) = memory_engine();
    let first = engine
        .create_slot(1, "2025-03-10T00:00:00Z", "2025-03-10T00:30:00Z")
        .await
        .unwrap();
    let last = engine
        .create_slot(1, "2025-03-10T23:45:00Z", "2025-03-11T00:15:00Z")
        .await
        .unwrap();
    engine
        .create_slot(1, "2025-03-11T00:00:00Z", "2025-03-11T00:30:00Z")
        .await
        .unwrap();
    engine
        .create_slot(2, "2025-03-10T12:00:00Z", "2025-03-10T12:30:00Z")
        .await
        .unwrap();
    let booked = engine
        .create_slot(1, "2025-03-10T12:00:00Z", "2025-03-10T12:30:00Z")
        .await
        .unwrap();
    engine.book_appointment(7, booked.id).await.unwrap();

    let mut ids: Vec<i64> = engine
        .list_available_slots(1, "2025-03-10")
        .await
        .unwrap()
        .into_iter()
        .map(|slot| slot.id)
        .collect();
    ids.sort();

    assert_eq!(ids, vec![first.id, last.id]);
}

#[tokio::test]
async fn test_list_available_slots_rejects_bad_date() {
    let engine = engine_with(Arc::new(MockStore::new()), MockNotify::new());

    let error = engine
        .list_available_slots(1, "10-03-2025")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_book_unavailable_slot_is_a_business_rejection() {
    let mut store = MockStore::new();
    store
        .expect_get_slot_by_id()
        .with(predicate::eq(1))
        .returning(|id| Ok(Some(slot(id, 1, false))));
    // No book_slot expectation: a write would panic.
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let outcome = engine.book_appointment(7, 1).await.unwrap();

    assert_eq!(outcome, BookingOutcome::Unavailable(slot(1, 1, false)));
}

#[tokio::test]
async fn test_book_missing_slot_fails() {
    let mut store = MockStore::new();
    store.expect_get_slot_by_id().returning(|_| Ok(None));
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let error = engine.book_appointment(7, 42).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.to_string(), "Slot not found: 42");
}

#[tokio::test]
async fn test_book_with_failing_slot_lookup() {
    let mut store = MockStore::new();
    store
        .expect_get_slot_by_id()
        .returning(|_| Err(AgendaError::Storage(eyre::eyre!("pool timed out"))));
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let error = engine.book_appointment(7, 1).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.to_string(), "Slot not found: 1");
}

#[tokio::test]
async fn test_book_sends_notification_with_slot_range() {
    let mut store = MockStore::new();
    store
        .expect_get_slot_by_id()
        .returning(|id| Ok(Some(slot(id, 1, true))));
    store
        .expect_book_slot()
        .with(predicate::eq(NewAppointment {
            client_id: 7,
            slot_id: 3,
            professional_id: 1,
        }))
        .times(1)
        .returning(|new| Ok(new.into_appointment(11)));

    let mut notifier = MockNotify::new();
    notifier
        .expect_send_appointment_notification()
        .withf(|n| {
            n.client_id == 7
                && n.professional_id == 1
                && n.appointment_id == 11
                && n.start_time == "2025-03-10T10:00:00Z"
                && n.end_time == "2025-03-10T10:30:00Z"
        })
        .times(1)
        .returning(|_| Ok(test_utils::delivered()));
    let engine = engine_with(Arc::new(store), notifier);

    let outcome = engine.book_appointment(7, 3).await.unwrap();

    assert!(matches!(outcome, BookingOutcome::Booked(a) if a.id == 11));
}

#[rstest]
#[case::notifier_error(true)]
#[case::notifier_declined(false)]
#[tokio::test]
async fn test_notification_failure_does_not_undo_booking(#[case] errors: bool) {
    let store = Arc::new(MemoryStore::new());
    let mut notifier = MockNotify::new();
    notifier
        .expect_send_appointment_notification()
        .times(1)
        .returning(move |_| {
            if errors {
                Err(AgendaError::Dependency(eyre::eyre!("connection refused")))
            } else {
                Ok(NotificationReceipt {
                    message: "Error obtaining client data".to_string(),
                    success: false,
                })
            }
        });
    let engine = engine_with(store.clone(), notifier);
    let slot = engine
        .create_slot(1, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap();

    let outcome = engine.book_appointment(7, slot.id).await.unwrap();

    assert!(matches!(outcome, BookingOutcome::Booked(a) if a.id == 1));
    assert_eq!(store.appointment_count().await, 1);
}

#[tokio::test]
async fn test_race_loser_gets_constraint_violation() {
    let mut store = MockStore::new();
    store
        .expect_get_slot_by_id()
        .returning(|id| Ok(Some(slot(id, 1, true))));
    store.expect_book_slot().returning(|new| {
        Err(AgendaError::ConstraintViolation(format!(
            "slot {} is no longer available",
            new.slot_id
        )))
    });
    // Notifier must not hear about a booking that did not happen.
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let error = engine.book_appointment(7, 1).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ConstraintViolation);
}

#[tokio::test]
async fn test_second_booking_of_a_slot_does_not_succeed() {
    let (store, engine) = memory_engine();
    let slot = engine
        .create_slot(1, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap();

    engine.book_appointment(7, slot.id).await.unwrap();
    let second = engine.book_appointment(8, slot.id).await.unwrap();

    assert!(matches!(second, BookingOutcome::Unavailable(_)));
    assert_eq!(store.appointment_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_produce_one_appointment() {
    let (store, engine) = memory_engine();
    let engine = Arc::new(engine);
    let slot = engine
        .create_slot(1, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap();

    let slot_id = slot.id;
    let mut handles = Vec::new();
    for client_id in 1..=16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.book_appointment(client_id, slot_id).await
        }));
    }

    let mut booked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(BookingOutcome::Booked(_)) => booked += 1,
            Ok(BookingOutcome::Unavailable(_)) => {}
            Err(err) => assert_eq!(err.kind(), ErrorKind::ConstraintViolation),
        }
    }

    assert_eq!(booked, 1);
    assert_eq!(store.appointment_count().await, 1);
}

#[tokio::test]
async fn test_background_dispatch_still_notifies() {
    let store = Arc::new(MemoryStore::new());
    let (notifier, mut receiver) = ChannelNotifier::new();
    let engine = SchedulingEngine::new(store, Arc::new(notifier))
        .with_dispatch(NotificationDispatch::Background);
    let slot = engine
        .create_slot(4, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
        .await
        .unwrap();

    let outcome = engine.book_appointment(7, slot.id).await.unwrap();
    assert!(matches!(outcome, BookingOutcome::Booked(_)));

    let notification = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notification.professional_id, 4);
    assert_eq!(notification.appointment_id, 1);
}

#[tokio::test]
async fn test_list_appointments_resolves_slot_times() {
    let mut store = MockStore::new();
    store
        .expect_list_appointments()
        .with(predicate::eq(AppointmentFilter {
            client_id: Some(7),
            professional_id: None,
        }))
        .returning(|_| Ok(vec![appointment(1, 3)]));
    store
        .expect_get_slots_by_ids()
        .withf(|ids| ids.to_vec() == vec![3])
        .times(1)
        .returning(|_| Ok(vec![slot(3, 1, false)]));
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let scheduled = engine
        .list_appointments(AppointmentFilter::from_wire(7, 0))
        .await
        .unwrap();

    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].appointment, appointment(1, 3));
    assert_eq!(scheduled[0].start_time, at(10, 10, 0));
    assert_eq!(scheduled[0].end_time, at(10, 10, 30));
}

#[tokio::test]
async fn test_list_appointments_fails_when_a_slot_is_missing() {
    let mut store = MockStore::new();
    store
        .expect_list_appointments()
        .returning(|_| Ok(vec![appointment(1, 3), appointment(2, 5)]));
    store
        .expect_get_slots_by_ids()
        .returning(|_| Ok(vec![slot(3, 1, false)]));
    let engine = engine_with(Arc::new(store), MockNotify::new());

    let error = engine
        .list_appointments(AppointmentFilter::default())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_appointments_without_filters_returns_all() {
    let (_store, engine) = memory_engine();
    for (professional_id, client_id) in [(1, 7), (2, 8)] {
        let slot = engine
            .create_slot(professional_id, "2025-03-10T10:00:00Z", "2025-03-10T10:30:00Z")
            .await
            .unwrap();
        engine.book_appointment(client_id, slot.id).await.unwrap();
    }

    let all = engine
        .list_appointments(AppointmentFilter::default())
        .await
        .unwrap();
    let for_second = engine
        .list_appointments(AppointmentFilter::from_wire(0, 2))
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(for_second.len(), 1);
    assert_eq!(for_second[0].appointment.client_id, 8);
}

#[tokio::test]
async fn test_empty_appointment_list_skips_slot_lookup() {
    let mut store = MockStore::new();
    store.expect_list_appointments().returning(|_| Ok(vec![]));
    let engine = engine_with(Arc::new(store), quiet_notifier());

    let scheduled = engine
        .list_appointments(AppointmentFilter::default())
        .await
        .unwrap();

    assert!(scheduled.is_empty());
}
