//! Contract tests for the in-process store.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use hotelops_core::notification::{
    NewNotification, NotificationScope, NotificationType, RecipientRole,
};
use hotelops_core::payment::PaymentMethod;
use hotelops_core::roles::{AccountStatus, Role};
use hotelops_core::status::{BookingStatus, PaymentStatus, RoomStatus};
use hotelops_db::models::booking::CreateBooking;
use hotelops_db::models::payment::CreatePayment;
use hotelops_db::models::room::CreateRoom;
use hotelops_db::models::user::CreateUser;
use hotelops_db::{
    BookingStore, MemoryStore, NotificationStore, PaymentStore, RoomStore, StoreError, UserStore,
};

fn user(email: &str, role: Role) -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role,
        phone: None,
    }
}

fn room(number: &str) -> CreateRoom {
    CreateRoom {
        room_number: number.to_string(),
        room_type: "double".to_string(),
        price_per_night: 120.0,
        floor: 1,
    }
}

fn booking(guest_id: i64, room_id: i64) -> CreateBooking {
    CreateBooking {
        guest_id,
        room_id,
        check_in_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        check_out_date: NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
        total_amount: 240.0,
    }
}

fn staff_notice(role: RecipientRole, user_id: Option<i64>, message: &str) -> NewNotification {
    NewNotification {
        notification_type: NotificationType::System,
        recipient_role: role,
        user_id,
        message: message.to_string(),
        reference_id: None,
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = MemoryStore::new();
    store.create_user(&user("a@hotel.test", Role::Guest)).await.unwrap();

    let err = store
        .create_user(&user("a@hotel.test", Role::Staff))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Duplicate(c) if c == "uq_users_email");
}

#[tokio::test]
async fn new_users_are_active_and_status_is_settable() {
    let store = MemoryStore::new();
    let created = store.create_user(&user("b@hotel.test", Role::Guest)).await.unwrap();
    assert_eq!(created.account_status, AccountStatus::Active);

    let updated = store
        .set_account_status(created.id, AccountStatus::Suspended)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.account_status, AccountStatus::Suspended);
    assert!(store
        .set_account_status(9_999, AccountStatus::Active)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn rooms_list_by_number_and_update_together() {
    let store = MemoryStore::new();
    store.create_room(&room("202")).await.unwrap();
    let r101 = store.create_room(&room("101")).await.unwrap();
    assert_eq!(r101.status, RoomStatus::Available);
    assert!(r101.is_available);

    let numbers: Vec<String> = store
        .list_rooms()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.room_number)
        .collect();
    assert_eq!(numbers, ["101", "202"]);

    let booked = store
        .update_room_status(r101.id, RoomStatus::Booked, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booked.status, RoomStatus::Booked);
    assert!(!booked.is_available);

    assert!(store.delete_room(r101.id).await.unwrap());
    assert!(!store.delete_room(r101.id).await.unwrap());
}

#[tokio::test]
async fn concurrent_identical_bookings_admit_exactly_one() {
    let store = Arc::new(MemoryStore::new());
    let guest = store.create_user(&user("g@hotel.test", Role::Guest)).await.unwrap();
    let r = store.create_room(&room("101")).await.unwrap();

    let input = booking(guest.id, r.id);
    let (a, b) = tokio::join!(store.create_booking(&input), store.create_booking(&input));

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        Err(StoreError::Duplicate(c)) if c == "uq_bookings_active_guest_room"
    )));
}

#[tokio::test]
async fn cancelled_booking_frees_the_guest_room_pair() {
    let store = MemoryStore::new();
    let first = store.create_booking(&booking(1, 2)).await.unwrap();
    store
        .update_booking_status(first.id, BookingStatus::Cancelled, None)
        .await
        .unwrap();

    let second = store.create_booking(&booking(1, 2)).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.status, BookingStatus::Pending);

    assert_eq!(store.list_bookings(Some(1)).await.unwrap().len(), 2);
    assert!(store.list_bookings(Some(3)).await.unwrap().is_empty());
}

#[tokio::test]
async fn completed_at_is_kept_once_stamped() {
    let store = MemoryStore::new();
    let b = store.create_booking(&booking(1, 2)).await.unwrap();
    let stamp = chrono::Utc::now();

    let done = store
        .update_booking_status(b.id, BookingStatus::CheckedOut, Some(stamp))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.completed_at, Some(stamp));

    let reopened = store
        .update_booking_status(b.id, BookingStatus::Pending, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.completed_at, Some(stamp));
}

#[tokio::test]
async fn one_open_payment_per_booking() {
    let store = MemoryStore::new();
    let cash = CreatePayment {
        booking_id: 5,
        user_id: 1,
        amount: 240.0,
        method: PaymentMethod::Cash,
        card_last4: None,
        status: PaymentStatus::Pending,
        completed_at: None,
    };
    let first = store.create_payment(&cash).await.unwrap();

    assert_matches!(
        store.create_payment(&cash).await,
        Err(StoreError::Duplicate(c)) if c == "uq_payments_open_booking"
    );

    store
        .update_payment_status(first.id, PaymentStatus::Failed, None)
        .await
        .unwrap();
    assert!(store.create_payment(&cash).await.is_ok());
}

#[tokio::test]
async fn reopening_a_row_respects_the_unique_indexes() {
    let store = MemoryStore::new();
    let cash = CreatePayment {
        booking_id: 5,
        user_id: 1,
        amount: 240.0,
        method: PaymentMethod::Cash,
        card_last4: None,
        status: PaymentStatus::Pending,
        completed_at: None,
    };
    let failed = store.create_payment(&cash).await.unwrap();
    store
        .update_payment_status(failed.id, PaymentStatus::Failed, None)
        .await
        .unwrap();
    store.create_payment(&cash).await.unwrap();

    assert_matches!(
        store
            .update_payment_status(failed.id, PaymentStatus::Pending, None)
            .await,
        Err(StoreError::Duplicate(c)) if c == "uq_payments_open_booking"
    );
    // Moving between open statuses on the same row is not a conflict.
    let open = store.list_payments(Some(1)).await.unwrap();
    let current = open.iter().find(|p| p.id != failed.id).unwrap();
    assert!(store
        .update_payment_status(current.id, PaymentStatus::Completed, None)
        .await
        .is_ok());

    let cancelled = store.create_booking(&booking(1, 2)).await.unwrap();
    store
        .update_booking_status(cancelled.id, BookingStatus::Cancelled, None)
        .await
        .unwrap();
    let active = store.create_booking(&booking(1, 2)).await.unwrap();

    assert_matches!(
        store
            .update_booking_status(cancelled.id, BookingStatus::Confirmed, None)
            .await,
        Err(StoreError::Duplicate(c)) if c == "uq_bookings_active_guest_room"
    );
    assert!(store
        .update_booking_status(active.id, BookingStatus::Confirmed, None)
        .await
        .unwrap()
        .is_some());
    assert!(store
        .update_booking_status(999, BookingStatus::Confirmed, None)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn notification_listing_is_scoped_and_unread_first() {
    let store = MemoryStore::new();
    let older = store
        .create_notification(&staff_notice(RecipientRole::Staff, None, "older"))
        .await
        .unwrap();
    store
        .create_notification(&staff_notice(RecipientRole::Staff, None, "newer"))
        .await
        .unwrap();
    store
        .create_notification(&staff_notice(RecipientRole::Staff, Some(42), "assigned"))
        .await
        .unwrap();
    store
        .create_notification(&staff_notice(RecipientRole::Admin, None, "admin only"))
        .await
        .unwrap();
    store.mark_read(older.id).await.unwrap();

    let scope = NotificationScope::for_identity(Role::Staff, 7);
    let messages: Vec<String> = store
        .list_notifications(&scope, 50)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, ["newer", "older"]);
    assert_eq!(store.unread_count(&scope).await.unwrap(), 1);

    let assignee = NotificationScope::for_identity(Role::Staff, 42);
    assert_eq!(store.list_notifications(&assignee, 50).await.unwrap().len(), 3);
    assert_eq!(store.list_notifications(&assignee, 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn mark_all_read_is_global_and_delete_is_hard() {
    let store = MemoryStore::new();
    let n = store
        .create_notification(&staff_notice(RecipientRole::Guest, Some(1), "hello"))
        .await
        .unwrap();
    store
        .create_notification(&staff_notice(RecipientRole::Admin, None, "ops"))
        .await
        .unwrap();

    assert_eq!(store.mark_all_read().await.unwrap(), 2);
    assert_eq!(store.mark_all_read().await.unwrap(), 0);

    assert!(store.delete_notification(n.id).await.unwrap());
    assert!(store.mark_read(n.id).await.unwrap().is_none());
}
