//! In-process store used by tests and local demos.
//!
//! All tables live behind one [`RwLock`], so each trait method is atomic in
//! the same way a single SQL statement is. Uniqueness rules mirror the
//! indexes in `migrations/` and report the same constraint names.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use hotelops_core::notification::{NewNotification, NotificationScope};
use hotelops_core::roles::AccountStatus;
use hotelops_core::status::{BookingStatus, PaymentStatus, RoomStatus, ServiceRequestStatus};
use hotelops_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::booking::{Booking, CreateBooking, ACTIVE_BOOKING_STATUSES};
use crate::models::notification::Notification;
use crate::models::payment::{CreatePayment, Payment, OPEN_PAYMENT_STATUSES};
use crate::models::room::{CreateRoom, Room};
use crate::models::service_request::{CreateServiceRequest, ServiceRequest};
use crate::models::user::{CreateUser, User};
use crate::store::{
    BookingStore, NotificationStore, PaymentStore, RoomStore, ServiceRequestStore, UserStore,
    UQ_ACTIVE_BOOKING, UQ_OPEN_PAYMENT, UQ_ROOM_NUMBER, UQ_USER_EMAIL,
};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: Vec<User>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    payments: Vec<Payment>,
    service_requests: Vec<ServiceRequest>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Newest first, ties broken by id like `ORDER BY created_at DESC, id DESC`.
fn newest_first<T>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (Timestamp, DbId),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|row| Reverse(key(row)));
    rows
}

/// Every store trait over plain vectors.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Duplicate(UQ_USER_EMAIL.to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: t.next_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            account_status: AccountStatus::Active,
            phone: input.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let t = self.tables.read().await;
        Ok(newest_first(t.users.iter().cloned(), |u| (u.created_at, u.id)))
    }

    async fn set_account_status(
        &self,
        id: DbId,
        status: AccountStatus,
    ) -> StoreResult<Option<User>> {
        let mut t = self.tables.write().await;
        Ok(t.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.account_status = status;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn create_room(&self, input: &CreateRoom) -> StoreResult<Room> {
        let mut t = self.tables.write().await;
        if t.rooms.iter().any(|r| r.room_number == input.room_number) {
            return Err(StoreError::Duplicate(UQ_ROOM_NUMBER.to_string()));
        }
        let now = Utc::now();
        let room = Room {
            id: t.next_id(),
            room_number: input.room_number.clone(),
            room_type: input.room_type.clone(),
            price_per_night: input.price_per_night,
            floor: input.floor,
            status: RoomStatus::Available,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        t.rooms.push(room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: DbId) -> StoreResult<Option<Room>> {
        let t = self.tables.read().await;
        Ok(t.rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn list_rooms(&self) -> StoreResult<Vec<Room>> {
        let t = self.tables.read().await;
        let mut rooms = t.rooms.clone();
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rooms)
    }

    async fn update_room_status(
        &self,
        id: DbId,
        status: RoomStatus,
        is_available: bool,
    ) -> StoreResult<Option<Room>> {
        let mut t = self.tables.write().await;
        Ok(t.rooms.iter_mut().find(|r| r.id == id).map(|r| {
            r.status = status;
            r.is_available = is_available;
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn delete_room(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.rooms.len();
        t.rooms.retain(|r| r.id != id);
        Ok(t.rooms.len() < before)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_booking(&self, input: &CreateBooking) -> StoreResult<Booking> {
        let mut t = self.tables.write().await;
        let held = t.bookings.iter().any(|b| {
            b.guest_id == input.guest_id
                && b.room_id == input.room_id
                && ACTIVE_BOOKING_STATUSES.contains(&b.status)
        });
        if held {
            return Err(StoreError::Duplicate(UQ_ACTIVE_BOOKING.to_string()));
        }
        let now = Utc::now();
        let booking = Booking {
            id: t.next_id(),
            guest_id: input.guest_id,
            room_id: input.room_id,
            check_in_date: input.check_in_date,
            check_out_date: input.check_out_date,
            total_amount: input.total_amount,
            status: BookingStatus::Pending,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        t.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        let t = self.tables.read().await;
        Ok(t.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self, guest_id: Option<DbId>) -> StoreResult<Vec<Booking>> {
        let t = self.tables.read().await;
        let rows = t
            .bookings
            .iter()
            .filter(|b| guest_id.map_or(true, |g| b.guest_id == g))
            .cloned();
        Ok(newest_first(rows, |b| (b.created_at, b.id)))
    }

    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Booking>> {
        let mut t = self.tables.write().await;
        if ACTIVE_BOOKING_STATUSES.contains(&status) {
            let Some(current) = t.bookings.iter().find(|b| b.id == id) else {
                return Ok(None);
            };
            let (guest_id, room_id) = (current.guest_id, current.room_id);
            let held = t.bookings.iter().any(|b| {
                b.id != id
                    && b.guest_id == guest_id
                    && b.room_id == room_id
                    && ACTIVE_BOOKING_STATUSES.contains(&b.status)
            });
            if held {
                return Err(StoreError::Duplicate(UQ_ACTIVE_BOOKING.to_string()));
            }
        }
        Ok(t.bookings.iter_mut().find(|b| b.id == id).map(|b| {
            b.status = status;
            b.completed_at = completed_at.or(b.completed_at);
            b.updated_at = Utc::now();
            b.clone()
        }))
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn create_payment(&self, input: &CreatePayment) -> StoreResult<Payment> {
        let mut t = self.tables.write().await;
        let open = t.payments.iter().any(|p| {
            p.booking_id == input.booking_id && OPEN_PAYMENT_STATUSES.contains(&p.status)
        });
        if open && OPEN_PAYMENT_STATUSES.contains(&input.status) {
            return Err(StoreError::Duplicate(UQ_OPEN_PAYMENT.to_string()));
        }
        let now = Utc::now();
        let payment = Payment {
            id: t.next_id(),
            booking_id: input.booking_id,
            user_id: input.user_id,
            amount: input.amount,
            method: input.method,
            card_last4: input.card_last4.clone(),
            status: input.status,
            completed_at: input.completed_at,
            created_at: now,
            updated_at: now,
        };
        t.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_payment(&self, id: DbId) -> StoreResult<Option<Payment>> {
        let t = self.tables.read().await;
        Ok(t.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn list_payments(&self, user_id: Option<DbId>) -> StoreResult<Vec<Payment>> {
        let t = self.tables.read().await;
        let rows = t
            .payments
            .iter()
            .filter(|p| user_id.map_or(true, |u| p.user_id == u))
            .cloned();
        Ok(newest_first(rows, |p| (p.created_at, p.id)))
    }

    async fn update_payment_status(
        &self,
        id: DbId,
        status: PaymentStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Payment>> {
        let mut t = self.tables.write().await;
        if OPEN_PAYMENT_STATUSES.contains(&status) {
            let Some(booking_id) = t.payments.iter().find(|p| p.id == id).map(|p| p.booking_id)
            else {
                return Ok(None);
            };
            let open = t.payments.iter().any(|p| {
                p.id != id && p.booking_id == booking_id && OPEN_PAYMENT_STATUSES.contains(&p.status)
            });
            if open {
                return Err(StoreError::Duplicate(UQ_OPEN_PAYMENT.to_string()));
            }
        }
        Ok(t.payments.iter_mut().find(|p| p.id == id).map(|p| {
            p.status = status;
            p.completed_at = completed_at.or(p.completed_at);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }
}

#[async_trait]
impl ServiceRequestStore for MemoryStore {
    async fn create_service_request(
        &self,
        input: &CreateServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let request = ServiceRequest {
            id: t.next_id(),
            reported_by: input.reported_by,
            room_id: input.room_id,
            request_type: input.request_type,
            description: input.description.clone(),
            status: ServiceRequestStatus::Pending,
            assigned_to: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        t.service_requests.push(request.clone());
        Ok(request)
    }

    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>> {
        let t = self.tables.read().await;
        Ok(t.service_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_service_requests(
        &self,
        reported_by: Option<DbId>,
    ) -> StoreResult<Vec<ServiceRequest>> {
        let t = self.tables.read().await;
        let rows = t
            .service_requests
            .iter()
            .filter(|r| reported_by.map_or(true, |u| r.reported_by == u))
            .cloned();
        Ok(newest_first(rows, |r| (r.created_at, r.id)))
    }

    async fn update_service_request_status(
        &self,
        id: DbId,
        status: ServiceRequestStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ServiceRequest>> {
        let mut t = self.tables.write().await;
        Ok(t.service_requests.iter_mut().find(|r| r.id == id).map(|r| {
            r.status = status;
            r.completed_at = completed_at.or(r.completed_at);
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn assign_service_request(
        &self,
        id: DbId,
        assignee_id: DbId,
        status: ServiceRequestStatus,
    ) -> StoreResult<Option<ServiceRequest>> {
        let mut t = self.tables.write().await;
        Ok(t.service_requests.iter_mut().find(|r| r.id == id).map(|r| {
            r.assigned_to = Some(assignee_id);
            r.status = status;
            r.updated_at = Utc::now();
            r.clone()
        }))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, input: &NewNotification) -> StoreResult<Notification> {
        let mut t = self.tables.write().await;
        let notification = Notification {
            id: t.next_id(),
            notification_type: input.notification_type,
            recipient_role: Some(input.recipient_role),
            user_id: input.user_id,
            message: input.message.clone(),
            reference_id: input.reference_id,
            is_read: false,
            created_at: Utc::now(),
        };
        t.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        scope: &NotificationScope,
        limit: i64,
    ) -> StoreResult<Vec<Notification>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Notification> = t
            .notifications
            .iter()
            .filter(|n| scope.matches(n.recipient_role, n.user_id))
            .cloned()
            .collect();
        rows.sort_by_key(|n| (n.is_read, Reverse((n.created_at, n.id))));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn unread_count(&self, scope: &NotificationScope) -> StoreResult<i64> {
        let t = self.tables.read().await;
        let count = t
            .notifications
            .iter()
            .filter(|n| !n.is_read && scope.matches(n.recipient_role, n.user_id))
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, id: DbId) -> StoreResult<Option<Notification>> {
        let mut t = self.tables.write().await;
        Ok(t.notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }

    async fn mark_all_read(&self) -> StoreResult<u64> {
        let mut t = self.tables.write().await;
        let mut changed = 0;
        for n in t.notifications.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.notifications.len();
        t.notifications.retain(|n| n.id != id);
        Ok(t.notifications.len() < before)
    }
}
