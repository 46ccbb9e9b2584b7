//! Store traits consumed by the HTTP layer.
//!
//! Handlers only ever see these traits, so the same code runs against
//! PostgreSQL ([`PgStore`]) and the in-process [`MemoryStore`](crate::MemoryStore).
//! Every method is a single atomic write or read; there are no cross-store
//! transactions.

use std::sync::Arc;

use async_trait::async_trait;
use hotelops_core::notification::{NewNotification, NotificationScope};
use hotelops_core::roles::AccountStatus;
use hotelops_core::status::{BookingStatus, PaymentStatus, RoomStatus, ServiceRequestStatus};
use hotelops_core::types::{DbId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use crate::models::booking::{Booking, CreateBooking};
use crate::models::notification::Notification;
use crate::models::payment::{CreatePayment, Payment};
use crate::models::room::{CreateRoom, Room};
use crate::models::service_request::{CreateServiceRequest, ServiceRequest};
use crate::models::user::{CreateUser, User};
use crate::repositories::{
    BookingRepo, NotificationRepo, PaymentRepo, RoomRepo, ServiceRequestRepo, UserRepo,
};
use crate::DbPool;

/// Constraint name reported when a guest already holds the room.
pub const UQ_ACTIVE_BOOKING: &str = "uq_bookings_active_guest_room";
/// Constraint name reported when a booking already has an open payment.
pub const UQ_OPEN_PAYMENT: &str = "uq_payments_open_booking";
pub const UQ_USER_EMAIL: &str = "uq_users_email";
pub const UQ_ROOM_NUMBER: &str = "uq_rooms_room_number";

/// Credential store: identities and their account state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn set_account_status(&self, id: DbId, status: AccountStatus)
        -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn create_room(&self, input: &CreateRoom) -> StoreResult<Room>;
    async fn find_room(&self, id: DbId) -> StoreResult<Option<Room>>;
    async fn list_rooms(&self) -> StoreResult<Vec<Room>>;
    async fn update_room_status(
        &self,
        id: DbId,
        status: RoomStatus,
        is_available: bool,
    ) -> StoreResult<Option<Room>>;
    async fn delete_room(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomic check-and-insert on (guest, room) among active bookings.
    async fn create_booking(&self, input: &CreateBooking) -> StoreResult<Booking>;
    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>>;
    async fn list_bookings(&self, guest_id: Option<DbId>) -> StoreResult<Vec<Booking>>;
    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Booking>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Atomic check-and-insert on booking among open payments.
    async fn create_payment(&self, input: &CreatePayment) -> StoreResult<Payment>;
    async fn find_payment(&self, id: DbId) -> StoreResult<Option<Payment>>;
    async fn list_payments(&self, user_id: Option<DbId>) -> StoreResult<Vec<Payment>>;
    async fn update_payment_status(
        &self,
        id: DbId,
        status: PaymentStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Payment>>;
}

#[async_trait]
pub trait ServiceRequestStore: Send + Sync {
    async fn create_service_request(
        &self,
        input: &CreateServiceRequest,
    ) -> StoreResult<ServiceRequest>;
    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>>;
    async fn list_service_requests(
        &self,
        reported_by: Option<DbId>,
    ) -> StoreResult<Vec<ServiceRequest>>;
    async fn update_service_request_status(
        &self,
        id: DbId,
        status: ServiceRequestStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ServiceRequest>>;
    async fn assign_service_request(
        &self,
        id: DbId,
        assignee_id: DbId,
        status: ServiceRequestStatus,
    ) -> StoreResult<Option<ServiceRequest>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, input: &NewNotification) -> StoreResult<Notification>;
    /// Unread first, then newest first, at most `limit` rows.
    async fn list_notifications(
        &self,
        scope: &NotificationScope,
        limit: i64,
    ) -> StoreResult<Vec<Notification>>;
    async fn unread_count(&self, scope: &NotificationScope) -> StoreResult<i64>;
    async fn mark_read(&self, id: DbId) -> StoreResult<Option<Notification>>;
    /// Global: marks every unread row, whoever it is addressed to.
    async fn mark_all_read(&self) -> StoreResult<u64>;
    async fn delete_notification(&self, id: DbId) -> StoreResult<bool>;
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// One handle per store, cheaply cloneable.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub rooms: Arc<dyn RoomStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub service_requests: Arc<dyn ServiceRequestStore>,
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Every store backed by the same PostgreSQL pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self::from_shared(Arc::new(PgStore::new(pool)))
    }

    /// Every store backed by one shared in-process [`MemoryStore`].
    pub fn memory() -> Self {
        Self::from_shared(Arc::new(MemoryStore::new()))
    }

    /// Replace the notification store, e.g. with one that always fails.
    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationStore>) -> Self {
        self.notifications = notifications;
        self
    }

    fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore
            + RoomStore
            + BookingStore
            + PaymentStore
            + ServiceRequestStore
            + NotificationStore
            + 'static,
    {
        Self {
            users: store.clone(),
            rooms: store.clone(),
            bookings: store.clone(),
            payments: store.clone(),
            service_requests: store.clone(),
            notifications: store,
        }
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// Store implementation delegating to the `*Repo` query structs.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn set_account_status(
        &self,
        id: DbId,
        status: AccountStatus,
    ) -> StoreResult<Option<User>> {
        Ok(UserRepo::set_account_status(&self.pool, id, status).await?)
    }
}

#[async_trait]
impl RoomStore for PgStore {
    async fn create_room(&self, input: &CreateRoom) -> StoreResult<Room> {
        Ok(RoomRepo::create(&self.pool, input).await?)
    }

    async fn find_room(&self, id: DbId) -> StoreResult<Option<Room>> {
        Ok(RoomRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_rooms(&self) -> StoreResult<Vec<Room>> {
        Ok(RoomRepo::list(&self.pool).await?)
    }

    async fn update_room_status(
        &self,
        id: DbId,
        status: RoomStatus,
        is_available: bool,
    ) -> StoreResult<Option<Room>> {
        Ok(RoomRepo::update_status(&self.pool, id, status, is_available).await?)
    }

    async fn delete_room(&self, id: DbId) -> StoreResult<bool> {
        Ok(RoomRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn create_booking(&self, input: &CreateBooking) -> StoreResult<Booking> {
        BookingRepo::create(&self.pool, input)
            .await?
            .ok_or_else(|| StoreError::Duplicate(UQ_ACTIVE_BOOKING.to_string()))
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_bookings(&self, guest_id: Option<DbId>) -> StoreResult<Vec<Booking>> {
        Ok(BookingRepo::list(&self.pool, guest_id).await?)
    }

    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::update_status(&self.pool, id, status, completed_at).await?)
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn create_payment(&self, input: &CreatePayment) -> StoreResult<Payment> {
        PaymentRepo::create(&self.pool, input)
            .await?
            .ok_or_else(|| StoreError::Duplicate(UQ_OPEN_PAYMENT.to_string()))
    }

    async fn find_payment(&self, id: DbId) -> StoreResult<Option<Payment>> {
        Ok(PaymentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_payments(&self, user_id: Option<DbId>) -> StoreResult<Vec<Payment>> {
        Ok(PaymentRepo::list(&self.pool, user_id).await?)
    }

    async fn update_payment_status(
        &self,
        id: DbId,
        status: PaymentStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<Payment>> {
        Ok(PaymentRepo::update_status(&self.pool, id, status, completed_at).await?)
    }
}

#[async_trait]
impl ServiceRequestStore for PgStore {
    async fn create_service_request(
        &self,
        input: &CreateServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        Ok(ServiceRequestRepo::create(&self.pool, input).await?)
    }

    async fn find_service_request(&self, id: DbId) -> StoreResult<Option<ServiceRequest>> {
        Ok(ServiceRequestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_service_requests(
        &self,
        reported_by: Option<DbId>,
    ) -> StoreResult<Vec<ServiceRequest>> {
        Ok(ServiceRequestRepo::list(&self.pool, reported_by).await?)
    }

    async fn update_service_request_status(
        &self,
        id: DbId,
        status: ServiceRequestStatus,
        completed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ServiceRequest>> {
        Ok(ServiceRequestRepo::update_status(&self.pool, id, status, completed_at).await?)
    }

    async fn assign_service_request(
        &self,
        id: DbId,
        assignee_id: DbId,
        status: ServiceRequestStatus,
    ) -> StoreResult<Option<ServiceRequest>> {
        Ok(ServiceRequestRepo::assign(&self.pool, id, assignee_id, status).await?)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, input: &NewNotification) -> StoreResult<Notification> {
        Ok(NotificationRepo::create(&self.pool, input).await?)
    }

    async fn list_notifications(
        &self,
        scope: &NotificationScope,
        limit: i64,
    ) -> StoreResult<Vec<Notification>> {
        Ok(NotificationRepo::list_for_scope(&self.pool, scope, limit).await?)
    }

    async fn unread_count(&self, scope: &NotificationScope) -> StoreResult<i64> {
        Ok(NotificationRepo::unread_count(&self.pool, scope).await?)
    }

    async fn mark_read(&self, id: DbId) -> StoreResult<Option<Notification>> {
        Ok(NotificationRepo::mark_read(&self.pool, id).await?)
    }

    async fn mark_all_read(&self) -> StoreResult<u64> {
        Ok(NotificationRepo::mark_all_read(&self.pool).await?)
    }

    async fn delete_notification(&self, id: DbId) -> StoreResult<bool> {
        Ok(NotificationRepo::delete(&self.pool, id).await?)
    }
}
