use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

use super::{Store, StoreError, StoreResult};
use crate::models::{Attendee, Event, EventFilter, EventStatus, NewAttendee, NewEvent};

const EVENT_COLUMNS: &str =
    "event_id, name, description, start_time, end_time, location, max_attendees, status";

const ATTENDEE_COLUMNS: &str =
    "attendee_id, first_name, last_name, email, phone_number, event_id, check_in_status";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

fn map_attendee_insert_error(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (name, description, start_time, end_time, location, max_attendees)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.location)
        .bind(event.max_attendees)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_event(&self, event_id: i64) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn update_event_status(
        &self,
        event_id: i64,
        status: EventStatus,
    ) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET status = $2 WHERE event_id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn query_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE TRUE"));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(location) = filter.location() {
            query.push(" AND location = ").push_bind(location.to_string());
        }
        if let Some((from, until)) = filter.day_window() {
            query
                .push(" AND start_time >= ")
                .push_bind(from)
                .push(" AND end_time <= ")
                .push_bind(until);
        }
        query.push(" ORDER BY event_id");

        let events = query
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn register_attendee(&self, attendee: NewAttendee) -> StoreResult<Attendee> {
        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        // Row lock serializes registrations for the same event until commit.
        let max_attendees: i32 = sqlx::query_scalar(
            "SELECT max_attendees FROM events WHERE event_id = $1 FOR UPDATE",
        )
        .bind(attendee.event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::EventNotFound(attendee.event_id))?;

        let registered: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
                .bind(attendee.event_id)
                .fetch_one(&mut *tx)
                .await?;

        if registered >= i64::from(max_attendees) {
            return Err(StoreError::EventFull {
                event_id: attendee.event_id,
                max_attendees,
            });
        }

        let created = sqlx::query_as::<_, Attendee>(&format!(
            "INSERT INTO attendees (first_name, last_name, email, phone_number, event_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(&attendee.first_name)
        .bind(&attendee.last_name)
        .bind(&attendee.email)
        .bind(&attendee.phone_number)
        .bind(attendee.event_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_attendee_insert_error(e, &attendee.email))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn check_in(&self, attendee_id: i64) -> StoreResult<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "UPDATE attendees SET check_in_status = TRUE
             WHERE attendee_id = $1
             RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(attendee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    async fn check_in_many(&self, attendee_ids: &[i64]) -> StoreResult<Vec<i64>> {
        if attendee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let checked_in: Vec<i64> = sqlx::query_scalar(
            "UPDATE attendees SET check_in_status = TRUE
             WHERE attendee_id = ANY($1)
             RETURNING attendee_id",
        )
        .bind(attendee_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(checked_in)
    }

    async fn attendees_for_event(&self, event_id: i64) -> StoreResult<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 ORDER BY attendee_id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }
}
