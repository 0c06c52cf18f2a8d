use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::models::{Attendee, BulkCheckInSummary, NewAttendee};
use crate::storage::Store;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct AttendeeService {
    store: Arc<dyn Store>,
}

impl AttendeeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers an attendee against an event with a free seat.
    ///
    /// Fails with `NotFound` for an unknown event, `CapacityExceeded` when the
    /// event is full and `DuplicateEmail` when the email is already taken.
    #[tracing::instrument(skip_all, fields(event_id = new_attendee.event_id))]
    pub async fn register_attendee(&self, new_attendee: NewAttendee) -> Result<Attendee, AppError> {
        let attendee = self.store.register_attendee(new_attendee).await?;
        info!(attendee_id = attendee.attendee_id, "Attendee registered");
        Ok(attendee)
    }

    /// Marks the attendee as present. Checking in twice is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn check_in(&self, attendee_id: i64) -> Result<Attendee, AppError> {
        let attendee = self
            .store
            .check_in(attendee_id)
            .await?
            .ok_or_else(|| AppError::attendee_not_found(attendee_id))?;

        info!("Attendee checked in");
        Ok(attendee)
    }

    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        Ok(self.store.attendees_for_event(event_id).await?)
    }

    /// Checks in every known attendee in `attendee_ids`.
    ///
    /// Unknown ids do not fail the batch; they are listed in the summary.
    #[tracing::instrument(skip_all, fields(rows = attendee_ids.len()))]
    pub async fn bulk_check_in(
        &self,
        attendee_ids: &[i64],
    ) -> Result<BulkCheckInSummary, AppError> {
        let mut seen = HashSet::new();
        let unique_ids: Vec<i64> = attendee_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let found: HashSet<i64> = self
            .store
            .check_in_many(&unique_ids)
            .await?
            .into_iter()
            .collect();

        let (checked_in, not_found): (Vec<i64>, Vec<i64>) =
            unique_ids.into_iter().partition(|id| found.contains(id));

        if !not_found.is_empty() {
            tracing::warn!(?not_found, "Bulk check-in skipped unknown attendees");
        }
        info!(checked_in = checked_in.len(), "Bulk check-in completed");

        Ok(BulkCheckInSummary {
            rows: attendee_ids.len(),
            checked_in,
            not_found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEvent;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    async fn setup(max_attendees: i32) -> (AttendeeService, i64) {
        let store = Arc::new(MemoryStore::new());
        let event = store
            .insert_event(NewEvent {
                name: "Launch party".to_string(),
                description: "Product launch".to_string(),
                start_time: Utc.with_ymd_and_hms(2025, 11, 20, 19, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2025, 11, 20, 23, 0, 0).unwrap(),
                location: "Amsterdam".to_string(),
                max_attendees,
            })
            .await
            .unwrap();
        (AttendeeService::new(store), event.event_id)
    }

    fn registration(event_id: i64, email: &str) -> NewAttendee {
        NewAttendee {
            event_id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            phone_number: "+31 6 0000 0000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_registration_up_to_capacity() {
        let (service, event_id) = setup(2).await;

        for email in ["a@example.com", "b@example.com"] {
            let attendee = service
                .register_attendee(registration(event_id, email))
                .await
                .unwrap();
            assert!(!attendee.check_in_status);
            assert_eq!(attendee.event_id, event_id);
        }

        let err = service
            .register_attendee(registration(event_id, "c@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));
    }

    #[tokio::test]
    async fn test_registration_for_unknown_event_is_not_found() {
        let (service, _) = setup(2).await;
        let err = service
            .register_attendee(registration(77, "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (service, event_id) = setup(5).await;
        service
            .register_attendee(registration(event_id, "grace@example.com"))
            .await
            .unwrap();

        let err = service
            .register_attendee(registration(event_id, "grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_check_in_is_idempotent() {
        let (service, event_id) = setup(5).await;
        let attendee = service
            .register_attendee(registration(event_id, "grace@example.com"))
            .await
            .unwrap();

        let first = service.check_in(attendee.attendee_id).await.unwrap();
        let second = service.check_in(attendee.attendee_id).await.unwrap();
        assert!(first.check_in_status);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_check_in_unknown_attendee_is_not_found() {
        let (service, _) = setup(5).await;
        let err = service.check_in(12).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_attendees_includes_everyone() {
        let (service, event_id) = setup(5).await;
        let first = service
            .register_attendee(registration(event_id, "a@example.com"))
            .await
            .unwrap();
        service
            .register_attendee(registration(event_id, "b@example.com"))
            .await
            .unwrap();
        service.check_in(first.attendee_id).await.unwrap();

        let attendees = service.list_attendees(event_id).await.unwrap();
        assert_eq!(attendees.len(), 2);
        assert_eq!(attendees.iter().filter(|a| a.check_in_status).count(), 1);

        assert!(service.list_attendees(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_check_in_reports_unknown_ids() {
        let (service, event_id) = setup(5).await;
        let a = service
            .register_attendee(registration(event_id, "a@example.com"))
            .await
            .unwrap();
        let b = service
            .register_attendee(registration(event_id, "b@example.com"))
            .await
            .unwrap();

        let summary = service
            .bulk_check_in(&[a.attendee_id, 500, b.attendee_id, a.attendee_id])
            .await
            .unwrap();

        assert_eq!(
            summary,
            BulkCheckInSummary {
                rows: 4,
                checked_in: vec![a.attendee_id, b.attendee_id],
                not_found: vec![500],
            }
        );
        assert!(service
            .list_attendees(event_id)
            .await
            .unwrap()
            .iter()
            .all(|attendee| attendee.check_in_status));
    }
}
