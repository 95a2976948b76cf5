//! Repository Integration Tests
//!
//! Tests for the per-domain cache repositories with an in-memory
//! SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{
        Activity, Debt, DebtStatus, Event, EventType, Identity, Location, Notification,
        NotificationKind, Organizer, Outing, OutingStatus, TicketType,
    };
    use crate::repository::{
        init_db, CacheRepository, EventRepository, IdentityRepository, NotificationRepository,
        OutingRepository,
    };
    use std::path::PathBuf;

    async fn test_db() -> crate::repository::DbState {
        let db_path = PathBuf::from(":memory:");
        init_db(&db_path).await.expect("Failed to init test DB")
    }

    fn event(id: &str, title: &str) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            event_type: EventType::Concert,
            location: Location {
                name: "Arena".to_string(),
                address: "1 Main St".to_string(),
                coordinates: Some("51.5074,-0.1278".to_string()),
            },
            date: 1_750_000_000_000,
            organizer: Organizer {
                name: "Org".to_string(),
                phone: "+440000".to_string(),
                email: "org@example.com".to_string(),
            },
            capacity: 500,
            sold: 120,
            amenities: vec!["parking".to_string()],
            requirements: vec!["18+".to_string()],
            ticket_types: vec![TicketType {
                name: "GA".to_string(),
                price: 30.0,
                total_quantity: 400,
                sold_quantity: 100,
            }],
            weather: "clear".to_string(),
            created_at: Some(1_749_000_000_000),
            updated_at: Some(1_749_500_000_000),
        }
    }

    fn outing(id: &str) -> Outing {
        Outing {
            id: id.to_string(),
            title: "Weekend trip".to_string(),
            description: String::new(),
            owner: "ada".to_string(),
            participants: vec!["ada".to_string(), "ben".to_string()],
            activities: vec![Activity {
                id: format!("{}-a1", id),
                outing_id: id.to_string(),
                title: "Dinner".to_string(),
                description: String::new(),
                amount: 80.0,
                payer: "ada".to_string(),
                participants: vec!["ada".to_string(), "ben".to_string()],
                references: vec!["receipt-1".to_string()],
                created_at: Some(1_750_000_000_000),
                updated_at: None,
            }],
            event_ids: vec!["e1".to_string()],
            debts: vec![Debt {
                id: format!("{}-d1", id),
                outing_id: id.to_string(),
                from_user: "ben".to_string(),
                to_user: "ada".to_string(),
                amount: 40.0,
                status: DebtStatus::Pending,
            }],
            status: OutingStatus::Unsettled,
            created_at: Some(1_750_000_000_000),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_event_replace_all_mirrors_remote() {
        let db = test_db().await;
        let repo = EventRepository::new(db.handle());

        repo.replace_all(&[event("e1", "First"), event("e2", "Second")])
            .await
            .expect("replace failed");
        repo.replace_all(&[event("e2", "Second v2"), event("e3", "Third")])
            .await
            .expect("replace failed");

        let events = repo.list().await.expect("list failed");
        let mut ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["e2", "e3"]);
        let e2 = events.iter().find(|e| e.id == "e2").unwrap();
        assert_eq!(e2.title, "Second v2");
    }

    #[tokio::test]
    async fn test_event_replace_all_is_idempotent() {
        let db = test_db().await;
        let repo = EventRepository::new(db.handle());
        let batch = vec![event("e1", "A"), event("e2", "B"), event("e3", "C")];

        repo.replace_all(&batch).await.expect("replace failed");
        repo.replace_all(&batch).await.expect("replace failed");

        let events = repo.list().await.expect("list failed");
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn test_event_fields_survive_round_trip() {
        let db = test_db().await;
        let repo = EventRepository::new(db.handle());

        repo.replace_all(&[event("e1", "Round trip")])
            .await
            .expect("replace failed");
        let stored = &repo.list().await.expect("list failed")[0];

        assert_eq!(stored.event_type, EventType::Concert);
        assert_eq!(stored.location.coordinates.as_deref(), Some("51.5074,-0.1278"));
        assert_eq!(stored.capacity, 500);
        assert_eq!(stored.ticket_types.len(), 1);
        assert_eq!(stored.ticket_types[0].available(), 300);
        assert_eq!(stored.amenities, vec!["parking".to_string()]);
        assert_eq!(stored.created_at, Some(1_749_000_000_000));
    }

    #[tokio::test]
    async fn test_empty_replace_clears_cache() {
        let db = test_db().await;
        let repo = EventRepository::new(db.handle());

        repo.replace_all(&[event("e1", "A")]).await.expect("replace failed");
        repo.replace_all(&[]).await.expect("replace failed");

        assert!(repo.list().await.expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn test_event_upsert_leaves_other_rows() {
        let db = test_db().await;
        let repo = EventRepository::new(db.handle());

        repo.replace_all(&[event("e1", "A"), event("e2", "B")])
            .await
            .expect("replace failed");
        repo.upsert(&event("e2", "B v2")).await.expect("upsert failed");

        let events = repo.list().await.expect("list failed");
        assert_eq!(events.len(), 2);
        assert_eq!(
            events.iter().find(|e| e.id == "e2").unwrap().title,
            "B v2"
        );
    }

    #[tokio::test]
    async fn test_identity_is_exclusive() {
        let db = test_db().await;
        let repo = IdentityRepository::new(db.handle());

        repo.upsert(&Identity::new(
            "u1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            String::new(),
            "tok-old".to_string(),
        ))
        .await
        .expect("save failed");
        repo.upsert(&Identity::new(
            "u2".to_string(),
            "Ben".to_string(),
            "ben@example.com".to_string(),
            String::new(),
            "tok-new".to_string(),
        ))
        .await
        .expect("save failed");

        let rows = repo.list().await.expect("list failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "u2");
        assert_eq!(rows[0].token, "tok-new");
    }

    #[tokio::test]
    async fn test_identity_clear_removes_session() {
        let db = test_db().await;
        let repo = IdentityRepository::new(db.handle());

        repo.upsert(&Identity::new(
            "u1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            String::new(),
            "tok".to_string(),
        ))
        .await
        .expect("save failed");
        repo.clear().await.expect("clear failed");

        assert!(repo.list().await.expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn test_outing_children_round_trip() {
        let db = test_db().await;
        let repo = OutingRepository::new(db.handle());

        repo.replace_all(&[outing("o1")]).await.expect("replace failed");
        let outings = repo.list().await.expect("list failed");

        assert_eq!(outings.len(), 1);
        let o = &outings[0];
        assert_eq!(o.activities.len(), 1);
        assert_eq!(o.activities[0].amount, 80.0);
        assert_eq!(o.activities[0].references, vec!["receipt-1".to_string()]);
        assert_eq!(o.debts.len(), 1);
        assert_eq!(o.debts[0].status, DebtStatus::Pending);
        assert_eq!(o.status, OutingStatus::Unsettled);
    }

    #[tokio::test]
    async fn test_outing_replace_drops_orphaned_children() {
        let db = test_db().await;
        let repo = OutingRepository::new(db.handle());

        repo.replace_all(&[outing("o1"), outing("o2")])
            .await
            .expect("replace failed");
        repo.replace_all(&[outing("o2")]).await.expect("replace failed");

        let outings = repo.list().await.expect("list failed");
        assert_eq!(outings.len(), 1);
        assert_eq!(outings[0].id, "o2");
        // o1's children must not linger in the child tables
        assert_eq!(outings[0].activities.len(), 1);
        assert_eq!(outings[0].activities[0].outing_id, "o2");
    }

    #[tokio::test]
    async fn test_notification_read_marker_round_trip() {
        let db = test_db().await;
        let repo = NotificationRepository::new(db.handle());

        let mut n = Notification {
            id: "n1".to_string(),
            kind: NotificationKind::DebtReminder,
            title: "You owe Ada".to_string(),
            message: "40.00 outstanding".to_string(),
            reference_id: "o1-d1".to_string(),
            sent_at: 1_750_000_000_000,
            read_at: None,
        };
        repo.replace_all(std::slice::from_ref(&n)).await.expect("replace failed");
        assert!(!repo.list().await.expect("list failed")[0].is_read());

        n.read_at = Some(1_750_000_100_000);
        repo.upsert(&n).await.expect("upsert failed");
        let rows = repo.list().await.expect("list failed");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_read());
        assert_eq!(rows[0].kind, NotificationKind::DebtReminder);
    }
}
