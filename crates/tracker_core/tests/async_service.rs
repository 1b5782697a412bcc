use chrono::NaiveDate;
use tracker_core::db::open_db_in_memory;
use tracker_core::{
    AsyncTrackerService, NewTracker, ServiceError, TrackerConfig, TrackerFilter, TrackerKind,
    TrackerQuery, TrackerUpdate, Weekday,
};
use uuid::Uuid;

fn habit(name: &str, category: &str, days: &[Weekday]) -> NewTracker {
    NewTracker {
        name: name.to_string(),
        color: "#AA00AA".to_string(),
        emoji: "🌱".to_string(),
        schedule: days.iter().copied().collect(),
        kind: TrackerKind::Habit,
        category_title: category.to_string(),
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

#[tokio::test]
async fn async_facade_runs_full_flow() {
    let service = AsyncTrackerService::new(open_db_in_memory().unwrap());
    assert!(service.add_category("Health").await.unwrap());
    let run = service
        .add_tracker(habit("Run", "Health", &[Weekday::Mon]))
        .await
        .unwrap();

    assert!(service.complete_tracker(run.id, monday()).await.unwrap());
    assert!(service.toggle_pin(run.id).await.unwrap());

    let snapshot = service
        .fetch_trackers(monday(), TrackerFilter::Completed)
        .await
        .unwrap();
    assert_eq!(snapshot.categories.len(), 1);
    assert_eq!(snapshot.categories[0].title, "Pinned");
    assert_eq!(snapshot.completion_count(run.id), 1);
    assert_eq!(service.total_completed().await.unwrap(), 1);
    assert_eq!(service.completion_count(run.id).await.unwrap(), 1);
}

#[tokio::test]
async fn async_facade_surfaces_errors() {
    let service = AsyncTrackerService::new(open_db_in_memory().unwrap());
    let missing = Uuid::new_v4();

    let err = service
        .update_tracker(
            missing,
            TrackerUpdate {
                name: "x".to_string(),
                color: "#000000".to_string(),
                emoji: "x".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(service.search("").await, Err(ServiceError::EmptySearchTerm)));
    let err = service.delete_tracker(missing).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clones_share_one_store() {
    let service = AsyncTrackerService::from_config(&TrackerConfig::default()).unwrap();
    service.add_category("Study").await.unwrap();

    let writers: Vec<_> = ["Read", "Write", "Review"]
        .into_iter()
        .map(|name| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .add_tracker(habit(name, "Study", &[Weekday::Mon]))
                    .await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let mut query = TrackerQuery::for_date(monday());
    query.search = Some("re".to_string());
    let snapshot = service.query(query).await.unwrap();
    let names: Vec<_> = snapshot.trackers().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Read", "Review"]);
    assert_eq!(service.list_categories().await.unwrap(), vec!["Study"]);
    assert_eq!(service.list_trackers().await.unwrap().len(), 3);
}

#[tokio::test]
async fn configured_locale_orders_results() {
    let service = AsyncTrackerService::new(open_db_in_memory().unwrap())
        .with_locale("ru")
        .unwrap();
    service.add_category("Сад").await.unwrap();
    for name in ["Яблоня", "Ёлка"] {
        service
            .add_tracker(habit(name, "Сад", &[Weekday::Mon]))
            .await
            .unwrap();
    }

    let snapshot = service.search("л").await.unwrap();
    let names: Vec<_> = snapshot.trackers().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Ёлка", "Яблоня"]);

    assert!(matches!(
        AsyncTrackerService::new(open_db_in_memory().unwrap()).with_locale("not a locale"),
        Err(ServiceError::Collation(_))
    ));
}
