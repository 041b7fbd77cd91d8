use chrono::NaiveDate;
use std::fs;
use worklog_core::{
    CsvRecordStore, MemoryRecordStore, PagerAction, PagerState, SearchError, SearchQuery,
    Task, TaskField, ValidationError, WorkLogService,
};

fn date(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn adding_to_empty_store_produces_one_row_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("work_log.csv");
    let service = WorkLogService::new(CsvRecordStore::new(&path));
    assert!(!service.has_log());

    let task = Task::from_raw("05/05/2024", "Fix bug", "45", "").unwrap();
    let position = service.add(task.clone()).unwrap();

    assert_eq!(position, 0);
    assert!(service.has_log());
    let table = service.load().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0), Some(&task));

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().next(), Some("date,title,duration,notes"));
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn add_appends_after_existing_rows() {
    let service = WorkLogService::new(MemoryRecordStore::new());

    service
        .add(Task::new(date(1, 1, 2023), "Standup", 15, ""))
        .unwrap();
    let position = service
        .add(Task::new(date(2, 1, 2023), "Review", 30, ""))
        .unwrap();

    assert_eq!(position, 1);
    let titles = service
        .load()
        .unwrap()
        .into_tasks()
        .into_iter()
        .map(|task| task.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Standup", "Review"]);
}

#[test]
fn search_reads_current_storage_each_time() {
    let service = WorkLogService::new(MemoryRecordStore::new());
    let query = SearchQuery::keyword("Review");

    assert!(service.search(&query).unwrap().is_empty());

    service
        .add(Task::new(date(2, 1, 2023), "Review", 30, ""))
        .unwrap();
    assert_eq!(service.search(&query).unwrap().len(), 1);
}

#[test]
fn search_surfaces_invalid_pattern_as_validation() {
    let service = WorkLogService::new(MemoryRecordStore::new());

    let err = service
        .search(&SearchQuery::Pattern("(".to_string()))
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Validation(ValidationError::InvalidPattern { .. })
    ));
}

#[test]
fn search_surfaces_corrupt_storage_as_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("work_log.csv");
    fs::write(&path, "date,title,duration,notes\nyesterday,Standup,15,\n").unwrap();
    let service = WorkLogService::new(CsvRecordStore::new(&path));

    let err = service.search(&SearchQuery::keyword("Standup")).unwrap_err();
    assert!(matches!(err, SearchError::Store(_)));
}

#[test]
fn distinct_dates_come_from_storage() {
    let service = WorkLogService::new(MemoryRecordStore::new());
    service
        .add(Task::new(date(2, 1, 2023), "Review", 30, ""))
        .unwrap();
    service
        .add(Task::new(date(1, 1, 2023), "Standup", 15, ""))
        .unwrap();
    service
        .add(Task::new(date(2, 1, 2023), "Deploy", 30, ""))
        .unwrap();

    assert_eq!(
        service.distinct_dates().unwrap(),
        vec![date(1, 1, 2023), date(2, 1, 2023)]
    );
}

#[test]
fn search_edit_and_delete_round_trip_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let service = WorkLogService::new(CsvRecordStore::new(dir.path().join("work_log.csv")));
    service
        .add(Task::new(date(1, 1, 2023), "Standup", 15, ""))
        .unwrap();
    service
        .add(Task::new(date(2, 1, 2023), "Review", 30, "PR 7"))
        .unwrap();
    service
        .add(Task::new(date(3, 1, 2023), "Deploy", 30, ""))
        .unwrap();

    let rows = service
        .search(&SearchQuery::exact_duration("30").unwrap())
        .unwrap();
    let mut pager = service.pager(rows);
    pager.apply(PagerAction::Next).unwrap();
    pager.apply(PagerAction::Edit).unwrap();
    pager.edit(TaskField::Date, "04/01/2023").unwrap();
    assert_eq!(pager.state(), PagerState::Viewing(1));
    assert_eq!(service.load().unwrap().get(2).unwrap().date, date(4, 1, 2023));

    pager.apply(PagerAction::Previous).unwrap();
    pager.apply(PagerAction::Delete).unwrap();
    pager.acknowledge().unwrap();

    let titles = service
        .load()
        .unwrap()
        .into_tasks()
        .into_iter()
        .map(|task| task.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Standup", "Deploy"]);
}
