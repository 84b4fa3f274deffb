use anyhow::Result;
use serde_json::json;
use six_wraps::core::export::{write_csv_file, JobExport, CUSTOMER_COLUMNS, JOB_COLUMNS};
use six_wraps::core::list_view::ListState;
use six_wraps::domain::model::{Customer, Job, Metadata};
use six_wraps::LocalStorage;
use tempfile::TempDir;

fn customers() -> Vec<Customer> {
    (1..=10)
        .map(|i| {
            serde_json::from_value(json!({
                "_id": format!("c{i}"),
                "firstName": if i % 2 == 0 { "Ann" } else { "bob" },
                "lastName": format!("Smith {i:02}"),
                "email": format!("c{i}@example.com"),
                "phone": "555",
                "totalJobs": i
            }))
            .unwrap()
        })
        .collect()
}

#[test]
fn test_search_sort_and_page_customers() {
    let items = customers();

    let mut state = ListState::new(6);
    state.toggle_sort("totalJobs");
    state.toggle_sort("totalJobs");
    let page = state.apply(&items);
    let jobs: Vec<u64> = page.items.iter().map(|c| c.total_jobs).collect();
    assert_eq!(jobs, vec![10, 9, 8, 7, 6, 5]);
    assert_eq!(page.total_pages, 2);

    state.set_page(2);
    let page = state.apply(&items);
    let jobs: Vec<u64> = page.items.iter().map(|c| c.total_jobs).collect();
    assert_eq!(jobs, vec![4, 3, 2, 1]);

    state.set_search("ANN");
    assert_eq!(state.page(), 1);
    let page = state.apply(&items);
    assert_eq!(page.total_filtered, 5);
    assert!(page.items.iter().all(|c| c.first_name == "Ann"));
}

#[tokio::test]
async fn test_export_writes_every_match_not_just_the_page() -> Result<()> {
    let dir = TempDir::new()?;
    let items = customers();

    let mut state = ListState::new(2);
    state.set_search("bob");
    let rows: Vec<Customer> = state.matching(&items).into_iter().cloned().collect();

    let storage = LocalStorage::new(dir.path());
    let written = write_csv_file(&storage, "customers.csv", &rows, &CUSTOMER_COLUMNS).await?;
    assert_eq!(written, 5);

    let csv = tokio::fs::read_to_string(dir.path().join("customers.csv")).await?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("First Name,Last Name,Email,Phone,Organization,Franchise,Total Jobs")
    );
    assert_eq!(lines.next(), Some("bob,Smith 01,c1@example.com,555,,,1"));
    assert_eq!(csv.lines().count(), 6);
    Ok(())
}

#[tokio::test]
async fn test_job_export_labels_status_and_quotes_commas() -> Result<()> {
    let dir = TempDir::new()?;
    let job: Job = serde_json::from_value(json!({
        "_id": "j1",
        "jobId": "JOB-7",
        "customer": { "firstName": "Lee, Jr.", "lastName": "Park" },
        "services": [{ "_id": "s1", "name": "Tint" }, { "_id": "s2", "name": "Wrap" }],
        "status": "completed",
        "paymentAmount": 300
    }))?;
    let metadata: Metadata = serde_json::from_value(json!({
        "statuses": [{ "label": "Done", "value": "completed" }]
    }))?;

    let rows = vec![JobExport {
        job: &job,
        metadata: Some(&metadata),
    }];
    write_csv_file(&LocalStorage::new(dir.path()), "jobs.csv", &rows, &JOB_COLUMNS).await?;

    let csv = tokio::fs::read_to_string(dir.path().join("jobs.csv")).await?;
    let row = csv.lines().nth(1).unwrap();
    assert_eq!(row, "JOB-7,\"Lee, Jr. Park\",\"Tint, Wrap\",,300,Done,");
    Ok(())
}
