//! Report, rating and assignment endpoints.

use std::io::Cursor;

use calamine::{Reader, Xlsx};
use chrono::{Duration, Local, NaiveDateTime};
use reqwest::StatusCode;
use serde_json::{json, Value};

use report_portal::store::{RowStore, Table};

mod common;

async fn submit(app: &common::TestApp, path: &str, body: Value) -> reqwest::Response {
    app.client.post(app.url(path)).json(&body).send().await.unwrap()
}

#[tokio::test]
async fn test_submitted_report_is_listed() {
    let app = common::spawn_app().await;

    let res = submit(&app, "/api/report", json!({"lecturer_name": "Smith", "course": "CS101"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json, json!({"message": "Report submitted"}));

    let listed: Vec<Value> = app
        .client
        .get(app.url("/api/reports"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.contains(&json!({"lecturer_name": "Smith", "course": "CS101"})));
}

#[tokio::test]
async fn test_search_by_lecturer_substring() {
    let app = common::spawn_app().await;
    submit(&app, "/api/report", json!({"lecturer_name": "Smith", "course": "CS101"})).await;
    submit(&app, "/api/report", json!({"lecturer_name": "Jones", "course": "CS102"})).await;

    let search = |needle: &'static str| {
        let request = app
            .client
            .get(app.url("/api/search-report"))
            .query(&[("lecturer_name", needle)]);
        async move { request.send().await.unwrap().json::<Vec<Value>>().await.unwrap() }
    };

    let found = search("mit").await;
    assert_eq!(found, vec![json!({"lecturer_name": "Smith", "course": "CS101"})]);

    assert!(search("zzz").await.is_empty());
    assert_eq!(search("").await.len(), 2);

    let without_param: Vec<Value> = app
        .client
        .get(app.url("/api/search-report"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(without_param.len(), 2);
}

#[tokio::test]
async fn test_rating_is_stamped_with_submission_time() {
    let app = common::spawn_app().await;

    let before = Local::now().naive_local() - Duration::milliseconds(1);
    let res = submit(&app, "/api/rating", json!({"score": 5})).await;
    let after = Local::now().naive_local();

    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["message"], "Rating submitted");

    let rows = app.store.fetch_all(Table::Rating).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["score"], json!(5));

    let stamped = rows[0]["date_submitted"].as_str().unwrap();
    let stamped = NaiveDateTime::parse_from_str(stamped, "%Y-%m-%d %H:%M:%S%.3f").unwrap();
    assert!(before <= stamped && stamped <= after, "{stamped} outside [{before}, {after}]");
}

#[tokio::test]
async fn test_rating_overrides_client_timestamp() {
    let app = common::spawn_app().await;
    submit(&app, "/api/rating", json!({"score": 3, "date_submitted": "1999-01-01"})).await;

    let rows = app.store.fetch_all(Table::Rating).await.unwrap();
    assert_ne!(rows[0]["date_submitted"], json!("1999-01-01"));
}

#[tokio::test]
async fn test_assign_course() {
    let app = common::spawn_app().await;

    let res = submit(&app, "/api/assign-course", json!({"course_code": "CS101", "lecturer": "Smith"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json, json!({"message": "Course assigned"}));

    let rows = app.store.fetch_all(Table::Assignment).await.unwrap();
    assert_eq!(rows, vec![json!({"course_code": "CS101", "lecturer": "Smith"}).as_object().cloned().unwrap()]);
}

#[tokio::test]
async fn test_free_form_bodies_are_checked_before_insert() {
    let app = common::spawn_app().await;

    let res = submit(&app, "/api/report", json!(["not", "an", "object"])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["message"], "Invalid request body");

    let res = submit(&app, "/api/assign-course", json!({"course`) VALUES (1); --": "x"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["message"], "Invalid field name");

    assert!(app.store.fetch_all(Table::Report).await.unwrap().is_empty());
    assert!(app.store.fetch_all(Table::Assignment).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_report_is_insert_failure() {
    let app = common::spawn_app().await;
    let res = submit(&app, "/api/report", json!({})).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["message"], "Report failed");
}

#[tokio::test]
async fn test_download_on_empty_table_fails() {
    let app = common::spawn_app().await;
    let res = app.client.get(app.url("/api/download-report")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Error generating Excel");
}

#[tokio::test]
async fn test_download_produces_workbook() {
    let app = common::spawn_app().await;
    submit(&app, "/api/report", json!({"lecturer_name": "Smith", "course": "CS101", "score": 4})).await;
    submit(&app, "/api/report", json!({"lecturer_name": "Jones", "course": "CS102", "score": 5})).await;

    let res = app.client.get(app.url("/api/download-report")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=reports.xlsx"
    );

    let bytes = res.bytes().await.unwrap().to_vec();
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Reports").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(ToString::to_string).collect())
        .collect();

    assert_eq!(rows[0], vec!["lecturer_name", "course", "score"]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], "Smith");
    assert_eq!(rows[2][1], "CS102");
}
