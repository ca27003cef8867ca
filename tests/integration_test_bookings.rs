mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::{json, Value};
use std::sync::Arc;
use team_booking::domain::models::booking::{Booking, NewBookingParams, STATUS_CONFIRMED};
use team_booking::error::AppError;

fn future_date(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

fn booking_payload(resource_id: &str, date: &str, time: &str) -> Value {
    json!({
        "resource_id": resource_id,
        "title": "Project Kickoff",
        "organizer": "Sarah Lee",
        "member_id": "USR001",
        "date": date,
        "time": time
    })
}

#[tokio::test]
async fn test_free_resource_booking_is_confirmed() {
    let app = TestApp::new().await;
    let date = future_date(2);

    let res = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, "10:00")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(body["resource_id"], "RES001");
    assert_eq!(body["organizer"], "Sarah Lee");
    assert!(body["reference_code"].as_str().unwrap().starts_with("BK-"));

    let id = body["id"].as_str().unwrap();
    let fetched = parse_body(app.get(&format!("/api/v1/bookings/{}", id)).await).await;
    assert_eq!(fetched["title"], "Project Kickoff");
}

#[tokio::test]
async fn test_paid_resource_booking_starts_pending_and_can_be_confirmed() {
    let app = TestApp::new().await;
    let date = future_date(3);

    let res = app.post_json("/api/v1/bookings", &booking_payload("RES004", &date, "14:00")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "PENDING");

    let id = body["id"].as_str().unwrap().to_string();
    let res = app.post_json(&format!("/api/v1/bookings/{}/confirm", id), &json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "CONFIRMED");

    let res = app.post_json(&format!("/api/v1/bookings/{}/confirm", id), &json!({})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected_until_cancelled() {
    let app = TestApp::new().await;
    let date = future_date(2);

    let first = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, "11:00")).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_id = parse_body(first).await["id"].as_str().unwrap().to_string();

    let clash = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, "11:30")).await;
    assert_eq!(clash.status(), StatusCode::CONFLICT);

    // other resources are independent
    let other = app.post_json("/api/v1/bookings", &booking_payload("RES002", &date, "11:30")).await;
    assert_eq!(other.status(), StatusCode::OK);

    let res = app.post_json(&format!("/api/v1/bookings/{}/cancel", first_id), &json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "CANCELLED");

    let res = app.post_json(&format!("/api/v1/bookings/{}/cancel", first_id), &json!({})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let retry = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, "11:30")).await;
    assert_eq!(retry.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_validation() {
    let app = TestApp::new().await;
    let date = future_date(2);

    let res = app.post_json("/api/v1/bookings", &booking_payload("RES999", &date, "10:00")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let mut unknown_member = booking_payload("RES001", &date, "10:00");
    unknown_member["member_id"] = json!("USR999");
    let res = app.post_json("/api/v1/bookings", &unknown_member).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let mut blank_title = booking_payload("RES001", &date, "10:00");
    blank_title["title"] = json!("   ");
    let res = app.post_json("/api/v1/bookings", &blank_title).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post_json("/api/v1/bookings", &booking_payload("RES001", "04/03/2030", "10:00")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, "10am")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let past = (Utc::now() - Duration::days(2)).format("%Y-%m-%d").to_string();
    let res = app.post_json("/api/v1/bookings", &booking_payload("RES001", &past, "10:00")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut zero = booking_payload("RES001", &date, "10:00");
    zero["duration_min"] = json!(0);
    let res = app.post_json("/api/v1/bookings", &zero).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for duration in [541, 100_000, i32::MAX] {
        let mut huge = booking_payload("RES001", &date, "10:00");
        huge["duration_min"] = json!(duration);
        let res = app.post_json("/api/v1/bookings", &huge).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "duration {}", duration);
    }

    let mut whole_day = booking_payload("RES001", &date, "09:00");
    whole_day["duration_min"] = json!(540);
    let res = app.post_json("/api/v1/bookings", &whole_day).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_booking_body_is_bad_request() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/bookings", &json!({"resource_id": "RES001", "title": "t"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].is_string());

    let mut wrong_type = booking_payload("RES001", &future_date(2), "10:00");
    wrong_type["duration_min"] = json!("sixty");
    let res = app.post_json("/api/v1/bookings", &wrong_type).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(parse_body(app.get("/api/v1/bookings").await).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_off_grid_and_after_hours_times_are_rejected() {
    let app = TestApp::new().await;
    let date = future_date(2);

    for time in ["10:15", "08:00", "17:30", "19:00"] {
        let res = app.post_json("/api/v1/bookings", &booking_payload("RES001", &date, time)).await;
        assert_eq!(res.status(), StatusCode::CONFLICT, "time {}", time);
    }

    // 17:00 for 90 minutes would run past closing
    let mut late = booking_payload("RES001", &date, "17:00");
    late["duration_min"] = json!(90);
    let res = app.post_json("/api/v1/bookings", &late).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rfc3339_time_is_accepted() {
    let app = TestApp::new().await;
    let date = future_date(4);

    let res = app.post_json(
        "/api/v1/bookings",
        &booking_payload("RES002", &date, &format!("{}T15:30:00Z", date)),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert!(body["start_time"].as_str().unwrap().contains("15:30:00"));
}

#[tokio::test]
async fn test_rfc3339_time_on_another_date_is_rejected() {
    let app = TestApp::new().await;
    let date = future_date(2);
    let other_day = future_date(5);

    let res = app.post_json(
        "/api/v1/bookings",
        &booking_payload("RES001", &date, &format!("{}T10:00:00Z", other_day)),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post_json(
        "/api/v1/bookings",
        &booking_payload("RES001", &date, &format!("{}T13:00:00+02:00", date)),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    // the offset is honoured, not dropped
    let body = parse_body(res).await;
    assert!(body["start_time"].as_str().unwrap().contains("11:00:00"));

    assert_eq!(parse_body(app.get("/api/v1/bookings").await).await.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_for_one_slot_book_it_once() {
    let app = Arc::new(TestApp::new().await);
    let date = future_date(2);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let app = app.clone();
        let payload = booking_payload("RES001", &date, "10:00");
        handles.push(tokio::spawn(async move {
            app.post_json("/api/v1/bookings", &payload).await.status()
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);

    let stored = parse_body(app.get("/api/v1/bookings?resource_id=RES001").await).await;
    assert_eq!(stored.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repository_refuses_overlapping_insert() {
    let app = TestApp::new().await;
    let start = Utc::now() + Duration::days(2);

    let booking = |offset_min: i64| Booking::new(NewBookingParams {
        resource_id: "RES001".into(),
        member_id: None,
        title: "Standup".into(),
        organizer: "John Doe".into(),
        start: start + Duration::minutes(offset_min),
        duration_min: 60,
        status: STATUS_CONFIRMED,
    });

    let repo = &app.state.booking_repo;
    repo.create(&booking(0)).await.unwrap();

    let clash = repo.create(&booking(30)).await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    // touching the end is not an overlap
    repo.create(&booking(60)).await.unwrap();
    assert_eq!(repo.list(Some("RES001")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_bookings_filtered_and_ordered() {
    let app = TestApp::new().await;
    let date = future_date(2);

    for (resource, time) in [("RES001", "15:00"), ("RES002", "09:00"), ("RES001", "09:00")] {
        let res = app.post_json("/api/v1/bookings", &booking_payload(resource, &date, time)).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let all = parse_body(app.get("/api/v1/bookings").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let room_a = parse_body(app.get("/api/v1/bookings?resource_id=RES001").await).await;
    let room_a = room_a.as_array().unwrap();
    assert_eq!(room_a.len(), 2);
    assert!(room_a[0]["start_time"].as_str().unwrap() < room_a[1]["start_time"].as_str().unwrap());

    let res = app.get("/api/v1/bookings/does-not-exist").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
