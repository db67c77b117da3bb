use chrono::{Duration, Utc};
use pawtrack_common::{BathroomType, Consistency};

use crate::common::{TestApp, routes};

fn series(body: &serde_json::Value, path: &[&str]) -> Vec<u64> {
    let mut node = &body["data"];
    for key in path {
        node = &node[*key];
    }
    node.as_array()
        .expect("series should be an array")
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn empty_store_yields_seven_zeroed_days() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::BATHROOM_STATS).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.data()["labels"].as_array().unwrap().len(), 7);
    for path in [
        &["pee"][..],
        &["poop"],
        &["consistency", "normal"],
        &["consistency", "soft"],
        &["consistency", "hard"],
    ] {
        assert_eq!(series(&res.body, path), [0; 7], "{path:?}");
    }
}

#[tokio::test]
async fn last_label_is_today() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::BATHROOM_STATS).await;

    let today = Utc::now().format("%a").to_string();
    assert_eq!(res.data()["labels"][6], today.as_str());
}

#[tokio::test]
async fn buckets_logs_by_days_ago() {
    let app = TestApp::spawn().await;
    let dog = app.create_dog("Rex", "Labrador").await;
    let now = Utc::now();

    app.insert_bathroom_log(&dog, BathroomType::Pee, None, now - Duration::hours(25))
        .await;
    app.insert_bathroom_log(&dog, BathroomType::Pee, None, now - Duration::hours(73))
        .await;
    app.insert_bathroom_log(&dog, BathroomType::Pee, None, now - Duration::days(8))
        .await;

    let res = app.get(routes::BATHROOM_STATS).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(series(&res.body, &["pee"]), [0, 0, 0, 1, 0, 1, 0]);
    assert_eq!(series(&res.body, &["poop"]), [0; 7]);
}

#[tokio::test]
async fn tallies_consistency_for_poop_events_only() {
    let app = TestApp::spawn().await;
    let dog = app.create_dog("Rex", "Labrador").await;
    let recent = Utc::now() - Duration::hours(2);

    app.insert_bathroom_log(&dog, BathroomType::Poop, Some(Consistency::Normal), recent)
        .await;
    app.insert_bathroom_log(&dog, BathroomType::Both, Some(Consistency::Soft), recent)
        .await;
    app.insert_bathroom_log(&dog, BathroomType::Poop, Some(Consistency::Watery), recent)
        .await;
    app.insert_bathroom_log(&dog, BathroomType::Pee, Some(Consistency::Hard), recent)
        .await;

    let res = app.get(routes::BATHROOM_STATS).await;

    assert_eq!(series(&res.body, &["poop"])[6], 3);
    assert_eq!(series(&res.body, &["pee"])[6], 2);
    assert_eq!(series(&res.body, &["consistency", "normal"])[6], 1);
    assert_eq!(series(&res.body, &["consistency", "soft"])[6], 1);
    assert_eq!(series(&res.body, &["consistency", "hard"]), [0; 7]);
}

#[tokio::test]
async fn logs_created_through_the_api_are_counted() {
    let app = TestApp::spawn().await;
    let dog = app.create_dog("Rex", "Labrador").await;
    app.create_bathroom_log(serde_json::json!({"dogId": dog, "type": "pee"}))
        .await;

    let res = app.get(routes::BATHROOM_STATS).await;

    assert_eq!(series(&res.body, &["pee"])[6], 1);
}
