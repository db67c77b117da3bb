use serde_json::{Value, json};

use crate::common::{TestApp, missing_id, routes};

fn pee(dog_id: &str) -> Value {
    json!({"dogId": dog_id, "type": "pee", "date": "2024-06-01T08:00:00Z"})
}

fn poop(dog_id: &str) -> Value {
    json!({
        "dogId": dog_id,
        "type": "poop",
        "date": "2024-06-01T09:00:00Z",
        "consistency": "normal",
        "color": "brown",
    })
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn pee_needs_no_consistency_or_color() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        let res = app.post(routes::BATHROOM_LOGS, &pee(&dog)).await;

        assert_eq!(res.status, 201, "{}", res.text);
        let log = res.data();
        assert_eq!(log["dogId"], dog.as_str());
        assert_eq!(log["type"], "pee");
        assert!(log.get("consistency").is_none());
        assert!(log.get("dog").is_none());
    }

    #[tokio::test]
    async fn poop_requires_consistency_and_color() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        for (log_type, missing) in [
            ("poop", "consistency"),
            ("poop", "color"),
            ("both", "consistency"),
            ("both", "color"),
        ] {
            let mut body = poop(&dog);
            body["type"] = json!(log_type);
            body.as_object_mut().unwrap().remove(missing);

            let res = app.post(routes::BATHROOM_LOGS, &body).await;
            assert_eq!(res.status, 400, "{log_type} accepted without {missing}");
            assert_eq!(res.error_code(), "VALIDATION_ERROR");
        }

        let res = app.post(routes::BATHROOM_LOGS, &poop(&dog)).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.data()["consistency"], "normal");
        assert_eq!(res.data()["color"], "brown");
    }

    #[tokio::test]
    async fn date_defaults_to_now() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        let res = app
            .post(routes::BATHROOM_LOGS, &json!({"dogId": dog, "type": "pee"}))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.data()["date"], res.data()["createdAt"]);
    }

    #[tokio::test]
    async fn rejects_bad_dog_references_and_types() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        let invalid = [
            json!({"type": "pee"}),
            json!({"dogId": "rex", "type": "pee"}),
            json!({"dogId": dog, "type": "splash"}),
            json!({"dogId": dog}),
        ];
        for body in &invalid {
            let res = app.post(routes::BATHROOM_LOGS, body).await;
            assert_eq!(res.status, 400, "accepted {body}");
            assert_eq!(res.error_code(), "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn dangling_dog_reference_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::BATHROOM_LOGS, &pee(&missing_id())).await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn notes_are_limited_to_500_characters() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        let mut body = pee(&dog);
        body["notes"] = json!("n".repeat(501));
        let res = app.post(routes::BATHROOM_LOGS, &body).await;
        assert_eq!(res.status, 400);

        body["notes"] = json!("n".repeat(500));
        let res = app.post(routes::BATHROOM_LOGS, &body).await;
        assert_eq!(res.status, 201);
    }

    #[tokio::test]
    async fn location_is_stored_as_a_geojson_point() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let mut body = pee(&dog);
        body["location"] = json!({"type": "Point", "coordinates": [-73.97, 40.77]});

        let created = app.post(routes::BATHROOM_LOGS, &body).await;
        assert_eq!(created.status, 201, "{}", created.text);

        let fetched = app.get(&routes::bathroom_log(&created.id())).await;
        assert_eq!(
            fetched.data()["location"],
            json!({"type": "Point", "coordinates": [-73.97, 40.77]})
        );
    }

    #[tokio::test]
    async fn rejects_out_of_range_coordinates() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;

        for location in [
            json!({"type": "Point", "coordinates": [-190.0, 40.0]}),
            json!({"type": "Point", "coordinates": [10.0, 91.0]}),
            json!({"type": "Point", "coordinates": [10.0]}),
            json!({"type": "Polygon", "coordinates": [10.0, 10.0]}),
        ] {
            let mut body = pee(&dog);
            body["location"] = location.clone();
            let res = app.post(routes::BATHROOM_LOGS, &body).await;
            assert_eq!(res.status, 400, "accepted {location}");
            assert_eq!(res.error_code(), "VALIDATION_ERROR");
        }
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn switching_to_poop_requires_consistency() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(pee(&dog)).await;

        let res = app
            .patch(&routes::bathroom_log(&id), &json!({"type": "poop"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");

        let res = app
            .patch(
                &routes::bathroom_log(&id),
                &json!({"type": "poop", "consistency": "soft", "color": "yellow"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["type"], "poop");
        assert_eq!(res.data()["consistency"], "soft");
    }

    #[tokio::test]
    async fn clearing_consistency_on_a_poop_log_is_rejected() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(poop(&dog)).await;

        let res = app
            .patch(&routes::bathroom_log(&id), &json!({"consistency": null}))
            .await;

        assert_eq!(res.status, 400);
        let after = app.get(&routes::bathroom_log(&id)).await;
        assert_eq!(after.data()["consistency"], "normal");
    }

    #[tokio::test]
    async fn null_clears_notes() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let mut body = pee(&dog);
        body["notes"] = json!("after breakfast");
        let id = app.create_bathroom_log(body).await;

        let res = app
            .patch(&routes::bathroom_log(&id), &json!({"notes": null}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.data().get("notes").is_none());
    }

    #[tokio::test]
    async fn unknown_log_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::bathroom_log(&missing_id()), &json!({"notes": "x"}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }
}

mod dog_join {
    use super::*;

    #[tokio::test]
    async fn include_dog_attaches_a_summary() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(pee(&dog)).await;

        let res = app
            .get(&format!("{}?includeDog=true", routes::bathroom_log(&id)))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.data()["dog"],
            json!({"_id": dog, "name": "Rex", "breed": "Labrador"})
        );
    }

    #[tokio::test]
    async fn deleted_dog_is_reported_as_null() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(pee(&dog)).await;
        app.delete(&routes::dog(&dog)).await;

        let single = app
            .get(&format!("{}?includeDog=true", routes::bathroom_log(&id)))
            .await;
        assert_eq!(single.status, 200);
        assert!(single.data()["dog"].is_null());
        assert!(single.data().get("dog").is_some());

        let list = app
            .get(&format!("{}?includeDog=true", routes::BATHROOM_LOGS))
            .await;
        assert_eq!(list.body["total"], 1);
        assert!(list.body["data"][0]["dog"].is_null());
    }

    #[tokio::test]
    async fn list_join_resolves_each_dog() {
        let app = TestApp::spawn().await;
        let rex = app.create_dog("Rex", "Labrador").await;
        let bella = app.create_dog("Bella", "Beagle").await;
        app.create_bathroom_log(pee(&rex)).await;
        app.create_bathroom_log(pee(&bella)).await;

        let res = app
            .get(&format!("{}?includeDog=true", routes::BATHROOM_LOGS))
            .await;

        for log in res.body["data"].as_array().unwrap() {
            assert_eq!(log["dog"]["_id"], log["dogId"]);
        }
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_type() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        app.create_bathroom_log(pee(&dog)).await;
        app.create_bathroom_log(pee(&dog)).await;
        app.create_bathroom_log(poop(&dog)).await;

        let res = app.get(&format!("{}?type=poop", routes::BATHROOM_LOGS)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 1);
        assert_eq!(res.body["data"][0]["type"], "poop");
    }

    #[tokio::test]
    async fn filters_by_date_range() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        for day in ["2024-05-01", "2024-05-10", "2024-05-20"] {
            app.create_bathroom_log(json!({
                "dogId": dog,
                "type": "pee",
                "date": format!("{day}T12:00:00Z"),
            }))
            .await;
        }

        let res = app
            .get(&format!(
                "{}?startDate=2024-05-05T00:00:00Z&endDate=2024-05-20T12:00:00Z",
                routes::BATHROOM_LOGS
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 2);
        assert_eq!(res.body["data"][0]["date"], "2024-05-20T12:00:00Z");
    }

    #[tokio::test]
    async fn inverted_date_range_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!(
                "{}?startDate=2024-05-20T00:00:00Z&endDate=2024-05-01T00:00:00Z",
                routes::BATHROOM_LOGS
            ))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_dog_filter_is_an_invalid_identifier() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?dogId=not-hex", routes::BATHROOM_LOGS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "INVALID_IDENTIFIER");
    }

    #[tokio::test]
    async fn dog_scoped_listing_only_returns_that_dog() {
        let app = TestApp::spawn().await;
        let rex = app.create_dog("Rex", "Labrador").await;
        let bella = app.create_dog("Bella", "Beagle").await;
        app.create_bathroom_log(pee(&rex)).await;
        app.create_bathroom_log(poop(&rex)).await;
        app.create_bathroom_log(pee(&bella)).await;

        let res = app.get(&routes::dog_bathroom_logs(&rex)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 2);
        for log in res.body["data"].as_array().unwrap() {
            assert_eq!(log["dogId"], rex.as_str());
        }

        let filtered = app
            .get(&format!("{}?type=pee", routes::dog_bathroom_logs(&rex)))
            .await;
        assert_eq!(filtered.body["total"], 1);
    }

    #[tokio::test]
    async fn dog_scoped_listing_rejects_malformed_id() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::dog_bathroom_logs("xyz")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "INVALID_IDENTIFIER");
    }

    #[tokio::test]
    async fn sorts_oldest_first_on_request() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        app.create_bathroom_log(pee(&dog)).await;
        app.create_bathroom_log(poop(&dog)).await;

        let res = app.get(&format!("{}?sort=date", routes::BATHROOM_LOGS)).await;

        assert_eq!(res.body["data"][0]["type"], "pee");
        assert_eq!(res.body["data"][1]["type"], "poop");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(pee(&dog)).await;

        let res = app.delete(&routes::bathroom_log(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Bathroom log deleted successfully");

        assert_eq!(app.get(&routes::bathroom_log(&id)).await.status, 404);
        assert_eq!(app.delete(&routes::bathroom_log(&id)).await.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_dog_keeps_its_logs() {
        let app = TestApp::spawn().await;
        let dog = app.create_dog("Rex", "Labrador").await;
        let id = app.create_bathroom_log(pee(&dog)).await;

        app.delete(&routes::dog(&dog)).await;

        let res = app.get(&routes::bathroom_log(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data()["dogId"], dog.as_str());
    }
}
