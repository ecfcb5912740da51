//! Integration tests for the club availability endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;
    use whiskey_night::availability::BusyInterval;

    use crate::test_utils::{
        FakeCalendar, FakeResponse, at, body_to_json, seed_club, test_app,
    };

    fn evening_busy() -> FakeResponse {
        FakeResponse::Busy(vec![BusyInterval {
            start: at("2024-06-01T18:00:00Z"),
            end: at("2024-06-01T20:00:00Z"),
        }])
    }

    fn get(uri: String) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests the three member scenario with one member unconnected
    #[tokio::test]
    async fn it_ranks_slots_by_free_members() {
        let test = test_app(FakeCalendar::default().with("a", evening_busy())).await;
        let club = seed_club(&test.db, &["a", "b", "c"], &["a", "b"]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z&durationMinutes=120",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["totalConnected"], 2);
        assert!(body.get("message").is_none());

        let slots = body["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0]["start"], "2024-06-01T16:00:00Z");
        assert_eq!(slots[0]["end"], "2024-06-01T18:00:00Z");
        assert_eq!(slots[0]["freeCount"], 2);
        assert_eq!(slots[1]["start"], "2024-06-01T20:00:00Z");
        assert_eq!(slots[1]["freeCount"], 2);
        assert_eq!(slots[2]["start"], "2024-06-01T17:00:00Z");
        assert_eq!(slots[2]["freeCount"], 1);
        assert!(slots.iter().all(|s| s["totalConnected"] == 2));
    }

    /// Tests the empty result when nobody has connected a calendar
    #[tokio::test]
    async fn it_returns_a_message_without_connections() {
        let test = test_app(FakeCalendar::default()).await;
        let club = seed_club(&test.db, &["a", "b"], &[]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["slots"].as_array().unwrap().len(), 0);
        assert_eq!(body["totalConnected"], 0);
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    /// Tests a failing calendar counts as free instead of failing the request
    #[tokio::test]
    async fn it_degrades_when_a_calendar_fails() {
        let calendar = FakeCalendar::default()
            .with("a", evening_busy())
            .with("b", FakeResponse::Fail);
        let test = test_app(calendar).await;
        let club = seed_club(&test.db, &["a", "b"], &["a", "b"]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T18:00:00Z&timeMax=2024-06-01T20:00:00Z",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["totalConnected"], 2);
        let slots = body["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0]["freeCount"], 1);
    }

    /// Tests the daily window filter and duration clamping
    #[tokio::test]
    async fn it_applies_time_of_day_window() {
        let test = test_app(FakeCalendar::default()).await;
        let club = seed_club(&test.db, &["a"], &["a"]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T00:00:00Z&timeMax=2024-06-02T00:00:00Z&durationMinutes=500&startTimeOfDay=17:00&endTimeOfDay=22:00&offsetMinutes=0",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        let slots = body["slots"].as_array().unwrap();
        // Duration clamps to 240 so only 17:00-21:00 and 18:00-22:00 fit
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0]["start"], "2024-06-01T17:00:00Z");
        assert_eq!(slots[1]["end"], "2024-06-01T22:00:00Z");
    }

    /// Tests a window without an offset is ignored
    #[tokio::test]
    async fn it_ignores_an_incomplete_window() {
        let test = test_app(FakeCalendar::default()).await;
        let club = seed_club(&test.db, &["a"], &["a"]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T00:00:00Z&timeMax=2024-06-01T06:00:00Z&durationMinutes=60&startTimeOfDay=17:00&endTimeOfDay=22:00",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["slots"].as_array().unwrap().len(), 6);
    }

    /// Tests an inverted range is rejected
    #[tokio::test]
    async fn it_returns_400_for_inverted_range() {
        let test = test_app(FakeCalendar::default()).await;
        let club = seed_club(&test.db, &["a"], &["a"]).await;

        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=a&timeMin=2024-06-01T22:00:00Z&timeMax=2024-06-01T16:00:00Z",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("Invalid time range"));
    }

    /// Tests missing and unparsable bounds are rejected
    #[tokio::test]
    async fn it_returns_400_for_bad_bounds() {
        let test = test_app(FakeCalendar::default()).await;

        let response = test
            .router
            .clone()
            .oneshot(get(String::from("/api/clubs/any/availability")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = test
            .router
            .oneshot(get(String::from(
                "/api/clubs/any/availability?userId=a&timeMin=soon&timeMax=2024-06-01T16:00:00Z",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests an unknown club returns 404
    #[tokio::test]
    async fn it_returns_404_for_unknown_club() {
        let test = test_app(FakeCalendar::default()).await;

        let response = test
            .router
            .oneshot(get(String::from(
                "/api/clubs/missing/availability?userId=a&timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests only club members can ask for suggestions
    #[tokio::test]
    async fn it_returns_403_for_non_members() {
        let test = test_app(FakeCalendar::default().with("a", evening_busy())).await;
        let club = seed_club(&test.db, &["a"], &["a"]).await;
        // Belongs to a different club
        seed_club(&test.db, &["outsider"], &["outsider"]).await;

        let response = test
            .router
            .clone()
            .oneshot(get(format!(
                "/api/clubs/{}/availability?userId=outsider&timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("Not a member"));

        // No user at all
        let response = test
            .router
            .oneshot(get(format!(
                "/api/clubs/{}/availability?timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z",
                club.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    /// Tests an unknown club is reported before membership
    #[tokio::test]
    async fn it_returns_404_before_checking_membership() {
        let test = test_app(FakeCalendar::default()).await;

        let response = test
            .router
            .oneshot(get(String::from(
                "/api/clubs/missing/availability?userId=nobody&timeMin=2024-06-01T16:00:00Z&timeMax=2024-06-01T22:00:00Z",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
