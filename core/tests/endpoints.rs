//! Endpoint methods against a recording transport: verb, path, payload and
//! the local checks that must fail before anything is sent.

mod common;

use common::{body, client, sorted_query, APP_ID};
use onesignal_core::{params, ApiErrorKind, Error, HttpMethod, Params};
use serde_json::{json, Value};

const BASE: &str = "https://onesignal.com/api/v1";

#[test]
fn notifications_details_returns_body_unchanged() {
    let c = client();
    c.transport().reply(200, r#"{"id":"N1","successful":1}"#);

    let value = c.notifications_details("N1").unwrap();

    assert_eq!(value, json!({"id": "N1", "successful": 1}));
    let req = c.transport().last();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, format!("{BASE}/notifications/N1"));
    assert_eq!(req.header("Authorization"), Some("Basic X"));
    assert_eq!(sorted_query(&req), vec![("app_id".to_string(), APP_ID.to_string())]);
}

#[test]
fn apps_create_posts_name_with_app_id() {
    let c = client();
    c.transport().reply(200, r#"{"id":"a2","name":"MyApp"}"#);

    c.apps_create("MyApp", Params::new()).unwrap();

    let req = c.transport().last();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, format!("{BASE}/apps"));
    assert_eq!(body(&req), json!({"app_id": APP_ID, "name": "MyApp"}));
}

#[test]
fn verbs_and_paths() {
    let c = client();
    let expect = |method: HttpMethod, path: &str, call: &dyn Fn() -> Result<Value, Error>| {
        c.transport().reply(200, r#"{"success":true}"#);
        call().unwrap();
        let req = c.transport().last();
        assert_eq!(req.method, method, "{path}");
        assert_eq!(req.url, format!("{BASE}/{path}"), "{path}");
    };

    expect(HttpMethod::Get, "notifications", &|| c.notifications());
    expect(HttpMethod::Post, "notifications", &|| c.notifications_create(Params::new()));
    expect(HttpMethod::Delete, "notifications/n1", &|| c.notifications_cancel("n1"));
    expect(HttpMethod::Put, "notifications/n1", &|| c.notifications_open("n1"));
    expect(HttpMethod::Get, "apps", &|| c.apps());
    expect(HttpMethod::Get, "apps/a9", &|| c.apps_details(Some("a9")));
    expect(HttpMethod::Put, "apps/a9", &|| c.apps_update("a9", Params::new()));
    expect(HttpMethod::Get, "players", &|| c.devices(Params::new()));
    expect(HttpMethod::Get, "players/p1", &|| c.devices_details("p1"));
    expect(HttpMethod::Post, "players", &|| c.devices_create(0, Params::new()));
    expect(HttpMethod::Put, "players/p1", &|| c.devices_update("p1", Params::new()));
    expect(HttpMethod::Post, "players/p1/on_session", &|| c.sessions_create("p1", Params::new()));
    expect(HttpMethod::Post, "players/p1/on_purchase", &|| {
        c.purchases_create("p1", Vec::new(), Params::new())
    });
    expect(HttpMethod::Post, "players/p1/on_focus", &|| c.sessions_length_update("p1", 10));
    expect(HttpMethod::Post, "players/csv_export", &|| c.csv_export(Params::new()));
}

#[test]
fn apps_details_defaults_to_configured_app() {
    let c = client();
    c.transport().reply(200, "{}");

    c.apps_details(None).unwrap();

    assert_eq!(c.transport().last().url, format!("{BASE}/apps/{APP_ID}"));
}

#[test]
fn apps_details_without_any_app_id_fails_locally() {
    let c = onesignal_core::OneSignal::with_transport(
        onesignal_core::ClientConfig::new("X"),
        common::RecordingTransport::default(),
    );

    let err = c.apps_details(None).unwrap_err();

    assert_eq!(err.as_api().map(|e| e.kind()), Some(ApiErrorKind::InvalidArgument));
    assert!(c.transport().requests().is_empty());
}

#[test]
fn devices_passes_filters_as_query() {
    let c = client();
    c.transport().reply(200, r#"{"total_count":0,"players":[]}"#);

    c.devices(params(json!({"limit": 2, "offset": 4}))).unwrap();

    let req = c.transport().last();
    assert!(req.body.is_none());
    assert_eq!(
        sorted_query(&req),
        vec![
            ("app_id".to_string(), APP_ID.to_string()),
            ("limit".to_string(), "2".to_string()),
            ("offset".to_string(), "4".to_string()),
        ]
    );
}

#[test]
fn devices_create_sends_coerced_device_type() {
    let c = client();
    c.transport().reply(200, r#"{"success":true,"id":"p1"}"#);

    c.devices_create("1", params(json!({"identifier": "tok"}))).unwrap();

    assert_eq!(
        body(&c.transport().last()),
        json!({"app_id": APP_ID, "device_type": 1, "identifier": "tok"})
    );
}

#[test]
fn devices_create_rejects_non_integer_before_sending() {
    let c = client();

    let err = c.devices_create("ios", Params::new()).unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.kind(), ApiErrorKind::InvalidArgument);
    assert_eq!(api.message(), "device_type must be an integer.");
    assert!(c.transport().requests().is_empty());
}

#[test]
fn purchases_create_rejects_missing_amount_before_sending() {
    let c = client();
    let purchases = vec![params(json!({"sku": "SKU1", "iso": "USD"}))];

    let err = c.purchases_create("p1", purchases, Params::new()).unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.kind(), ApiErrorKind::InvalidArgument);
    assert!(api.message().starts_with("A purchase is missing a required field"));
    assert!(c.transport().requests().is_empty());
}

#[test]
fn purchases_create_sends_purchases() {
    let c = client();
    c.transport().reply(200, r#"{"success":true}"#);
    let purchase = json!({"sku": "SKU1", "amount": 0.99, "iso": "USD"});

    c.purchases_create("p1", vec![params(purchase.clone())], params(json!({"existing": false})))
        .unwrap();

    assert_eq!(
        body(&c.transport().last()),
        json!({"app_id": APP_ID, "existing": false, "purchases": [purchase]})
    );
}

#[test]
fn sessions_length_update_sends_ping() {
    let c = client();
    c.transport().reply(200, r#"{"success":true}"#);

    c.sessions_length_update("p1", 3600).unwrap();

    assert_eq!(
        body(&c.transport().last()),
        json!({"app_id": APP_ID, "state": "ping", "active_time": 3600})
    );
}

#[test]
fn notifications_open_marks_opened() {
    let c = client();
    c.transport().reply(200, r#"{"success":true}"#);

    c.notifications_open("n1").unwrap();

    assert_eq!(body(&c.transport().last()), json!({"app_id": APP_ID, "opened": true}));
}

#[test]
fn request_accepts_absolute_https_url() {
    let c = client();
    c.transport().reply(200, "[]");

    c.get("https://onesignal.com/api/v2/apps", Params::new()).unwrap();

    assert_eq!(c.transport().last().url, "https://onesignal.com/api/v2/apps");
}

#[test]
fn error_status_surfaces_message_and_code() {
    let c = client();
    c.transport().reply(400, r#"{"errors":["Notification content must not be null for any languages."]}"#);

    let err = c.notifications_create(Params::new()).unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.kind(), ApiErrorKind::Status);
    assert_eq!(api.status_code(), Some(400));
    assert_eq!(api.message(), "Notification content must not be null for any languages.");
}

#[test]
fn transport_failure_is_not_translated() {
    let c = client();

    let err = c.apps().unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.to_string(), "transport error: connection refused");
}
