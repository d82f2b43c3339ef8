use super::common::*;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::reconciliation::roster::RosterRepository;

fn json_request(method: &str, uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn roster_upload_accepts_backend_objects() {
    let (service, roster) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/roster",
            json!({
                "entries": [
                    { "Motorista": "JOAO SILVA", "Base": "SP", "Telefone": "111", "Status": "aprovado" },
                    { "Motorista": "MARIA", "Base": "RJ", "WhatsApp": "222" }
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["loaded"], 2);

    let stored = roster.snapshot().expect("snapshot");
    assert_eq!(stored[1].contact_phone(), "222");
}

#[tokio::test]
async fn empty_roster_upload_is_unprocessable() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("PUT", "/api/v1/roster", json!({ "entries": [] })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn roster_csv_without_hub_is_bad_request() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/roster",
            json!({ "csv": "Motorista,Telefone\nANA,111\n" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("hub"));
}

#[tokio::test]
async fn reconcile_route_returns_summary_and_results() {
    let (service, _) = build_service();
    service
        .load_roster(scenario_roster())
        .expect("roster loads");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reconcile",
            json!({
                "records_csv": "Pedido,Motorista,Base\n1001,joao silva,sp\n1002,Maria Souza,RJ\n1003,Carlos,SP\n1004,,SP\n"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["received"], 4);
    assert_eq!(payload["summary"]["skipped"], 1);
    assert_eq!(payload["cascade"], "legacy");

    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["match_kind"], "exact");
    assert_eq!(results[0]["order_number"], "1001");
    assert_eq!(results[1]["match_kind"], "partial");
    assert_eq!(results[2]["phone"], Value::Null);
    assert!(payload.get("batches").is_none());
}

#[tokio::test]
async fn reconcile_route_splits_batches() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reconcile",
            json!({
                "records": [
                    { "driver_name": "joao silva", "hub": "sp" },
                    { "driver_name": "Maria Souza", "hub": "RJ" },
                    { "driver_name": "Carlos", "hub": "SP" }
                ],
                "roster": [
                    { "driver_name": "JOAO SILVA", "hub": "SP", "phone": "111" },
                    { "driver_name": "MARIA", "hub": "RJ", "phone": "222" }
                ],
                "batch_size": 2
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("results").is_none());
    let batches = payload["batches"].as_array().expect("batches array");
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].as_array().map(Vec::len), Some(2));
    assert_eq!(batches[1][0]["match_kind"], "none");
}

#[tokio::test]
async fn reconcile_route_rejects_zero_batch_size() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reconcile",
            json!({ "records": [], "batch_size": 0 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn roster_route_lists_snapshot() {
    let (service, _) = build_service();
    service
        .load_roster(scenario_roster())
        .expect("roster loads");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/roster")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["count"], 2);
    assert_eq!(payload["entries"][0]["driver_name"], "JOAO SILVA");
}

#[tokio::test]
async fn reconcile_route_without_records_is_unprocessable() {
    let (service, _) = build_service();
    service
        .load_roster(scenario_roster())
        .expect("roster loads");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reconcile",
            json!({ "roster": [{ "driver_name": "ANA", "hub": "SP" }] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("records"));
}

#[tokio::test]
async fn reconcile_route_returns_source_fields_untouched() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let source = json!({
        "Motorista": "Ana",
        "Base": "SP",
        "Pedido": 77,
        "volumes": 3,
        "urgente": true,
        "itens": [1, 2],
        "peso": 12.5,
        "obs": null,
        "phone": "legacy-col",
        "matched": "yes"
    });

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reconcile",
            json!({
                "records": [source.clone()],
                "roster": [{ "driver_name": "ANA", "hub": "SP", "phone": "111" }]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let result = &payload["results"][0];
    assert_eq!(result["fields"], source);
    for key in ["Motorista", "Base", "Pedido", "volumes", "urgente", "itens", "peso", "obs"] {
        assert_eq!(result["fields"][key], source[key], "field {key} changed");
    }
    assert_eq!(result["order_number"], "77");
    assert_eq!(result["phone"], "111");
    assert_eq!(result["matched"], true);
    assert_eq!(result["match_kind"], "exact");
}
