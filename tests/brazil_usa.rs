//! Multi-airport aggregation through the HTTP surface.

mod common;

use common::start_stack;
use reqwest::StatusCode;
use serde_json::Value;

async fn aggregate(query: &str) -> Value {
    let gw = start_stack().await;
    let res = reqwest::get(gw.url(&format!("/getBrazilUsaFlights{query}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

fn idents(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["ident"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_merge_filter_dedup_and_order() {
    let body = aggregate("").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["airports_searched"], 8);
    // domestic and freighter flights dropped, duplicate collapsed
    assert_eq!(idents(&body), vec!["AAL904", "TAM8180"]);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_found"], 2);
    assert_eq!(body["message"], "2 Brazil-USA flights found");

    // the first source to report a duplicate wins
    let tam = &body["data"][1];
    assert_eq!(tam["origin_airport_name"], "São Paulo/Guarulhos");
    assert_eq!(tam["route_type"], "Brasil-EUA");
    assert_eq!(tam["status_description"], "Programado");
}

#[tokio::test]
async fn test_failed_source_is_reported() {
    let body = aggregate("").await;

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["airport"], "SBRF");
    assert!(errors[0]["error"].is_string());
}

#[tokio::test]
async fn test_include_cargo() {
    let body = aggregate("?include_cargo=true").await;
    assert_eq!(idents(&body), vec!["AAL904", "LTC9001", "TAM8180"]);

    let body = aggregate("?include_cargo=false").await;
    assert_eq!(idents(&body), vec!["AAL904", "TAM8180"]);
}

#[tokio::test]
async fn test_limit_truncates_after_sort() {
    let body = aggregate("?limit=1").await;
    assert_eq!(idents(&body), vec!["AAL904"]);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total_found"], 2);
}

#[tokio::test]
async fn test_limit_out_of_range() {
    let gw = start_stack().await;
    for limit in ["0", "51", "many"] {
        let res = reqwest::get(gw.url(&format!("/getBrazilUsaFlights?limit={limit}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "INVALID_LIMIT");
        assert_eq!(body["message"], "Limit must be a number between 1 and 50");
    }
}
