use asset_dashboard::domain::errors::FetchError;
use asset_dashboard::infrastructure::http::{read_response, unwrap_envelope};
use quickcheck_macros::quickcheck;
use serde_json::json;

#[quickcheck]
fn error_code_wins_over_data(code: i64, status: u16, message: String) -> bool {
    let body = json!({
        "status": { "error_code": code, "error_message": message.clone() },
        "data": { "id": "1e31218a", "slug": "bitcoin" }
    });
    let expected = Err(FetchError::Upstream { code, message });
    unwrap_envelope(body.clone()) == expected && read_response(status, "", Ok(body)) == expected
}

#[test]
fn rate_limit_envelope_reports_upstream_message() {
    let body = json!({ "status": { "error_code": 429, "error_message": "Too Many Requests" } });
    let result = read_response(429, "Too Many Requests", Ok(body));
    assert_eq!(result, Err(FetchError::Upstream { code: 429, message: "Too Many Requests".into() }));
}

#[test]
fn success_returns_the_data_field() {
    let body = json!({
        "status": { "elapsed": 12, "timestamp": "2021-10-12T23:20:40.021Z" },
        "data": { "values": [[1633046400000u64, 1.0, 2.0, 0.5, 1.5, 100.0]] }
    });
    let data = read_response(200, "OK", Ok(body)).unwrap();
    assert_eq!(data["values"][0][4], json!(1.5));
}

#[test]
fn null_data_is_missing() {
    let body = json!({ "status": {}, "data": null });
    assert_eq!(read_response(200, "OK", Ok(body)), Err(FetchError::MissingData));
}

#[test]
fn plain_http_failure_keeps_status() {
    let body = json!({ "message": "not found" });
    let result = read_response(404, "Not Found", Ok(body));
    assert_eq!(result, Err(FetchError::Http { status: 404, status_text: "Not Found".into() }));
}
