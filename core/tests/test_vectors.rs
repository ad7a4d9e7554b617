//! Verify encoding, response classification and the stats projection against
//! JSON test vectors stored in `test-vectors/`.
//!
//! The vector files are plain data so that other client implementations can
//! run the same cases.

use std::collections::HashMap;

use sabnzbd_core::response::interpret;
use sabnzbd_core::{
    stats, ApiError, ArgValue, Call, Decoded, Endpoint, HttpMethod, HttpResponse, Output,
    ServerStat, ServerStats, TransportError,
};
use serde_json::Value;

fn parse_output(case: &Value) -> Output {
    match case["output"].as_str() {
        None | Some("json") => Output::Json,
        Some("text") => Output::Text,
        Some(other) => panic!("unknown output: {other}"),
    }
}

/// Vector argument values map onto the `ArgValue` conversions callers use.
fn parse_arg(value: &Value) -> ArgValue {
    match value {
        Value::String(s) => s.as_str().into(),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => n.as_i64().unwrap().into(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().unwrap().to_string())
            .collect::<Vec<_>>()
            .into(),
        other => panic!("unsupported argument value: {other}"),
    }
}

fn counts(value: &Value) -> HashMap<String, u64> {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.as_u64().unwrap()))
        .collect()
}

fn expected_stats(value: &Value) -> ServerStats {
    let servers = value["servers"]
        .as_object()
        .unwrap()
        .iter()
        .map(|(name, s)| {
            let stat = ServerStat {
                day: s["day"].as_u64().unwrap(),
                week: s["week"].as_u64().unwrap(),
                month: s["month"].as_u64().unwrap(),
                total: s["total"].as_u64().unwrap(),
                daily: counts(&s["daily"]),
                articles_tried: counts(&s["articles_tried"]),
                articles_success: counts(&s["articles_success"]),
            };
            (name.clone(), stat)
        })
        .collect();
    ServerStats {
        day: value["day"].as_u64().unwrap(),
        week: value["week"].as_u64().unwrap(),
        month: value["month"].as_u64().unwrap(),
        total: value["total"].as_u64().unwrap(),
        servers,
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

#[test]
fn encode_test_vectors() {
    let raw = include_str!("../../test-vectors/encode.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let endpoint = Endpoint::new(
        vectors["host"].as_str().unwrap(),
        vectors["api_key"].as_str().unwrap(),
    )
    .unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut call = Call::new(case["mode"].as_str().unwrap()).output(parse_output(case));
        for pair in case["args"].as_array().unwrap() {
            call = call.arg(pair[0].as_str().unwrap(), parse_arg(&pair[1]));
        }

        let req = endpoint.encode(&call);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert!(req.body.is_none(), "{name}: body");
        assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[test]
fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let outcome = interpret(Ok(response), parse_output(case));

        match (case["expected"].as_str().unwrap(), outcome) {
            ("json", Ok(Decoded::Json(value))) => {
                assert_eq!(value, case["expected_value"], "{name}: value")
            }
            ("text", Ok(Decoded::Text(text))) => {
                assert_eq!(text, case["expected_value"].as_str().unwrap(), "{name}: text")
            }
            ("decode", Err(ApiError::Decode(_))) => {}
            ("status", Err(ApiError::Transport(TransportError::Status { status, body }))) => {
                assert_eq!(u64::from(status), case["expected_status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(body, sim["body"].as_str().unwrap(), "{name}: body kept");
            }
            (expected, other) => panic!("{name}: expected {expected}, got {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Server stats
// ---------------------------------------------------------------------------

#[test]
fn server_stats_test_vectors() {
    let raw = include_str!("../../test-vectors/server_stats.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = stats::project(&case["document"]);
        match case.get("error").and_then(Value::as_str) {
            Some("protocol") => {
                assert!(matches!(result, Err(ApiError::Protocol(_))), "{name}: {result:?}")
            }
            Some(other) => panic!("{name}: unknown error kind {other}"),
            None => assert_eq!(result.unwrap(), expected_stats(&case["expected"]), "{name}"),
        }
    }
}
