//! HTTP calls against the prediction service.
//!
//! The service answers every request with a JSON body carrying a `status`
//! field, including HTTP 4xx/5xx responses, so bodies are parsed regardless
//! of the status code. A body that cannot be parsed is a transport failure.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::http_client;

use super::types::{
    ApiError, FeatureRecord, HealthReport, ModelReport, PredictionOutcome, SampleBundle,
};

const MAX_RESPONSE_BYTES: usize = 256 * 1024;
const STATUS_SUCCESS: &str = "success";
const FALLBACK_ERROR: &str = "Unknown error occurred";

/// Post a feature record to `/api/predict` and return the prediction.
pub fn predict(base_url: &str, record: &FeatureRecord) -> Result<PredictionOutcome, ApiError> {
    let url = format!("{base_url}/api/predict");
    let request = http_client::agent()
        .post(&url)
        .set("Accept", "application/json")
        .set("Content-Type", "application/json");
    let body = match request.send_json(record) {
        Ok(response) => read_body(response)?,
        Err(ureq::Error::Status(code, response)) => read_status_body(code, response)?,
        Err(ureq::Error::Transport(err)) => return Err(ApiError::Transport(err.to_string())),
    };
    parse_prediction(&body)
}

/// Fetch the preset/range bundle from `/api/samples`.
pub fn fetch_samples(base_url: &str) -> Result<SampleBundle, ApiError> {
    let body = get_body(&format!("{base_url}/api/samples"))?;
    parse_samples(&body)
}

/// Query `/api/health` for service readiness.
pub fn check_health(base_url: &str) -> Result<HealthReport, ApiError> {
    let body = get_body(&format!("{base_url}/api/health"))?;
    serde_json::from_str(&body).map_err(|err| ApiError::Transport(err.to_string()))
}

/// Fetch model metadata from `/api/model`.
pub fn fetch_model_info(base_url: &str) -> Result<ModelReport, ApiError> {
    let body = get_body(&format!("{base_url}/api/model"))?;
    parse_model_info(&body)
}

fn get_body(url: &str) -> Result<String, ApiError> {
    match http_client::agent()
        .get(url)
        .set("Accept", "application/json")
        .call()
    {
        Ok(response) => read_body(response),
        Err(ureq::Error::Status(code, response)) => read_status_body(code, response),
        Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
    }
}

fn read_body(response: ureq::Response) -> Result<String, ApiError> {
    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ApiError::Transport(err.to_string()))
}

fn read_status_body(code: u16, response: ureq::Response) -> Result<String, ApiError> {
    read_body(response).map_err(|_| ApiError::Transport(format!("HTTP {code}")))
}

#[derive(Debug, Deserialize)]
struct PredictionWire {
    status: String,
    prediction: Option<String>,
    confidence: Option<f64>,
    probabilities: Option<BTreeMap<String, f64>>,
    message: Option<String>,
}

fn parse_prediction(body: &str) -> Result<PredictionOutcome, ApiError> {
    let wire: PredictionWire =
        serde_json::from_str(body).map_err(|err| ApiError::Transport(err.to_string()))?;
    if wire.status != STATUS_SUCCESS {
        return Err(ApiError::Rejected(
            wire.message.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        ));
    }
    let (Some(prediction), Some(confidence), Some(probabilities)) =
        (wire.prediction, wire.confidence, wire.probabilities)
    else {
        return Err(ApiError::Transport(
            "Success response missing prediction fields".to_string(),
        ));
    };
    Ok(PredictionOutcome {
        prediction,
        confidence,
        probabilities,
    })
}

#[derive(Debug, Deserialize)]
struct SamplesWire {
    status: String,
    message: Option<String>,
    #[serde(rename = "totalSamples")]
    total_samples: Option<usize>,
    presets: Option<Vec<super::types::Preset>>,
    #[serde(rename = "featureRanges")]
    feature_ranges: Option<BTreeMap<String, super::types::FeatureRange>>,
}

fn parse_samples(body: &str) -> Result<SampleBundle, ApiError> {
    let wire: SamplesWire =
        serde_json::from_str(body).map_err(|err| ApiError::Transport(err.to_string()))?;
    if wire.status != STATUS_SUCCESS {
        return Err(ApiError::Rejected(
            wire.message.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        ));
    }
    let (Some(presets), Some(feature_ranges)) = (wire.presets, wire.feature_ranges) else {
        return Err(ApiError::Transport(
            "Success response missing sample fields".to_string(),
        ));
    };
    let total_samples = wire.total_samples.unwrap_or(presets.len());
    Ok(SampleBundle {
        total_samples,
        presets,
        feature_ranges,
    })
}

#[derive(Debug, Deserialize)]
struct ModelWire {
    status: String,
    message: Option<String>,
    model_type: Option<String>,
    classes: Option<Vec<String>>,
    n_features: Option<usize>,
}

fn parse_model_info(body: &str) -> Result<ModelReport, ApiError> {
    let wire: ModelWire =
        serde_json::from_str(body).map_err(|err| ApiError::Transport(err.to_string()))?;
    if wire.status != STATUS_SUCCESS {
        return Err(ApiError::Rejected(
            wire.message.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        ));
    }
    let (Some(model_type), Some(classes), Some(n_features)) =
        (wire.model_type, wire.classes, wire.n_features)
    else {
        return Err(ApiError::Transport(
            "Success response missing model fields".to_string(),
        ));
    };
    Ok(ModelReport {
        model_type,
        classes,
        n_features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(body: &str) -> String {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn parses_successful_prediction() {
        let body = r#"{
            "status": "success",
            "prediction": "High",
            "confidence": 0.92,
            "probabilities": { "High": 0.92, "Medium": 0.06, "Low": 0.02 }
        }"#;
        let outcome = parse_prediction(body).unwrap();
        assert_eq!(outcome.prediction, "High");
        assert!((outcome.confidence - 0.92).abs() < 1e-12);
        assert_eq!(outcome.probabilities.len(), 3);
    }

    #[test]
    fn rejection_carries_server_message() {
        let err = parse_prediction(r#"{ "status": "error", "message": "Missing Features" }"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(message) if message == "Missing Features"));
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = parse_prediction(r#"{ "status": "error" }"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(message) if message == FALLBACK_ERROR));
    }

    #[test]
    fn malformed_body_is_a_transport_error() {
        let err = parse_prediction("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn parses_sample_bundle_wire_names() {
        let body = r#"{
            "status": "success",
            "totalSamples": 1,
            "presets": [{
                "id": 1,
                "name": "Wine Sample 1",
                "description": "High quality profile",
                "expectedClass": "High",
                "features": { "Alcohol": 13.2 }
            }],
            "featureRanges": {
                "Alcohol": { "min": 11.0, "mean": 13.0, "max": 14.8, "std": 0.8 }
            }
        }"#;
        let bundle = parse_samples(body).unwrap();
        assert_eq!(bundle.total_samples, 1);
        assert_eq!(bundle.presets[0].expected_class, "High");
        assert!(bundle.feature_ranges.contains_key("Alcohol"));
    }

    #[test]
    fn sample_count_defaults_to_preset_length() {
        let body = r#"{
            "status": "success",
            "presets": [],
            "featureRanges": {}
        }"#;
        let bundle = parse_samples(body).unwrap();
        assert_eq!(bundle.total_samples, 0);
    }

    #[test]
    fn parses_model_report() {
        let body = r#"{
            "status": "success",
            "model_type": "Logistic Regression",
            "classes": ["High", "Medium", "Low"],
            "n_features": 13
        }"#;
        let report = parse_model_info(body).unwrap();
        assert_eq!(report.model_type, "Logistic Regression");
        assert_eq!(report.classes.len(), 3);
        assert_eq!(report.n_features, 13);
    }

    #[test]
    fn predict_round_trips_against_stub_server() {
        let base = serve_once(
            r#"{ "status": "success", "prediction": "Low", "confidence": 0.5, "probabilities": { "Low": 0.5 } }"#,
        );
        let record = FeatureRecord::from([("Alcohol".to_string(), 12.5)]);
        let outcome = predict(&base, &record).unwrap();
        assert_eq!(outcome.prediction, "Low");
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is a safe bet for a refused connection.
        let err = fetch_samples("http://127.0.0.1:9").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
