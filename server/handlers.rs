use std::io::Cursor;

use bipolar_mlp::{MlpError, Network, Result};
use serde::Serialize;
use tiny_http::Response;

use crate::routes::json_response;

#[derive(Debug, Serialize)]
pub struct Prediction {
    pub class: usize,
    pub outputs: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn predict(network: &Network, body: &str) -> Response<Cursor<Vec<u8>>> {
    let prediction = parse_features(body).and_then(|features| classify(network, &features));
    let encoded = prediction.and_then(|p| serde_json::to_string(&p).map_err(MlpError::from));
    match encoded {
        Ok(json) => json_response(200, json),
        Err(e) => bad_request(&e.to_string()),
    }
}

pub fn bad_request(message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| String::from("{\"error\":\"bad request\"}"));
    json_response(400, body)
}

fn classify(network: &Network, features: &[f64]) -> Result<Prediction> {
    let (class, outputs) = network.classify(features)?;
    Ok(Prediction { class, outputs })
}

/// Parses `x1,x2,...`; semicolons are accepted as separators as well.
pub fn parse_features(body: &str) -> Result<Vec<f64>> {
    let body = body.trim();
    if body.is_empty() {
        return Err(MlpError::format("request body has no features"));
    }
    body.split(|c| c == ',' || c == ';')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.parse::<f64>()
                .map_err(|_| MlpError::format(format!("'{}' is not a number", cell)))
        })
        .collect()
}
