use std::io::Cursor;

use bipolar_mlp::Network;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn respond_with(status: u16, content_type: &str, body: String) -> Response<Cursor<Vec<u8>>> {
    let response = Response::from_string(body).with_status_code(StatusCode(status));
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

pub fn text_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    respond_with(status, "text/plain; charset=utf-8", body)
}

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    respond_with(status, "application/json", body)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "404 Not Found".to_owned())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

pub fn dispatch(mut request: Request, network: &Network) {
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("").to_owned();
    debug!("{} {}", method, path);

    let response = match (method, path.as_str()) {
        (Method::Get, "/health") => text_response(200, "ok".to_owned()),
        (Method::Get, "/network") => text_response(200, network.to_string()),
        (Method::Post, "/predict") => {
            let mut body = String::new();
            match request.as_reader().read_to_string(&mut body) {
                Ok(_) => handlers::predict(network, &body),
                Err(e) => handlers::bad_request(&format!("could not read body: {}", e)),
            }
        }
        _ => not_found(),
    };

    let _ = request.respond(response);
}
