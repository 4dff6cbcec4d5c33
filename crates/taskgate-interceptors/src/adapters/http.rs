use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::{to_http_response, InterceptError};
use crate::stages::GuardChain;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;
use futures::FutureExt;
use std::str::FromStr;

const BODY_LIMIT: usize = 1_048_576;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub struct AxumReq<'a> {
    req: &'a mut Request<Body>,
}

#[async_trait]
impl ProtoRequest for AxumReq<'_> {
    fn method(&self) -> &str {
        self.req.method().as_str()
    }

    fn path(&self) -> &str {
        self.req.uri().path()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.req
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    async fn read_json(&mut self) -> Result<serde_json::Value, InterceptError> {
        // Handlers read the body at most once; it is consumed here.
        let body = std::mem::take(self.req.body_mut());
        let bytes = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| InterceptError::internal(&format!("read body: {e}")))?;
        if bytes.is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| InterceptError::validation(&format!("json parse: {e}")))
    }
}

pub struct AxumRes {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
}

#[async_trait]
impl ProtoResponse for AxumRes {
    fn set_status(&mut self, code: u16) {
        self.status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        if let (Ok(header_name), Ok(header_value)) = (HeaderName::from_str(name), value.parse()) {
            self.headers.insert(header_name, header_value);
        }
    }

    async fn write_json(&mut self, body: &serde_json::Value) -> Result<(), InterceptError> {
        self.body = Some(body.clone());
        Ok(())
    }
}

/// Bridge one axum request through the admission chain. Admitted requests
/// get the handler's JSON body; denied ones get the public error view with
/// the status the error taxonomy assigns.
pub async fn handle_with_chain<F, Fut>(
    mut req: Request<Body>,
    chain: &GuardChain,
    handler: F,
) -> Response
where
    F: FnOnce(&mut GuardContext, &mut dyn ProtoRequest) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<serde_json::Value, InterceptError>> + Send + 'static,
{
    let inbound_request_id = req.headers().get(&REQUEST_ID).cloned();

    let mut preq = AxumReq { req: &mut req };
    let mut pres = AxumRes {
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body: None,
    };

    let outcome = chain
        .run_with_handler(GuardContext::default(), &mut preq, &mut pres, |cx, req| {
            handler(cx, req).boxed()
        })
        .await;

    match outcome {
        Ok(()) => {
            let mut response = json_response(pres.status, pres.body.as_ref());
            for (name, value) in &pres.headers {
                response.headers_mut().insert(name.clone(), value.clone());
            }
            response
        }
        Err(err) => {
            let (status, body) = to_http_response(&err);
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut response = json_response(status, Some(&body));
            // Denied requests keep their correlation handle too.
            if let Some(id) = inbound_request_id {
                response.headers_mut().insert(REQUEST_ID.clone(), id);
            }
            response
        }
    }
}

fn json_response(status: StatusCode, body: Option<&serde_json::Value>) -> Response {
    let mut response = match body {
        Some(body) => Response::new(Body::from(serde_json::to_vec(body).unwrap_or_default())),
        None => Response::new(Body::empty()),
    };
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
