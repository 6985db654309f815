use super::ContractService;
use crate::error::{FiretruckError, Result};
use crate::model::{
    Contract, Declaration, EventOutcome, InstantiationRequest, InstantiationResponse,
    ReportRequest, ResidualSource,
};
use crate::value::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Everything but RFC 3986 unreserved characters is escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn segment(id: &str) -> PercentEncode<'_> {
    utf8_percent_encode(id, PATH_SEGMENT)
}

/// Connection settings for one contract service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ServiceEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Status and body of a response, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn describe(&self) -> String {
        format!("status {}: {}", self.status, self.body)
    }
}

pub struct HttpService {
    endpoint: ServiceEndpoint,
    agent: ureq::Agent,
}

impl HttpService {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(endpoint.timeout)
            .http_status_as_error(false)
            .build();
        let agent = ureq::Agent::new_with_config(config);
        Self { endpoint, agent }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    fn get(&self, path: &str) -> Result<RawResponse> {
        let url = self.endpoint.url(path);
        tracing::debug!(target: "firetruck::http", method = "GET", %url, "request");
        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FiretruckError::Transport(format!("GET {}: {}", url, e)))?;
        read_response(&url, response)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<RawResponse> {
        let url = self.endpoint.url(path);
        let bytes = serde_json::to_vec(body)?;
        tracing::debug!(target: "firetruck::http", method = "POST", %url, bytes = bytes.len(), "request");
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&bytes[..])
            .map_err(|e| FiretruckError::Transport(format!("POST {}: {}", url, e)))?;
        read_response(&url, response)
    }
}

fn read_response(url: &str, mut response: ureq::http::Response<ureq::Body>) -> Result<RawResponse> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| FiretruckError::Transport(format!("failed to read response: {}", e)))?;
    tracing::debug!(target: "firetruck::http", %url, status, "response");
    Ok(RawResponse { status, body })
}

/// Decodes a successful response, or turns a failed one into an error.
///
/// `not_found` builds the error for a 404; any other non-2xx status goes through
/// `failed`.
pub fn decode<T: DeserializeOwned>(
    raw: RawResponse,
    not_found: impl FnOnce() -> FiretruckError,
    failed: impl FnOnce(&RawResponse) -> FiretruckError,
) -> Result<T> {
    if raw.is_ok() {
        return serde_json::from_str(&raw.body).map_err(|e| {
            FiretruckError::Transport(format!("unexpected response body ({}): {}", e, raw.body))
        });
    }
    if raw.status == 404 {
        return Err(not_found());
    }
    Err(failed(&raw))
}

fn transport(raw: &RawResponse) -> FiretruckError {
    FiretruckError::Transport(raw.describe())
}

fn evaluation(raw: &RawResponse) -> FiretruckError {
    FiretruckError::Evaluation(raw.describe())
}

impl ContractService for HttpService {
    fn list_contracts(&self) -> Result<Vec<Contract>> {
        let raw = self.get("/contracts")?;
        decode(raw, || FiretruckError::Transport("contract listing not found".into()), transport)
    }

    fn get_contract(&self, id: &str) -> Result<Contract> {
        let raw = self.get(&format!("/contracts/{}", segment(id)))?;
        decode(raw, || FiretruckError::contract_not_found(id), transport)
    }

    fn evaluate_report(
        &self,
        contract_id: Option<&str>,
        expression: &str,
        values: &[Value],
    ) -> Result<Value> {
        let request = ReportRequest {
            csl: expression.to_string(),
            values: values.to_vec(),
        };
        match contract_id {
            Some(id) => {
                let raw = self.post(&format!("/contracts/{}/report", segment(id)), &request)?;
                decode(raw, || FiretruckError::contract_not_found(id), evaluation)
            }
            None => {
                let raw = self.post("/contracts/report", &request)?;
                decode(raw, || FiretruckError::Evaluation("report endpoint not found".into()), evaluation)
            }
        }
    }

    fn residual_source(&self, id: &str, simplify: bool) -> Result<ResidualSource> {
        let raw = self.get(&format!("/contracts/{}/src?simplified={}", segment(id), simplify))?;
        decode(raw, || FiretruckError::contract_not_found(id), |raw| {
            FiretruckError::Transport(format!(
                "Could not retrieve residual contract for contract with id: {} ({})",
                id,
                raw.describe()
            ))
        })
    }

    fn apply_event(&self, contract_id: &str, record: &Value) -> Result<EventOutcome> {
        let body = serde_json::json!({ "record": record });
        let raw = self.post(&format!("/contracts/{}/events", segment(contract_id)), &body)?;
        if raw.is_ok() {
            Ok(EventOutcome::Applied)
        } else if raw.status == 404 {
            Err(FiretruckError::contract_not_found(contract_id))
        } else {
            Ok(EventOutcome::Rejected(raw.describe()))
        }
    }

    fn instantiate(&self, request: &InstantiationRequest) -> Result<InstantiationResponse> {
        let raw = self.post("/contracts", request)?;
        decode(
            raw,
            || FiretruckError::declaration_not_found(&request.declaration_id),
            transport,
        )
    }

    fn get_declaration(&self, declaration_id: &str) -> Result<Declaration> {
        let raw = self.get(&format!("/declarations/{}", segment(declaration_id)))?;
        decode(raw, || FiretruckError::declaration_not_found(declaration_id), transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn joins_base_url_and_path() {
        let endpoint = ServiceEndpoint::new("http://localhost:8080/");
        assert_eq!(endpoint.url("/contracts"), "http://localhost:8080/contracts");
    }

    #[test]
    fn escapes_ids_in_path_segments() {
        assert_eq!(segment("c-1_a.b~").to_string(), "c-1_a.b~");
        assert_eq!(segment("a b/c?d").to_string(), "a%20b%2Fc%3Fd");
        assert_eq!(
            format!("/contracts/{}/report", segment("x/../y")),
            "/contracts/x%2F..%2Fy/report"
        );
    }

    #[test]
    fn decodes_successful_value() {
        let value: Value = decode(
            raw(200, r#"{"class": "IntValue", "i": 7}"#),
            || FiretruckError::contract_not_found("c1"),
            evaluation,
        )
        .unwrap();
        assert_eq!(value, Value::int(7));
    }

    #[test]
    fn maps_404_to_not_found() {
        let err = decode::<Value>(
            raw(404, "no such contract"),
            || FiretruckError::contract_not_found("c1"),
            evaluation,
        )
        .unwrap_err();
        assert!(matches!(err, FiretruckError::NotFound { kind: "contract", ref id } if id == "c1"));
        assert_eq!(err.to_string(), "Could not find contract with id: c1");
    }

    #[test]
    fn maps_other_failures_with_server_text() {
        let err = decode::<Value>(
            raw(400, "Type error: expected Int"),
            || FiretruckError::contract_not_found("c1"),
            evaluation,
        )
        .unwrap_err();
        match err {
            FiretruckError::Evaluation(msg) => assert!(msg.contains("Type error: expected Int")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_success_body() {
        let err = decode::<Contract>(
            raw(200, "<html>"),
            || FiretruckError::contract_not_found("c1"),
            transport,
        )
        .unwrap_err();
        assert!(matches!(err, FiretruckError::Transport(_)));
    }
}
