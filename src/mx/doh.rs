//! DNS-over-HTTPS transport speaking the `application/dns-json` dialect
//! served by `dns.google/resolve`.

use serde::Deserialize;

use super::{Error, LookupMx, MxRecord};

pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

const MX_RECORD_TYPE: u16 = 15;

pub struct DohResolver {
    agent: ureq::Agent,
    endpoint: String,
}

impl DohResolver {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_DOH_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for DohResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupMx for DohResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let mut response = self
            .agent
            .get(self.endpoint.as_str())
            .query("name", domain)
            .query("type", "MX")
            .call()
            .map_err(Error::transport)?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(Error::transport)?;
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u16,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

pub(crate) fn parse_response(body: &str) -> Result<Vec<MxRecord>, Error> {
    let response: DohResponse = serde_json::from_str(body).map_err(Error::malformed)?;
    if response.status != 0 {
        return Err(Error::query_failed(response.status));
    }
    response
        .answer
        .iter()
        .filter(|answer| answer.record_type == MX_RECORD_TYPE)
        .map(|answer| parse_mx_data(&answer.data))
        .collect()
}

// "10 aspmx.l.google.com."
fn parse_mx_data(data: &str) -> Result<MxRecord, Error> {
    let mut parts = data.split_whitespace();
    let (Some(preference), Some(exchange), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::malformed(format!("unexpected MX data '{data}'")));
    };
    let preference = preference
        .parse::<u16>()
        .map_err(|_| Error::malformed(format!("invalid MX preference in '{data}'")))?;
    Ok(MxRecord::new(preference, exchange))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers_in_order() {
        let body = r#"{
            "Status": 0, "TC": false, "RD": true, "RA": true, "AD": false, "CD": false,
            "Question": [{"name": "gmail.com.", "type": 15}],
            "Answer": [
                {"name": "gmail.com.", "type": 15, "TTL": 3600, "data": "20 alt2.gmail-smtp-in.l.google.com."},
                {"name": "gmail.com.", "type": 15, "TTL": 3600, "data": "5 gmail-smtp-in.l.google.com."}
            ]
        }"#;
        let records = parse_response(body).expect("valid body");
        assert_eq!(
            records,
            vec![
                MxRecord::new(20, "alt2.gmail-smtp-in.l.google.com."),
                MxRecord::new(5, "gmail-smtp-in.l.google.com."),
            ]
        );
    }

    #[test]
    fn missing_answer_is_empty() {
        let records = parse_response(r#"{"Status": 0}"#).expect("valid body");
        assert!(records.is_empty());
    }

    #[test]
    fn skips_non_mx_answers() {
        let body = r#"{"Status": 0, "Answer": [
            {"name": "mail.example.", "type": 5, "TTL": 60, "data": "example.net."},
            {"name": "example.net.", "type": 15, "TTL": 60, "data": "10 mx.example.net."}
        ]}"#;
        let records = parse_response(body).expect("valid body");
        assert_eq!(records, vec![MxRecord::new(10, "mx.example.net.")]);
    }

    #[test]
    fn nonzero_status_is_query_failure() {
        let err = parse_response(r#"{"Status": 3}"#).expect_err("NXDOMAIN");
        assert_eq!(err, Error::QueryFailed { status: 3 });
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_response("<html>").expect_err("not json");
        assert!(matches!(err, Error::MalformedResponse { .. }));

        let err = parse_response(r#"{"Status": 0, "Answer": [{"type": 15, "data": "mx.example.net."}]}"#)
            .expect_err("no preference");
        assert!(matches!(err, Error::MalformedResponse { .. }));

        let err = parse_response(r#"{"Status": 0, "Answer": [{"type": 15, "data": "ten mx.example.net."}]}"#)
            .expect_err("bad preference");
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
