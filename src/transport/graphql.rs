use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{Envelope, SubmissionTransport};
use crate::error::{Error, Result};
use crate::model::{CreateSubmissionInput, RatingType, Submission};

const FETCH_QUERY: &str = "\
query FetchSubmissionsGrouped($reportId: ID!, $ratingType: String!) {
  fetchSubmissionsGrouped(reportId: $reportId, ratingType: $ratingType) { success message data }
}";

const CREATE_MUTATION: &str = "\
mutation CreateSubmission($input: CreateSubmissionInput!) {
  createSubmission(input: $input) {
    success message
    data {
      id respondentId respondentName type createdAt
      ratingPoints { id submissionId entityId entityName axis1 axis2 score description dimension { id name } }
    }
  }
}";

const DELETE_MUTATION: &str = "\
mutation DeleteSubmission($id: ID!) {
  deleteSubmission(id: $id) { success message }
}";

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize, Debug)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize, Debug)]
struct GraphqlError {
    message: String,
}

/// Blocking GraphQL client for the submissions API.
pub struct GraphqlTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl GraphqlTransport {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token,
        })
    }

    fn execute<T: DeserializeOwned>(
        &self,
        op: &str,
        query: &str,
        variables: Value,
    ) -> Result<Envelope<T>> {
        debug!(op, endpoint = %self.endpoint, "sending request");
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&GraphqlRequest { query, variables });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::transport(format!("{op}: HTTP {status}: {body}")));
        }

        let body: GraphqlResponse = resp.json()?;
        decode_envelope(op, body)
    }
}

fn decode_envelope<T: DeserializeOwned>(op: &str, body: GraphqlResponse) -> Result<Envelope<T>> {
    if !body.errors.is_empty() {
        let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(Error::transport(format!("{op}: {}", messages.join("; "))));
    }
    let payload = body
        .data
        .and_then(|mut d| d.get_mut(op).map(Value::take))
        .ok_or_else(|| Error::transport(format!("{op}: response carried no payload")))?;
    serde_json::from_value(payload)
        .map_err(|e| Error::transport(format!("{op}: malformed response: {e}")))
}

impl SubmissionTransport for GraphqlTransport {
    fn fetch_grouped(
        &self,
        report_id: &str,
        rating_type: RatingType,
    ) -> Result<Envelope<String>> {
        self.execute(
            "fetchSubmissionsGrouped",
            FETCH_QUERY,
            json!({ "reportId": report_id, "ratingType": rating_type.as_str() }),
        )
    }

    fn create_submission(&self, input: &CreateSubmissionInput) -> Result<Envelope<Submission>> {
        self.execute(
            "createSubmission",
            CREATE_MUTATION,
            json!({ "input": input }),
        )
    }

    fn delete_submission(&self, id: &str) -> Result<Envelope<()>> {
        self.execute("deleteSubmission", DELETE_MUTATION, json!({ "id": id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: Value) -> GraphqlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_fetch_payload() {
        let body = response(json!({
            "data": {"fetchSubmissionsGrouped": {"success": true, "message": "", "data": "{}"}}
        }));
        let env: Envelope<String> = decode_envelope("fetchSubmissionsGrouped", body).unwrap();
        assert!(env.success);
        assert_eq!(env.data.as_deref(), Some("{}"));
    }

    #[test]
    fn decodes_delete_without_data() {
        let body = response(json!({
            "data": {"deleteSubmission": {"success": false, "message": "locked"}}
        }));
        let env: Envelope<()> = decode_envelope("deleteSubmission", body).unwrap();
        assert!(!env.success);
        assert_eq!(env.message, "locked");
    }

    #[test]
    fn graphql_errors_become_transport_errors() {
        let body = response(json!({
            "data": null,
            "errors": [{"message": "unauthorized"}, {"message": "try later"}]
        }));
        let err = decode_envelope::<String>("fetchSubmissionsGrouped", body).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("unauthorized; try later"), "got {err}");
        assert!(err.to_string().contains("retry"), "got {err}");
    }

    #[test]
    fn missing_operation_is_transport_error() {
        let body = response(json!({ "data": {} }));
        assert!(matches!(
            decode_envelope::<String>("fetchSubmissionsGrouped", body),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn malformed_submission_is_transport_error() {
        let body = response(json!({
            "data": {"createSubmission": {"success": true, "data": {"id": 5}}}
        }));
        assert!(matches!(
            decode_envelope::<Submission>("createSubmission", body),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn client_builds() {
        GraphqlTransport::new("http://localhost:4000/graphql", None, Duration::from_secs(5))
            .unwrap();
    }
}
