//! BigQuery REST backend (`bigquery/v2`).
//!
//! Authenticates with a caller-supplied OAuth bearer token.  Obtaining and
//! refreshing that token is outside this crate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use super::{QueryBackend, TableField};
use crate::error::{AdapterError, Result};

/// Public REST endpoint of the BigQuery API.
pub const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

const SERVICE: &str = "bigquery";

/// Server-side wait per `jobs.query` / `getQueryResults` call.
const QUERY_WAIT_MS: u64 = 10_000;

/// Unfinished-job polls before giving up.
const MAX_JOB_POLLS: usize = 30;

/// Connection settings for [`BigQueryClient`].
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    pub endpoint: String,
    pub project_id: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl BigQueryConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_BIGQUERY_ENDPOINT.into(),
            project_id: project_id.into(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// REST client for the BigQuery API.
pub struct BigQueryClient {
    config: BigQueryConfig,
    client: reqwest::Client,
}

impl BigQueryClient {
    pub fn new(config: BigQueryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("IntentHub/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdapterError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// `<endpoint>/projects/<project>/<segments...>`
    fn project_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|e| {
            AdapterError::Config(format!("invalid endpoint `{}`: {e}", self.config.endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|_| AdapterError::Config("endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .push("projects")
            .push(&self.config.project_id)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| AdapterError::Transport {
                service: SERVICE,
                source,
            })?;
        check_status(response).await
    }

    /// `GET projects/<p>/queries/<job>`: waits for the job server-side and
    /// returns one page of rows.
    async fn query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse> {
        let mut url = self.project_url(&["queries", &job.job_id])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("timeoutMs", &QUERY_WAIT_MS.to_string());
            if let Some(location) = &job.location {
                query.append_pair("location", location);
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| AdapterError::Transport {
                service: SERVICE,
                source,
            })
    }
}

/// Turn a non-success response into [`AdapterError::Api`], extracting the
/// Google error message when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdapterError::Api {
        service: SERVICE,
        status: status.as_u16(),
        message: google_error_message(&body),
    })
}

/// Pull `error.message` out of a Google API error body.
pub(crate) fn google_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn is_conflict(err: &AdapterError) -> bool {
    matches!(err, AdapterError::Api { status, .. } if *status == StatusCode::CONFLICT.as_u16())
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetList {
    #[serde(default)]
    datasets: Vec<DatasetListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetListEntry {
    dataset_reference: DatasetReference,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetReference {
    dataset_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<InsertError>,
}

#[derive(Debug, Deserialize)]
struct InsertError {
    index: u64,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    schema: Option<QuerySchema>,
    #[serde(default)]
    rows: Vec<QueryRow>,
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuerySchema {
    #[serde(default)]
    fields: Vec<QueryField>,
}

#[derive(Debug, Deserialize)]
struct QueryField {
    name: String,
    #[serde(rename = "type", default)]
    field_type: String,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    f: Vec<QueryCell>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    #[serde(default)]
    v: Value,
}

/// Convert a string-encoded cell into a typed JSON value.
fn decode_cell(field_type: &str, raw: Value) -> Value {
    let Value::String(text) = raw else {
        return raw;
    };
    match field_type {
        "INTEGER" | "INT64" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::String(text)),
        "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(text)),
        "BOOLEAN" | "BOOL" => Value::Bool(text == "true"),
        _ => Value::String(text),
    }
}

fn decode_rows(fields: &[QueryField], rows: Vec<QueryRow>) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .map(|row| {
            fields
                .iter()
                .zip(row.f)
                .map(|(field, cell)| (field.name.clone(), decode_cell(&field.field_type, cell.v)))
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Backend impl
// ---------------------------------------------------------------------------

#[async_trait]
impl QueryBackend for BigQueryClient {
    async fn list_datasets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.project_url(&["datasets"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            let page: DatasetList = self.send_json(self.request(Method::GET, url)).await?;
            names.extend(
                page.datasets
                    .into_iter()
                    .map(|d| d.dataset_reference.dataset_id),
            );
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(count = names.len(), "datasets listed");
        Ok(names)
    }

    async fn create_dataset(&self, dataset: &str, location: &str) -> Result<()> {
        let url = self.project_url(&["datasets"])?;
        let body = json!({
            "datasetReference": {
                "projectId": self.config.project_id,
                "datasetId": dataset,
            },
            "location": location,
        });
        match self.send(self.request(Method::POST, url).json(&body)).await {
            Ok(_) => {
                debug!(dataset, "dataset created");
                Ok(())
            }
            Err(e) if is_conflict(&e) => {
                debug!(dataset, "dataset already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn create_table(
        &self,
        dataset: &str,
        table: &str,
        schema: &[TableField],
    ) -> Result<()> {
        let url = self.project_url(&["datasets", dataset, "tables"])?;
        let body = json!({
            "tableReference": {
                "projectId": self.config.project_id,
                "datasetId": dataset,
                "tableId": table,
            },
            "schema": { "fields": schema },
        });
        match self.send(self.request(Method::POST, url).json(&body)).await {
            Ok(_) => {
                debug!(dataset, table, "table created");
                Ok(())
            }
            Err(e) if is_conflict(&e) => {
                debug!(dataset, table, "table already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn insert_rows(
        &self,
        dataset: &str,
        table: &str,
        rows: &[Value],
    ) -> Result<Vec<String>> {
        let url = self.project_url(&["datasets", dataset, "tables", table, "insertAll"])?;
        let body = json!({
            "rows": rows.iter().map(|row| json!({ "json": row })).collect::<Vec<_>>(),
        });
        let response: InsertAllResponse = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(response
            .insert_errors
            .into_iter()
            .map(|err| {
                let detail = err
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.reason, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("row {}: {detail}", err.index)
            })
            .collect())
    }

    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>> {
        let url = self.project_url(&["queries"])?;
        let body = json!({
            "query": sql,
            "useLegacySql": false,
            "timeoutMs": QUERY_WAIT_MS,
        });
        let mut page: QueryResponse = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;

        let mut fields: Vec<QueryField> = Vec::new();
        let mut rows = Vec::new();
        let mut polls = 0;
        loop {
            let QueryResponse {
                job_complete,
                job_reference,
                schema,
                rows: page_rows,
                page_token,
            } = page;

            if job_complete {
                if fields.is_empty() {
                    fields = schema.map(|s| s.fields).unwrap_or_default();
                }
                rows.extend(decode_rows(&fields, page_rows));
                if page_token.is_none() {
                    break;
                }
            } else {
                polls += 1;
                if polls > MAX_JOB_POLLS {
                    return Err(AdapterError::Backend(format!(
                        "query job did not complete after {MAX_JOB_POLLS} polls"
                    )));
                }
            }

            let job = job_reference.ok_or_else(|| {
                AdapterError::Backend("query response carries no job reference".into())
            })?;
            debug!(job = %job.job_id, polls, rows = rows.len(), "fetching query results");
            page = self.query_results(&job, page_token.as_deref()).await?;
        }

        debug!(rows = rows.len(), "query complete");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_url_appends_segments() {
        let mut config = BigQueryConfig::new("demo-project");
        config.endpoint = "http://localhost:9050/bigquery/v2/".into();
        let client = BigQueryClient::new(config).unwrap();
        let url = client
            .project_url(&["datasets", "enterprise_rag", "tables"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9050/bigquery/v2/projects/demo-project/datasets/enterprise_rag/tables"
        );
    }

    #[test]
    fn decode_cell_types() {
        assert_eq!(decode_cell("INTEGER", json!("3")), json!(3));
        assert_eq!(decode_cell("FLOAT", json!("1500.5")), json!(1500.5));
        assert_eq!(decode_cell("BOOLEAN", json!("true")), json!(true));
        assert_eq!(decode_cell("STRING", json!("APPROVED")), json!("APPROVED"));
        assert_eq!(decode_cell("INTEGER", Value::Null), Value::Null);
        assert_eq!(decode_cell("INTEGER", json!("n/a")), json!("n/a"));
    }

    #[test]
    fn google_error_message_prefers_structured_message() {
        let body = r#"{"error": {"code": 404, "message": "Not found: Dataset x"}}"#;
        assert_eq!(google_error_message(body), "Not found: Dataset x");
        assert_eq!(google_error_message("  plain text \n"), "plain text");
    }
}
