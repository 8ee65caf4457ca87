//! Blocking client for the POEditor v2 API.
//!
//! Every endpoint is a form POST carrying `api_token`. Responses share one envelope:
//!
//! ```json
//! { "response": { "status": "success", "code": "200", "message": "OK" },
//!   "result": { "projects": [ ... ] } }
//! ```

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use poet::{ExportType, TranslationSource};

pub const DEFAULT_ENDPOINT: &str = "https://api.poeditor.com/v2/";
const TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("POEditor responded: {0}")]
    Service(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "number_or_string")]
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub percentage: f64,
}

pub struct PoEditorClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PoEditorClient {
    pub fn new(token: impl Into<String>) -> Result<Self, ServiceError> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Ok(Self {
            http,
            endpoint,
            token: token.into(),
        })
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.call("projects/list", &[], "projects")
    }

    pub fn list_languages(&self, project_id: u64) -> Result<Vec<Language>, ServiceError> {
        self.call("languages/list", &[("id", project_id.to_string())], "languages")
    }

    /// Asks the service to build an export of `export_type` and returns the download URL.
    pub fn export_url(
        &self,
        project_id: u64,
        language: &str,
        export_type: ExportType,
    ) -> Result<String, ServiceError> {
        self.call(
            "projects/export",
            &[
                ("id", project_id.to_string()),
                ("language", language.to_string()),
                ("type", export_type.to_string()),
            ],
            "url",
        )
    }

    pub fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// A [`TranslationSource`] exporting from one project.
    pub fn project(&self, project_id: u64) -> ProjectSource<'_> {
        ProjectSource {
            client: self,
            project_id,
        }
    }

    fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, String)],
        result_key: &str,
    ) -> Result<T, ServiceError> {
        let mut form: Vec<(&str, &str)> = vec![("api_token", self.token.as_str())];
        form.extend(fields.iter().map(|(k, v)| (*k, v.as_str())));

        tracing::debug!(path, "POEditor request");
        let body: Value = self
            .http
            .post(format!("{}{}", self.endpoint, path))
            .form(&form)
            .send()?
            .json()?;

        let result = extract_result(&body, result_key)?;
        serde_json::from_value(result.clone())
            .map_err(|e| ServiceError::UnexpectedResponse(format!("`{}`: {}", result_key, e)))
    }
}

/// Exports one project's languages through a [`PoEditorClient`].
pub struct ProjectSource<'a> {
    client: &'a PoEditorClient,
    project_id: u64,
}

impl TranslationSource for ProjectSource<'_> {
    fn fetch(&self, language: &str, export_type: ExportType) -> Result<Vec<u8>, poet::Error> {
        self.client
            .export_url(self.project_id, language, export_type)
            .and_then(|url| self.client.download(&url))
            .map_err(|e| {
                poet::Error::fetch_error(format!("export of `{}` failed", language), Some(Box::new(e)))
            })
    }
}

/// Checks the response envelope and returns `result[key]`.
pub fn extract_result<'a>(body: &'a Value, key: &str) -> Result<&'a Value, ServiceError> {
    let response = body.get("response").ok_or_else(|| {
        ServiceError::UnexpectedResponse("JSON response did not contain response dictionary".into())
    })?;

    if response.get("status").and_then(Value::as_str) == Some("fail") {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Error");
        return Err(ServiceError::Service(message.to_string()));
    }

    body.get("result")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ServiceError::UnexpectedResponse(
                "JSON response did not contain result dictionary".into(),
            )
        })?
        .get(key)
        .ok_or_else(|| ServiceError::UnexpectedResponse(format!("Could not find '{}'", key)))
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(n) => Ok(n),
        Id::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_result_success() {
        let body = json!({
            "response": { "status": "success", "code": "200", "message": "OK" },
            "result": { "url": "https://api.poeditor.com/v2/download/file/abc" }
        });
        let url = extract_result(&body, "url").unwrap();
        assert_eq!(url, "https://api.poeditor.com/v2/download/file/abc");
    }

    #[test]
    fn test_extract_result_service_failure() {
        let body = json!({
            "response": { "status": "fail", "code": "4011", "message": "Invalid API Token" }
        });
        let err = extract_result(&body, "projects").unwrap_err();
        assert!(matches!(err, ServiceError::Service(ref m) if m == "Invalid API Token"));
        assert_eq!(err.to_string(), "POEditor responded: Invalid API Token");
    }

    #[test]
    fn test_extract_result_malformed_envelopes() {
        let missing_response = json!({ "result": {} });
        assert!(matches!(
            extract_result(&missing_response, "url"),
            Err(ServiceError::UnexpectedResponse(_))
        ));

        let missing_result = json!({ "response": { "status": "success" } });
        let err = extract_result(&missing_result, "url").unwrap_err();
        assert!(err.to_string().contains("result dictionary"));

        let missing_key = json!({ "response": { "status": "success" }, "result": {} });
        let err = extract_result(&missing_key, "url").unwrap_err();
        assert!(err.to_string().contains("'url'"));
    }

    #[test]
    fn test_project_ids_as_number_or_string() {
        let projects: Vec<Project> = serde_json::from_value(json!([
            { "id": 41593, "name": "App", "public": 0 },
            { "id": "7", "name": "Web" }
        ]))
        .unwrap();
        assert_eq!(projects[0].id, 41593);
        assert_eq!(projects[1].id, 7);
    }

    #[test]
    fn test_language_deserialize() {
        let languages: Vec<Language> = serde_json::from_value(json!([
            { "name": "German", "code": "de", "translations": 120, "percentage": 98.5 },
            { "name": "French", "code": "fr" }
        ]))
        .unwrap();
        assert_eq!(languages[0].percentage, 98.5);
        assert_eq!(languages[1].percentage, 0.0);
    }

    #[test]
    fn test_endpoint_gets_trailing_slash() {
        let client = PoEditorClient::with_endpoint("token", "http://localhost:9/v2").unwrap();
        assert_eq!(client.endpoint, "http://localhost:9/v2/");
    }
}
