//! Incident table calls: list, resolve, update.

use serde::Deserialize;
use serde_json::Value;
use triage_core::{TicketBatch, UpdatePayload};

use crate::{
    ServiceNowClient,
    error::ServiceNowError,
    http::into_json,
    query::TicketQuery,
};

#[derive(Deserialize)]
struct SysIdResponse {
    #[serde(default)]
    result: Vec<SysIdRow>,
}

#[derive(Deserialize)]
struct SysIdRow {
    #[serde(default)]
    sys_id: Option<String>,
}

impl SysIdResponse {
    fn first_sys_id(self) -> Option<String> {
        self.result
            .into_iter()
            .find_map(|row| row.sys_id.filter(|id| !id.is_empty()))
    }
}

impl ServiceNowClient {
    /// List incidents matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceNowError`] if the request fails, the instance
    /// returns a non-success status, or the body is not a ticket envelope.
    pub async fn list_incidents(&self, query: &TicketQuery) -> Result<TicketBatch, ServiceNowError> {
        let url = format!("{}?{}", self.table_url(), query.to_query_string());
        tracing::debug!(%url, "listing incidents");

        let batch: TicketBatch = into_json(self.get(&url).send().await?).await?;
        tracing::info!(count = batch.len(), "fetched incidents");
        Ok(batch)
    }

    /// Resolve a business number to the record's `sys_id`.
    ///
    /// Returns `Ok(None)` when no incident carries that number.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceNowError`] if the request fails or the instance
    /// returns a non-success status.
    pub async fn resolve_sys_id(&self, number: &str) -> Result<Option<String>, ServiceNowError> {
        let url = format!("{}?{}", self.table_url(), resolve_query(number));
        let data: SysIdResponse = into_json(self.get(&url).send().await?).await?;
        Ok(data.first_sys_id())
    }

    /// Apply a partial update to the incident identified by `sys_id`.
    ///
    /// Returns the instance's response body (`{ "result": { ...updated record } }`).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceNowError::Api`] with the status and body for any
    /// non-success response, or [`ServiceNowError::Http`] on transport failure.
    pub async fn apply_update(
        &self,
        sys_id: &str,
        payload: &UpdatePayload,
    ) -> Result<Value, ServiceNowError> {
        let url = self.record_url(sys_id);
        into_json(self.put(&url).json(payload).send().await?).await
    }
}

fn resolve_query(number: &str) -> String {
    format!(
        "sysparm_query={}&sysparm_fields=sys_id&sysparm_limit=1",
        urlencoding::encode(&format!("number={number}"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_query_filters_by_number() {
        assert_eq!(
            resolve_query("INC0010023"),
            "sysparm_query=number%3DINC0010023&sysparm_fields=sys_id&sysparm_limit=1"
        );
    }

    #[test]
    fn parse_sys_id_response() {
        let data: SysIdResponse = serde_json::from_str(
            r#"{"result": [{"sys_id": "9d385017c611228701d22104cc95c371"}]}"#,
        )
        .unwrap();
        assert_eq!(
            data.first_sys_id().as_deref(),
            Some("9d385017c611228701d22104cc95c371")
        );
    }

    #[test]
    fn empty_result_resolves_to_none() {
        let data: SysIdResponse = serde_json::from_str(r#"{"result": []}"#).unwrap();
        assert!(data.first_sys_id().is_none());

        let blank: SysIdResponse = serde_json::from_str(r#"{"result": [{"sys_id": ""}]}"#).unwrap();
        assert!(blank.first_sys_id().is_none());
    }
}
