//! Error-bank endpoints: fetch an item, mark it for redo, submit a text
//! answer, generate similar practice questions

use serde_json::{json, Map, Value};

use crate::client::ApiClient;
use crate::envelope::Fetched;
use crate::Result;

impl ApiClient {
    pub async fn get_error(&self, id: &str) -> Result<Fetched<Value>> {
        let envelope = self.get("/api/error/get", &[("id", id)]).await?;
        Ok(envelope.field("data"))
    }

    pub async fn redo_error(&self, id: &str) -> Result<Fetched<Map<String, Value>>> {
        let envelope = self.post("/api/error/redo", &json!({ "id": id })).await?;
        Ok(envelope.into_payload())
    }

    pub async fn redo_error_text(
        &self,
        id: &str,
        answer: &str,
    ) -> Result<Fetched<Map<String, Value>>> {
        let envelope = self
            .post("/api/error/redo_text", &json!({ "id": id, "answer": answer }))
            .await?;
        Ok(envelope.into_payload())
    }

    pub async fn generate_similar(&self, id: &str, count: u32) -> Result<Fetched<Value>> {
        let envelope = self
            .post(
                "/api/error/practice/generate-similar",
                &json!({ "error_id": id, "count": count }),
            )
            .await?;
        Ok(envelope.field("data"))
    }
}
