//! Authentication and profile endpoints

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::client::ApiClient;
use crate::envelope::Fetched;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl ApiClient {
    /// Current login session, if any
    pub async fn auth_session(&self) -> Result<Fetched<Map<String, Value>>> {
        Ok(self.get("/auth/session", &[]).await?.into_payload())
    }

    /// Ask the server to send a login code; the payload says whether the
    /// address is registered
    pub async fn check_email(&self, email: &str) -> Result<Fetched<Map<String, Value>>> {
        let envelope = self
            .post("/auth/login/check-email", &json!({ "email": email.trim() }))
            .await?;
        Ok(envelope.into_payload())
    }

    pub async fn verify_login(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Fetched<Map<String, Value>>> {
        let envelope = self
            .post(
                "/auth/login/verify",
                &json!({ "email": email.trim(), "code": code.trim() }),
            )
            .await?;
        Ok(envelope.into_payload())
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Fetched<Map<String, Value>>> {
        Ok(self.post("/auth/register", request).await?.into_payload())
    }

    /// Students linked to a parent account
    pub async fn children(&self) -> Result<Fetched<Vec<Value>>> {
        Ok(self.get("/auth/children", &[]).await?.field("children"))
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Fetched<Map<String, Value>>> {
        Ok(self.post("/auth/update-profile", update).await?.into_payload())
    }

    pub async fn update_student(
        &self,
        update: &StudentUpdate,
    ) -> Result<Fetched<Map<String, Value>>> {
        Ok(self.post("/auth/update-student", update).await?.into_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_verify_login_trims_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/verify"))
            .and(body_json(json!({"email": "kim@example.com", "code": "123456"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "user": {"name": "Kim"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let payload = client
            .verify_login(" kim@example.com ", "123456\n")
            .await
            .unwrap()
            .ready()
            .unwrap();
        assert_eq!(payload["user"]["name"], "Kim");
    }

    #[tokio::test]
    async fn test_login_cookie_carries_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/verify"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc; Path=/")
                    .set_body_json(json!({"success": true})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/session"))
            .and(header("cookie", "session=abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "user": {"name": "Kim"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/session"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "not logged in"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        assert!(client.auth_session().await.unwrap().ready().is_none());

        client.verify_login("kim@example.com", "123456").await.unwrap();
        let session = client.auth_session().await.unwrap().ready().unwrap();
        assert_eq!(session["user"]["name"], "Kim");
    }

    #[tokio::test]
    async fn test_children_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "children": [{"id": 1}, {"id": 2}]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let children = client.children().await.unwrap().ready().unwrap();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Kim".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"name": "Kim"}));
    }
}
