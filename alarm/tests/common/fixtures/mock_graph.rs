//! Mock Microsoft Entra token endpoint and Graph sendMail endpoint
//!
//! One server plays both roles; point `authority_host` and `graph_base_url`
//! at `authority_host()` / `graph_base_url()`.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use super::test_data::{ACCESS_TOKEN, RECEIVER_EMAIL, SENDER_EMAIL, TENANT_ID};
use web_alarm::config::GraphSettings;

pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn authority_host(&self) -> String {
        self.server.uri()
    }

    pub fn graph_base_url(&self) -> String {
        format!("{}/v1.0", self.server.uri())
    }

    pub fn token_path() -> String {
        format!("/{}/oauth2/v2.0/token", TENANT_ID)
    }

    pub fn send_mail_path() -> String {
        format!("/v1.0/users/{}/sendMail", SENDER_EMAIL)
    }

    /// Settings wired to this server
    pub fn settings(&self) -> GraphSettings {
        GraphSettings {
            tenant_id: TENANT_ID.to_string(),
            client_id: super::test_data::CLIENT_ID.to_string(),
            client_secret: super::test_data::CLIENT_SECRET.to_string(),
            authority_host: self.authority_host(),
            graph_base_url: self.graph_base_url(),
            sender_email: SENDER_EMAIL.to_string(),
            receiver_email: RECEIVER_EMAIL.to_string(),
        }
    }

    /// Token endpoint issues a one-hour token
    pub async fn mock_token_success(&self) {
        Mock::given(method("POST"))
            .and(path(Self::token_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "ext_expires_in": 3599,
                "access_token": ACCESS_TOKEN
            })))
            .mount(&self.server)
            .await;
    }

    /// Token endpoint issues tokens that live `expires_in` seconds
    pub async fn mock_token_expiring(&self, expires_in: i64) {
        Mock::given(method("POST"))
            .and(path(Self::token_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": expires_in,
                "access_token": ACCESS_TOKEN
            })))
            .mount(&self.server)
            .await;
    }

    /// Something in front of the token endpoint answers with an HTML page
    pub async fn mock_token_html_error(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(Self::token_path()))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_raw("<html>Bad Request</html>", "text/html"),
            )
            .mount(&self.server)
            .await;
    }

    /// Token endpoint rejects the client secret
    pub async fn mock_token_failure(&self) {
        Mock::given(method("POST"))
            .and(path(Self::token_path()))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided.",
                "error_codes": [7000215]
            })))
            .mount(&self.server)
            .await;
    }

    /// sendMail accepts the message
    pub async fn mock_send_accepted(&self) {
        Mock::given(method("POST"))
            .and(path(Self::send_mail_path()))
            .respond_with(ResponseTemplate::new(202))
            .mount(&self.server)
            .await;
    }

    /// sendMail rejects the first request with 401, then accepts.
    /// Mounted first so it takes precedence while it still has uses left.
    pub async fn mock_send_unauthorized_once(&self) {
        Mock::given(method("POST"))
            .and(path(Self::send_mail_path()))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "code": "InvalidAuthenticationToken",
                    "message": "Access token has expired or is not yet valid."
                }
            })))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// sendMail fails with a Graph error body
    pub async fn mock_send_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(Self::send_mail_path()))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {
                    "code": "ErrorAccessDenied",
                    "message": "Access is denied. Check credentials and try again."
                }
            })))
            .mount(&self.server)
            .await;
    }

    async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.url.path() == route)
            .collect()
    }

    pub async fn token_requests(&self) -> Vec<Request> {
        self.requests_to(&Self::token_path()).await
    }

    pub async fn sent_mail(&self) -> Vec<Value> {
        self.requests_to(&Self::send_mail_path())
            .await
            .iter()
            .filter_map(|req| req.body_json::<Value>().ok())
            .collect()
    }

    /// Subjects of every sendMail request received
    pub async fn sent_subjects(&self) -> Vec<String> {
        self.sent_mail()
            .await
            .iter()
            .filter_map(|body| body["message"]["subject"].as_str().map(str::to_string))
            .collect()
    }
}
