use stagepost_business::{BusinessConfig, HttpAttachmentApi, UploadSession};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const POST_ID: &str = "P1";

/// Mock backend plus a config pointing at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub config: BusinessConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri()).with_token(TOKEN);

        Self {
            mock_server,
            config,
        }
    }

    pub fn api(&self) -> HttpAttachmentApi {
        HttpAttachmentApi::new(self.config.clone())
    }

    #[allow(unused)]
    pub async fn open_session(&self) -> UploadSession<HttpAttachmentApi> {
        self.mock_create_post_id().await;
        UploadSession::open(self.api(), self.config.clone())
            .await
            .expect("session should open")
    }

    pub fn storage_url(&self, attachment_id: &str) -> String {
        format!("{}/storage/{attachment_id}", self.mock_server.uri())
    }

    pub async fn mock_create_post_id(&self) {
        Mock::given(method("POST"))
            .and(path("/api/v1/posts/drafts"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "postId": POST_ID
            })))
            .mount(&self.mock_server)
            .await;
    }

    /// Issue `attachment_id` for `file_name`, pointing at a storage path on the mock server.
    pub async fn mock_issue(&self, file_name: &str, attachment_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/attachments/upload-url"))
            .and(body_partial_json(serde_json::json!({
                "postId": POST_ID,
                "fileName": file_name
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "attachmentId": attachment_id,
                "uploadUrl": self.storage_url(attachment_id)
            })))
            .mount(&self.mock_server)
            .await;
    }

    #[allow(unused)]
    pub async fn mock_storage(&self, attachment_id: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/storage/{attachment_id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    #[allow(unused)]
    pub async fn mock_delete(&self, attachment_id: &str, response: ResponseTemplate) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/attachments/{attachment_id}")))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }
}
