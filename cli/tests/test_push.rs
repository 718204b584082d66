#[cfg(test)]
mod tests {
    use std::io::Write;

    use affiliate_cli::commands::push;
    use serde_json::json;
    use tempfile::NamedTempFile;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn payload_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write payload");
        file.flush().expect("flush payload");
        file
    }

    #[tokio::test]
    async fn push_sends_key_and_collects_acks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/receive-post"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Post received and saved",
                "id": "p1",
                "title": "Mouse",
                "slug": "mouse",
            })))
            .expect(2)
            .mount(&server)
            .await;

        let file = payload_file(
            r#"[{"id":"p1","title":"Mouse","content":"a"},{"id":"p2","title":"Mouse","content":"b"}]"#,
        );
        let api_base = format!("{}/api/", server.uri());

        let acks = push::run(&api_base, "secret", file.path()).await.expect("push");
        assert_eq!(acks.len(), 2);
        assert_eq!(acks[0]["slug"], "mouse");
    }

    #[tokio::test]
    async fn rejected_push_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/receive-post"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let file = payload_file(
            r#"[{"id":"p1","title":"Mouse","content":"a"},{"id":"p2","title":"Pad","content":"b"}]"#,
        );
        let api_base = format!("{}/api", server.uri());

        let err = push::run(&api_base, "wrong", file.path())
            .await
            .expect_err("unauthorized");
        let message = err.to_string();
        assert!(message.contains("401"), "{message}");
        assert!(message.contains("Unauthorized"), "{message}");
    }
}
