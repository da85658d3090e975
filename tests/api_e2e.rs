use std::net::SocketAddr;
use serde_json::{json, Value};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

use photovote::{config::Config, routes, state::AppState};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
    _dir: TempDir,
}

impl TestContext {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_base_dir(dir.path());
        adjust(&mut config);

        let state = AppState::new(&config).await.unwrap();
        let app = routes::router(state);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Self::client(),
            base_url: format!("http://{}", addr),
            _dir: dir,
        }
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_session(&self, client: &reqwest::Client, name: Option<&str>) -> Value {
        let mut request = client.post(self.url("/api/session"));
        if let Some(name) = name {
            request = request.json(&json!({ "name": name }));
        }
        let response = request.send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200, "Session creation failed");
        response.json().await.unwrap()
    }

    async fn upload(&self, session_id: &str, files: &[(&str, &str, &[u8])]) -> reqwest::Response {
        let mut form = Form::new();
        for (name, mime, bytes) in files {
            let part = Part::bytes(bytes.to_vec())
                .file_name(name.to_string())
                .mime_str(mime)
                .unwrap();
            form = form.part("photos", part);
        }

        self.client
            .post(self.url(&format!("/api/upload/{}", session_id)))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn vote(&self, session_id: &str, photo_id: &str, vote: &str, voter_id: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/vote/{}", session_id)))
            .json(&json!({ "photoId": photo_id, "vote": vote, "voterId": voter_id }))
            .send()
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_upload_vote_and_rank() {
        let context = TestContext::new().await;

        let created = context.create_session(&context.client, Some("Team photos")).await;
        let session_id = created["sessionId"].as_str().unwrap().to_string();
        assert!(created["userId"].as_str().is_some());

        let upload = context
            .upload(
                &session_id,
                &[
                    ("a.jpg", "image/jpeg", JPEG_BYTES),
                    ("b.jpg", "image/jpeg", JPEG_BYTES),
                    ("c.jpg", "image/jpeg", JPEG_BYTES),
                ],
            )
            .await;
        assert_eq!(upload.status().as_u16(), 200, "Upload failed");
        let body: Value = upload.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "3 file(s) uploaded successfully");

        let files = body["files"].as_array().unwrap();
        let ids: Vec<String> = files
            .iter()
            .map(|f| f["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(files[0]["originalName"], "a.jpg");
        assert!(files[0]["path"].as_str().unwrap().starts_with("/uploads/"));

        // A: 2 up, B: 1 up 1 down, C: nothing
        context.vote(&session_id, &ids[0], "up", "v1").await;
        context.vote(&session_id, &ids[0], "up", "v2").await;
        context.vote(&session_id, &ids[1], "up", "v1").await;
        let response = context.vote(&session_id, &ids[1], "down", "v2").await;
        assert_eq!(response.status().as_u16(), 200);
        let vote_body: Value = response.json().await.unwrap();
        assert_eq!(vote_body["success"], true);
        assert_eq!(vote_body["votes"]["downvotes"], json!(["v2"]));

        let results: Value = context
            .client
            .get(context.url(&format!("/api/results/{}", session_id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ranked: Vec<(String, i64)> = results
            .as_array()
            .unwrap()
            .iter()
            .map(|r| (r["id"].as_str().unwrap().to_string(), r["score"].as_i64().unwrap()))
            .collect();
        assert_eq!(
            ranked,
            vec![(ids[0].clone(), 2), (ids[1].clone(), 0), (ids[2].clone(), 0)]
        );

        let served = context
            .client
            .get(context.url(files[0]["path"].as_str().unwrap()))
            .send()
            .await
            .unwrap();
        assert_eq!(served.status().as_u16(), 200);
        assert_eq!(served.bytes().await.unwrap().as_ref(), JPEG_BYTES);
    }

    #[tokio::test]
    async fn test_revote_moves_voter_between_sets() {
        let context = TestContext::new().await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();

        context.vote(session_id, "p1", "up", "alice").await;
        let body: Value = context
            .vote(session_id, "p1", "down", "alice")
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(body["votes"]["upvotes"], json!([]));
        assert_eq!(body["votes"]["downvotes"], json!(["alice"]));

        let cleared: Value = context
            .vote(session_id, "p1", "meh", "alice")
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(cleared["votes"]["downvotes"], json!([]));
    }

    #[tokio::test]
    async fn test_null_or_numeric_vote_clears_stance() {
        let context = TestContext::new().await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();
        let url = context.url(&format!("/api/vote/{}", session_id));

        context.vote(session_id, "p1", "up", "bob").await;

        for vote in [Value::Null, json!(7)] {
            let response = context
                .client
                .post(&url)
                .json(&json!({ "photoId": "p1", "vote": vote, "voterId": "bob" }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status().as_u16(), 200);
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["votes"]["upvotes"], json!([]));
            assert_eq!(body["votes"]["downvotes"], json!([]));

            context.vote(session_id, "p1", "up", "bob").await;
        }
    }

    #[tokio::test]
    async fn test_mixed_batch_is_rejected_entirely() {
        let context = TestContext::new().await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();

        let response = context
            .upload(
                session_id,
                &[
                    ("1.jpg", "image/jpeg", JPEG_BYTES),
                    ("2.jpg", "image/jpeg", JPEG_BYTES),
                    ("notes.txt", "text/plain", &b"not an image"[..]),
                    ("3.jpg", "image/jpeg", JPEG_BYTES),
                    ("4.jpg", "image/jpeg", JPEG_BYTES),
                ],
            )
            .await;
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("notes.txt"));

        let session: Value = context
            .client
            .get(context.url(&format!("/api/session/{}", session_id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(session["photos"], json!([]));
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected() {
        let context = TestContext::with_config(|config| config.max_file_size = 8).await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();

        let response = context
            .upload(session_id, &[("big.jpg", "image/jpeg", JPEG_BYTES)])
            .await;
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_upload_without_files_is_rejected() {
        let context = TestContext::new().await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();

        let response = context.upload(session_id, &[]).await;
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404_everywhere() {
        let context = TestContext::new().await;
        let missing = "does-not-exist";

        let get = context
            .client
            .get(context.url(&format!("/api/session/{}", missing)))
            .send()
            .await
            .unwrap();
        assert_eq!(get.status().as_u16(), 404);

        let results = context
            .client
            .get(context.url(&format!("/api/results/{}", missing)))
            .send()
            .await
            .unwrap();
        assert_eq!(results.status().as_u16(), 404);

        let vote = context.vote(missing, "p1", "up", "v1").await;
        assert_eq!(vote.status().as_u16(), 404);

        let upload = context
            .upload(missing, &[("a.jpg", "image/jpeg", JPEG_BYTES)])
            .await;
        assert_eq!(upload.status().as_u16(), 404);

        let rename = context
            .client
            .put(context.url(&format!("/api/project/{}", missing)))
            .json(&json!({ "name": "x" }))
            .send()
            .await
            .unwrap();
        assert_eq!(rename.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_projects_are_grouped_by_owner_cookie() {
        let context = TestContext::new().await;

        let none: Value = context
            .client
            .get(context.url("/api/user/projects"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(none["projects"], json!([]));
        assert_eq!(none["userId"], Value::Null);

        let first = context.create_session(&context.client, Some("First")).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = context.create_session(&context.client, Some("Second")).await;
        assert_eq!(first["userId"], second["userId"]);

        let stranger = TestContext::client();
        let other = context.create_session(&stranger, Some("Other")).await;
        assert_ne!(other["userId"], first["userId"]);

        let listing: Value = context
            .client
            .get(context.url("/api/user/projects"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ids: Vec<&str> = listing["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![second["sessionId"].as_str().unwrap(), first["sessionId"].as_str().unwrap()]
        );
        assert_eq!(listing["userId"], first["userId"]);
        assert_eq!(listing["projects"][0]["photoCount"], 0);
        assert_eq!(listing["projects"][0]["voteCount"], 0);
    }

    #[tokio::test]
    async fn test_rename_project() {
        let context = TestContext::new().await;
        let created = context.create_session(&context.client, Some("Draft")).await;
        let session_id = created["sessionId"].as_str().unwrap();
        let url = context.url(&format!("/api/project/{}", session_id));

        let renamed: Value = context
            .client
            .put(&url)
            .json(&json!({ "name": "  Final  " }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(renamed, json!({ "success": true, "name": "Final" }));

        let blank: Value = context
            .client
            .put(&url)
            .json(&json!({ "name": "   " }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(blank["name"], "Final");
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_votes_on_unknown_photos() {
        let context =
            TestContext::with_config(|config| config.allow_votes_on_unknown_photos = false).await;
        let created = context.create_session(&context.client, None).await;
        let session_id = created["sessionId"].as_str().unwrap();

        let response = context.vote(session_id, "ghost", "up", "v1").await;
        assert_eq!(response.status().as_u16(), 404);
    }
}
