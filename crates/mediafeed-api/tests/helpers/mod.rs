//! Test helpers: build the router over in-memory collaborators.
//!
//! Posts live in an [`InMemoryPostStore`], the remote media host is a
//! [`FakeHost`], and staged files go to a per-test temporary directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use mediafeed_api::setup::{build_state, routes};
use mediafeed_core::Config;
use mediafeed_db::InMemoryPostStore;
use mediafeed_storage::{
    RemoteMediaHost, RemoteUpload, RemoteUploadError, StagedFile, StagingStore, UploadOptions,
};
use tempfile::TempDir;

type Responder = dyn Fn(&str) -> Result<RemoteUpload, RemoteUploadError> + Send + Sync;

/// Remote media host double.
pub struct FakeHost {
    responder: Box<Responder>,
    uploads: Mutex<Vec<RecordedUpload>>,
    deleted: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub staged_path: PathBuf,
    pub display_name: String,
    pub bytes: Vec<u8>,
    pub tags: Vec<String>,
}

impl FakeHost {
    /// Accept every upload with a fixed URL and name.
    pub fn accepting(url: &str, name: &str) -> Self {
        let (url, name) = (url.to_string(), name.to_string());
        Self::with_responder(move |display_name| {
            Ok(RemoteUpload {
                url: url.clone(),
                name: name.clone(),
                file_id: format!("file-{}", display_name),
            })
        })
    }

    /// Accept every upload, naming it after the requested display name.
    pub fn echoing() -> Self {
        Self::with_responder(|display_name| {
            Ok(RemoteUpload {
                url: format!("https://host/{}", display_name),
                name: display_name.to_string(),
                file_id: format!("file-{}", display_name),
            })
        })
    }

    /// Reject every upload with the given status.
    pub fn rejecting(status: u16, message: &str) -> Self {
        let message = message.to_string();
        Self::with_responder(move |_| {
            Err(RemoteUploadError::Rejected {
                status,
                message: message.clone(),
            })
        })
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<RemoteUpload, RemoteUploadError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            uploads: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteMediaHost for FakeHost {
    async fn upload(
        &self,
        staged: &StagedFile,
        display_name: &str,
        options: &UploadOptions,
    ) -> Result<RemoteUpload, RemoteUploadError> {
        let bytes = tokio::fs::read(staged.path()).await?;
        self.uploads.lock().unwrap().push(RecordedUpload {
            staged_path: staged.path().to_path_buf(),
            display_name: display_name.to_string(),
            bytes,
            tags: options.tags.clone(),
        });
        (self.responder)(display_name)
    }

    async fn delete(&self, file_id: &str) -> Result<(), RemoteUploadError> {
        self.deleted.lock().unwrap().push(file_id.to_string());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Test application: server plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub posts: InMemoryPostStore,
    pub host: Arc<FakeHost>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently in the staging area.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        list_dir(self.staging_dir.path())
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read staging directory")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect()
}

pub fn create_test_config(staging_dir: &Path) -> Config {
    let vars: HashMap<&str, String> = [
        ("DATABASE_URL", "postgres://unused/mediafeed".to_string()),
        ("IMAGEKIT_PRIVATE_KEY", "private_test_key".to_string()),
        ("STAGING_DIR", staging_dir.display().to_string()),
        ("MAX_UPLOAD_SIZE_MB", "5".to_string()),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeHost::echoing()).await
}

pub async fn setup_test_app_with(host: FakeHost) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(staging_dir.path());

    let staging = StagingStore::new(staging_dir.path())
        .await
        .expect("Failed to create staging store");
    let posts = InMemoryPostStore::new();
    let host = Arc::new(host);

    let state = build_state(config.clone(), Arc::new(posts.clone()), staging, host.clone());
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        posts,
        host,
        staging_dir,
    }
}

/// Multipart form with a `file` part and an optional caption.
pub fn upload_form(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    caption: Option<&str>,
) -> MultipartForm {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_type(content_type.to_string());
    let form = MultipartForm::new();
    let form = match caption {
        Some(caption) => form.add_text("caption", caption.to_string()),
        None => form,
    };
    form.add_part("file", part)
}
