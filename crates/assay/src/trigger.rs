//! Object-storage notifications and the request/response handler around the
//! pipeline.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::{AssayError, Result};
use crate::pipeline::Pipeline;

/// S3-style notification: `Records[].s3.bucket.name` / `Records[].s3.object.key`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    /// Key as delivered, URL-encoded.
    pub key: String,
    /// Object size in bytes, when the notification reports it.
    #[serde(default)]
    pub size: Option<u64>,
}

/// Bucket and decoded key of the object an event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
    pub size: Option<u64>,
}

impl StorageEvent {
    /// Parse a notification from JSON.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AssayError::InvalidEvent(e.to_string()))
    }

    /// The object named by the first record, with its key decoded.
    pub fn first_object(&self) -> Result<ObjectLocation> {
        let record = self
            .records
            .first()
            .ok_or_else(|| AssayError::InvalidEvent("event has no records".to_string()))?;

        if self.records.len() > 1 {
            debug!(
                records = self.records.len(),
                "event carries several records, processing the first"
            );
        }

        Ok(ObjectLocation {
            bucket: record.s3.bucket.name.clone(),
            key: decode_key(&record.s3.object.key)?,
            size: record.s3.object.size,
        })
    }
}

/// Decode an object key as S3 delivers it: `+` is a space, the rest is
/// percent-encoded.
pub fn decode_key(key: &str) -> Result<String> {
    let spaced = key.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|k| k.into_owned())
        .map_err(|e| AssayError::InvalidEvent(format!("object key is not valid UTF-8: {e}")))
}

/// Source of object bytes.
pub trait ObjectFetcher {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Object store backed by a local directory: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an object maps to. Keys may not leave the bucket directory.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        for part in [bucket, key] {
            let escapes = Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if part.is_empty() || escapes {
                return Err(AssayError::InvalidEvent(format!(
                    "invalid object location: {bucket}/{key}"
                )));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl ObjectFetcher for LocalObjectStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| AssayError::Io { path, source: e })
    }
}

/// Request/response shape of a handled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded body.
    pub body: String,
}

impl HandlerResponse {
    fn success(output_file: &str) -> Self {
        Self {
            status_code: 200,
            body: json!({
                "message": "Data processing completed successfully",
                "outputFile": output_file,
            })
            .to_string(),
        }
    }

    fn failure(err: &AssayError) -> Self {
        Self {
            status_code: 500,
            body: json!({
                "message": "Data processing failed",
                "error": err.to_string(),
            })
            .to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Fetch the object an event names, run the pipeline on it, and report the
/// outcome. Never fails: errors become a 500 response.
pub fn handle_event(
    event: &StorageEvent,
    fetcher: &dyn ObjectFetcher,
    pipeline: &mut Pipeline,
) -> HandlerResponse {
    info!("Processing new data pipeline request");

    match process(event, fetcher, pipeline) {
        Ok(output_file) => {
            info!(output_file = %output_file, "Pipeline processing completed successfully");
            HandlerResponse::success(&output_file)
        }
        Err(e) => {
            error!(error = %e, "Pipeline processing failed");
            HandlerResponse::failure(&e)
        }
    }
}

/// Same as [`handle_event`] for an event still in its JSON form.
pub fn handle_event_json(
    raw: &str,
    fetcher: &dyn ObjectFetcher,
    pipeline: &mut Pipeline,
) -> HandlerResponse {
    match StorageEvent::from_json(raw) {
        Ok(event) => handle_event(&event, fetcher, pipeline),
        Err(e) => {
            error!(error = %e, "Pipeline processing failed");
            HandlerResponse::failure(&e)
        }
    }
}

fn process(
    event: &StorageEvent,
    fetcher: &dyn ObjectFetcher,
    pipeline: &mut Pipeline,
) -> Result<String> {
    let object = event.first_object()?;
    let bytes = fetcher.fetch(&object.bucket, &object.key)?;
    if let Some(expected) = object.size.filter(|&n| n != bytes.len() as u64) {
        warn!(
            key = %object.key,
            expected,
            fetched = bytes.len(),
            "fetched object size differs from the event"
        );
    }
    let output_file = format!("transformed/{}", object.key);

    pipeline.run_bytes(
        &bytes,
        format!("{}/{}", object.bucket, object.key),
        &output_file,
    )?;
    Ok(output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StreamProfiler;
    use crate::quality::QualityEngine;
    use crate::store::MetadataStore;
    use serde_json::Value;
    use tempfile::TempDir;

    fn event_for(bucket: &str, key: &str) -> String {
        json!({
            "Records": [{ "s3": { "bucket": { "name": bucket }, "object": { "key": key } } }]
        })
        .to_string()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(
            StreamProfiler::new(),
            QualityEngine::new(),
            MetadataStore::in_memory().unwrap(),
        )
    }

    #[test]
    fn test_parse_event_and_decode_key() {
        let event = StorageEvent::from_json(&event_for("uploads", "daily/New+Users%3A2024.csv")).unwrap();
        let object = event.first_object().unwrap();
        assert_eq!(object.bucket, "uploads");
        assert_eq!(object.key, "daily/New Users:2024.csv");
        assert_eq!(object.size, None);
    }

    #[test]
    fn test_event_object_size_is_carried() {
        let raw = json!({
            "Records": [{
                "s3": { "bucket": { "name": "uploads" }, "object": { "key": "a.csv", "size": 1024 } }
            }]
        })
        .to_string();
        let object = StorageEvent::from_json(&raw).unwrap().first_object().unwrap();
        assert_eq!(object.size, Some(1024));
    }

    #[test]
    fn test_event_without_records() {
        let event = StorageEvent::from_json(r#"{"Records": []}"#).unwrap();
        assert!(matches!(
            event.first_object(),
            Err(AssayError::InvalidEvent(_))
        ));
        assert!(StorageEvent::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_local_store_rejects_escaping_keys() {
        let store = LocalObjectStore::new("/srv/objects");
        assert!(store.object_path("bucket", "../secret.csv").is_err());
        assert!(store.object_path("bucket", "/etc/passwd").is_err());
        assert_eq!(
            store.object_path("bucket", "a/b.csv").unwrap(),
            PathBuf::from("/srv/objects/bucket/a/b.csv")
        );
    }

    #[test]
    fn test_handle_event_success() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("uploads")).unwrap();
        fs::write(
            dir.path().join("uploads/users.csv"),
            "id,name\n1,Ann\n2,Bo\n",
        )
        .unwrap();

        let mut pipeline = pipeline();
        let response = handle_event_json(
            &event_for("uploads", "users.csv"),
            &LocalObjectStore::new(dir.path()),
            &mut pipeline,
        );

        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["outputFile"], "transformed/users.csv");
        assert_eq!(pipeline.store().recent_profiles(5).unwrap().len(), 1);
    }

    #[test]
    fn test_handle_event_missing_object() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = pipeline();
        let response = handle_event_json(
            &event_for("uploads", "missing.csv"),
            &LocalObjectStore::new(dir.path()),
            &mut pipeline,
        );

        assert_eq!(response.status_code, 500);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "Data processing failed");
        assert!(body["error"].as_str().unwrap().contains("missing.csv"));
    }

    #[test]
    fn test_response_wire_name() {
        let response = HandlerResponse::success("transformed/a.csv");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
    }
}
