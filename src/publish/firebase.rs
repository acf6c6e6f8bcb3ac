//! Firebase Realtime Database sink over the REST API.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{Value, json};

use crate::error::SinkError;
use crate::publish::record::PublishRecord;
use crate::publish::sink::{Sink, WriteMode};

/// Marker value written by [`FirebaseSink::check_connection`].
pub const CONNECTION_CHECK_VALUE: &str = "CONNECTION_TEST";

/// Writes records to `{database_url}/{path}.json`.
///
/// Overwrite maps to `PUT` (Firebase `set`), append to `POST` (Firebase
/// `push`, which creates a child with a generated key).
pub struct FirebaseSink {
    client: Client,
    database_url: String,
}

impl FirebaseSink {
    /// Create a sink for `database_url`; every request is bounded by `timeout`.
    pub fn new(database_url: &str, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("waste-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            database_url: database_url.trim_end_matches('/').to_string(),
        })
    }

    /// REST endpoint for a database path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path.trim_matches('/'))
    }

    /// Write a check value under `path` and read it back.
    ///
    /// Fails with [`SinkError::Unavailable`] if the value read back is not the
    /// value that was written. Returns the value the database holds.
    pub fn check_connection(&self, path: &str) -> Result<Value, SinkError> {
        let url = self.endpoint(path);
        let expected = json!({ "result": CONNECTION_CHECK_VALUE });
        info!("checking connection to {url}");
        send(self.client.put(&url).json(&expected), path)?;
        let value = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json::<Value>()?;
        debug!("read back {value}");
        if value != expected {
            return Err(SinkError::Unavailable(format!(
                "{path} holds {value} after writing {expected}"
            )));
        }
        Ok(value)
    }
}

fn send(request: RequestBuilder, path: &str) -> Result<(), SinkError> {
    let response = request.send()?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(SinkError::Rejected {
            path: path.to_string(),
            status: status.as_u16(),
        })
    }
}

impl Sink for FirebaseSink {
    fn write(
        &mut self,
        path: &str,
        mode: WriteMode,
        record: &PublishRecord,
    ) -> Result<(), SinkError> {
        let url = self.endpoint(path);
        let request = match mode {
            WriteMode::Overwrite => self.client.put(&url),
            WriteMode::Append => self.client.post(&url),
        };
        send(request.json(record), path)
    }
}
