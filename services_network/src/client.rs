//! Backend client
//!
//! Implements every collaborator trait over the backend's JSON routes.

use crate::protocol::{
    BackendRoute, BucketContentsBody, BucketSummary, BucketsReply, ContentsReply,
    CredentialsBody, ErrorReply, PreviewBody, PreviewDocument, VerifyReply,
};
use crate::transport::Transport;
use crate::{BucketSource, CredentialVerifier, FetchError, ListingSource, PreviewSource};
use core_types::BucketName;
use identity::{Credentials, Session};
use object_view::ObjectEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use services_logger::{LogLevel, Logger};
use services_settings::BrowserSettings;

/// Talks to the storage backend through a [`Transport`]
#[derive(Debug)]
pub struct BackendClient<T: Transport> {
    transport: T,
    base_url: String,
    logger: Logger,
}

impl<T: Transport> BackendClient<T> {
    /// Creates a client for the backend at `base_url`
    pub fn new(transport: T, base_url: impl Into<String>, logger: Logger) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            logger: logger.for_component("network"),
        }
    }

    /// Creates a client from a settings snapshot
    pub fn from_settings(transport: T, settings: &BrowserSettings, logger: Logger) -> Self {
        Self::new(transport, settings.backend_base_url.clone(), logger)
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call<B, R>(&self, route: BackendRoute, body: &B) -> Result<R, FetchError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| FetchError::Encode(e.to_string()))?;
        let url = route.url(&self.base_url);
        self.logger.log(
            self.logger
                .entry(LogLevel::Debug, "POST")
                .with_field("route", route.path()),
        );

        let reply = self.transport.post(&url, &payload).map_err(|err| {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Warn, "transport failed")
                    .with_field("route", route.path())
                    .with_field("error", &err),
            );
            FetchError::from(err)
        })?;

        if !reply.is_success() {
            let detail = serde_json::from_slice::<ErrorReply>(&reply.body)
                .map(|e| e.detail)
                .unwrap_or_else(|_| reply.body_text());
            self.logger.log(
                self.logger
                    .entry(LogLevel::Warn, "backend refused request")
                    .with_field("route", route.path())
                    .with_field("status", reply.status),
            );
            return Err(FetchError::from_status(reply.status, detail));
        }

        serde_json::from_slice(&reply.body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn credentials_body(credentials: &Credentials) -> CredentialsBody {
    CredentialsBody {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
    }
}

impl<T: Transport> CredentialVerifier for BackendClient<T> {
    fn verify(&self, credentials: &Credentials) -> Result<(), FetchError> {
        let _: VerifyReply = self.call(
            BackendRoute::VerifyCredentials,
            &credentials_body(credentials),
        )?;
        Ok(())
    }
}

impl<T: Transport> BucketSource for BackendClient<T> {
    fn list_buckets(&self, credentials: &Credentials) -> Result<Vec<BucketSummary>, FetchError> {
        let reply: BucketsReply =
            self.call(BackendRoute::ListBuckets, &credentials_body(credentials))?;
        Ok(reply.buckets)
    }
}

impl<T: Transport> ListingSource for BackendClient<T> {
    fn list_objects(
        &self,
        session: &Session,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<Vec<ObjectEntry>, FetchError> {
        let credentials = session.credentials();
        let body = BucketContentsBody {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            bucket_name: bucket.as_str().to_string(),
            prefix: prefix.to_string(),
        };
        let reply: ContentsReply = self.call(BackendRoute::ListBucketContents, &body)?;
        Ok(reply
            .contents
            .into_iter()
            .map(|record| ObjectEntry::new(record.name, record.size))
            .collect())
    }
}

impl<T: Transport> PreviewSource for BackendClient<T> {
    fn preview(
        &self,
        session: &Session,
        bucket: &BucketName,
        key: &str,
    ) -> Result<PreviewDocument, FetchError> {
        let credentials = session.credentials();
        let body = PreviewBody {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            bucket_name: bucket.as_str().to_string(),
            file_name: key.to_string(),
        };
        self.call(BackendRoute::QuickPreview, &body)
    }
}
