use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::domain::{
    AllotmentRequest, CandidateUpload, FormData, JobRequest, PresetJob, UploadReceipt,
};
use super::wire::{AllotmentEnvelope, AllotmentRow, ErrorBody, RankingEnvelope, RankingRow};
use crate::config::RankingServiceConfig;

/// The external service that ranks and allots candidates.
#[async_trait]
pub trait RankingService: Send + Sync {
    async fn presets(&self) -> Result<Vec<PresetJob>, ClientError>;

    async fn form_data(&self) -> Result<FormData, ClientError>;

    async fn upload_candidates(
        &self,
        upload: CandidateUpload,
    ) -> Result<UploadReceipt, ClientError>;

    async fn rank_custom(&self, job: &JobRequest) -> Result<Vec<RankingRow>, ClientError>;

    async fn generate_allotment(
        &self,
        job_keys: &[String],
    ) -> Result<Vec<AllotmentRow>, ClientError>;
}

/// Request could not complete or the service answered with a failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not reach ranking service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ranking service returned {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("ranking service sent an unreadable {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct HttpRankingService {
    config: RankingServiceConfig,
    client: Client,
}

impl HttpRankingService {
    pub fn new(config: RankingServiceConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RankingServiceConfig {
        &self.config
    }

    async fn read<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|error| error.detail)
                .unwrap_or(body);
            warn!(endpoint, status = status.as_u16(), %detail, "ranking service call failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[async_trait]
impl RankingService for HttpRankingService {
    async fn presets(&self) -> Result<Vec<PresetJob>, ClientError> {
        debug!("fetching preset jobs");
        let response = self.client.get(self.config.endpoint("presets")).send().await?;
        self.read("presets", response).await
    }

    async fn form_data(&self) -> Result<FormData, ClientError> {
        debug!("fetching form data");
        let response = self.client.get(self.config.endpoint("form-data")).send().await?;
        self.read("form-data", response).await
    }

    async fn upload_candidates(
        &self,
        upload: CandidateUpload,
    ) -> Result<UploadReceipt, ClientError> {
        debug!(
            filename = %upload.filename,
            bytes = upload.contents.len(),
            "uploading candidates"
        );
        let part = reqwest::multipart::Part::bytes(upload.contents)
            .file_name(upload.filename)
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.endpoint("upload-csv"))
            .multipart(form)
            .send()
            .await?;
        self.read("upload-csv", response).await
    }

    async fn rank_custom(&self, job: &JobRequest) -> Result<Vec<RankingRow>, ClientError> {
        debug!(post = %job.post, offers = job.offers, "requesting ranking");
        let response = self
            .client
            .post(self.config.endpoint("rank-custom"))
            .json(job)
            .send()
            .await?;
        let envelope: RankingEnvelope = self.read("rank-custom", response).await?;
        Ok(envelope.ranking)
    }

    async fn generate_allotment(
        &self,
        job_keys: &[String],
    ) -> Result<Vec<AllotmentRow>, ClientError> {
        debug!(jobs = job_keys.len(), "requesting allotment");
        let request = AllotmentRequest {
            job_keys: job_keys.to_vec(),
        };
        let response = self
            .client
            .post(self.config.endpoint("generate-allotment"))
            .json(&request)
            .send()
            .await?;
        let envelope: AllotmentEnvelope = self.read("generate-allotment", response).await?;
        Ok(envelope.allotment_list)
    }
}
