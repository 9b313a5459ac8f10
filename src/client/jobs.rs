use super::{Endpoint, SlurmClient};
use crate::credential::Credential;
use crate::error::Error;
use crate::models::{CancelJobResponse, JobRef, JobSubmission, JobSubmitResponse, JobsResponse};
use serde::Serialize;

impl SlurmClient {
    pub async fn list_jobs(&self, credential: Option<&Credential>) -> Result<JobsResponse, Error> {
        let req = self.request(&Endpoint::Jobs, credential)?;
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }

    /// Fetches one job. slurmrestd answers with the same envelope as the
    /// listing, holding a single entry.
    pub async fn get_job(
        &self,
        credential: Option<&Credential>,
        job: impl Into<JobRef>,
    ) -> Result<JobsResponse, Error> {
        let req = self.request(&Endpoint::JobDetail(job.into()), credential)?;
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }

    /// Submits `payload` unvalidated as `{"job": payload}`; schema checks are
    /// left to the scheduler.
    pub async fn submit_job<P: Serialize>(
        &self,
        credential: Option<&Credential>,
        payload: &P,
    ) -> Result<JobSubmitResponse, Error> {
        let body = serde_json::to_vec(&JobSubmission { job: payload })?;
        let req = self.request(&Endpoint::SubmitJob, credential)?.body(body);
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }

    pub async fn cancel_job(
        &self,
        credential: Option<&Credential>,
        job: impl Into<JobRef>,
    ) -> Result<CancelJobResponse, Error> {
        let req = self.request(&Endpoint::CancelJob(job.into()), credential)?;
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }
}
