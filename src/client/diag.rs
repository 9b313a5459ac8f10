use super::{Endpoint, SlurmClient};
use crate::credential::Credential;
use crate::error::Error;
use crate::models::DiagnosticsResponse;

impl SlurmClient {
    pub async fn get_diagnostics(
        &self,
        credential: Option<&Credential>,
    ) -> Result<DiagnosticsResponse, Error> {
        let req = self.request(&Endpoint::Diagnostics, credential)?;
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }
}
