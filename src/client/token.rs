use super::{Endpoint, SlurmClient};
use crate::credential::Credential;
use crate::error::Error;
use crate::models::TokenResponse;

impl SlurmClient {
    /// Asks the scheduler to issue a token. The response is returned raw; the
    /// caller decides which field holds the token.
    pub async fn acquire_credential(
        &self,
        credential: Option<&Credential>,
    ) -> Result<TokenResponse, Error> {
        let req = self.request(&Endpoint::Token, credential)?;
        let resp = req.send().await?;
        self.expect_ok_raw_json(resp).await
    }
}
