use super::{Endpoint, SlurmClient};
use crate::credential::Credential;
use crate::error::Error;
use crate::models::NodesResponse;

impl SlurmClient {
    pub async fn list_nodes(
        &self,
        credential: Option<&Credential>,
    ) -> Result<NodesResponse, Error> {
        let req = self.request(&Endpoint::Nodes, credential)?;
        let resp = req.send().await?;
        self.expect_ok_json(resp).await
    }
}
