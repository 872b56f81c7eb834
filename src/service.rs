use crate::{Error, Result};

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Service {
    /// Either a full DID URL (`<did>#<fragment>`) or a relative one (`#<fragment>`).
    pub id: String,
    pub r#type: String,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

impl Service {
    pub fn verify(&self) -> Result<()> {
        if self
            .id
            .split_once('#')
            .map_or(true, |(_, fragment)| fragment.is_empty())
        {
            return Err(Error::MalformedDocument(
                format!("service id {:?} must contain a non-empty fragment", self.id).into(),
            ));
        }
        verify_service_endpoint(&self.service_endpoint)
    }
}

pub(crate) fn verify_service_endpoint(service_endpoint: &str) -> Result<()> {
    url::Url::parse(service_endpoint).map_err(|e| Error::InvalidServiceEndpoint {
        endpoint: service_endpoint.to_string(),
        reason: e.to_string().into(),
    })?;
    Ok(())
}
