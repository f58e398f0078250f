//! Remote signing through a wallet's HTTP interface.
//!
//! The wallet derives keys from the [`KeySelection`] parameters and may ask
//! its user for permission, so a call can take arbitrarily long. No timeout
//! or retry is applied here.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ec::PublicKey;
use crate::error::WalletClientError;
use crate::signer::{Counterparty, KeyResolutionCapability, KeySelection, Protocol, SigningCapability};
use crate::PushDropError;

/// Configuration for a [`WalletClient`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalletClientConfig {
    /// Base URL of the wallet's HTTP interface.
    pub base_url: String,
    /// Sent as the `Originator` header to identify the calling application.
    pub originator: Option<String>,
}

impl Default for WalletClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3321".to_string(),
            originator: None,
        }
    }
}

#[derive(Serialize)]
struct CreateSignatureRequest<'a> {
    #[serde(rename = "protocolID")]
    protocol_id: &'a Protocol,
    #[serde(rename = "keyID")]
    key_id: &'a str,
    counterparty: &'a Counterparty,
    privileged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    data: &'a [u8],
}

#[derive(Deserialize)]
struct CreateSignatureResponse {
    signature: Vec<u8>,
}

#[derive(Serialize)]
struct GetPublicKeyRequest<'a> {
    #[serde(rename = "protocolID")]
    protocol_id: &'a Protocol,
    #[serde(rename = "keyID")]
    key_id: &'a str,
    counterparty: &'a Counterparty,
    privileged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "forSelf")]
    for_self: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPublicKeyResponse {
    public_key: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    description: Option<String>,
    message: Option<String>,
}

/// HTTP client for a wallet that signs on the caller's behalf.
#[derive(Debug, Clone)]
pub struct WalletClient {
    config: WalletClientConfig,
    client: reqwest::Client,
}

impl WalletClient {
    /// Create a client with the given configuration.
    pub fn new(config: WalletClientConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// The client's configuration.
    pub fn config(&self) -> &WalletClientConfig {
        &self.config
    }

    /// Ask the wallet to sign `sha256(data)`.
    ///
    /// # Returns
    /// The DER signature bytes exactly as the wallet returned them.
    pub async fn create_signature(
        &self,
        data: &[u8],
        selection: &KeySelection,
    ) -> Result<Vec<u8>, WalletClientError> {
        let body = CreateSignatureRequest {
            protocol_id: &selection.protocol_id,
            key_id: &selection.key_id,
            counterparty: &selection.counterparty,
            privileged: selection.privileged,
            description: selection.description.as_deref(),
            data,
        };
        let response: CreateSignatureResponse = self.post("createSignature", &body).await?;
        Ok(response.signature)
    }

    /// Ask the wallet for the public key derived from `selection`.
    pub async fn get_public_key(
        &self,
        selection: &KeySelection,
    ) -> Result<String, WalletClientError> {
        let body = GetPublicKeyRequest {
            protocol_id: &selection.protocol_id,
            key_id: &selection.key_id,
            counterparty: &selection.counterparty,
            privileged: selection.privileged,
            description: selection.description.as_deref(),
            for_self: selection.for_self,
        };
        let response: GetPublicKeyResponse = self.post("getPublicKey", &body).await?;
        Ok(response.public_key)
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, WalletClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, "wallet request");

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
        if let Some(ref originator) = self.config.originator {
            request = request.header("Originator", originator);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let description = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(ErrorBody { description: Some(d), .. }) => d,
                Ok(ErrorBody { message: Some(m), .. }) => m,
                _ => String::from_utf8_lossy(&bytes).into_owned(),
            };
            warn!(%url, status = status.as_u16(), %description, "wallet rejected request");
            return Err(WalletClientError::Rejected {
                status: status.as_u16(),
                description,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl SigningCapability for WalletClient {
    async fn sign(&self, data: &[u8], selection: &KeySelection) -> Result<Vec<u8>, PushDropError> {
        self.create_signature(data, selection)
            .await
            .map_err(|e| PushDropError::SigningFailure(format!("createSignature: {e}")))
    }
}

impl KeyResolutionCapability for WalletClient {
    async fn resolve_public_key(&self, selection: &KeySelection) -> Result<PublicKey, PushDropError> {
        let hex_key = self
            .get_public_key(selection)
            .await
            .map_err(|e| PushDropError::KeyResolutionFailure(format!("getPublicKey: {e}")))?;
        PublicKey::from_hex(&hex_key).map_err(|e| {
            PushDropError::KeyResolutionFailure(format!("getPublicKey returned a bad key: {e}"))
        })
    }
}
