//! The pack module is a client of the MnemoPack HTTP service.
//!
//! Packs are stored remotely and managed through `/packs`; questions go to
//! the talk service at `/talk/pack/invoke`.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::DataUnitType;
use crate::constants::{DEFAULT_PACK_API_URL, DEFAULT_TALK_API_URL, USER_AGENT};
use crate::talk::QaBackend;

/// One typed payload stored in a pack.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct DataUnit {
    #[serde(rename = "type")]
    pub kind: DataUnitType,
    pub data: String,
}

/// A pack as returned by `GET /packs/{id}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Pack {
    pub id: String,
    #[serde(default)]
    pub data_units: Vec<DataUnit>,
}

/// Id and access key of a saved pack. The access key allows updates and deletion.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct PackCredentials {
    pub id: String,
    pub access_key: String,
}

#[derive(Deserialize)]
struct TalkResponse {
    output: String,
}

/// Client for the pack management API and the pack talk service.
pub struct PackClient {
    client: reqwest::Client,
    api_url: String,
    talk_url: String,
}

impl PackClient {
    /// Creates a client for the public pack API and a local talk service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be built.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            api_url: DEFAULT_PACK_API_URL.to_string(),
            talk_url: DEFAULT_TALK_API_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_talk_url(mut self, talk_url: &str) -> Self {
        self.talk_url = talk_url.trim_end_matches('/').to_string();
        self
    }

    /// Asks a pack a question.
    ///
    /// # Returns
    ///
    /// The answer, or `None` if the service didn't answer with 200. The
    /// status and body of a failed call are logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the request can't be sent or a 200 response
    /// doesn't carry an `output` string.
    pub async fn talk(&self, pack_id: &str, question: &str) -> Result<Option<String>> {
        let url = format!("{}/talk/pack/invoke", self.talk_url);
        let body = json!({
            "input": {
                "pack_id": pack_id,
                "question": question,
            },
            "config": {},
            "kwargs": {},
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Unable to reach talk service at {url}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!("Failed to talk to pack {pack_id}: {status} - {text}");
            return Ok(None);
        }

        let answer: TalkResponse = response
            .json()
            .await
            .context("Talk service response has no output")?;
        debug!("Pack {pack_id} answered with {} characters", answer.output.len());

        Ok(Some(answer.output))
    }

    /// Loads a pack by id.
    ///
    /// # Returns
    ///
    /// The pack, or `None` if the API didn't answer with 200.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the pack JSON can't be decoded.
    pub async fn get_pack(&self, pack_id: &str) -> Result<Option<Pack>> {
        let url = format!("{}/packs/{pack_id}", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Unable to reach pack API at {url}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!("Failed to load pack: {status} - {text}");
            return Ok(None);
        }

        let pack = response
            .json()
            .await
            .with_context(|| format!("Unable to decode pack {pack_id}"))?;
        Ok(Some(pack))
    }

    /// Creates a pack, or replaces the data of an existing one.
    ///
    /// # Arguments
    ///
    /// * `pack_id` - Id of the pack to update, `None` to create a new pack
    /// * `access_key` - Access key of the pack to update
    /// * `unit` - The data unit to store
    ///
    /// # Returns
    ///
    /// The pack id with its access key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * An update is requested without an access key
    /// * The request fails
    /// * The API rejects the pack
    pub async fn save_pack(
        &self,
        pack_id: Option<&str>,
        access_key: Option<&str>,
        unit: DataUnit,
    ) -> Result<PackCredentials> {
        let body = json!({ "data_units": [unit] });

        let response = match pack_id {
            Some(pack_id) => {
                let access_key =
                    access_key.context("Access key is required to update a pack")?;
                let response = self
                    .client
                    .put(format!("{}/packs/{pack_id}", self.api_url))
                    .bearer_auth(access_key)
                    .json(&body)
                    .send()
                    .await
                    .context("Unable to reach pack API")?;

                if response.status() == StatusCode::OK {
                    info!("Updated pack {pack_id}");
                    return Ok(PackCredentials {
                        id: pack_id.to_string(),
                        access_key: access_key.to_string(),
                    });
                }
                response
            }
            None => self
                .client
                .post(format!("{}/packs", self.api_url))
                .json(&body)
                .send()
                .await
                .context("Unable to reach pack API")?,
        };

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            let credentials: PackCredentials = response
                .json()
                .await
                .context("Unable to decode saved pack credentials")?;
            info!("Saved pack {}", credentials.id);
            return Ok(credentials);
        }

        let text = response.text().await.unwrap_or_default();
        bail!("Failed to save pack: {status} - {text}")
    }

    /// Deletes a pack.
    ///
    /// # Returns
    ///
    /// `true` if the API answered with 204, otherwise the failure is logged
    /// and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request can't be sent.
    pub async fn delete_pack(&self, pack_id: &str, access_key: &str) -> Result<bool> {
        let response = self
            .client
            .delete(format!("{}/packs/{pack_id}", self.api_url))
            .bearer_auth(access_key)
            .send()
            .await
            .context("Unable to reach pack API")?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("Deleted pack {pack_id}");
            return Ok(true);
        }

        let text = response.text().await.unwrap_or_default();
        warn!("Failed to delete pack: {status} - {text}");
        Ok(false)
    }
}

#[async_trait]
impl QaBackend for PackClient {
    async fn answer(&self, context: &str, question: &str) -> Result<Option<String>> {
        self.talk(context, question).await
    }
}
