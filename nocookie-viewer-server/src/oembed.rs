/* This file is part of the NoCookie Viewer project
*
*  Copyright (C) 2026 NoCookie Viewer contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{sync::Arc, time::Duration};

use cloneable_errors::{ErrorContext, ResContext};
use log::warn;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::{resolver::VideoId, state::AppConfig};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Title used when the oEmbed endpoint answered, but not with a 200
pub const NOT_AVAILABLE_TITLE: &str = "Video Not Available";
/// Title used when the oEmbed endpoint couldn't be reached or returned garbage
pub const INFO_UNAVAILABLE_TITLE: &str = "Video Information Unavailable";

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VideoMetadata {
    pub title: Arc<str>,
    pub thumbnail_url: Option<Arc<str>>,
    pub author_name: Arc<str>,
}

impl VideoMetadata {
    fn placeholder(title: &str) -> VideoMetadata {
        VideoMetadata {
            title: title.into(),
            thumbnail_url: None,
            author_name: UNKNOWN_AUTHOR.into(),
        }
    }

    pub fn not_available() -> VideoMetadata {
        Self::placeholder(NOT_AVAILABLE_TITLE)
    }

    pub fn unavailable() -> VideoMetadata {
        Self::placeholder(INFO_UNAVAILABLE_TITLE)
    }
}

// https://oembed.com/#section2.3
// only the fields we use, youtube sends more
#[derive(Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: Option<Arc<str>>,
    #[serde(default)]
    thumbnail_url: Option<Arc<str>>,
    #[serde(default)]
    author_name: Option<Arc<str>>,
}

impl From<OEmbedResponse> for VideoMetadata {
    fn from(value: OEmbedResponse) -> Self {
        VideoMetadata {
            title: value.title.unwrap_or_else(|| UNKNOWN_TITLE.into()),
            thumbnail_url: value.thumbnail_url,
            author_name: value.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.into()),
        }
    }
}

enum MetadataError {
    /// The endpoint responded with something other than 200
    Status(StatusCode),
    /// The request never completed, or the body was unusable
    Fault(ErrorContext),
}

impl From<ErrorContext> for MetadataError {
    fn from(value: ErrorContext) -> Self {
        MetadataError::Fault(value)
    }
}

pub struct OEmbedClient {
    client: Client,
    endpoint: Url,
}

impl OEmbedClient {
    pub fn new(client: Client, endpoint: Url) -> OEmbedClient {
        OEmbedClient { client, endpoint }
    }

    pub fn from_config(config: &AppConfig) -> Result<OEmbedClient, ErrorContext> {
        let timeout = Duration::try_from_secs_f64(config.reqwest_timeout_secs).context("Invalid reqwest timeout")?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build the reqwest client")?;
        let endpoint = Url::parse(&config.youtube.oembed_endpoint)
            .with_context(|| format!("Failed to parse the oEmbed endpoint URL {}", config.youtube.oembed_endpoint))?;
        Ok(OEmbedClient::new(client, endpoint))
    }

    /// Looks up the title, thumbnail and author of a video.
    ///
    /// Never fails, any problem with the request results in placeholder metadata.
    /// Exactly one request is made, there are no retries.
    pub async fn fetch_metadata(&self, video_id: &VideoId) -> VideoMetadata {
        match self.request(video_id).await {
            Ok(metadata) => metadata,
            Err(MetadataError::Status(status)) => {
                warn!("oEmbed request for {video_id} returned {status}");
                VideoMetadata::not_available()
            },
            Err(MetadataError::Fault(err)) => {
                warn!("Failed to get oEmbed data for {video_id}: {err:?}");
                VideoMetadata::unavailable()
            },
        }
    }

    async fn request(&self, video_id: &VideoId) -> Result<VideoMetadata, MetadataError> {
        let watch_url = video_id.watch_url();
        let resp = self.client.get(self.endpoint.clone())
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .send().await
            .context("Failed to send oEmbed request")?;
        if resp.status() != StatusCode::OK {
            return Err(MetadataError::Status(resp.status()));
        }
        let body: OEmbedResponse = resp.json().await.context("Failed to deserialize oEmbed response")?;
        Ok(body.into())
    }
}
