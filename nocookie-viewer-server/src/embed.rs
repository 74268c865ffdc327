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

use cloneable_errors::ErrorContext;
use nocookie_viewer_api::{EmbedInfo, EmbedResponse};

use crate::{oembed::OEmbedClient, resolver::{Resolver, VideoId}, state::AppConfig};

pub const INVALID_URL_ERROR: &str = "Invalid YouTube URL or video ID not found";

/// Everything needed to answer an embed request. Built once at startup, shared between workers.
pub struct Viewer {
    resolver: Resolver,
    oembed: OEmbedClient,
    nocookie_host: Box<str>,
}

impl Viewer {
    pub fn new(resolver: Resolver, oembed: OEmbedClient, nocookie_host: &str) -> Viewer {
        Viewer {
            resolver,
            oembed,
            nocookie_host: nocookie_host.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Viewer, ErrorContext> {
        Ok(Viewer::new(
            Resolver::new(&config.youtube.allowed_hosts),
            OEmbedClient::from_config(config)?,
            &config.youtube.nocookie_host,
        ))
    }

    pub fn embed_url(&self, video_id: &VideoId) -> String {
        format!("https://{}/embed/{video_id}", self.nocookie_host)
    }

    /// Resolves a link and looks up the video behind it.
    ///
    /// Links that don't resolve are answered right away, without contacting oEmbed.
    /// Metadata problems never make the result invalid.
    pub async fn process_url(&self, url: &str) -> EmbedResponse {
        let Some(video_id) = self.resolver.resolve(url) else {
            return EmbedResponse::invalid(INVALID_URL_ERROR);
        };

        let metadata = self.oembed.fetch_metadata(&video_id).await;

        EmbedResponse::valid(EmbedInfo {
            embed_url: self.embed_url(&video_id).into(),
            video_id: video_id.as_str().into(),
            original_url: url.into(),
            title: metadata.title,
            thumbnail_url: metadata.thumbnail_url,
            author_name: metadata.author_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, Url};
    use serde_json::json;

    use super::*;
    use crate::{oembed::{INFO_UNAVAILABLE_TITLE, NOT_AVAILABLE_TITLE, UNKNOWN_AUTHOR}, test_utils::{spawn_oembed, unreachable_endpoint, viewer, Reply}};

    fn rick() -> Reply {
        Reply::Json(json!({
            "title": "Rick Astley - Never Gonna Give You Up (Official Music Video)",
            "author_name": "Rick Astley",
            "thumbnail_url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
        }))
    }

    #[actix_web::test]
    async fn watch_link_becomes_nocookie_embed() {
        let mock = spawn_oembed(rick());
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        let resp = viewer(mock.endpoint.clone()).process_url(url).await;

        assert!(resp.is_valid());
        assert_eq!(resp.info(), Some(&EmbedInfo {
            video_id: "dQw4w9WgXcQ".into(),
            embed_url: "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ".into(),
            original_url: url.into(),
            title: "Rick Astley - Never Gonna Give You Up (Official Music Video)".into(),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".into()),
            author_name: "Rick Astley".into(),
        }));
        assert_eq!(mock.hits(), 1);
    }

    #[actix_web::test]
    async fn short_link_resolves_to_the_same_video() {
        let mock = spawn_oembed(rick());
        let resp = viewer(mock.endpoint.clone()).process_url("https://youtu.be/dQw4w9WgXcQ").await;
        let info = resp.info().expect("short link should be valid");
        assert_eq!(&*info.video_id, "dQw4w9WgXcQ");
        assert_eq!(&*info.embed_url, "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ");
        assert_eq!(&*info.original_url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[actix_web::test]
    async fn invalid_link_never_reaches_oembed() {
        let mock = spawn_oembed(rick());
        let viewer = viewer(mock.endpoint.clone());
        for url in ["https://vimeo.com/12345", "https://www.youtube.com/", "garbage"] {
            let resp = viewer.process_url(url).await;
            assert!(!resp.is_valid());
            assert_eq!(resp.error(), Some(INVALID_URL_ERROR));
            assert!(resp.info().is_none());
        }
        assert_eq!(mock.hits(), 0);
    }

    #[actix_web::test]
    async fn oembed_server_error_still_embeds() {
        let mock = spawn_oembed(Reply::Status(500));
        let resp = viewer(mock.endpoint.clone()).process_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await;
        let info = resp.info().expect("metadata errors should not invalidate the result");
        assert_eq!(&*info.title, NOT_AVAILABLE_TITLE);
        assert_eq!(&*info.author_name, UNKNOWN_AUTHOR);
        assert_eq!(info.thumbnail_url, None);
        assert_eq!(&*info.embed_url, "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ");
    }

    #[actix_web::test]
    async fn unreachable_oembed_still_embeds() {
        let resp = viewer(unreachable_endpoint()).process_url("https://m.youtube.com/watch?v=dQw4w9WgXcQ").await;
        let info = resp.info().expect("metadata errors should not invalidate the result");
        assert_eq!(&*info.title, INFO_UNAVAILABLE_TITLE);
        assert_eq!(&*info.video_id, "dQw4w9WgXcQ");
    }

    #[actix_web::test]
    async fn same_input_same_output() {
        let mock = spawn_oembed(rick());
        let viewer = viewer(mock.endpoint.clone());
        let first = viewer.process_url("https://www.youtube.com/embed/dQw4w9WgXcQ").await;
        let second = viewer.process_url("https://www.youtube.com/embed/dQw4w9WgXcQ").await;
        assert_eq!(first, second);
        assert_eq!(mock.hits(), 2);
    }

    #[test]
    fn embed_url_uses_the_configured_host() {
        let client = Client::new();
        let endpoint = Url::parse("http://127.0.0.1/oembed").unwrap();
        let viewer = Viewer::new(Resolver::new(["youtu.be"]), OEmbedClient::new(client, endpoint), "nocookie.example");
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(viewer.embed_url(&id), "https://nocookie.example/embed/dQw4w9WgXcQ");
    }
}
