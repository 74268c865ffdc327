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
#![allow(clippy::needless_pass_by_value)]
use actix_web::{error::{InternalError, JsonPayloadError}, get, http::header::ContentType, post, web, HttpRequest, HttpResponse, Responder};
use chrono::DateTime;
use nocookie_viewer_api::{EmbedRequest, EmbedResponse, StatusResponse};

use crate::{built_info, embed::Viewer, state::AppConfig};

pub const NO_URL_ERROR: &str = "No URL provided";

const PRIVACY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Privacy Information</title>
</head>
<body>
    <h1>Privacy Information</h1>
    <p>This site uses YouTube's no-cookie domain (youtube-nocookie.com) which:</p>
    <ul>
        <li>Does not store visitor data unless they play the video</li>
        <li>Respects user privacy</li>
        <li>Is GDPR compliant for embedded content</li>
    </ul>
    <a href="/">Return to viewer</a>
</body>
</html>
"#;

/// Routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
       .service(post_embed)
       .service(get_status);
}

/// Plain pages outside `/api`. The index is served from the static content directory.
pub fn configure_pages(cfg: &mut web::ServiceConfig) {
    cfg.service(privacy);
}

/// Keeps bad request bodies in the same shape as every other embed response
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let resp = HttpResponse::BadRequest().json(EmbedResponse::invalid(format!("Invalid request body: {err}")));
    InternalError::from_response(err, resp).into()
}

#[post("/embed")]
async fn post_embed(viewer: web::Data<Viewer>, body: web::Json<EmbedRequest>) -> web::Json<EmbedResponse> {
    let url = body.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return web::Json(EmbedResponse::invalid(NO_URL_ERROR));
    }
    web::Json(viewer.process_url(url).await)
}

#[get("/status")]
async fn get_status(config: web::Data<AppConfig>) -> web::Json<StatusResponse> {
    web::Json(StatusResponse {
        server_version: Some(built_info::PKG_VERSION.into()),
        server_git_hash: built_info::GIT_COMMIT_HASH.map(std::convert::Into::into),
        server_git_dirty: built_info::GIT_DIRTY,
        server_build_timestamp: DateTime::parse_from_rfc2822(built_info::BUILT_TIME_UTC).ok().map(|t| t.timestamp()),
        server_startup_timestamp: Some(config.startup_timestamp.timestamp()),
    })
}

#[get("/privacy")]
async fn privacy() -> impl Responder {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(PRIVACY_PAGE)
}
