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

//! A fake oEmbed endpoint for tests, served by a throwaway actix server on a random local port

use std::{net::TcpListener, sync::{atomic::{AtomicUsize, Ordering}, Arc}, time::Duration};

use actix_web::{http::StatusCode, rt::{spawn, time::sleep}, web, App, HttpResponse, HttpServer};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{embed::Viewer, oembed::OEmbedClient, resolver::Resolver, state::YoutubeConfig};

#[derive(Clone)]
pub enum Reply {
    /// 200 with this json body
    Json(serde_json::Value),
    /// empty response with this status
    Status(u16),
    /// 200 with this plaintext body
    Raw(&'static str),
    /// wait this long, then send an empty json object
    Stall(Duration),
}

pub struct MockOEmbed {
    pub endpoint: Url,
    hits: Arc<AtomicUsize>,
}

impl MockOEmbed {
    /// Number of requests received so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct OEmbedQuery {
    url: String,
    format: String,
}

async fn respond(reply: Reply, query: Option<OEmbedQuery>) -> HttpResponse {
    // a malformed lookup should never look like a successful one
    let well_formed = query.is_some_and(|q| q.format == "json" && q.url.starts_with("https://www.youtube.com/watch?v="));
    if !well_formed {
        return HttpResponse::BadRequest().finish();
    }
    match reply {
        Reply::Json(body) => HttpResponse::Ok().json(body),
        Reply::Status(code) => HttpResponse::build(StatusCode::from_u16(code).expect("test status codes should be valid")).finish(),
        Reply::Raw(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Reply::Stall(duration) => {
            sleep(duration).await;
            HttpResponse::Ok().json(serde_json::json!({}))
        },
    }
}

pub fn spawn_oembed(reply: Reply) -> MockOEmbed {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = {
        let hits = hits.clone();
        HttpServer::new(move || {
            let reply = reply.clone();
            let hits = hits.clone();
            App::new().route("/oembed", web::get().to(move |query: Option<web::Query<OEmbedQuery>>| {
                hits.fetch_add(1, Ordering::SeqCst);
                respond(reply.clone(), query.map(web::Query::into_inner))
            }))
        })
    };
    let server = server
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("mock oEmbed server should be able to bind");
    let addr = server.addrs()[0];
    spawn(server.run());
    MockOEmbed {
        endpoint: Url::parse(&format!("http://{addr}/oembed")).expect("mock endpoint should be a valid URL"),
        hits,
    }
}

/// An endpoint on a port nothing listens on
pub fn unreachable_endpoint() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should be able to grab a free port");
    let addr = listener.local_addr().expect("listener should have an address");
    drop(listener);
    Url::parse(&format!("http://{addr}/oembed")).expect("unreachable endpoint should be a valid URL")
}

/// A viewer with the default youtube config, talking to the given oEmbed endpoint
pub fn viewer(endpoint: Url) -> Viewer {
    let client = Client::builder().timeout(Duration::from_millis(500)).build().expect("test reqwest client should build");
    let defaults = YoutubeConfig::default();
    Viewer::new(Resolver::new(&defaults.allowed_hosts), OEmbedClient::new(client, endpoint), &defaults.nocookie_host)
}
