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
use std::{fs::{Permissions, set_permissions}, os::unix::prelude::PermissionsExt, path::Path};
use actix_files::Files;
use actix_web::{HttpServer, App, web, middleware::{Logger, NormalizePath}};
use cloneable_errors::{ErrorContext, ResContext};
use env_logger::Env;
use log::info;

mod embed;
mod middleware;
mod oembed;
mod resolver;
mod routes;
mod state;
mod utils;
#[cfg(test)]
mod test_utils;

use embed::Viewer;
use middleware::Timings;
use state::AppConfig;

const CONFIG_PATH: &str = "config.toml";


#[actix_web::main]
async fn main() -> Result<(), ErrorContext> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config: web::Data<AppConfig> = web::Data::new(AppConfig::load_or_create(Path::new(CONFIG_PATH))?);
    let viewer: web::Data<Viewer> = web::Data::new(Viewer::from_config(&config).context("Failed to set up the viewer")?);
    info!("Accepting links from: {}", config.youtube.allowed_hosts.join(", "));

    let mut server = {
        let config = config.clone();
        HttpServer::new(move || {
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(Logger::default())
                .wrap(Timings::new(config.enable_timings_header))
                .app_data(config.clone())
                .app_data(viewer.clone())
                .service(web::scope("/api")
                    .configure(routes::configure)
                )
                .configure(routes::configure_pages)
                .service(
                    Files::new("/", config.static_content_path.as_path())
                        .index_file("index.html")
                )
        })
    };
    if let Some((ref ip, port)) = config.listen.tcp {
        let ip_str = ip.as_str();
        server = server.bind((ip_str, port)).with_context(|| format!("Failed to bind to tcp port {ip_str}:{port}"))?;
        info!("Listening on {ip_str}:{port}");
    }
    if let Some(ref path) = config.listen.unix {
        let path_str = path.as_str();
        server = server.bind_uds(path_str).with_context(|| format!("Failed to bind to unix socket {path_str}"))?;
        if let Some(mode) = config.listen.unix_mode {
            let perms = Permissions::from_mode(mode);
            set_permissions(path_str, perms).with_context(|| format!("Failed to change mode of unix socket {path_str} to {mode}"))?;
        }
        info!("Listening on {path_str}");
    }
    server.run()
    .await
    .context("Error while running the server")
}

mod built_info {
    // Contents generated by buildscript, using built
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
