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
use std::{fs::File, io::{self, Read, Write}, path::{Path, PathBuf}};

use chrono::{DateTime, Utc};
use cloneable_errors::{bail, ErrorContext, ResContext};
use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub static_content_path: PathBuf,
    pub listen: ListenConfig,
    pub reqwest_timeout_secs: f64,
    #[serde(skip)]
    pub startup_timestamp: DateTime<Utc>,
    pub enable_timings_header: bool,
    pub youtube: YoutubeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            static_content_path: PathBuf::from("./static"),
            listen: ListenConfig::default(),
            reqwest_timeout_secs: 10.,
            startup_timestamp: Utc::now(),
            enable_timings_header: false,
            youtube: YoutubeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the config file, or writes out the defaults if it doesn't exist yet
    pub fn load_or_create(path: &Path) -> Result<AppConfig, ErrorContext> {
        let path_str = path.display();
        let cfg: AppConfig = match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).with_context(|| format!("Failed to read {path_str}"))?;
                toml::from_str(&contents).with_context(|| format!("Failed to deserialize contents of {path_str}"))?
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = AppConfig::default();
                let serialized = toml::to_string(&cfg).context("Failed to serialize default AppConfig as TOML")?;
                let mut file = File::options().write(true).create_new(true).open(path).with_context(|| format!("Failed to create {path_str}"))?;
                write!(file, "{serialized}").with_context(|| format!("Failed to write serialized default AppConfig to {path_str}"))?;
                cfg
            },
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {path_str}"));
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ErrorContext> {
        if self.listen.tcp.is_none() && self.listen.unix.is_none() {
            bail!("Invalid configuration - no tcp port or unix socket path specified");
        }
        if !(self.reqwest_timeout_secs.is_finite() && self.reqwest_timeout_secs > 0.) {
            bail!("Invalid configuration - reqwest_timeout_secs must be a positive number, got {}", self.reqwest_timeout_secs);
        }
        if self.youtube.allowed_hosts.is_empty() {
            bail!("Invalid configuration - youtube.allowed_hosts is empty, no link would ever be accepted");
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Links are only accepted if their host is exactly one of these
    pub allowed_hosts: Vec<String>,
    pub oembed_endpoint: String,
    /// Host used for the generated embed links
    pub nocookie_host: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![
                "youtube.com".to_owned(),
                "www.youtube.com".to_owned(),
                "youtu.be".to_owned(),
                "m.youtube.com".to_owned(),
            ],
            oembed_endpoint: "https://www.youtube.com/oembed".to_owned(),
            nocookie_host: "www.youtube-nocookie.com".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ListenConfig {
    pub tcp: Option<(String, u16)>,
    pub unix: Option<String>,
    pub unix_mode: Option<u32>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            tcp: Some(("0.0.0.0".to_owned(), 9292)),
            unix: None,
            unix_mode: None,
        }
    }
}
