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
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/embed`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(default)]
pub struct EmbedRequest {
    pub url: Option<Arc<str>>,
}

/// Everything known about a successfully resolved video
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct EmbedInfo {
    pub video_id: Arc<str>,
    pub embed_url: Arc<str>,
    pub original_url: Arc<str>,
    pub title: Arc<str>,
    pub thumbnail_url: Option<Arc<str>>,
    pub author_name: Arc<str>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct EmbedError {
    pub error: Arc<str>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(untagged)]
pub enum EmbedResult {
    Valid(EmbedInfo),
    Invalid(EmbedError),
}

/// Response of `POST /api/embed`.
///
/// Serializes as a flat object: `{"valid": true, "video_id": ..., ...}` on success,
/// `{"valid": false, "error": ...}` on failure.
/// The `valid` flag always agrees with the variant, which is why the fields are private.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct EmbedResponse {
    valid: bool,
    #[serde(flatten)]
    result: EmbedResult,
}

impl EmbedResponse {
    pub fn valid(info: EmbedInfo) -> Self {
        Self {
            valid: true,
            result: EmbedResult::Valid(info),
        }
    }

    pub fn invalid(error: impl Into<Arc<str>>) -> Self {
        Self {
            valid: false,
            result: EmbedResult::Invalid(EmbedError { error: error.into() }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn info(&self) -> Option<&EmbedInfo> {
        match self.result {
            EmbedResult::Valid(ref info) => Some(info),
            EmbedResult::Invalid(..) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self.result {
            EmbedResult::Valid(..) => None,
            EmbedResult::Invalid(ref err) => Some(&err.error),
        }
    }

    pub fn into_result(self) -> EmbedResult {
        self.result
    }
}

impl From<EmbedResult> for EmbedResponse {
    fn from(value: EmbedResult) -> Self {
        match value {
            EmbedResult::Valid(info) => Self::valid(info),
            EmbedResult::Invalid(err) => Self::invalid(err.error),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(default)]
pub struct StatusResponse {
    pub server_version: Option<Arc<str>>,
    pub server_git_hash: Option<Arc<str>>,
    pub server_git_dirty: Option<bool>,
    pub server_build_timestamp: Option<i64>,
    pub server_startup_timestamp: Option<i64>,
}
