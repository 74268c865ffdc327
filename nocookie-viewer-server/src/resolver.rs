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

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("Should be able to parse the video ID regex"));

/// Tried in order against the whole URL string, first match wins.
/// The first pattern also catches most embed & short links on its own, the other two only
/// matter for URLs it somehow misses.
static EXTRACTION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| [
    // youtube.com/watch?v=XXX
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11}).*").expect("Should be able to parse the query-style extraction regex"),
    // youtube.com/embed/XXX
    Regex::new(r"(?:embed/)([0-9A-Za-z_-]{11})").expect("Should be able to parse the embed-style extraction regex"),
    // youtu.be/XXX
    Regex::new(r"(?:youtu\.be/)([0-9A-Za-z_-]{11})").expect("Should be able to parse the short link extraction regex"),
]);

/// An 11 character YouTube video ID
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(s: &str) -> Option<VideoId> {
        VIDEO_ID_REGEX.is_match(s).then(|| VideoId(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical youtube.com URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns user-supplied links into video IDs.
///
/// The host check and the ID extraction are independent: the authority has to be on the allow-list,
/// then the patterns run against the original string, regardless of which host it was.
/// Authorities are compared as written, so case, escapes, ports and credentials all count.
pub struct Resolver {
    allowed_hosts: Box<[Box<str>]>,
}

impl Resolver {
    pub fn new<I, S>(allowed_hosts: I) -> Resolver
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Resolver {
            allowed_hosts: allowed_hosts.into_iter().map(|h| h.as_ref().into()).collect(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<VideoId> {
        if !authority(url).is_some_and(|authority| self.is_allowed(authority)) {
            return None;
        }

        EXTRACTION_PATTERNS.iter()
            .find_map(|pattern| pattern.captures(url))
            .and_then(|captures| VideoId::parse(&captures[1]))
    }

    fn is_allowed(&self, authority: &str) -> bool {
        self.allowed_hosts.iter().any(|allowed| &**allowed == authority)
    }
}

/// The raw authority of a URL: whatever sits between `//` and the next `/`, `?` or `#`.
///
/// An optional scheme may precede the `//`. Nothing is decoded or normalized.
fn authority(url: &str) -> Option<&str> {
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };
    let rest = rest.strip_prefix("//")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn is_scheme(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_alphabetic())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
