//! License resolution.
//! Lists available licenses, fetches full license text and maps SPDX
//! identifiers to trove classifiers. The remote source sits behind the
//! [`LicenseSource`] trait; listing degrades to an offline table and body
//! fetching degrades to `Error::LicenseFetchUnavailable`.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

pub const GITHUB_API_BASE_URL: &str = "https://api.github.com/";
pub const LICENSE_API_TIMEOUT: Duration = Duration::from_secs(5);
const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Key that skips license setup entirely.
pub const SKIP_KEY: &str = "none";

const SPDX_IDS: [(&str, &str); 13] = [
    ("agpl-3.0", "AGPL-3.0-only"),
    ("apache-2.0", "Apache-2.0"),
    ("bsd-2-clause", "BSD-2-Clause"),
    ("bsd-3-clause", "BSD-3-Clause"),
    ("bsl-1.0", "BSL-1.0"),
    ("cc0-1.0", "CC0-1.0"),
    ("epl-2.0", "EPL-2.0"),
    ("gpl-2.0", "GPL-2.0-only"),
    ("gpl-3.0", "GPL-3.0-only"),
    ("lgpl-2.1", "LGPL-2.1-only"),
    ("mit", "MIT"),
    ("mpl-2.0", "MPL-2.0"),
    ("unlicense", "Unlicense"),
];

const CLASSIFIERS: [(&str, &str); 13] = [
    ("MIT", "License :: OSI Approved :: MIT License"),
    ("Apache-2.0", "License :: OSI Approved :: Apache Software License"),
    ("BSD-2-Clause", "License :: OSI Approved :: BSD License"),
    ("BSD-3-Clause", "License :: OSI Approved :: BSD License"),
    ("GPL-2.0-only", "License :: OSI Approved :: GNU General Public License v2 (GPLv2)"),
    ("GPL-3.0-only", "License :: OSI Approved :: GNU General Public License v3 (GPLv3)"),
    (
        "LGPL-2.1-only",
        "License :: OSI Approved :: GNU Lesser General Public License v2 or later (LGPLv2+)",
    ),
    ("AGPL-3.0-only", "License :: OSI Approved :: GNU Affero General Public License v3"),
    ("MPL-2.0", "License :: OSI Approved :: Mozilla Public License 2.0 (MPL 2.0)"),
    ("Unlicense", "License :: OSI Approved :: The Unlicense (Unlicense)"),
    ("BSL-1.0", "License :: OSI Approved :: Boost Software License 1.0 (BSL-1.0)"),
    ("CC0-1.0", "License :: CC0 1.0 Universal (CC0 1.0) Public Domain Dedication"),
    ("EPL-2.0", "License :: OSI Approved :: Eclipse Public License 2.0 (EPL-2.0)"),
];

const OFFLINE_LICENSES: [(&str, &str); 6] = [
    ("apache-2.0", "Apache License 2.0"),
    ("mit", "MIT License"),
    ("bsd-3-clause", "BSD 3-Clause \"New\" or \"Revised\" License"),
    ("gpl-3.0", "GNU General Public License v3.0"),
    ("mpl-2.0", "Mozilla Public License 2.0"),
    ("unlicense", "The Unlicense"),
];

const YEAR_PLACEHOLDERS: [&str; 3] = ["[year]", "[yyyy]", "<year>"];
const HOLDER_PLACEHOLDERS: [&str; 6] = [
    "[fullname]",
    "[name of copyright owner]",
    "[name of copyright holder]",
    "<name of copyright owner>",
    "<name of copyright holder>",
    "<copyright holders>",
];

/// An entry of the license listing, as returned by the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseSummary {
    pub key: String,
    pub name: String,
}

/// A full license document. Only these three fields are required; anything
/// else the source sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseDocument {
    pub key: String,
    pub name: String,
    pub body: String,
}

/// A license selected for the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseInfo {
    pub key: String,
    pub name: String,
    pub spdx_id: String,
}

impl LicenseInfo {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let key = key.into();
        Self { spdx_id: spdx_id_for_key(&key), key, name: name.into() }
    }

    pub fn classifier(&self) -> Option<&'static str> {
        map_to_classifier(&self.spdx_id)
    }
}

/// A fully resolved license, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    pub key: String,
    pub spdx_id: String,
    pub display_name: String,
    pub full_text: String,
    pub classifier_tag: Option<&'static str>,
}

/// The license listing together with whether it came from the offline table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseListing {
    pub licenses: Vec<LicenseInfo>,
    pub abbreviated: bool,
}

impl LicenseListing {
    pub fn keys(&self) -> Vec<&str> {
        self.licenses.iter().map(|l| l.key.as_str()).collect()
    }
}

/// Trait for license metadata sources.
pub trait LicenseSource {
    fn list(&self) -> Result<Vec<LicenseSummary>>;

    fn fetch(&self, key: &str) -> Result<LicenseDocument>;
}

/// License source backed by the GitHub licenses API.
pub struct GithubLicenseSource {
    client: Client,
    base_url: Url,
}

impl GithubLicenseSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::ConfigError(format!("invalid license API URL '{base_url}': {e}")))?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(LICENSE_API_TIMEOUT)
            .build()
            .map_err(|e| Error::ConfigError(format!("cannot create HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::ConfigError(format!("invalid license API path '{path}': {e}")))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let unavailable = |reason: String| Error::LicenseFetchUnavailable {
            key: key.to_string(),
            reason,
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| unavailable(e.to_string()))?
            .json()
            .map_err(|e| unavailable(format!("malformed response: {e}")))
    }
}

impl LicenseSource for GithubLicenseSource {
    fn list(&self) -> Result<Vec<LicenseSummary>> {
        self.get("*", "licenses")
    }

    fn fetch(&self, key: &str) -> Result<LicenseDocument> {
        self.get(key, &format!("licenses/{key}"))
    }
}

/// A source that is never reachable, used for `--offline` runs.
pub struct OfflineLicenseSource;

impl LicenseSource for OfflineLicenseSource {
    fn list(&self) -> Result<Vec<LicenseSummary>> {
        Err(Error::LicenseFetchUnavailable {
            key: "*".to_string(),
            reason: "offline mode".to_string(),
        })
    }

    fn fetch(&self, key: &str) -> Result<LicenseDocument> {
        Err(Error::LicenseFetchUnavailable {
            key: key.to_string(),
            reason: "offline mode".to_string(),
        })
    }
}

/// Resolves license keys, listings and bodies against a [`LicenseSource`].
pub struct LicenseResolver<'a> {
    source: &'a dyn LicenseSource,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(source: &'a dyn LicenseSource) -> Self {
        Self { source }
    }

    /// Lists available licenses, falling back to the offline table when the
    /// source is unreachable.
    pub fn list_licenses(&self) -> LicenseListing {
        match self.source.list() {
            Ok(summaries) => LicenseListing {
                licenses: summaries.into_iter().map(|s| LicenseInfo::new(s.key, s.name)).collect(),
                abbreviated: false,
            },
            Err(e) => {
                warn!("License list unavailable ({e}), showing an abbreviated offline list");
                LicenseListing { licenses: offline_licenses(), abbreviated: true }
            }
        }
    }

    /// Matches a user supplied key case-insensitively against the listing.
    ///
    /// Returns `Ok(None)` for the skip key.
    ///
    /// # Errors
    /// * `Error::UnknownLicenseKey` listing the valid keys
    pub fn find(&self, key: &str) -> Result<Option<LicenseInfo>> {
        let wanted = key.trim().to_lowercase();
        if wanted == SKIP_KEY {
            return Ok(None);
        }

        let listing = self.list_licenses();
        match listing.licenses.iter().find(|l| l.key.to_lowercase() == wanted) {
            Some(license) => Ok(Some(license.clone())),
            None => Err(Error::UnknownLicenseKey {
                key: key.to_string(),
                available: listing.keys().join(", "),
            }),
        }
    }

    /// Fetches the full text of a license and fills in the copyright holder and year.
    ///
    /// # Errors
    /// * `Error::LicenseFetchUnavailable` when the source cannot be reached
    pub fn resolve_license_body(&self, key: &str, author: &str, year: i32) -> Result<String> {
        let document = self.source.fetch(key)?;
        if document.body.trim().is_empty() {
            return Err(Error::LicenseFetchUnavailable {
                key: key.to_string(),
                reason: "empty license body".to_string(),
            });
        }
        Ok(fill_placeholders(&document.body, author, year))
    }

    pub fn resolve(&self, license: &LicenseInfo, author: &str, year: i32) -> Result<LicenseRecord> {
        let full_text = self.resolve_license_body(&license.key, author, year)?;
        Ok(LicenseRecord {
            key: license.key.clone(),
            spdx_id: license.spdx_id.clone(),
            display_name: license.name.clone(),
            full_text,
            classifier_tag: license.classifier(),
        })
    }
}

pub fn offline_licenses() -> Vec<LicenseInfo> {
    OFFLINE_LICENSES.iter().map(|(key, name)| LicenseInfo::new(*key, *name)).collect()
}

/// Maps a license key to its SPDX identifier; unknown keys are upper-cased.
pub fn spdx_id_for_key(key: &str) -> String {
    let key = key.to_lowercase();
    SPDX_IDS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, spdx)| spdx.to_string())
        .unwrap_or_else(|| key.to_uppercase())
}

/// Maps an SPDX identifier to a trove classifier.
pub fn map_to_classifier(spdx_id: &str) -> Option<&'static str> {
    CLASSIFIERS.iter().find(|(id, _)| *id == spdx_id).map(|(_, tag)| *tag)
}

/// Substitutes year and copyright holder placeholders in a license body.
pub fn fill_placeholders(body: &str, author: &str, year: i32) -> String {
    let year = year.to_string();
    let body = YEAR_PLACEHOLDERS.iter().fold(body.to_string(), |acc, p| acc.replace(p, &year));
    HOLDER_PLACEHOLDERS.iter().fold(body, |acc, p| acc.replace(p, author))
}
