use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// URL-like handle identifying the bytes of a resource.
///
/// Locators are opaque to the filtering layer: they are produced by backing
/// loaders (or by the exported service registry) and handed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocator(Url);

impl ResourceLocator {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    pub fn from_url(url: Url) -> Self {
        Self(url)
    }

    /// `file:` locator for an absolute path. Returns `None` for relative paths.
    pub fn from_file_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(Self)
    }

    /// `jar:file:///<jar>!/<entry>` locator for an entry inside an archive.
    pub fn jar_entry(jar: &Path, entry: &str) -> Option<Self> {
        let archive = Url::from_file_path(jar).ok()?;
        let entry = entry.trim_start_matches('/');
        Url::parse(&format!("jar:{}!/{}", archive, entry))
            .ok()
            .map(Self)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Local path for `file:` locators.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.0.scheme() != "file" {
            return None;
        }
        self.0.to_file_path().ok()
    }

    /// Archive path and entry name for `jar:` locators.
    pub fn jar_parts(&self) -> Option<(PathBuf, String)> {
        if self.0.scheme() != "jar" {
            return None;
        }
        let rest = &self.0.as_str()["jar:".len()..];
        let separator = rest.find("!/")?;
        let archive = Url::parse(&rest[..separator]).ok()?.to_file_path().ok()?;
        Some((archive, rest[separator + 2..].to_string()))
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for ResourceLocator {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Url> for ResourceLocator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl Serialize for ResourceLocator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
