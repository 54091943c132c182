//! Catalog entries: add-ons, event groups, guest types and packages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Catalog kind, as it appears in catalog URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    #[serde(rename = "addon")]
    Addon,
    #[serde(rename = "eventGroup")]
    EventGroup,
    #[serde(rename = "guestType")]
    GuestType,
    #[serde(rename = "package")]
    Package,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Addon,
        CatalogKind::EventGroup,
        CatalogKind::GuestType,
        CatalogKind::Package,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Addon => "addon",
            CatalogKind::EventGroup => "eventGroup",
            CatalogKind::GuestType => "guestType",
            CatalogKind::Package => "package",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ClientError::InvalidCatalog(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub id: i64,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGroup {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestType {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// Any catalog element. Untagged; variants are tried richest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogElement {
    Package(Package),
    Addon(Addon),
    Titled(EventGroup),
}

impl CatalogElement {
    pub fn id(&self) -> i64 {
        match self {
            CatalogElement::Package(p) => p.id,
            CatalogElement::Addon(a) => a.id,
            CatalogElement::Titled(t) => t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogElement::Package(p) => &p.title,
            CatalogElement::Addon(a) => &a.title,
            CatalogElement::Titled(t) => &t.title,
        }
    }
}

/// Body for creating a catalog entry; `id` is set for updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}
