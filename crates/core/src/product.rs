//! Product types shared by the catalog and the advisor

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canonical product identifier.
///
/// The catalog and every lookup path use this single numeric type. External
/// payloads that carry ids as strings or numbers are normalized into it at
/// the deserialization boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl ProductId {
    /// Sentinel id for records synthesized outside the catalog.
    pub const UNKNOWN: ProductId = ProductId(0);
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ProductId)
            .map_err(|_| Error::InvalidProductId(s.to_string()))
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

/// Strain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrainType {
    Indica,
    Sativa,
    Hybrid,
}

impl StrainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrainType::Indica => "indica",
            StrainType::Sativa => "sativa",
            StrainType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for StrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terpene entry with its share in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terpene {
    /// Terpene name (e.g. "Myrcen")
    pub name: String,
    /// Share in percent
    pub percentage: f32,
}

impl Terpene {
    pub fn new(name: impl Into<String>, percentage: f32) -> Self {
        Self {
            name: name.into(),
            percentage,
        }
    }
}

/// A single catalog product.
///
/// List fields are never null: absence is represented as an empty sequence.
/// THC/CBD content is carried as percentage strings the way the storefront
/// displays them ("18%", "0,4%"); use [`ProductRecord::thc_percent`] /
/// [`ProductRecord::cbd_percent`] for numeric access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique id within the catalog
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Category (e.g. "Blüten", "Extrakte")
    pub category: String,
    /// Strain classification
    pub strain: StrainType,
    /// Price in EUR
    pub price: f64,
    /// THC content as displayed (percentage string)
    pub thc: String,
    /// CBD content as displayed (percentage string)
    pub cbd: String,
    /// Effect tags
    #[serde(default)]
    pub effects: Vec<String>,
    /// Benefit tags
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Terpene profile
    #[serde(default)]
    pub terpenes: Vec<Terpene>,
    /// Flavor tags
    #[serde(default)]
    pub flavors: Vec<String>,
    /// Image references
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductRecord {
    /// Numeric THC content, if the display string parses.
    pub fn thc_percent(&self) -> Option<f32> {
        parse_percent(&self.thc)
    }

    /// Numeric CBD content, if the display string parses.
    pub fn cbd_percent(&self) -> Option<f32> {
        parse_percent(&self.cbd)
    }
}

/// Parse a display percentage ("18%", "0,4 %") into a number.
fn parse_percent(value: &str) -> Option<f32> {
    value
        .trim()
        .trim_end_matches('%')
        .trim()
        .replace(',', ".")
        .parse()
        .ok()
}
