// src/entity/tag.rs
use serde::{Deserialize, Serialize};

/// Scenario category. A scenario carries at most one; "no tag" is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Safety,
    Efficacy,
    #[serde(rename = "Data Quality")]
    DataQuality,
    Compliance,
    #[serde(rename = "Protocol Deviation")]
    ProtocolDeviation,
    Other,
}

impl Tag {
    /// All tags in declared order.
    pub const ALL: [Tag; 6] = [
        Tag::Safety,
        Tag::Efficacy,
        Tag::DataQuality,
        Tag::Compliance,
        Tag::ProtocolDeviation,
        Tag::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tag::Safety => "Safety",
            Tag::Efficacy => "Efficacy",
            Tag::DataQuality => "Data Quality",
            Tag::Compliance => "Compliance",
            Tag::ProtocolDeviation => "Protocol Deviation",
            Tag::Other => "Other",
        }
    }

    /// CSS badge class used when rendering the tag.
    pub fn color(&self) -> &'static str {
        "light text-dark"
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        name.parse().ok()
    }

    /// Resolve a free-form tag name, falling back to `Other`.
    pub fn resolve(name: &str) -> Tag {
        Tag::from_name(name).unwrap_or(Tag::Other)
    }

    /// Parse a seed label, which may be a decorated string such as
    /// `Tag(name='Safety', color='light text-dark')`.
    pub fn from_label(label: &str) -> Tag {
        const ORDER: [Tag; 5] = [
            Tag::Safety,
            Tag::Compliance,
            Tag::DataQuality,
            Tag::Efficacy,
            Tag::ProtocolDeviation,
        ];
        ORDER
            .into_iter()
            .find(|tag| label.contains(tag.name()))
            .unwrap_or(Tag::Other)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "safety" => Ok(Tag::Safety),
            "efficacy" => Ok(Tag::Efficacy),
            "data quality" => Ok(Tag::DataQuality),
            "compliance" => Ok(Tag::Compliance),
            "protocol deviation" => Ok(Tag::ProtocolDeviation),
            "other" => Ok(Tag::Other),
            _ => Err(format!("Invalid tag: {}", s)),
        }
    }
}
