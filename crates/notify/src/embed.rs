//! Structured message (embed) model for the messaging API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A rich embed attached to a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
}

impl Default for Embed {
    fn default() -> Self {
        Self {
            title: None,
            kind: "rich".to_string(),
            description: None,
            url: None,
            timestamp: None,
            color: None,
            footer: None,
            thumbnail: None,
            fields: Vec::new(),
        }
    }
}

/// Footer line of an embed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Thumbnail image of an embed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// A titled field in an embed body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

impl EmbedField {
    /// An inline field.
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: Some(true),
        }
    }

    /// A block field.
    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let embed = Embed::default();
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["type"], "rich");
        assert!(json.get("title").is_none());
        assert!(json.get("timestamp").is_none());
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_timestamp_serializes_rfc3339() {
        let embed = Embed {
            timestamp: Some(time::macros::datetime!(2024-06-01 12:00 UTC)),
            ..Embed::default()
        };
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["timestamp"], "2024-06-01T12:00:00Z");
    }
}
