use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response payload. `ephemeral` is a delivery flag, each gateway encodes it its own way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,

    #[serde(skip)]
    pub ephemeral: bool,
}

impl Message {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    /// Only visible to the invoking user
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Embed {
    /// New embed stamped with the current time
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            timestamp: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Value of the field called `name`
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|x| x.name == name).map(|x| x.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_serializes_without_empty_parts() {
        let message = Message::content("❌ Unknown command.").ephemeral();

        assert_eq!(serde_json::to_value(&message).unwrap(), json!({ "content": "❌ Unknown command." }));
    }

    #[test]
    fn embed_serializes_in_platform_shape() {
        let mut embed = Embed::new("💰 Wallet Balance").color(0x1e88e5).field("Network", "Sepolia Testnet", true).footer("Click title to view on explorer");
        embed.timestamp = None;

        assert_eq!(
            serde_json::to_value(Message::embed(embed)).unwrap(),
            json!({
                "embeds": [{
                    "title": "💰 Wallet Balance",
                    "color": 0x1e88e5,
                    "fields": [{ "name": "Network", "value": "Sepolia Testnet", "inline": true }],
                    "footer": { "text": "Click title to view on explorer" }
                }]
            })
        );
    }
}
