// Note records
// A note is a titled block of content with inline markers, a background and a
// whole-block text format. Content is stored exactly as the user left it.

use crate::identity::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BACKGROUND: &str = "default";

/// Heading style applied to the whole content block, independent of inline markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Normal,
    H1,
    H2,
}

impl TextFormat {
    pub fn css_class(&self) -> &'static str {
        match self {
            TextFormat::Normal => "text-format-normal",
            TextFormat::H1 => "text-format-h1",
            TextFormat::H2 => "text-format-h2",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextFormat::Normal => "normal",
            TextFormat::H1 => "h1",
            TextFormat::H2 => "h2",
        };
        f.write_str(name)
    }
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(TextFormat::Normal),
            "h1" => Ok(TextFormat::H1),
            "h2" => Ok(TextFormat::H2),
            other => Err(format!("Unknown text format '{}'", other)),
        }
    }
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_background")]
    pub bg_color: String,
    #[serde(default = "default_background")]
    pub bg_image: String,
    #[serde(default)]
    pub text_format: TextFormat,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn from_draft(id: String, owner_id: UserId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Note {
            id,
            owner_id,
            title: draft.title,
            content: draft.content,
            bg_color: draft.bg_color,
            bg_image: draft.bg_image,
            text_format: draft.text_format,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields set in `patch` and bump `updated_at`
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(bg_color) = patch.bg_color {
            self.bg_color = bg_color;
        }
        if let Some(bg_image) = patch.bg_image {
            self.bg_image = bg_image;
        }
        if let Some(text_format) = patch.text_format {
            self.text_format = text_format;
        }
        self.updated_at = now;
    }
}

/// A note that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub bg_color: String,
    pub bg_image: String,
    pub text_format: TextFormat,
}

impl Default for NoteDraft {
    fn default() -> Self {
        NoteDraft {
            title: String::new(),
            content: String::new(),
            bg_color: default_background(),
            bg_image: default_background(),
            text_format: TextFormat::Normal,
        }
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// A draft with neither title nor content is not worth saving
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// A partial update; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub bg_color: Option<String>,
    pub bg_image: Option<String>,
    pub text_format: Option<TextFormat>,
}

impl NotePatch {
    pub fn content(content: impl Into<String>) -> Self {
        NotePatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn text_format(text_format: TextFormat) -> Self {
        NotePatch {
            text_format: Some(text_format),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == NotePatch::default()
    }
}
