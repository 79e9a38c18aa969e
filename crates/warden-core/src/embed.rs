//! Outgoing embed value types.
//!
//! Kept platform-agnostic so the dispatcher and command bodies can build
//! replies without depending on the Discord adapter.

pub const COLOR_SUCCESS: u32 = 0x2ecc71;
pub const COLOR_ERROR: u32 = 0xe74c3c;
pub const COLOR_INFO: u32 = 0x5865f2;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
    pub thumbnail: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Green embed used for "it worked" replies.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            description: Some(text.into()),
            color: Some(COLOR_SUCCESS),
            ..Self::default()
        }
    }

    /// Red embed used for every user-visible failure.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            description: Some(text.into()),
            color: Some(COLOR_ERROR),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}
