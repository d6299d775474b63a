//! Command recognition and option parsing for chat text.
//!
//! The first whitespace token names the command (an optional leading `/` is ignored, and an
//! `@botname` suffix must name this bot when its username is known); the remaining tokens are split by [`ParsedArgs::parse`] into recognised options and free text.

use citymap_core::{MarkerColor, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Help,
    Guide,
    ShowCity,
    RememberCity,
    ShowMyCities,
}

impl CommandKind {
    /// Case-sensitive lookup of a command name without its `/`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "guid" => Some(Self::Guide),
            "show_city" => Some(Self::ShowCity),
            "remember_city" => Some(Self::RememberCity),
            "show_my_cities" => Some(Self::ShowMyCities),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Guide => "guid",
            Self::ShowCity => "show_city",
            Self::RememberCity => "remember_city",
            Self::ShowMyCities => "show_my_cities",
        }
    }
}

/// A recognised command and the tokens that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub kind: CommandKind,
    pub args: Vec<&'a str>,
}

impl<'a> Command<'a> {
    /// Returns `None` for empty text and unknown command names. Any `@botname` suffix is accepted.
    pub fn parse(text: &'a str) -> Option<Self> {
        Self::parse_for(text, None)
    }

    /// Like [`Command::parse`], but when `bot_username` is known a command addressed to another bot
    /// (`/help@OtherBot`) returns `None`. Usernames compare case-insensitively, as Telegram does.
    pub fn parse_for(text: &'a str, bot_username: Option<&str>) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?;
        let head = head.strip_prefix('/').unwrap_or(head);
        let name = match head.split_once('@') {
            Some((name, target)) => {
                if let Some(username) = bot_username {
                    if !target.eq_ignore_ascii_case(username.trim_start_matches('@')) {
                        return None;
                    }
                }
                name
            }
            None => head,
        };
        let kind = CommandKind::from_name(name)?;
        Some(Self {
            kind,
            args: tokens.collect(),
        })
    }
}

/// One classified argument token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgToken<'a> {
    /// `color:<value>`; the value is whatever follows the first `:` up to the next one.
    Color(&'a str),
    Fill,
    Objects,
    Text(&'a str),
}

impl<'a> ArgToken<'a> {
    fn classify(token: &'a str) -> Self {
        if let Some(rest) = token.strip_prefix("color:") {
            return Self::Color(rest.split(':').next().unwrap_or(""));
        }
        match token {
            "fill" => Self::Fill,
            "objects" => Self::Objects,
            other => Self::Text(other),
        }
    }
}

/// Options and free text extracted from command arguments.
///
/// Options may appear anywhere; free-text tokens are joined with single spaces in the order they appear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedArgs {
    pub text: String,
    /// Last `color:` value seen, lower-cased. `None` when no colour was given.
    pub color: Option<String>,
    pub fill: bool,
    pub objects: bool,
}

impl ParsedArgs {
    pub fn parse(args: &[&str]) -> Self {
        let mut parsed = Self::default();
        let mut words: Vec<&str> = Vec::new();

        for &token in args {
            match ArgToken::classify(token) {
                ArgToken::Color(value) => parsed.color = Some(value.to_lowercase()),
                ArgToken::Fill => parsed.fill = true,
                ArgToken::Objects => parsed.objects = true,
                ArgToken::Text(word) => words.push(word),
            }
        }

        parsed.text = words.join(" ");
        parsed
    }

    /// The requested marker colour, or `Err(value)` when the value is not one of [`MarkerColor`].
    pub fn marker_color(&self) -> Result<MarkerColor, String> {
        match &self.color {
            None => Ok(MarkerColor::default()),
            Some(value) => value.parse().map_err(|_| value.clone()),
        }
    }

    /// Render options with the colour falling back to the default when invalid.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            marker_color: self.marker_color().unwrap_or_default(),
            fill_continents: self.fill,
            show_features: self.objects,
        }
    }
}
