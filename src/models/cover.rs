use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DreamLayerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverStyle {
    Gradients,
    Abstract,
    Minimalist,
    Geometric,
    Vintage,
    Nature,
}

impl CoverStyle {
    pub const ALL: [CoverStyle; 6] = [
        CoverStyle::Gradients,
        CoverStyle::Abstract,
        CoverStyle::Minimalist,
        CoverStyle::Geometric,
        CoverStyle::Vintage,
        CoverStyle::Nature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverStyle::Gradients => "gradients",
            CoverStyle::Abstract => "abstract",
            CoverStyle::Minimalist => "minimalist",
            CoverStyle::Geometric => "geometric",
            CoverStyle::Vintage => "vintage",
            CoverStyle::Nature => "nature",
        }
    }

    pub fn prompt(&self, mood: &str) -> String {
        match self {
            CoverStyle::Gradients => {
                format!("beautiful gradient, {}, artistic, 300x300px, square", mood)
            }
            CoverStyle::Abstract => format!(
                "abstract art, {}, bold shapes, artistic, 300x300px, square",
                mood
            ),
            CoverStyle::Minimalist => format!(
                "minimalist design, {}, clean lines, simple, 300x300px, square",
                mood
            ),
            CoverStyle::Geometric => format!(
                "geometric pattern, {}, modern, symmetrical, 300x300px, square",
                mood
            ),
            CoverStyle::Vintage => format!(
                "vintage album art, {}, retro, film grain, 300x300px, square",
                mood
            ),
            CoverStyle::Nature => format!(
                "nature scenery, {}, soft light, artistic, 300x300px, square",
                mood
            ),
        }
    }
}

impl fmt::Display for CoverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverStyle {
    type Err = DreamLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        CoverStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == tag)
            .ok_or_else(|| DreamLayerError::InvalidStyle(s.to_string()))
    }
}

/// Builds the full prompt for a playlist cover. A blank title adds nothing.
pub fn cover_prompt(style: CoverStyle, mood: &str, title: Option<&str>) -> String {
    let mut prompt = style.prompt(mood);
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(", inspired by \"{}\"", title));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradients_with_title() {
        let prompt = cover_prompt(CoverStyle::Gradients, "calm", Some("Late Night"));
        assert_eq!(
            prompt,
            "beautiful gradient, calm, artistic, 300x300px, square, inspired by \"Late Night\""
        );
    }

    #[test]
    fn test_blank_title_is_ignored() {
        assert_eq!(
            cover_prompt(CoverStyle::Gradients, "calm", Some("   ")),
            "beautiful gradient, calm, artistic, 300x300px, square"
        );
        assert_eq!(
            cover_prompt(CoverStyle::Gradients, "calm", None),
            "beautiful gradient, calm, artistic, 300x300px, square"
        );
    }

    #[test]
    fn test_parse_style_tags() {
        assert_eq!("gradients".parse::<CoverStyle>().unwrap(), CoverStyle::Gradients);
        assert_eq!(" Vintage ".parse::<CoverStyle>().unwrap(), CoverStyle::Vintage);
        for style in CoverStyle::ALL {
            assert_eq!(style.to_string().parse::<CoverStyle>().unwrap(), style);
        }
        assert!(matches!(
            "vaporwave".parse::<CoverStyle>(),
            Err(DreamLayerError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_every_style_mentions_mood() {
        for style in CoverStyle::ALL {
            assert!(style.prompt("melancholic").contains("melancholic"));
        }
    }
}
