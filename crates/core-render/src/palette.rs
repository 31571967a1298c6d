//! Configured colors as ready-to-embed token strings.

use core_config::{ColorSpec, ColorsConfig, Shade};
use core_terminal::{ColorToken, Target};

fn shade_components(shade: Shade) -> [bool; 4] {
    let (r, g, b) = shade.name.components();
    [r, g, b, shade.bright]
}

fn side(target: Target, shade: Option<Shade>) -> String {
    ColorToken::sequence(target, shade.map(shade_components))
        .iter()
        .map(ColorToken::encode)
        .collect()
}

/// Tokens driving both foreground and background to `spec`.
pub fn spec_tokens(spec: &ColorSpec) -> String {
    format!(
        "{}{}",
        side(Target::Foreground, spec.fg),
        side(Target::Background, spec.bg)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub reset: String,
    pub prompt: String,
    pub text: String,
    pub selection: String,
    pub search_filter: String,
    pub completion_match: String,
    pub dir_history: String,
    pub dir_history_selected: String,
}

impl Palette {
    pub fn from_colors(colors: &ColorsConfig) -> Self {
        Self {
            reset: spec_tokens(&ColorSpec::default()),
            prompt: spec_tokens(&colors.prompt),
            text: spec_tokens(&colors.text),
            selection: spec_tokens(&colors.selection),
            search_filter: spec_tokens(&colors.search_filter),
            completion_match: spec_tokens(&colors.completion_match),
            dir_history: spec_tokens(&colors.dir_history),
            dir_history_selected: spec_tokens(&colors.dir_history_selected),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_colors(&ColorsConfig::default())
    }
}
