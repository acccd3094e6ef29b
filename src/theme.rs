// Light and dark palettes sharing one layout scale. Both use a blue primary
// button and blue focus rings; dark sits on a gray-900 base.

use gpui::{App, Global};

use crate::appearance::EffectiveTheme;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    // Backgrounds
    pub surface: u32,
    pub titlebar_background: u32,
    pub card_background: u32,
    pub card_footer_background: u32,
    pub input_background: u32,
    pub badge_background: u32,

    // Borders
    pub border: u32,
    pub border_focus: u32,

    // Text
    pub text_primary: u32,
    pub text_dim: u32,
    pub text_on_filled: u32,
    pub input_placeholder: u32,
    pub link: u32,
    pub link_hover: u32,

    // Buttons
    pub button_filled: u32,
    pub button_filled_hover: u32,
    pub button_disabled: u32,

    // Feedback
    pub error_text: u32,
    pub error_border: u32,
    pub error_background: u32,
    pub success_text: u32,
    pub success_border: u32,
    pub success_background: u32,

    // Theme toggle
    pub toggle_track: u32,
    pub toggle_track_hover: u32,
    pub toggle_knob: u32,
    pub sun: u32,
    pub moon: u32,

    pub selection: u32,
}

pub const LIGHT: Palette = Palette {
    surface: 0xeef2fb,
    titlebar_background: 0xfafafa,
    card_background: 0xffffff,
    card_footer_background: 0xf9fafb,
    input_background: 0xffffff,
    badge_background: 0x4f46e5,

    border: 0xd1d5db,
    border_focus: 0x3b82f6,

    text_primary: 0x111827,
    text_dim: 0x4b5563,
    text_on_filled: 0xffffff,
    input_placeholder: 0x6b728099,
    link: 0x2563eb,
    link_hover: 0x3b82f6,

    button_filled: 0x2563eb,
    button_filled_hover: 0x1d4ed8,
    button_disabled: 0x93c5fd,

    error_text: 0xdc2626,
    error_border: 0xef4444,
    error_background: 0xfef2f2,
    success_text: 0x15803d,
    success_border: 0x86efac,
    success_background: 0xf0fdf4,

    toggle_track: 0xe5e7eb,
    toggle_track_hover: 0xd1d5db,
    toggle_knob: 0xffffff,
    sun: 0xeab308,
    moon: 0x60a5fa,

    selection: 0x3b82f640,
};

pub const DARK: Palette = Palette {
    surface: 0x111827,
    titlebar_background: 0x0b1120,
    card_background: 0x1f2937,
    card_footer_background: 0x1a2230,
    input_background: 0x1f2937,
    badge_background: 0x4f46e5,

    border: 0x374151,
    border_focus: 0x60a5fa,

    text_primary: 0xf3f4f6,
    text_dim: 0x9ca3af,
    text_on_filled: 0xffffff,
    input_placeholder: 0x9ca3af99,
    link: 0x60a5fa,
    link_hover: 0x93c5fd,

    button_filled: 0x2563eb,
    button_filled_hover: 0x3b82f6,
    button_disabled: 0x1e3a8a,

    error_text: 0xf87171,
    error_border: 0xf87171,
    error_background: 0x3b1c22,
    success_text: 0x4ade80,
    success_border: 0x166534,
    success_background: 0x13261b,

    toggle_track: 0x374151,
    toggle_track_hover: 0x4b5563,
    toggle_knob: 0x111827,
    sun: 0xeab308,
    moon: 0x60a5fa,

    selection: 0x60a5fa50,
};

impl Palette {
    pub fn for_theme(theme: EffectiveTheme) -> &'static Palette {
        match theme {
            EffectiveTheme::Light => &LIGHT,
            EffectiveTheme::Dark => &DARK,
        }
    }
}

/// Root theme marker of the window. Written only by the theme provider.
pub struct ActiveTheme {
    pub marker: EffectiveTheme,
}

impl Global for ActiveTheme {}

impl ActiveTheme {
    pub fn palette(context: &App) -> &'static Palette {
        let marker = context
            .try_global::<ActiveTheme>()
            .map(|active| active.marker)
            .unwrap_or(EffectiveTheme::Light);
        Palette::for_theme(marker)
    }
}

// Typography
pub const TEXT_SIZE_TITLE: f32 = 22.0;
pub const TEXT_SIZE_MEDIUM: f32 = 14.0;
pub const TEXT_SIZE_SMALL: f32 = 12.0;

pub const LINE_HEIGHT_MEDIUM: f32 = 20.0;

// Element sizing
pub const ELEMENT_HEIGHT: f32 = 40.0;
pub const BUTTON_HEIGHT_LARGE: f32 = 44.0;
pub const TITLEBAR_HEIGHT: f32 = 32.0;
pub const ICON_SLOT_WIDTH: f32 = 28.0;
pub const CHECKBOX_SIZE: f32 = 16.0;
pub const BADGE_SIZE: f32 = 64.0;

// Radius
pub const RADIUS: f32 = 8.0;
pub const RADIUS_CARD: f32 = 12.0;
pub const RADIUS_BADGE: f32 = 16.0;
pub const CURSOR_WIDTH: f32 = 2.0;

// Spacing
pub const GAP_EXTRA_SMALL: f32 = 4.0;
pub const GAP_SMALL: f32 = 8.0;
pub const GAP_MEDIUM: f32 = 12.0;
pub const GAP_LARGE: f32 = 24.0;

// Padding
pub const PADDING_INPUT_HORIZONTAL: f32 = 12.0;
pub const PADDING_INPUT_VERTICAL: f32 = 10.0;
pub const PADDING_CARD: f32 = 24.0;
pub const PADDING_BANNER: f32 = 16.0;
pub const PADDING_SCREEN: f32 = 16.0;

// Layout
pub const WINDOW_WIDTH: f32 = 720.0;
pub const WINDOW_HEIGHT: f32 = 760.0;
pub const CARD_MAX_WIDTH: f32 = 448.0;

// Theme toggle
pub const THEME_TOGGLE_WIDTH: f32 = 64.0;
pub const THEME_TOGGLE_HEIGHT: f32 = 36.0;
pub const THEME_TOGGLE_KNOB_SIZE: f32 = 28.0;
pub const THEME_TOGGLE_KNOB_LIGHT_OFFSET: f32 = 4.0;
pub const THEME_TOGGLE_KNOB_DARK_OFFSET: f32 = 32.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_marker_has_its_own_palette() {
        assert_eq!(Palette::for_theme(EffectiveTheme::Light), &LIGHT);
        assert_eq!(Palette::for_theme(EffectiveTheme::Dark), &DARK);
        assert_ne!(LIGHT.surface, DARK.surface);
        assert_ne!(LIGHT.text_primary, DARK.text_primary);
    }

    #[test]
    fn knob_travel_fits_in_track() {
        assert!(
            THEME_TOGGLE_KNOB_DARK_OFFSET + THEME_TOGGLE_KNOB_SIZE <= THEME_TOGGLE_WIDTH
        );
        assert!(THEME_TOGGLE_KNOB_SIZE < THEME_TOGGLE_HEIGHT);
    }
}
