use gpui::{Div, Entity, FocusHandle, Stateful, div, prelude::*, px, rgb};

use crate::{appearance::EffectiveTheme, text_input::TextInput, theme::*};

pub fn label(text: &str, palette: &Palette) -> Div {
    div()
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(palette.text_dim))
        .child(text.to_string())
}

/// Labelled input with an inline error, or helper text when there is none.
pub fn field(
    text: &str,
    input: &Entity<TextInput>,
    error: Option<&str>,
    helper: Option<&str>,
    palette: &Palette,
) -> Div {
    let note = match (error, helper) {
        (Some(error), _) => Some((error.to_string(), palette.error_text)),
        (None, Some(helper)) => Some((helper.to_string(), palette.text_dim)),
        (None, None) => None,
    };

    div()
        .flex()
        .flex_col()
        .gap(px(GAP_EXTRA_SMALL))
        .w_full()
        .child(label(text, palette))
        .child(input.clone())
        .when_some(note, |element, (text, color)| {
            element.child(
                div()
                    .text_size(px(TEXT_SIZE_SMALL))
                    .text_color(rgb(color))
                    .child(text),
            )
        })
}

/// Raised card surface the login form sits on.
pub fn card(palette: &Palette) -> Div {
    div()
        .flex()
        .flex_col()
        .w_full()
        .max_w(px(CARD_MAX_WIDTH))
        .rounded(px(RADIUS_CARD))
        .bg(rgb(palette.card_background))
        .border_1()
        .border_color(rgb(palette.border))
        .shadow_lg()
}

pub fn card_header() -> Div {
    div()
        .flex()
        .flex_col()
        .items_center()
        .p(px(PADDING_CARD))
        .pb(px(GAP_MEDIUM))
}

pub fn card_content() -> Div {
    div()
        .flex()
        .flex_col()
        .gap(px(GAP_LARGE))
        .px(px(PADDING_CARD))
        .pb(px(PADDING_CARD))
}

pub fn card_footer(palette: &Palette) -> Div {
    div()
        .flex()
        .flex_row()
        .items_center()
        .justify_center()
        .px(px(PADDING_CARD))
        .py(px(GAP_MEDIUM))
        .border_t_1()
        .border_color(rgb(palette.border))
        .rounded_b(px(RADIUS_CARD))
        .bg(rgb(palette.card_footer_background))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(palette.text_dim))
}

pub fn logo_badge(glyph: &str, palette: &Palette) -> Div {
    div()
        .flex()
        .items_center()
        .justify_center()
        .size(px(BADGE_SIZE))
        .mb(px(GAP_LARGE))
        .rounded(px(RADIUS_BADGE))
        .bg(rgb(palette.badge_background))
        .text_color(rgb(palette.text_on_filled))
        .text_size(px(TEXT_SIZE_TITLE))
        .child(glyph.to_string())
}

pub fn heading(title: &str, subtitle: &str, palette: &Palette) -> Div {
    div()
        .flex()
        .flex_col()
        .items_center()
        .gap(px(GAP_SMALL))
        .child(
            div()
                .text_size(px(TEXT_SIZE_TITLE))
                .font_weight(gpui::FontWeight::BOLD)
                .text_color(rgb(palette.text_primary))
                .child(title.to_string()),
        )
        .child(
            div()
                .text_size(px(TEXT_SIZE_MEDIUM))
                .text_color(rgb(palette.text_dim))
                .child(subtitle.to_string()),
        )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

pub fn banner(kind: BannerKind, text: &str, palette: &Palette) -> Div {
    let (background, border, color) = match kind {
        BannerKind::Error => (
            palette.error_background,
            palette.error_border,
            palette.error_text,
        ),
        BannerKind::Success => (
            palette.success_background,
            palette.success_border,
            palette.success_text,
        ),
    };

    div()
        .w_full()
        .p(px(PADDING_BANNER))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(border))
        .bg(rgb(background))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(color))
        .child(text.to_string())
}

/// Primary button. While `loading` it shows `loading_text` and ignores the
/// pointer.
pub fn button_action(
    text: &str,
    loading_text: &str,
    loading: bool,
    focus_handle: &FocusHandle,
    palette: &Palette,
) -> Div {
    let background = if loading {
        palette.button_disabled
    } else {
        palette.button_filled
    };
    let hover_background = palette.button_filled_hover;
    let focus_border = palette.border_focus;

    div()
        .track_focus(focus_handle)
        .flex()
        .items_center()
        .justify_center()
        .h(px(BUTTON_HEIGHT_LARGE))
        .w_full()
        .bg(rgb(background))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(gpui::transparent_black())
        .when(!loading, |element| {
            element
                .cursor_pointer()
                .hover(move |style| style.bg(rgb(hover_background)))
                .focus(move |style| style.border_color(rgb(focus_border)))
        })
        .text_color(rgb(palette.text_on_filled))
        .text_size(px(TEXT_SIZE_MEDIUM))
        .font_weight(gpui::FontWeight::MEDIUM)
        .child(if loading { loading_text } else { text }.to_string())
}

pub fn link(text: &str, focus_handle: &FocusHandle, palette: &Palette) -> Div {
    let hover = palette.link_hover;

    div()
        .track_focus(focus_handle)
        .cursor_pointer()
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(palette.link))
        .hover(move |style| style.text_color(rgb(hover)))
        .focus(move |style| style.text_color(rgb(hover)))
        .child(text.to_string())
}

pub fn checkbox(text: &str, checked: bool, focus_handle: &FocusHandle, palette: &Palette) -> Div {
    let (background, border) = if checked {
        (palette.button_filled, palette.button_filled)
    } else {
        (palette.input_background, palette.border)
    };
    let focus_border = palette.border_focus;

    div()
        .flex()
        .flex_row()
        .items_center()
        .gap(px(GAP_SMALL))
        .cursor_pointer()
        .child(
            div()
                .track_focus(focus_handle)
                .flex()
                .items_center()
                .justify_center()
                .size(px(CHECKBOX_SIZE))
                .rounded(px(GAP_EXTRA_SMALL))
                .border_1()
                .border_color(rgb(border))
                .bg(rgb(background))
                .focus(move |style| style.border_color(rgb(focus_border)))
                .text_size(px(TEXT_SIZE_SMALL))
                .text_color(rgb(palette.text_on_filled))
                .when(checked, |element| element.child("✓")),
        )
        .child(label(text, palette))
}

/// Pill with a sliding knob: sun on the left for light, moon on the right
/// for dark.
pub fn theme_toggle(theme: EffectiveTheme, focus_handle: &FocusHandle, palette: &Palette) -> Div {
    let knob_offset = match theme {
        EffectiveTheme::Light => THEME_TOGGLE_KNOB_LIGHT_OFFSET,
        EffectiveTheme::Dark => THEME_TOGGLE_KNOB_DARK_OFFSET,
    };
    let knob_inset = (THEME_TOGGLE_HEIGHT - THEME_TOGGLE_KNOB_SIZE) / 2.0;
    let hover = palette.toggle_track_hover;
    let focus_border = palette.border_focus;
    let glyph = |text: &'static str, color: u32, visible: bool| {
        div()
            .text_size(px(TEXT_SIZE_MEDIUM))
            .text_color(rgb(color))
            .when(!visible, |element| element.opacity(0.0))
            .child(text)
    };

    div()
        .track_focus(focus_handle)
        .relative()
        .flex()
        .flex_row()
        .items_center()
        .justify_between()
        .px(px(GAP_SMALL))
        .w(px(THEME_TOGGLE_WIDTH))
        .h(px(THEME_TOGGLE_HEIGHT))
        .rounded(px(THEME_TOGGLE_HEIGHT / 2.0))
        .bg(rgb(palette.toggle_track))
        .border_1()
        .border_color(gpui::transparent_black())
        .cursor_pointer()
        .hover(move |style| style.bg(rgb(hover)))
        .focus(move |style| style.border_color(rgb(focus_border)))
        .child(
            div()
                .absolute()
                .top(px(knob_inset))
                .left(px(knob_offset))
                .size(px(THEME_TOGGLE_KNOB_SIZE))
                .rounded(px(THEME_TOGGLE_KNOB_SIZE / 2.0))
                .bg(rgb(palette.toggle_knob))
                .shadow_md(),
        )
        .child(glyph("☀", palette.sun, !theme.is_dark()))
        .child(glyph("☾", palette.moon, theme.is_dark()))
}

pub fn titlebar_title(text: &str, palette: &Palette) -> Div {
    div()
        .flex()
        .flex_1()
        .h_full()
        .items_center()
        .pl(px(PADDING_SCREEN))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(palette.text_dim))
        .child(text.to_string())
}

pub fn titlebar_close(palette: &Palette) -> Stateful<Div> {
    let hover_background = palette.error_border;
    let hover_text = palette.text_on_filled;

    div()
        .id("titlebar-close")
        .flex()
        .items_center()
        .px(px(PADDING_SCREEN))
        .h(px(TITLEBAR_HEIGHT))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(palette.text_dim))
        .cursor_pointer()
        .hover(move |style| style.bg(rgb(hover_background)).text_color(rgb(hover_text)))
        .child("Exit")
}
