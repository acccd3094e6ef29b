use std::ops::Range;

use gpui::{
    App, Bounds, ClipboardItem, Context, CursorStyle, ElementId, ElementInputHandler,
    Entity, EntityInputHandler, EventEmitter, FocusHandle, Focusable, GlobalElementId, LayoutId,
    MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, PaintQuad, Pixels, Point,
    ShapedLine, SharedString, Style, TextRun, UTF16Selection, Window, actions, div,
    fill, point, prelude::*, px, relative, rgb, rgba,
};
use unicode_segmentation::*;

use crate::theme::*;

actions!(
    text_input,
    [
        Backspace,
        Delete,
        Left,
        Right,
        SelectLeft,
        SelectRight,
        SelectAll,
        Home,
        End,
        Paste,
        Cut,
        Copy,
    ]
);

const MASK: char = '•';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextInputEvent {
    Changed(String),
}

/// Single-line editable field with optional masking for secrets.
pub struct TextInput {
    pub focus_handle: FocusHandle,
    content: SharedString,
    placeholder: SharedString,
    leading_glyph: Option<SharedString>,
    selected_range: Range<usize>,
    selection_reversed: bool,
    marked_range: Option<Range<usize>>,
    last_layout: Option<ShapedLine>,
    last_bounds: Option<Bounds<Pixels>>,
    is_selecting: bool,
    masked: bool,
    pub disabled: bool,
    pub invalid: bool,
}

impl EventEmitter<TextInputEvent> for TextInput {}

impl TextInput {
    pub fn new(
        context: &mut App,
        placeholder: &str,
        leading_glyph: Option<&str>,
        masked: bool,
    ) -> Entity<Self> {
        let placeholder: SharedString = placeholder.to_string().into();
        let leading_glyph = leading_glyph.map(|glyph| SharedString::from(glyph.to_string()));
        context.new(|context| Self {
            focus_handle: context.focus_handle(),
            content: SharedString::default(),
            placeholder,
            leading_glyph,
            selected_range: 0..0,
            selection_reversed: false,
            marked_range: None,
            last_layout: None,
            last_bounds: None,
            is_selecting: false,
            masked,
            disabled: false,
            invalid: false,
        })
    }

    pub fn set_masked(&mut self, masked: bool, context: &mut Context<Self>) {
        if self.masked != masked {
            self.masked = masked;
            context.notify();
        }
    }

    /// Replaces the content without emitting [`TextInputEvent::Changed`].
    pub fn set_text(&mut self, text: &str, context: &mut Context<Self>) {
        self.content = text.to_string().into();
        let length = self.content.len();
        self.selected_range = length..length;
        self.marked_range = None;
        context.notify();
    }

    fn edited(&mut self, context: &mut Context<Self>) {
        context.emit(TextInputEvent::Changed(self.content.to_string()));
        context.notify();
    }

    fn left(&mut self, _: &Left, _: &mut Window, context: &mut Context<Self>) {
        let target = if self.selected_range.is_empty() {
            self.previous_boundary(self.cursor_offset())
        } else {
            self.selected_range.start
        };
        self.move_to(target, context);
    }

    fn right(&mut self, _: &Right, _: &mut Window, context: &mut Context<Self>) {
        let target = if self.selected_range.is_empty() {
            self.next_boundary(self.selected_range.end)
        } else {
            self.selected_range.end
        };
        self.move_to(target, context);
    }

    fn select_left(&mut self, _: &SelectLeft, _: &mut Window, context: &mut Context<Self>) {
        self.select_to(self.previous_boundary(self.cursor_offset()), context);
    }

    fn select_right(&mut self, _: &SelectRight, _: &mut Window, context: &mut Context<Self>) {
        self.select_to(self.next_boundary(self.cursor_offset()), context);
    }

    fn select_all(&mut self, _: &SelectAll, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(0, context);
        self.select_to(self.content.len(), context);
    }

    fn home(&mut self, _: &Home, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(0, context);
    }

    fn end(&mut self, _: &End, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(self.content.len(), context);
    }

    fn backspace(&mut self, _: &Backspace, window: &mut Window, context: &mut Context<Self>) {
        if self.disabled {
            return;
        }
        if self.selected_range.is_empty() {
            self.select_to(self.previous_boundary(self.cursor_offset()), context);
        }
        self.replace_text_in_range(None, "", window, context);
    }

    fn delete(&mut self, _: &Delete, window: &mut Window, context: &mut Context<Self>) {
        if self.disabled {
            return;
        }
        if self.selected_range.is_empty() {
            self.select_to(self.next_boundary(self.cursor_offset()), context);
        }
        self.replace_text_in_range(None, "", window, context);
    }

    fn paste(&mut self, _: &Paste, window: &mut Window, context: &mut Context<Self>) {
        if self.disabled {
            return;
        }
        if let Some(text) = context.read_from_clipboard().and_then(|item| item.text()) {
            self.replace_text_in_range(None, &text, window, context);
        }
    }

    // Masked content never reaches the clipboard.
    fn copy(&mut self, _: &Copy, _: &mut Window, context: &mut Context<Self>) {
        if self.masked || self.selected_range.is_empty() {
            return;
        }
        context.write_to_clipboard(ClipboardItem::new_string(
            self.content[self.selected_range.clone()].to_string(),
        ));
    }

    fn cut(&mut self, _: &Cut, window: &mut Window, context: &mut Context<Self>) {
        if self.disabled || self.masked || self.selected_range.is_empty() {
            return;
        }
        context.write_to_clipboard(ClipboardItem::new_string(
            self.content[self.selected_range.clone()].to_string(),
        ));
        self.replace_text_in_range(None, "", window, context);
    }

    fn on_mouse_down(
        &mut self,
        event: &MouseDownEvent,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        self.is_selecting = true;
        let offset = self.index_for_mouse_position(event.position);
        if event.modifiers.shift {
            self.select_to(offset, context);
        } else {
            self.move_to(offset, context);
        }
    }

    fn on_mouse_up(&mut self, _: &MouseUpEvent, _: &mut Window, _: &mut Context<Self>) {
        self.is_selecting = false;
    }

    fn on_mouse_move(
        &mut self,
        event: &MouseMoveEvent,
        _: &mut Window,
        context: &mut Context<Self>,
    ) {
        if self.is_selecting {
            self.select_to(self.index_for_mouse_position(event.position), context);
        }
    }

    fn move_to(&mut self, offset: usize, context: &mut Context<Self>) {
        self.selected_range = offset..offset;
        context.notify();
    }

    fn select_to(&mut self, offset: usize, context: &mut Context<Self>) {
        if self.selection_reversed {
            self.selected_range.start = offset;
        } else {
            self.selected_range.end = offset;
        }
        if self.selected_range.end < self.selected_range.start {
            self.selection_reversed = !self.selection_reversed;
            self.selected_range = self.selected_range.end..self.selected_range.start;
        }
        context.notify();
    }

    fn cursor_offset(&self) -> usize {
        if self.selection_reversed {
            self.selected_range.start
        } else {
            self.selected_range.end
        }
    }

    fn index_for_mouse_position(&self, position: Point<Pixels>) -> usize {
        if self.content.is_empty() {
            return 0;
        }
        let (Some(bounds), Some(line)) = (self.last_bounds.as_ref(), self.last_layout.as_ref())
        else {
            return 0;
        };
        if position.y < bounds.top() {
            return 0;
        }
        if position.y > bounds.bottom() {
            return self.content.len();
        }
        let shown = line.closest_index_for_x(position.x - bounds.left());
        content_offset(&self.content, shown, self.masked)
    }

    fn previous_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .rev()
            .find_map(|(index, _)| (index < offset).then_some(index))
            .unwrap_or(0)
    }

    fn next_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .find_map(|(index, _)| (index > offset).then_some(index))
            .unwrap_or(self.content.len())
    }

    fn range_to_utf16(&self, range: &Range<usize>) -> Range<usize> {
        utf8_to_utf16(&self.content, range.start)..utf8_to_utf16(&self.content, range.end)
    }

    fn range_from_utf16(&self, range: &Range<usize>) -> Range<usize> {
        utf16_to_utf8(&self.content, range.start)..utf16_to_utf8(&self.content, range.end)
    }
}

/// What the field shows for `content`: the text itself, or one mask
/// character per grapheme.
fn shown_text(content: &str, masked: bool) -> String {
    if masked {
        content.graphemes(true).map(|_| MASK).collect()
    } else {
        content.to_string()
    }
}

/// Byte offset in the shown text for a byte offset in `content`.
fn shown_offset(content: &str, offset: usize, masked: bool) -> usize {
    if masked {
        content[..offset].graphemes(true).count() * MASK.len_utf8()
    } else {
        offset
    }
}

/// Byte offset in `content` for a byte offset in the shown text.
fn content_offset(content: &str, shown: usize, masked: bool) -> usize {
    if !masked {
        return shown.min(content.len());
    }
    content
        .grapheme_indices(true)
        .nth(shown / MASK.len_utf8())
        .map(|(index, _)| index)
        .unwrap_or(content.len())
}

fn utf16_to_utf8(content: &str, offset: usize) -> usize {
    let mut utf8 = 0;
    let mut utf16 = 0;
    for character in content.chars() {
        if utf16 >= offset {
            break;
        }
        utf16 += character.len_utf16();
        utf8 += character.len_utf8();
    }
    utf8
}

fn utf8_to_utf16(content: &str, offset: usize) -> usize {
    let mut utf16 = 0;
    let mut utf8 = 0;
    for character in content.chars() {
        if utf8 >= offset {
            break;
        }
        utf8 += character.len_utf8();
        utf16 += character.len_utf16();
    }
    utf16
}

impl EntityInputHandler for TextInput {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<String> {
        let range = self.range_from_utf16(&range_utf16);
        actual_range.replace(self.range_to_utf16(&range));
        Some(self.content[range].to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        Some(UTF16Selection {
            range: self.range_to_utf16(&self.selected_range),
            reversed: self.selection_reversed,
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        self.marked_range
            .as_ref()
            .map(|range| self.range_to_utf16(range))
    }

    fn unmark_text(&mut self, _window: &mut Window, _context: &mut Context<Self>) {
        self.marked_range = None;
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _: &mut Window,
        context: &mut Context<Self>,
    ) {
        if self.disabled {
            return;
        }
        let range = range_utf16
            .as_ref()
            .map(|range| self.range_from_utf16(range))
            .or(self.marked_range.clone())
            .unwrap_or(self.selected_range.clone());

        let single_line: String = new_text
            .chars()
            .filter(|character| *character != '\n' && *character != '\r')
            .collect();

        self.content = format!(
            "{}{}{}",
            &self.content[..range.start],
            single_line,
            &self.content[range.end..]
        )
        .into();
        let cursor = range.start + single_line.len();
        self.selected_range = cursor..cursor;
        self.marked_range = None;
        self.edited(context);
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        if self.disabled {
            return;
        }
        let range = range_utf16
            .as_ref()
            .map(|range| self.range_from_utf16(range))
            .or(self.marked_range.clone())
            .unwrap_or(self.selected_range.clone());

        self.content = format!(
            "{}{}{}",
            &self.content[..range.start],
            new_text,
            &self.content[range.end..]
        )
        .into();

        self.marked_range =
            (!new_text.is_empty()).then(|| range.start..range.start + new_text.len());
        self.selected_range = new_selected_range_utf16
            .as_ref()
            .map(|selected| self.range_from_utf16(selected))
            .map(|selected| selected.start + range.start..selected.end + range.start)
            .unwrap_or_else(|| range.start + new_text.len()..range.start + new_text.len());

        self.edited(context);
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        bounds: Bounds<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let layout = self.last_layout.as_ref()?;
        let range = self.range_from_utf16(&range_utf16);
        let start = shown_offset(&self.content, range.start, self.masked);
        let end = shown_offset(&self.content, range.end, self.masked);
        Some(Bounds::from_corners(
            point(bounds.left() + layout.x_for_index(start), bounds.top()),
            point(bounds.left() + layout.x_for_index(end), bounds.bottom()),
        ))
    }

    fn character_index_for_point(
        &mut self,
        position: Point<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<usize> {
        let local = self.last_bounds?.localize(&position)?;
        let layout = self.last_layout.as_ref()?;
        let shown = layout.index_for_x(position.x - local.x)?;
        let offset = content_offset(&self.content, shown, self.masked);
        Some(utf8_to_utf16(&self.content, offset))
    }
}

struct TextLine {
    input: Entity<TextInput>,
}

struct TextLinePrepaint {
    line: Option<ShapedLine>,
    cursor: Option<PaintQuad>,
    selection: Option<PaintQuad>,
}

impl IntoElement for TextLine {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for TextLine {
    type RequestLayoutState = ();
    type PrepaintState = TextLinePrepaint;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        window: &mut Window,
        context: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = relative(1.).into();
        style.size.height = window.line_height().into();
        (window.request_layout(style, [], context), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        context: &mut App,
    ) -> Self::PrepaintState {
        let palette = ActiveTheme::palette(context);
        let input = self.input.read(context);
        let content = input.content.clone();
        let masked = input.masked;
        let selected_range = input.selected_range.clone();
        let cursor = input.cursor_offset();
        let style = window.text_style();

        let (shown, color) = if content.is_empty() {
            (input.placeholder.clone(), rgba(palette.input_placeholder).into())
        } else {
            (SharedString::from(shown_text(&content, masked)), style.color)
        };

        let base_run = TextRun {
            len: shown.len(),
            font: style.font(),
            color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };

        // Composition underline only makes sense when the text is visible.
        let runs = match input.marked_range.as_ref() {
            Some(marked) if !masked && !content.is_empty() => [
                TextRun {
                    len: marked.start,
                    ..base_run.clone()
                },
                TextRun {
                    len: marked.end - marked.start,
                    underline: Some(gpui::UnderlineStyle {
                        color: Some(base_run.color),
                        thickness: px(1.0),
                        wavy: false,
                    }),
                    ..base_run.clone()
                },
                TextRun {
                    len: shown.len() - marked.end,
                    ..base_run.clone()
                },
            ]
            .into_iter()
            .filter(|run| run.len > 0)
            .collect(),
            _ => vec![base_run],
        };

        let font_size = style.font_size.to_pixels(window.rem_size());
        let line = window
            .text_system()
            .shape_line(shown, font_size, &runs, None);

        let (selection, cursor) = if selected_range.is_empty() {
            let x = line.x_for_index(shown_offset(&content, cursor, masked));
            (
                None,
                Some(fill(
                    Bounds::new(
                        point(bounds.left() + x, bounds.top()),
                        gpui::size(px(CURSOR_WIDTH), bounds.bottom() - bounds.top()),
                    ),
                    rgb(palette.border_focus),
                )),
            )
        } else {
            let start = line.x_for_index(shown_offset(&content, selected_range.start, masked));
            let end = line.x_for_index(shown_offset(&content, selected_range.end, masked));
            (
                Some(fill(
                    Bounds::from_corners(
                        point(bounds.left() + start, bounds.top()),
                        point(bounds.left() + end, bounds.bottom()),
                    ),
                    rgba(palette.selection),
                )),
                None,
            )
        };

        TextLinePrepaint {
            line: Some(line),
            cursor,
            selection,
        }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        context: &mut App,
    ) {
        let focus_handle = self.input.read(context).focus_handle.clone();
        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.input.clone()),
            context,
        );
        if let Some(selection) = prepaint.selection.take() {
            window.paint_quad(selection);
        }
        let Some(line) = prepaint.line.take() else {
            return;
        };
        if let Err(error) = line.paint(
            bounds.origin,
            window.line_height(),
            window,
            context,
        ) {
            log::warn!("[text_input] failed to paint line: {error}");
        }
        if focus_handle.is_focused(window)
            && let Some(cursor) = prepaint.cursor.take()
        {
            window.paint_quad(cursor);
        }
        self.input.update(context, |input, _| {
            input.last_layout = Some(line);
            input.last_bounds = Some(bounds);
        });
    }
}

impl Render for TextInput {
    fn render(&mut self, window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let palette = ActiveTheme::palette(context);
        let disabled = self.disabled;
        let focused = !disabled && self.focus_handle.is_focused(window);
        let border = match (self.invalid, focused) {
            (true, _) => palette.error_border,
            (false, true) => palette.border_focus,
            (false, false) => palette.border,
        };
        let background = if self.invalid {
            palette.error_background
        } else {
            palette.input_background
        };
        let text_color = if disabled {
            palette.text_dim
        } else {
            palette.text_primary
        };

        div()
            .flex()
            .key_context("TextInput")
            .when(!disabled, |element| {
                element
                    .track_focus(&self.focus_handle(context))
                    .cursor(CursorStyle::IBeam)
            })
            .on_action(context.listener(Self::backspace))
            .on_action(context.listener(Self::delete))
            .on_action(context.listener(Self::left))
            .on_action(context.listener(Self::right))
            .on_action(context.listener(Self::select_left))
            .on_action(context.listener(Self::select_right))
            .on_action(context.listener(Self::select_all))
            .on_action(context.listener(Self::home))
            .on_action(context.listener(Self::end))
            .on_action(context.listener(Self::paste))
            .on_action(context.listener(Self::cut))
            .on_action(context.listener(Self::copy))
            .when(!disabled, |element| {
                element
                    .on_mouse_down(MouseButton::Left, context.listener(Self::on_mouse_down))
                    .on_mouse_up(MouseButton::Left, context.listener(Self::on_mouse_up))
                    .on_mouse_up_out(MouseButton::Left, context.listener(Self::on_mouse_up))
                    .on_mouse_move(context.listener(Self::on_mouse_move))
            })
            .text_color(rgb(text_color))
            .text_size(px(TEXT_SIZE_MEDIUM))
            .line_height(px(LINE_HEIGHT_MEDIUM))
            .w_full()
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .h(px(ELEMENT_HEIGHT))
                    .w_full()
                    .px(px(PADDING_INPUT_HORIZONTAL))
                    .py(px(PADDING_INPUT_VERTICAL))
                    .bg(rgb(background))
                    .border_1()
                    .border_color(rgb(border))
                    .rounded(px(RADIUS))
                    .when_some(self.leading_glyph.clone(), |element, glyph| {
                        element.child(
                            div()
                                .w(px(ICON_SLOT_WIDTH))
                                .flex_shrink_0()
                                .text_color(rgb(palette.text_dim))
                                .child(glyph),
                        )
                    })
                    .child(div().flex_1().overflow_hidden().child(TextLine {
                        input: context.entity().clone(),
                    })),
            )
    }
}

impl Focusable for TextInput {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_uses_one_mask_per_grapheme() {
        assert_eq!(shown_text("admin123", true), "••••••••");
        assert_eq!(shown_text("e\u{301}a", true), "••");
        assert_eq!(shown_text("admin123", false), "admin123");
    }

    #[test]
    fn offsets_map_between_content_and_mask() {
        let content = "añb";
        assert_eq!(shown_offset(content, 3, true), 2 * MASK.len_utf8());
        assert_eq!(content_offset(content, 2 * MASK.len_utf8(), true), 3);
        assert_eq!(content_offset(content, 99, true), content.len());
        assert_eq!(shown_offset(content, 3, false), 3);
        assert_eq!(content_offset(content, 99, false), content.len());
    }

    #[test]
    fn utf16_offsets_round_through_astral_characters() {
        let content = "a😀b";
        assert_eq!(utf8_to_utf16(content, 5), 3);
        assert_eq!(utf16_to_utf8(content, 3), 5);
        assert_eq!(utf16_to_utf8(content, 0), 0);
    }
}
