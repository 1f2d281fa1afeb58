use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_CARD: Color32 = Color32::from_rgb(38, 40, 52);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_ROW_EVEN: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 6);
pub const BG_ROW_HOVER: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 14);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const DANGER: Color32 = Color32::from_rgb(229, 57, 53);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const CURRENT_MONTH: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 30);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);
pub const FALLBACK_PROJECT: Color32 = Color32::from_rgb(66, 133, 244);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const BAR_ROUNDING: f32 = 5.0;
/// Vertical gap between a bar and its row edges.
pub const BAR_INSET: f32 = 5.0;
pub const LABEL_COLUMN_WIDTH: f32 = 240.0;

pub const COLUMN_WIDTH: f32 = 250.0;
pub const COLUMN_GAP: f32 = 10.0;
pub const CARD_ROUNDING: f32 = 6.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const DETAIL_PANEL_WIDTH: f32 = 340.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_status() -> FontId {
    FontId::proportional(11.0)
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

/// Fill, border and text stroke for one interaction state.
struct WidgetLook {
    fill: Color32,
    border: Color32,
    text: Stroke,
}

fn style_widget(widget: &mut egui::style::WidgetVisuals, look: WidgetLook) {
    widget.bg_fill = look.fill;
    widget.weak_bg_fill = look.fill;
    widget.bg_stroke = Stroke::new(1.0, look.border);
    widget.fg_stroke = look.text;
    widget.rounding = Rounding::same(4.0);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_ROW_EVEN;

    let widgets = &mut visuals.widgets;
    style_widget(
        &mut widgets.noninteractive,
        WidgetLook { fill: BG_PANEL, border: BORDER_SUBTLE, text: Stroke::new(1.0, TEXT_SECONDARY) },
    );
    style_widget(
        &mut widgets.inactive,
        WidgetLook { fill: BG_CARD, border: BORDER_SUBTLE, text: Stroke::new(1.0, TEXT_PRIMARY) },
    );
    style_widget(
        &mut widgets.hovered,
        WidgetLook { fill: BG_CARD.gamma_multiply(1.25), border: ACCENT, text: Stroke::new(1.0, TEXT_PRIMARY) },
    );
    style_widget(
        &mut widgets.active,
        WidgetLook { fill: BG_HEADER, border: ACCENT, text: Stroke::new(2.0, TEXT_ON_BAR) },
    );
    style_widget(
        &mut widgets.open,
        WidgetLook { fill: BG_HEADER, border: ACCENT, text: Stroke::new(1.0, TEXT_PRIMARY) },
    );

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

/// Register the Phosphor icon font as a fallback so icons render inline.
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_sets_board_palette() {
        let ctx = egui::Context::default();
        apply_theme(&ctx);
        let style = ctx.style();
        let visuals = &style.visuals;
        assert_eq!(visuals.panel_fill, BG_PANEL);
        assert_eq!(visuals.extreme_bg_color, BG_FIELD);
        assert_eq!(visuals.selection.bg_fill, BG_SELECTED);
        assert_eq!(visuals.widgets.inactive.bg_fill, BG_CARD);
        assert_eq!(visuals.widgets.hovered.bg_stroke.color, ACCENT);
        assert_eq!(style.spacing.item_spacing, egui::vec2(8.0, 4.0));
    }
}
