use egui::{Color32, FontId, Rounding, Stroke};

// ── Surface colors ───────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(21, 23, 30);
pub const BG_PANEL: Color32 = Color32::from_rgb(28, 31, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(33, 36, 47);
pub const BG_LANE_ALT: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 5);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(72, 132, 214, 48);
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(48, 52, 66);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 231, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 157, 175);
pub const TEXT_DIM: Color32 = Color32::from_rgb(96, 102, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;
pub const ACCENT: Color32 = Color32::from_rgb(72, 132, 214);

// ── Timeline layers ──────────────────────────────────────────────────────────

pub const WEEKEND_BAND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 45);
pub const HOLIDAY_MARKER: Color32 = Color32::from_rgba_premultiplied(120, 40, 40, 70);
pub const SPECIAL_MARKER: Color32 = Color32::from_rgba_premultiplied(40, 90, 130, 70);
pub const GRID_WEEK: Color32 = Color32::from_rgb(38, 41, 53);
pub const GRID_MONTH: Color32 = Color32::from_rgb(60, 65, 83);
pub const TODAY_LINE: Color32 = Color32::from_rgb(236, 72, 72);
pub const MILESTONE: Color32 = Color32::from_rgb(255, 165, 0);
pub const CELL_BADGE: Color32 = Color32::from_rgb(250, 204, 21);
pub const CAPTURE_OUTLINE: Color32 = Color32::from_rgba_premultiplied(72, 132, 214, 60);
pub const PREVIEW_FILL: Color32 = Color32::from_rgba_premultiplied(60, 105, 165, 150);
pub const PREVIEW_STROKE: Color32 = Color32::from_rgb(140, 190, 255);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const LANE_HEIGHT: f32 = 32.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const HANDLE_WIDTH: f32 = 8.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const BAR_INSET: f32 = 5.0; // vertical inset so bars don't touch lane edges
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.0)
}

// ── Phase colors ─────────────────────────────────────────────────────────────

pub const PHASE_COLORS: &[Color32] = &[
    Color32::from_rgb(66, 133, 244),
    Color32::from_rgb(52, 168, 83),
    Color32::from_rgb(171, 71, 188),
    Color32::from_rgb(251, 140, 0),
    Color32::from_rgb(3, 169, 244),
    Color32::from_rgb(229, 57, 53),
];

pub fn phase_color(index: usize) -> Color32 {
    PHASE_COLORS[index % PHASE_COLORS.len()]
}

// ── Visuals ──────────────────────────────────────────────────────────────────

/// Widget fills for (inactive, hovered, active).
const WIDGET_FILLS: [Color32; 3] = [
    Color32::from_rgb(40, 43, 56),
    Color32::from_rgb(50, 54, 70),
    Color32::from_rgb(58, 62, 80),
];

pub fn apply_theme(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        let v = &mut style.visuals;
        *v = egui::Visuals::dark();
        v.override_text_color = Some(TEXT_PRIMARY);
        v.panel_fill = BG_PANEL;
        v.window_fill = BG_PANEL;
        v.extreme_bg_color = BG_DARK;
        v.window_rounding = Rounding::same(6.0);
        v.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
        v.selection.bg_fill = BG_SELECTED;
        v.selection.stroke = Stroke::new(1.0, ACCENT);

        v.widgets.noninteractive.bg_fill = BG_PANEL;
        v.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
        let [inactive, hovered, active] = WIDGET_FILLS;
        v.widgets.inactive.bg_fill = inactive;
        v.widgets.inactive.weak_bg_fill = inactive;
        v.widgets.hovered.bg_fill = hovered;
        v.widgets.hovered.weak_bg_fill = hovered;
        v.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
        v.widgets.active.bg_fill = active;
        v.widgets.active.weak_bg_fill = active;
        v.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
        for widget in [
            &mut v.widgets.noninteractive,
            &mut v.widgets.inactive,
            &mut v.widgets.hovered,
            &mut v.widgets.active,
            &mut v.widgets.open,
        ] {
            widget.rounding = Rounding::same(4.0);
        }
    });
}
