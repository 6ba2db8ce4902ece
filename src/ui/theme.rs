//! Colors, spacing and egui style for the chat window

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme
#[derive(Clone, Debug)]
pub struct Theme {
    /// Accent (bot bubbles, send button, avatar)
    pub accent: Color32,
    pub accent_hover: Color32,
    pub success: Color32,
    pub error: Color32,

    /// Window background
    pub bg_primary: Color32,
    /// Header and input bar background
    pub bg_secondary: Color32,
    /// Borders, user bubbles, hovered buttons
    pub border: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,

    /// Widest the content column gets on large windows
    pub max_content_width: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            accent: Color32::from_rgb(139, 92, 246),       // Violet
            accent_hover: Color32::from_rgb(124, 58, 237), // Darker violet
            success: Color32::from_rgb(34, 197, 94),
            error: Color32::from_rgb(239, 68, 68),

            bg_primary: Color32::from_rgb(13, 17, 23),
            bg_secondary: Color32::from_rgb(22, 27, 34),
            border: Color32::from_rgb(48, 54, 61),

            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(201, 209, 217),
            text_muted: Color32::from_rgb(139, 148, 158),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(8.0),
            bubble_rounding: Rounding::same(16.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,

            max_content_width: 960.0,
        }
    }

    /// Side margin that centers the content column in a window this wide
    pub fn column_margin(&self, window_width: f32) -> f32 {
        ((window_width - self.max_content_width) / 2.0).max(self.spacing_lg)
    }

    /// Background for a message bubble
    pub fn bubble_fill(&self, is_bot: bool) -> Color32 {
        if is_bot {
            self.accent
        } else {
            self.border
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_primary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);

        visuals.widgets.inactive.bg_fill = self.bg_secondary;
        visuals.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.border;
        visuals.widgets.hovered.weak_bg_fill = self.border;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent_hover;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.hyperlink_color = self.accent;
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.border);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing_sm, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(22.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(16.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
