//! Title bar with the mute toggle

use crate::conversation::Conversation;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2, WidgetInfo, WidgetType};

pub struct Header<'a> {
    conversation: &'a mut Conversation,
    theme: &'a Theme,
    title: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(conversation: &'a mut Conversation, theme: &'a Theme, title: &'a str) -> Self {
        Self {
            conversation,
            theme,
            title,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("⚖").size(26.0).color(self.theme.accent));
            ui.label(
                RichText::new(self.title)
                    .size(20.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let muted = self.conversation.is_muted();
                let (icon, label, tooltip) = if muted {
                    ("🔇", "Unmute audio responses", "Read answers aloud")
                } else {
                    ("🔊", "Mute audio responses", "Stop reading answers aloud")
                };

                let button = egui::Button::new(
                    RichText::new(icon).size(18.0).color(self.theme.text_secondary),
                )
                .min_size(Vec2::splat(36.0))
                .rounding(self.theme.button_rounding);

                let response = ui.add(button);
                response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, true, label));
                if response.clicked() {
                    self.conversation.toggle_mute();
                }
                response.on_hover_text(tooltip);
            });
        });
    }
}
