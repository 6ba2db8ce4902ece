//! Message list component
//!
//! Conversation history as chat bubbles: bot messages on the left, user
//! messages on the right, each with its avatar on the outer edge. Shows a welcome screen when empty and
//! a typing indicator while waiting for the service.

use crate::conversation::Conversation;
use crate::messages::Message;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, Layout, RichText, Vec2, WidgetInfo, WidgetType};

const AVATAR_SIZE: f32 = 32.0;

/// Message list component
pub struct MessageList<'a> {
    conversation: &'a Conversation,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(conversation: &'a Conversation, theme: &'a Theme) -> Self {
        Self {
            conversation,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing_lg);

                let messages = self.conversation.messages();
                if messages.is_empty() && !self.conversation.is_loading() {
                    self.show_empty_state(ui);
                }

                for message in messages.iter() {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_lg);
                }

                if self.conversation.is_loading() {
                    self.show_typing_indicator(ui);
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            self.avatar(ui, 64.0, true);
            ui.add_space(self.theme.spacing);

            let heading = ui.label(
                RichText::new("Welcome! How can I help you today?")
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            heading.widget_info(|| {
                WidgetInfo::labeled(WidgetType::Label, true, "Welcome message")
            });

            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Type a question, speak it, or upload an image.")
                    .color(self.theme.text_secondary),
            );
        });
    }

    /// Scales for the assistant, a speech bubble for the user
    fn avatar(&self, ui: &mut egui::Ui, size: f32, is_bot: bool) -> egui::Response {
        let (fill, glyph, color) = if is_bot {
            (self.theme.accent.gamma_multiply(0.15), "⚖", self.theme.accent)
        } else {
            (self.theme.border, "💬", self.theme.text_primary)
        };

        let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), egui::Sense::hover());
        let painter = ui.painter();
        painter.circle_filled(rect.center(), size / 2.0, fill);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            glyph,
            egui::FontId::proportional(size * 0.55),
            color,
        );
        response
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let layout = if message.is_bot {
            Layout::left_to_right(Align::TOP)
        } else {
            Layout::right_to_left(Align::TOP)
        };

        ui.with_layout(layout, |ui| {
            // Right-to-left puts the user's avatar on the far right
            let avatar = self.avatar(ui, AVATAR_SIZE, message.is_bot);
            let avatar_label = if message.is_bot {
                "Assistant avatar"
            } else {
                "User avatar"
            };
            avatar.widget_info(|| WidgetInfo::labeled(WidgetType::Other, true, avatar_label));

            let max_width = ui.available_width() * 0.8;
            egui::Frame::none()
                .fill(self.theme.bubble_fill(message.is_bot))
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::same(self.theme.spacing))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.vertical(|ui| {
                        let text = ui.add(
                            egui::Label::new(
                                RichText::new(&message.text).color(self.theme.text_primary),
                            )
                            .wrap(),
                        );
                        let label = if message.is_bot {
                            format!("Assistant response: {}", message.text)
                        } else {
                            format!("User message: {}", message.text)
                        };
                        text.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, &label));

                        ui.label(
                            RichText::new(message.timestamp.format("%H:%M").to_string())
                                .size(10.0)
                                .color(Color32::WHITE.gamma_multiply(0.6)),
                        );
                    });
                });
        });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(Layout::left_to_right(Align::TOP), |ui| {
            let frame = egui::Frame::none()
                .fill(self.theme.border)
                .rounding(self.theme.card_rounding)
                .inner_margin(egui::Margin::same(self.theme.spacing))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let t = ui.ctx().input(|i| i.time);
                        for i in 0..3 {
                            let phase = ((t * 4.0 - i as f64 * 0.6).sin() * 0.5 + 0.5) as f32;
                            let (rect, _) =
                                ui.allocate_exact_size(Vec2::new(8.0, 14.0), egui::Sense::hover());
                            let center = rect.center() - Vec2::new(0.0, phase * 3.0);
                            ui.painter().circle_filled(center, 4.0, self.theme.accent);
                        }
                    });
                });
            frame.response.widget_info(|| {
                WidgetInfo::labeled(WidgetType::Label, true, "Waiting for response")
            });
        });
        ui.ctx().request_repaint();
    }
}
