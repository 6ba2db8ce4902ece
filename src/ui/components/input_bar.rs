//! Input bar component
//!
//! Attach-image button, mic toggle, text input and send button. Everything
//! is disabled while a request is in flight.

use crate::conversation::Conversation;
use crate::speech::VoiceState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2, WidgetInfo, WidgetType};
use std::path::PathBuf;

/// Image path entry shown under the bar after pressing the attach button
#[derive(Debug, Default)]
pub struct AttachState {
    pub open: bool,
    pub path: String,
}

/// Input bar component for text and voice input
pub struct InputBar<'a> {
    conversation: &'a mut Conversation,
    attach: &'a mut AttachState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(
        conversation: &'a mut Conversation,
        attach: &'a mut AttachState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            conversation,
            attach,
            theme,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .stroke(egui::Stroke::new(1.0, self.theme.border))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_attach_button(ui);
                    self.show_mic_button(ui);
                    self.show_text_input(ui);
                    self.show_send_button(ui);
                });

                if self.attach.open {
                    ui.add_space(self.theme.spacing_sm);
                    self.show_attach_row(ui);
                }
            });
    }

    fn icon_button(&self, icon: &str, color: egui::Color32) -> egui::Button<'static> {
        egui::Button::new(RichText::new(icon.to_string()).size(18.0).color(color))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding)
    }

    fn show_attach_button(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.conversation.is_loading();
        let response = ui.add_enabled(enabled, self.icon_button("🖼", self.theme.text_secondary));
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, enabled, "Attach image"));

        if response.clicked() {
            self.attach.open = !self.attach.open;
        }
        response.on_hover_text("Upload an image (or drop one on the window)");
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.conversation.is_loading();
        let state = self.conversation.voice_state();

        let (color, label, tooltip) = match state {
            VoiceState::Idle => (self.theme.text_secondary, "Start voice input", "Speak a question"),
            VoiceState::Listening => (self.theme.text_primary, "Stop voice input", "Stop listening"),
            VoiceState::Stopping => (self.theme.text_muted, "Stop voice input", "Finishing..."),
        };

        let mut button = self.icon_button("🎤", color);
        if state != VoiceState::Idle {
            button = button.fill(self.theme.border);
        }

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, enabled, label));

        if state == VoiceState::Listening {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            ui.painter().circle_stroke(
                response.rect.center(),
                response.rect.width() / 2.0 + 2.0 + pulse * 3.0,
                egui::Stroke::new(2.0 * pulse, self.theme.accent.gamma_multiply(1.0 - pulse * 0.5)),
            );
            ui.ctx().request_repaint();
        }

        if response.clicked() {
            self.conversation.toggle_listening();
        }
        response.on_hover_text(tooltip);
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.conversation.is_loading();
        // Leave room for the send button
        let width = (ui.available_width() - 56.0).max(80.0);

        let text_edit = egui::TextEdit::singleline(self.conversation.draft_mut())
            .hint_text("Ask a question...")
            .desired_width(width)
            .margin(egui::Margin::symmetric(12.0, 8.0))
            .id(egui::Id::new("message_input"));

        let response = ui.add_enabled(enabled, text_edit);
        response.widget_info(|| WidgetInfo::labeled(WidgetType::TextEdit, enabled, "Message input"));

        // Singleline edits give up focus on Enter
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.conversation.submit_draft();
            response.request_focus();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send =
            !self.conversation.draft().trim().is_empty() && !self.conversation.is_loading();

        let fill = if can_send {
            self.theme.accent
        } else {
            self.theme.accent.gamma_multiply(0.4)
        };
        let button = self.icon_button("➤", egui::Color32::WHITE).fill(fill);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, can_send, "Send message"));

        if response.clicked() {
            self.conversation.submit_draft();
        }
        response.on_hover_text("Send message (Enter)");
    }

    fn show_attach_row(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.conversation.is_loading();

        ui.horizontal(|ui| {
            let width = (ui.available_width() - 90.0).max(80.0);
            let path_edit = egui::TextEdit::singleline(&mut self.attach.path)
                .hint_text("Path to an image file")
                .desired_width(width)
                .id(egui::Id::new("image_path_input"));
            let response = ui.add_enabled(enabled, path_edit);
            response.widget_info(|| WidgetInfo::labeled(WidgetType::TextEdit, enabled, "Image path"));

            let can_upload = enabled && !self.attach.path.trim().is_empty();
            let upload = ui.add_enabled(can_upload, egui::Button::new("Upload"));
            upload.widget_info(|| WidgetInfo::labeled(WidgetType::Button, can_upload, "Upload image"));

            if upload.clicked() {
                let path = PathBuf::from(self.attach.path.trim());
                if self.conversation.submit_path(&path) {
                    self.attach.path.clear();
                    self.attach.open = false;
                }
            }
        });
    }
}
