//! Toast overlay for controller notifications

use crate::conversation::{NotificationLevel, Notifications};
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText, WidgetInfo, WidgetType};

pub struct Toasts<'a> {
    notifications: &'a Notifications,
    theme: &'a Theme,
}

impl<'a> Toasts<'a> {
    pub fn new(notifications: &'a Notifications, theme: &'a Theme) -> Self {
        Self {
            notifications,
            theme,
        }
    }

    pub fn show(self, ctx: &egui::Context) {
        if self.notifications.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-self.theme.spacing, -110.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Max), |ui| {
                    for notification in self.notifications.iter().rev() {
                        let accent = match notification.level {
                            NotificationLevel::Info => self.theme.text_secondary,
                            NotificationLevel::Success => self.theme.success,
                            NotificationLevel::Error => self.theme.error,
                        };

                        let frame = egui::Frame::none()
                            .fill(self.theme.bg_secondary)
                            .stroke(egui::Stroke::new(1.0, accent))
                            .rounding(self.theme.card_rounding)
                            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(&notification.text).color(self.theme.text_primary),
                                );
                            });

                        let label = format!("Notification: {}", notification.text);
                        frame
                            .response
                            .widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, &label));
                    }
                });
            });

        // Keep repainting so expired toasts disappear
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
