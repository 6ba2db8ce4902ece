//! Main application struct and eframe integration

use crate::conversation::Conversation;
use crate::service::UploadFile;
use crate::ui::components::{AttachState, Header, InputBar, MessageList, Toasts};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, TopBottomPanel};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_TITLE: &str = "Parley Assistant";

/// The chat window
pub struct ParleyApp {
    conversation: Conversation,
    theme: Theme,
    attach: AttachState,
    theme_applied: bool,
}

impl ParleyApp {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            theme: Theme::dark(),
            attach: AttachState::default(),
            theme_applied: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn attach(&self) -> &AttachState {
        &self.attach
    }

    /// Draw one frame
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.theme_applied {
            self.theme.apply(ctx);
            self.theme_applied = true;
        }

        if self.conversation.poll_events() {
            ctx.request_repaint();
        }
        self.handle_dropped_files(ctx);

        let column_margin = self.theme.column_margin(ctx.screen_rect().width());

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .stroke(egui::Stroke::new(1.0, self.theme.border))
                    .inner_margin(self.theme.spacing_lg),
            )
            .show(ctx, |ui| {
                Header::new(&mut self.conversation, &self.theme, DEFAULT_TITLE).show(ui);
            });

        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(column_margin, self.theme.spacing_lg)),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.conversation, &mut self.attach, &self.theme).show(ui);
            });

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(column_margin, 0.0)),
            )
            .show(ctx, |ui| {
                MessageList::new(&self.conversation, &self.theme).show(ui);
            });

        Toasts::new(self.conversation.notifications(), &self.theme).show(ctx);

        // Requests and voice sessions finish off the UI thread
        if self.conversation.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// A file dropped on the window is uploaded like a picked one
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(path) = file.path.as_deref() {
            info!("File dropped: {}", path.display());
            self.conversation.submit_path(path);
        } else if let Some(bytes) = file.bytes {
            info!("File dropped: {}", file.name);
            self.conversation
                .submit_image(UploadFile::new(file.name, bytes.to_vec()));
        }
    }
}

impl eframe::App for ParleyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Parley shutting down");
    }
}
