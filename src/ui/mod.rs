//! Desktop chat window (egui/eframe)

pub mod app;
pub mod components;
pub mod theme;

pub use app::{ParleyApp, DEFAULT_TITLE};
pub use theme::Theme;

use crate::conversation::Conversation;
use crate::{ParleyError, Result};

/// Open the chat window and block until it is closed
pub fn run(conversation: Conversation) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(DEFAULT_TITLE)
            .with_inner_size([760.0, 820.0])
            .with_min_inner_size([420.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        DEFAULT_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(ParleyApp::new(conversation)))),
    )
    .map_err(|e| ParleyError::IoError(format!("Window error: {}", e)))
}
