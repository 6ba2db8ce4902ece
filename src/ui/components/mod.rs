//! UI components

pub mod header;
pub mod input_bar;
pub mod message_list;
pub mod toasts;

pub use header::Header;
pub use input_bar::{AttachState, InputBar};
pub use message_list::MessageList;
pub use toasts::Toasts;
