//! UI automation tests using egui_kittest and AccessKit
//!
//! The real chat window is rendered against test doubles; widgets are found
//! through their accessibility labels.

mod common;

use common::{Fixture, MockBackend, WAIT};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use parley::conversation::Conversation;
use parley::ui::ParleyApp;

fn harness(conversation: Conversation) -> Harness<'static, ParleyApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(760.0, 820.0))
        .build_state(|ctx, app: &mut ParleyApp| app.show(ctx), ParleyApp::new(conversation))
}

fn type_message(harness: &mut Harness<'_, ParleyApp>, text: &str) {
    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text(text);
    harness.run();
}

#[test]
fn test_initial_layout() {
    let fixture = Fixture::new(MockBackend::replying(vec![]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    let _ = harness.get_by_label("Welcome message");
    let _ = harness.get_by_label("Message input");
    let _ = harness.get_by_label("Send message");
    let _ = harness.get_by_label("Attach image");
    let _ = harness.get_by_label("Start voice input");
    let _ = harness.get_by_label("Mute audio responses");
    assert!(harness.query_by_label("Waiting for response").is_none());
}

#[test]
fn test_type_text_into_input() {
    let fixture = Fixture::new(MockBackend::replying(vec![]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    type_message(&mut harness, "Hello, world!");

    assert_eq!(harness.state().conversation().draft(), "Hello, world!");
}

#[test]
fn test_send_shows_both_messages() {
    let fixture = Fixture::new(MockBackend::replying(vec![Ok("Courts are open 9am-5pm.".into())]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    type_message(&mut harness, "hours for court filings");
    harness.get_by_label("Send message").click();
    harness.run();

    assert_eq!(harness.state().conversation().draft(), "");
    assert!(harness
        .state_mut()
        .conversation_mut()
        .wait_for_response(WAIT));
    harness.run();

    let _ = harness.get_by_label("User message: hours for court filings");
    let _ = harness.get_by_label("Assistant response: Courts are open 9am-5pm.");
    let _ = harness.get_by_label("User avatar");
    let _ = harness.get_by_label("Assistant avatar");
    assert!(harness.query_by_label("Welcome message").is_none());
    assert_eq!(fixture.synthesizer.spoken(), vec!["Courts are open 9am-5pm."]);
}

#[test]
fn test_loading_indicator_and_gate() {
    let fixture = Fixture::new(MockBackend::held(vec![Ok("done".into())]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    harness.state_mut().conversation_mut().submit_text("first");
    harness.run();
    let _ = harness.get_by_label("Waiting for response");

    // The send button stays disabled while the request is in flight
    harness
        .state_mut()
        .conversation_mut()
        .draft_mut()
        .push_str("second");
    harness.run();
    harness.get_by_label("Send message").click();
    harness.run();
    assert_eq!(harness.state().conversation().messages().len(), 1);

    fixture.backend.release();
    assert!(harness
        .state_mut()
        .conversation_mut()
        .wait_for_response(WAIT));
    harness.run();

    assert!(harness.query_by_label("Waiting for response").is_none());
    let _ = harness.get_by_label("Assistant response: done");
    assert_eq!(fixture.backend.queries(), vec!["first"]);
}

#[test]
fn test_failed_send_shows_toast() {
    let fixture = Fixture::new(MockBackend::replying(vec![Err(
        parley::ParleyError::ServiceError("model offline".into()),
    )]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    harness.state_mut().conversation_mut().submit_text("hello");
    assert!(harness
        .state_mut()
        .conversation_mut()
        .wait_for_response(WAIT));
    harness.run();

    let _ = harness.get_by_label("Notification: Failed to send message. Please try again.");
    assert!(harness.query_by_label("Assistant response: model offline").is_none());
}

#[test]
fn test_mute_button_toggles() {
    let fixture = Fixture::new(MockBackend::replying(vec![]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    harness.get_by_label("Mute audio responses").click();
    harness.run();

    assert!(harness.state().conversation().is_muted());
    let _ = harness.get_by_label("Unmute audio responses");
    let _ = harness.get_by_label("Notification: Audio responses muted");

    harness.get_by_label("Unmute audio responses").click();
    harness.run();

    assert!(!harness.state().conversation().is_muted());
    let _ = harness.get_by_label("Mute audio responses");
}

#[test]
fn test_mic_without_recognizer() {
    let fixture = Fixture::new(MockBackend::replying(vec![]));
    let mut harness = harness(fixture.text_only());
    harness.run();

    harness.get_by_label("Start voice input").click();
    harness.run();

    let _ = harness.get_by_label("Notification: Speech recognition is not supported on this system");
    let _ = harness.get_by_label("Start voice input");
}

#[test]
fn test_voice_round_trip() {
    let fixture = Fixture::new(MockBackend::replying(vec![Ok("Courts are open 9am-5pm.".into())]));
    let mut harness = harness(fixture.conversation());
    harness.run();

    harness.get_by_label("Start voice input").click();
    harness.run();
    let _ = harness.get_by_label("Stop voice input");
    let _ = harness.get_by_label("Notification: Listening...");

    fixture.recognizer.say("hours for court filings");
    harness.run();

    let _ = harness.get_by_label("User message: hours for court filings");
    let _ = harness.get_by_label("Notification: Voice captured and sent!");
    assert_eq!(harness.state().conversation().draft(), "hours for court filings");

    assert!(harness
        .state_mut()
        .conversation_mut()
        .wait_for_response(WAIT));
    harness.run();
    let _ = harness.get_by_label("Assistant response: Courts are open 9am-5pm.");
}

#[test]
fn test_attach_and_upload_image() {
    let path = std::env::temp_dir().join(format!("parley-ui-{}.png", std::process::id()));
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();

    let fixture = Fixture::new(MockBackend::replying(vec![Ok("A parking citation.".into())]));
    let mut harness = harness(fixture.conversation());
    harness.run();
    assert!(harness.query_by_label("Image path").is_none());

    harness.get_by_label("Attach image").click();
    harness.run();
    assert!(harness.state().attach().open);

    harness.get_by_label("Image path").focus();
    harness.run();
    harness
        .get_by_label("Image path")
        .type_text(&*path.to_string_lossy());
    harness.run();
    harness.get_by_label("Upload image").click();
    harness.run();

    assert!(!harness.state().attach().open);
    assert!(harness
        .state_mut()
        .conversation_mut()
        .wait_for_response(WAIT));
    harness.run();

    let _ = harness.get_by_label(&format!("User message: Uploaded image: {}", name));
    let _ = harness.get_by_label("Assistant response: A parking citation.");
    assert_eq!(fixture.backend.uploads()[0].mime_type, "image/png");

    std::fs::remove_file(&path).ok();
}
