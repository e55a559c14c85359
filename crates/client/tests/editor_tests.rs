mod common;

use common::fixtures::{article_json, file_json};
use common::{ScriptedTransport, client};
use folio_client::{ArticleEditor, FileEditor, Method, SaveStatus};
use folio_core::{Article, ArticleStatus, FileRecord, RecordId};
use serde_json::{Value, json};
use tokio::time::{Duration, sleep};

const DELAY: Duration = Duration::from_millis(800);

fn article(id: u64, title: &str) -> Article {
    serde_json::from_value(article_json(id, title, "draft")).unwrap()
}

fn file(id: u64, title: &str) -> FileRecord {
    serde_json::from_value(file_json(id, title, false)).unwrap()
}

fn put_bodies(transport: &ScriptedTransport, path: &str) -> Vec<Value> {
    transport
        .calls_to(Method::Put, path)
        .iter()
        .filter_map(|c| c.json_body().cloned())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_saves_once_with_final_state() {
    let transport = ScriptedTransport::new();
    transport.always(Method::Put, "/v1/articles/1", 200, json!({"ok": true}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    for title in ["Rivers a", "Rivers an", "Rivers and lakes"] {
        editor.edit(|d| d.set_title(title));
        assert!(matches!(editor.status(), SaveStatus::Pending));
        sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(transport.count(Method::Put, "/v1/articles/1"), 0);

    sleep(Duration::from_secs(1)).await;
    let bodies = put_bodies(&transport, "/v1/articles/1");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["title"], "Rivers and lakes");
    assert_eq!(bodies[0]["slug"], "rivers-and-lakes");
    assert_eq!(bodies[0]["content"], "Body");
    assert_eq!(bodies[0]["external_link"], Value::Null);
    assert!(matches!(editor.status(), SaveStatus::Saved));
    assert!(!editor.is_save_pending());
}

#[tokio::test(start_paused = true)]
async fn test_switching_records_discards_pending_save() {
    let transport = ScriptedTransport::new();
    transport.always(Method::Put, "/v1/articles/1", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);

    editor.select(&article(1, "Rivers"));
    editor.edit(|d| d.summary = "draft summary".to_string());
    sleep(Duration::from_millis(300)).await;
    assert!(editor.select(&article(2, "Lakes")));
    assert!(matches!(editor.status(), SaveStatus::Idle));

    sleep(Duration::from_secs(2)).await;
    assert_eq!(transport.total_calls(), 0);
    assert_eq!(editor.draft().unwrap().title, "Lakes");
}

#[tokio::test(start_paused = true)]
async fn test_reselecting_same_record_keeps_local_edits() {
    let transport = ScriptedTransport::new();
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);

    editor.select(&article(1, "Rivers"));
    editor.edit(|d| d.set_title("Local title"));
    assert!(!editor.select(&article(1, "Server title")));
    assert_eq!(editor.draft().unwrap().title, "Local title");
    assert!(editor.is_save_pending());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_metadata_suppresses_save_until_fixed() {
    let transport = ScriptedTransport::new();
    transport.always(Method::Put, "/v1/public-files/5", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut editor = FileEditor::new(client, DELAY);
    editor.select(&file(5, "Gauges"));

    editor.edit(|d| d.set_metadata_text("{\"year\": "));
    sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.total_calls(), 0);
    assert!(matches!(editor.status(), SaveStatus::Invalid(_)));
    assert!(editor.draft().unwrap().metadata_error().is_some());

    editor.edit(|d| d.set_metadata_text("{}"));
    sleep(Duration::from_secs(1)).await;
    let bodies = put_bodies(&transport, "/v1/public-files/5");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["metadata"], json!({}));
    assert_eq!(bodies[0]["links"][0]["href"], "https://example.org/r.pdf");
    assert!(matches!(editor.status(), SaveStatus::Saved));
}

#[tokio::test(start_paused = true)]
async fn test_late_response_for_abandoned_record_is_ignored() {
    let transport = ScriptedTransport::new();
    transport.respond_after(
        Duration::from_millis(500),
        Method::Put,
        "/v1/articles/1",
        200,
        json!({}),
    );
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    editor.edit(|d| d.set_title("Rivers!"));
    sleep(Duration::from_millis(900)).await;
    assert!(matches!(editor.status(), SaveStatus::Saving));

    editor.select(&article(2, "Lakes"));
    sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.count(Method::Put, "/v1/articles/1"), 1);
    assert!(matches!(editor.status(), SaveStatus::Idle));
    let draft = editor.draft().unwrap();
    assert_eq!(draft.id, RecordId::from(2));
    assert_eq!(draft.title, "Lakes");
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_save_keeps_status_pending() {
    let transport = ScriptedTransport::new();
    transport
        .respond_after(Duration::from_millis(300), Method::Put, "/v1/articles/1", 200, json!({}))
        .respond(Method::Put, "/v1/articles/1", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    editor.edit(|d| d.set_title("first"));
    sleep(Duration::from_millis(900)).await;
    editor.edit(|d| d.set_title("second"));
    sleep(Duration::from_millis(400)).await;
    // first save answered, but a newer edit is waiting
    assert!(matches!(editor.status(), SaveStatus::Pending));

    sleep(Duration::from_secs(1)).await;
    let bodies = put_bodies(&transport, "/v1/articles/1");
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1]["title"], "second");
    assert!(matches!(editor.status(), SaveStatus::Saved));
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_keeps_draft() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Put, "/v1/articles/1", 500, json!({"message": "db down"}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    editor.edit(|d| d.set_title("Unsaved title"));
    sleep(Duration::from_secs(1)).await;

    match editor.status() {
        SaveStatus::Failed(e) => assert_eq!(e.status(), Some(500)),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(editor.draft().unwrap().title, "Unsaved title");
}

#[tokio::test(start_paused = true)]
async fn test_flush_saves_immediately_and_cancels_timer() {
    let transport = ScriptedTransport::new();
    transport.always(Method::Put, "/v1/articles/1", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    editor.edit(|d| d.add_tag("  Floods ").unwrap());
    editor.flush().await.unwrap().unwrap();
    assert_eq!(transport.count(Method::Put, "/v1/articles/1"), 1);

    sleep(Duration::from_secs(2)).await;
    let bodies = put_bodies(&transport, "/v1/articles/1");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["tags"], json!(["climate", "Floods"]));
}

#[tokio::test(start_paused = true)]
async fn test_drive_mode_sends_link_without_content() {
    let transport = ScriptedTransport::new();
    transport.always(Method::Put, "/v1/articles/9", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut record = article(9, "Briefing");
    record.source = None;
    record.external_link = Some("https://docs.example.org/d/abc".to_string());
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&record);

    editor.edit(|d| d.summary = "Weekly".to_string());
    sleep(Duration::from_secs(1)).await;

    let body = &put_bodies(&transport, "/v1/articles/9")[0];
    assert_eq!(body["source"], "drive");
    assert_eq!(body["content"], Value::Null);
    assert_eq!(body["external_link"], "https://docs.example.org/d/abc");
}

#[tokio::test(start_paused = true)]
async fn test_toggle_status_skips_autosave_and_reverts_on_failure() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Patch, "/v1/articles/1/status", 200, json!({}))
        .respond(Method::Patch, "/v1/articles/1/status", 422, json!({"message": "no"}));
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);
    editor.select(&article(1, "Rivers"));

    editor.toggle_status().await.unwrap().unwrap();
    assert_eq!(editor.draft().unwrap().status, ArticleStatus::Published);

    editor.toggle_status().await.unwrap().unwrap_err();
    assert_eq!(editor.draft().unwrap().status, ArticleStatus::Published);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(transport.count(Method::Put, "/v1/articles/1"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_published_on_file() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Patch, "/v1/public-files/5/publish", 200, json!({}));
    let (client, _) = client(&transport, true);
    let mut editor = FileEditor::new(client, DELAY);
    editor.select(&file(5, "Gauges"));

    editor.toggle_published().await.unwrap().unwrap();
    assert!(editor.draft().unwrap().is_published);
    let call = &transport.calls_to(Method::Patch, "/v1/public-files/5/publish")[0];
    assert_eq!(call.json_body(), Some(&json!({"is_published": true})));
}

#[tokio::test(start_paused = true)]
async fn test_edit_without_selection_is_noop() {
    let transport = ScriptedTransport::new();
    let (client, _) = client(&transport, true);
    let mut editor = ArticleEditor::new(client, DELAY);

    assert!(editor.edit(|d| d.set_title("x")).is_none());
    assert!(editor.flush().await.is_none());
    assert!(!editor.is_save_pending());
}
