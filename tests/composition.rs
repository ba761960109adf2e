// Composition tests — the classifier facade driving the whole engine.
//
// These tests exercise the data flow between modules:
//   KeywordSource -> pipeline -> ThemeStore -> normalize -> score -> message
// with stub keyword sources instead of the network, and temporary theme
// files instead of the real dictionary.

use std::fs;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use themescope::classifier::Classifier;
use themescope::keywords::pipeline::{acquire_candidates, build_keyword_set, RetryPolicy};
use themescope::keywords::traits::{KeywordSource, StaticKeywordSource};
use themescope::output::UNDETERMINED_MESSAGE;
use themescope::server::protocol::{parse_command, Command};
use themescope::server::{handle_connection, respond};
use themescope::store::{ThemeStore, EMPTY_LIST_MESSAGE};
use themescope::text::stemmer::{IdentityStemmer, SnowballStemmer, WordStemmer};

// ============================================================
// Helpers
// ============================================================

/// Fails `failures` times, then answers with a fixed phrase list.
struct FlakySource {
    failures: u32,
    calls: AtomicU32,
}

impl FlakySource {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordSource for FlakySource {
    async fn fetch_candidates(&self, _theme: &str) -> Result<Vec<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            anyhow::bail!("connection reset");
        }
        Ok(vec!["снег мороз".to_string()])
    }
}

fn fast_retry(max_attempts: Option<u32>) -> RetryPolicy {
    RetryPolicy {
        backoff: Duration::from_millis(1),
        max_attempts,
    }
}

fn classifier_with(
    dir: &TempDir,
    json: &str,
    stemmer: Arc<dyn WordStemmer>,
    source: Arc<dyn KeywordSource>,
) -> Classifier {
    let path = dir.path().join("themes.json");
    fs::write(&path, json).unwrap();
    let store = ThemeStore::load(&path).unwrap();
    Classifier::new(store, stemmer, source, fast_retry(None))
}

fn offline_classifier(dir: &TempDir, json: &str) -> Classifier {
    classifier_with(
        dir,
        json,
        Arc::new(SnowballStemmer::russian()),
        Arc::new(StaticKeywordSource::new(Vec::<String>::new())),
    )
}

// ============================================================
// classify
// ============================================================

#[tokio::test]
async fn sport_text_is_classified_as_sport() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"спорт": ["бег", "мяч"]}"#);

    let message = classifier
        .classify("Вчера я играл в мяч и бегал по полю")
        .await;
    assert!(message.contains("Тема текста: Спорт"), "got {message}");
    assert!(message.contains("Тема: Спорт - 100.0%"), "got {message}");
}

#[tokio::test]
async fn empty_store_reports_undetermined() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, "{}");
    assert_eq!(
        classifier.classify("Любой непустой текст").await,
        UNDETERMINED_MESSAGE
    );
}

#[tokio::test]
async fn unrelated_text_reports_undetermined() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"спорт": ["мяч"], "зима": ["снег"]}"#);
    assert_eq!(
        classifier.classify("Кошка спит на диване").await,
        UNDETERMINED_MESSAGE
    );
}

#[tokio::test]
async fn classification_lists_every_theme() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"спорт": ["мяч"], "зима": ["снег"]}"#);

    let message = classifier.classify("снег снег снег мяч").await;
    assert!(message.contains("Тема текста: Зима"), "got {message}");
    assert!(message.contains("Тема: Спорт - 25.0%"), "got {message}");
    assert!(message.contains("Тема: Зима - 75.0%"), "got {message}");
}

#[tokio::test]
async fn classify_file_reads_text() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"спорт": ["мяч"]}"#);
    let input = dir.path().join("input.txt");
    fs::write(&input, "Мяч улетел за ворота").unwrap();

    let message = classifier.classify_file(&input).await;
    assert!(message.contains("Тема текста: Спорт"), "got {message}");
}

#[tokio::test]
async fn classify_missing_file_reports_message() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"спорт": ["мяч"]}"#);

    let message = classifier
        .classify_file(&dir.path().join("nope.txt"))
        .await;
    assert!(message.starts_with("Файла с текстом не существует"), "got {message}");
}

// ============================================================
// add / remove / list through the facade
// ============================================================

#[tokio::test]
async fn add_theme_builds_keywords_from_source() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = classifier_with(
        &dir,
        "{}",
        Arc::new(IdentityStemmer),
        Arc::new(StaticKeywordSource::new([
            "футбольный мяч",
            "бег 100 метров",
            "Спорт новости",
        ])),
    );

    let message = classifier.add_theme("спорт").await;
    assert_eq!(message, "Тема спорт успешно добавлена!");

    let store = ThemeStore::load(dir.path().join("themes.json")).unwrap();
    assert_eq!(
        store.get("спорт").unwrap().keywords,
        vec!["бег", "метров", "мяч", "новости", "спорт", "футбольный"]
    );
}

#[tokio::test]
async fn duplicate_add_skips_source_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FlakySource::new(0));
    let classifier = classifier_with(
        &dir,
        r#"{"зима": ["снег"]}"#,
        Arc::new(IdentityStemmer),
        source.clone(),
    );

    assert_eq!(classifier.add_theme("зима").await, "Тема зима уже существует!");
    assert_eq!(source.calls(), 0);
    assert_eq!(classifier.list_themes().await, "Темы:\n1) Зима\n");
}

#[tokio::test]
async fn remove_theme_messages() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, r#"{"зима": ["снег"]}"#);

    assert_eq!(classifier.remove_theme("лето").await, "Тема лето не существует!");
    assert_eq!(classifier.remove_theme("зима").await, "Тема зима удалена!");
    assert_eq!(classifier.list_themes().await, EMPTY_LIST_MESSAGE);
    assert_eq!(
        fs::read_to_string(dir.path().join("themes.json")).unwrap(),
        "{}"
    );
}

#[tokio::test]
async fn blank_theme_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FlakySource::new(0));
    let classifier = classifier_with(&dir, "{}", Arc::new(IdentityStemmer), source.clone());

    let message = classifier.add_theme("   ").await;
    assert_eq!(message, "Название темы не может быть пустым!");
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn concurrent_adds_all_land_in_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = Arc::new(offline_classifier_with_words(&dir));

    let names = ["осень", "зима", "весна", "лето", "спорт"];
    let mut handles = Vec::new();
    for name in names {
        let classifier = Arc::clone(&classifier);
        handles.push(tokio::spawn(async move { classifier.add_theme(name).await }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().ends_with("успешно добавлена!"));
    }

    let store = ThemeStore::load(dir.path().join("themes.json")).unwrap();
    assert_eq!(store.len(), names.len());
    for name in names {
        assert!(store.contains(name), "missing {name}");
    }
}

fn offline_classifier_with_words(dir: &TempDir) -> Classifier {
    classifier_with(
        dir,
        "{}",
        Arc::new(IdentityStemmer),
        Arc::new(StaticKeywordSource::new(["общие слова"])),
    )
}

// ============================================================
// Keyword acquisition retry
// ============================================================

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let source = FlakySource::new(2);
    let candidates = acquire_candidates(&source, "зима", &fast_retry(None))
        .await
        .unwrap();
    assert_eq!(candidates, vec!["снег мороз"]);
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn retry_cap_gives_up_without_adding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("themes.json");
    let store = ThemeStore::load(&path).unwrap();
    let source = Arc::new(StaticKeywordSource::new(Vec::<String>::new()));
    let classifier = Classifier::new(
        store,
        Arc::new(IdentityStemmer),
        source,
        fast_retry(Some(3)),
    );

    let message = classifier.add_theme("зима").await;
    assert_eq!(
        message,
        "Не удалось получить ключевые слова для темы зима (попыток: 3)"
    );
    assert_eq!(classifier.list_themes().await, EMPTY_LIST_MESSAGE);
}

#[test]
fn keyword_pipeline_is_idempotent() {
    let raw: Vec<String> = ["Зимний лес", "снег идёт 2024", "зима снег", "МОРОЗ и солнце"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let stemmer = SnowballStemmer::russian();

    let first = build_keyword_set("зима", &raw, &stemmer);
    let second = build_keyword_set("зима", &raw, &stemmer);
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(first, sorted);
    assert!(!first.iter().any(|w| w == "зима"));
}

// ============================================================
// TCP server
// ============================================================

#[tokio::test]
async fn respond_frames_classifier_messages() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = offline_classifier(&dir, "{}");

    assert_eq!(respond(Command::CheckHealth, &classifier).await, "{Ready}");
    assert_eq!(
        respond(parse_command(b"List"), &classifier).await,
        format!("{{{EMPTY_LIST_MESSAGE}}}")
    );
    assert_eq!(
        respond(parse_command(b"Bogus"), &classifier).await,
        "{Неизвестная команда}"
    );
}

#[tokio::test]
async fn server_answers_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = Arc::new(offline_classifier(&dir, r#"{"спорт": ["мяч"]}"#));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_classifier = Arc::clone(&classifier);
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        handle_connection(socket, &server_classifier).await
    });

    let mut client = TcpStream::connect(addr).await.unwrap();
    let mut buf = vec![0u8; 4096];

    client.write_all(b"CheckHealth").await.unwrap();
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"{Ready}");

    client.write_all("TextМяч в воротах".as_bytes()).await.unwrap();
    let n = client.read(&mut buf).await.unwrap();
    let reply = String::from_utf8_lossy(&buf[..n]).into_owned();
    assert!(reply.starts_with('{') && reply.ends_with('}'));
    assert!(reply.contains("Тема текста: Спорт"), "got {reply}");

    drop(client);
    server.await.unwrap().unwrap();
}
