#![allow(clippy::unwrap_used)]
//! End-to-end synchronization runs against an in-memory resource store and a
//! fake translator that counts its calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

use strsync_cli::cache::TranslationCache;
use strsync_cli::model::{ContentRun, TreeEntry, ValueKind, ValueNode, ValueTree};
use strsync_cli::resource::{
    ResourceError, ResourceStore, parse_resources, render_resources,
};
use strsync_cli::sync::{SyncEngine, SyncError, SyncOptions};
use strsync_cli::translation::{
    Lang, TranslationError, TranslationErrorKind, Translator, all_languages, find_language,
};

const SOURCE_PATH: &str = "app/res/values/strings.xml";
const FR_PATH: &str = "app/res/values-fr/strings.xml";
const DE_PATH: &str = "app/res/values-de/strings.xml";

#[derive(Default)]
struct MemoryStore {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    fn insert(&self, path: &str, tree: &ValueTree) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), render_resources(tree));
    }

    fn tree(&self, path: &str) -> ValueTree {
        parse_resources(&self.file(path).unwrap()).unwrap()
    }
}

impl ResourceStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Option<ValueTree>, ResourceError> {
        match self.files.lock().unwrap().get(path) {
            Some(source) => parse_resources(source).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, path: &Path, tree: &ValueTree) -> Result<(), ResourceError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), render_resources(tree));
        Ok(())
    }
}

/// Prefixes the text with the target code, e.g. `Hello` -> `[fr] Hello`.
#[derive(Default)]
struct FakeTranslator {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
    cancel_at_call: Option<(usize, CancellationToken)>,
}

impl FakeTranslator {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    fn key(&self) -> &str {
        "fake"
    }

    fn supported_languages(&self) -> Vec<Lang> {
        all_languages()
    }

    async fn translate(
        &self,
        from: &Lang,
        to: &Lang,
        text: &str,
    ) -> Result<String, TranslationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.texts.lock().unwrap().push(text.to_string());

        if let Some((at, token)) = &self.cancel_at_call
            && *at == call
        {
            token.cancel();
        }

        if self.fail_on == Some(text) {
            return Err(TranslationError::new(
                TranslationErrorKind::ProviderRejected,
                from,
                to,
                text,
                "quota exceeded",
            ));
        }

        Ok(format!("[{}] {text}", to.code))
    }
}

fn lang(code: &str) -> Lang {
    find_language(code).unwrap()
}

fn options(overwrite: bool) -> SyncOptions {
    SyncOptions {
        source_lang: lang("en"),
        overwrite,
        use_cache: true,
    }
}

fn simple(name: &str, text: &str) -> TreeEntry {
    TreeEntry::Node(ValueNode::simple(name, vec![ContentRun::text(text)]))
}

fn simple_text(tree: &ValueTree, name: &str) -> Vec<ContentRun> {
    match &tree.node(name).unwrap().kind {
        ValueKind::Simple(runs) => runs.clone(),
        other => panic!("expected a simple node, got {other:?}"),
    }
}

fn greeting_source() -> ValueTree {
    ValueTree::from_entries(vec![
        simple("greeting", "Hello"),
        TreeEntry::Node(
            ValueNode::simple("app_name", vec![ContentRun::text("MyApp")]).with_translatable(false),
        ),
    ])
}

async fn run(
    translator: &FakeTranslator,
    store: &MemoryStore,
    cache: &mut TranslationCache,
    options: SyncOptions,
    source: &ValueTree,
    targets: &[Lang],
) -> Result<strsync_cli::sync::SyncReport, SyncError> {
    let mut engine = SyncEngine::new(translator, store, cache, options);
    engine.run(Path::new(SOURCE_PATH), source, targets).await
}

#[tokio::test]
async fn test_greeting_translated_and_non_translatable_omitted() {
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let report = run(
        &translator,
        &store,
        &mut cache,
        options(false),
        &greeting_source(),
        &[lang("fr")],
    )
    .await
    .unwrap();

    let french = store.tree(FR_PATH);
    assert_eq!(french.node_count(), 1);
    assert_eq!(simple_text(&french, "greeting"), vec![ContentRun::text("[fr] Hello")]);
    assert!(french.node("app_name").is_none());

    assert_eq!(translator.calls(), 1);
    assert_eq!(report.languages.len(), 1);
    assert_eq!(report.languages[0].translated, 1);
    assert_eq!(report.languages[0].skipped, 1);
    assert_eq!(report.languages[0].path, PathBuf::from(FR_PATH));
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_second_run_without_overwrite_is_byte_identical() {
    let source = parse_resources(
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources xmlns:xliff="urn:oasis:names:tc:xliff:document:1.2">
    <!-- Launcher -->
    <string name="greeting">Hello</string>
    <string name="inbox">You have <xliff:g id="count" example="3">%d</xliff:g> messages</string>
    <string-array name="planets">
        <item>Mercury</item>
        <item>Venus</item>
    </string-array>
    <plurals name="songs">
        <item quantity="one">%d song</item>
        <item quantity="other">%d songs</item>
    </plurals>
</resources>
"#,
    )
    .unwrap();
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();
    let targets = [lang("fr"), lang("de")];

    run(&translator, &store, &mut cache, options(false), &source, &targets)
        .await
        .unwrap();
    let first_fr = store.file(FR_PATH).unwrap();
    let first_de = store.file(DE_PATH).unwrap();
    let first_calls = translator.calls();

    cache.clear();
    let report = run(&translator, &store, &mut cache, options(false), &source, &targets)
        .await
        .unwrap();

    assert_eq!(store.file(FR_PATH).unwrap(), first_fr);
    assert_eq!(store.file(DE_PATH).unwrap(), first_de);
    assert_eq!(translator.calls(), first_calls);
    assert_eq!(report.total_requests(), 0);
    assert_eq!(report.languages[0].reused, 4);
}

#[tokio::test]
async fn test_blank_runs_never_reach_the_provider() {
    let source = ValueTree::from_entries(vec![
        simple("empty", ""),
        simple("spaces", "   "),
        simple("breaks", "\n\t\r\n"),
        TreeEntry::Node(ValueNode::list(
            "blank_items",
            vec![vec![ContentRun::text(" ")], vec![]],
        )),
    ]);
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let report = run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    assert_eq!(translator.calls(), 0);
    assert_eq!(report.languages[0].translated, 4);
    assert_eq!(store.tree(FR_PATH).node_count(), 4);
}

#[tokio::test]
async fn test_pass_through_after_skipped_node_is_dropped_once() {
    let source = ValueTree::from_entries(vec![
        TreeEntry::Node(
            ValueNode::simple("app_name", vec![ContentRun::text("MyApp")]).with_translatable(false),
        ),
        TreeEntry::Comment(" app name docs ".to_string()),
        TreeEntry::Whitespace("\n    ".to_string()),
        simple("greeting", "Hello"),
        TreeEntry::Comment(" kept ".to_string()),
        TreeEntry::Whitespace("\n".to_string()),
    ]);
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    let written = store.file(FR_PATH).unwrap();
    assert!(!written.contains("app name docs"));
    assert!(written.contains("<!-- kept -->"));
    assert!(!written.contains("MyApp"));
    assert!(written.contains(r#"<string name="greeting">[fr] Hello</string>"#));
}

#[tokio::test]
async fn test_existing_entries_are_reused_without_overwrite() {
    let store = MemoryStore::default();
    store.insert(
        FR_PATH,
        &ValueTree::from_entries(vec![simple("greeting", "Salut"), simple("stale", "Vieux")]),
    );
    let source = ValueTree::from_entries(vec![simple("greeting", "Hello"), simple("bye", "Bye")]);
    let translator = FakeTranslator::default();
    let mut cache = TranslationCache::default();

    let report = run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    let french = store.tree(FR_PATH);
    assert_eq!(simple_text(&french, "greeting"), vec![ContentRun::text("Salut")]);
    assert_eq!(simple_text(&french, "bye"), vec![ContentRun::text("[fr] Bye")]);
    assert!(french.node("stale").is_none());
    assert_eq!(translator.texts(), vec!["Bye".to_string()]);
    assert_eq!(report.languages[0].reused, 1);
    assert_eq!(report.languages[0].translated, 1);
}

#[tokio::test]
async fn test_overwrite_retranslates_existing_entries() {
    let store = MemoryStore::default();
    store.insert(FR_PATH, &ValueTree::from_entries(vec![simple("greeting", "Salut")]));
    let translator = FakeTranslator::default();
    let mut cache = TranslationCache::default();

    run(
        &translator,
        &store,
        &mut cache,
        options(true),
        &greeting_source(),
        &[lang("fr")],
    )
    .await
    .unwrap();

    let french = store.tree(FR_PATH);
    assert_eq!(simple_text(&french, "greeting"), vec![ContentRun::text("[fr] Hello")]);
    assert_eq!(translator.calls(), 1);
}

#[tokio::test]
async fn test_cache_serves_repeated_text() {
    let source = ValueTree::from_entries(vec![simple("ok", "OK"), simple("confirm", "OK")]);
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let report = run(&translator, &store, &mut cache, options(true), &source, &[lang("fr")])
        .await
        .unwrap();

    assert_eq!(translator.calls(), 1);
    assert_eq!(report.languages[0].translated, 2);
    assert_eq!(report.languages[0].requests, 1);
    assert_eq!(cache.lookup(&lang("en"), &lang("fr"), "OK"), Some("[fr] OK".to_string()));
}

#[tokio::test]
async fn test_disabled_cache_is_not_consulted() {
    let source = ValueTree::from_entries(vec![simple("ok", "OK"), simple("confirm", "OK")]);
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();
    let options = SyncOptions {
        use_cache: false,
        ..options(true)
    };

    run(&translator, &store, &mut cache, options, &source, &[lang("fr")])
        .await
        .unwrap();

    assert_eq!(translator.calls(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_padding_and_placeholders_are_preserved() {
    let source = ValueTree::from_entries(vec![TreeEntry::Node(ValueNode::simple(
        "inbox",
        vec![
            ContentRun::text("  You have "),
            ContentRun::placeholder("%d", Some("count"), Some("3")),
            ContentRun::text(" messages"),
        ],
    ))]);
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    run(&translator, &store, &mut cache, options(false), &source, &[lang("de")])
        .await
        .unwrap();

    assert_eq!(
        translator.texts(),
        vec!["You have".to_string(), "messages".to_string()]
    );
    assert_eq!(
        simple_text(&store.tree(DE_PATH), "inbox"),
        vec![
            ContentRun::text("  [de] You have "),
            ContentRun::placeholder("%d", Some("count"), Some("3")),
            ContentRun::text(" [de] messages"),
        ]
    );
}

#[tokio::test]
async fn test_source_language_target_is_skipped() {
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let report = run(
        &translator,
        &store,
        &mut cache,
        options(false),
        &greeting_source(),
        &[lang("en"), lang("fr")],
    )
    .await
    .unwrap();

    assert_eq!(report.languages.len(), 1);
    assert_eq!(report.languages[0].lang, lang("fr"));
    assert!(store.file("app/res/values-en/strings.xml").is_none());
}

#[tokio::test]
async fn test_first_error_aborts_the_run() {
    let source = ValueTree::from_entries(vec![
        simple("greeting", "Hello"),
        simple("bad", "Boom"),
        simple("after", "World"),
    ]);
    let translator = FakeTranslator {
        fail_on: Some("Boom"),
        ..FakeTranslator::default()
    };
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let err = run(
        &translator,
        &store,
        &mut cache,
        options(false),
        &source,
        &[lang("fr"), lang("de")],
    )
    .await
    .unwrap_err();

    let SyncError::Translation(error) = err else {
        panic!("expected a translation error");
    };
    assert_eq!(error.kind, TranslationErrorKind::ProviderRejected);
    assert_eq!(error.to, lang("fr"));
    assert_eq!(error.text, "Boom");
    assert_eq!(translator.texts(), vec!["Hello".to_string(), "Boom".to_string()]);
    assert!(store.file(FR_PATH).is_none());
    assert!(store.file(DE_PATH).is_none());
}

#[tokio::test]
async fn test_cancelled_before_start_writes_nothing() {
    let translator = FakeTranslator::default();
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut engine = SyncEngine::new(&translator, &store, &mut cache, options(false))
        .with_cancellation(cancel);
    let report = engine
        .run(Path::new(SOURCE_PATH), &greeting_source(), &[lang("fr")])
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.languages.is_empty());
    assert_eq!(translator.calls(), 0);
    assert!(store.file(FR_PATH).is_none());
}

#[tokio::test]
async fn test_cancellation_keeps_earlier_languages() {
    let source = ValueTree::from_entries(vec![simple("one", "One"), simple("two", "Two")]);
    let cancel = CancellationToken::new();
    let translator = FakeTranslator {
        cancel_at_call: Some((3, cancel.clone())),
        ..FakeTranslator::default()
    };
    let store = MemoryStore::default();
    let mut cache = TranslationCache::default();

    let mut engine = SyncEngine::new(&translator, &store, &mut cache, options(false))
        .with_cancellation(cancel);
    let report = engine
        .run(Path::new(SOURCE_PATH), &source, &[lang("fr"), lang("de")])
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.languages.len(), 1);
    assert_eq!(translator.calls(), 3);
    assert!(store.file(FR_PATH).is_some());
    assert!(store.file(DE_PATH).is_none());
}

const TOOLS_NS: &str = "http://schemas.android.com/tools";

#[tokio::test]
async fn test_element_attributes_survive_translation_and_reuse() {
    let source = parse_resources(&format!(
        r#"<resources xmlns:tools="{TOOLS_NS}">
    <string name="pair" formatted="false">%s and %s</string>
    <string name="title" tools:ignore="Typos">Title</string>
    <dimen name="margin" tools:ignore="UnusedResources">4dp</dimen>
</resources>"#
    ))
    .unwrap();
    let store = MemoryStore::default();
    store.insert(
        FR_PATH,
        &parse_resources(&format!(
            r#"<resources xmlns:tools="{TOOLS_NS}"><string name="title" tools:ignore="Typos">Titre</string></resources>"#
        ))
        .unwrap(),
    );
    let translator = FakeTranslator::default();
    let mut cache = TranslationCache::default();

    run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    let french = store.file(FR_PATH).unwrap();
    assert!(french.contains(&format!(r#"<resources xmlns:tools="{TOOLS_NS}">"#)));
    assert!(french.contains(r#"<string name="pair" formatted="false">[fr] %s and %s</string>"#));
    assert!(french.contains(r#"<string name="title" tools:ignore="Typos">Titre</string>"#));
    assert!(french.contains(r#"<dimen name="margin" tools:ignore="UnusedResources">4dp</dimen>"#));
    assert_eq!(translator.texts(), vec!["%s and %s".to_string()]);
}

#[tokio::test]
async fn test_target_only_namespace_is_kept_for_reused_entries() {
    let source =
        parse_resources(r#"<resources><string name="title">Title</string></resources>"#).unwrap();
    let store = MemoryStore::default();
    store.insert(
        FR_PATH,
        &parse_resources(&format!(
            r#"<resources xmlns:tools="{TOOLS_NS}"><string name="title" tools:ignore="Typos">Titre</string></resources>"#
        ))
        .unwrap(),
    );
    let translator = FakeTranslator::default();
    let mut cache = TranslationCache::default();

    run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    let french = store.file(FR_PATH).unwrap();
    assert!(french.contains(&format!(r#"xmlns:tools="{TOOLS_NS}""#)));
    assert!(french.contains(r#"tools:ignore="Typos""#));
    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn test_placeholder_markup_passes_through_translation() {
    let source = parse_resources(
        r#"<resources xmlns:xliff="urn:oasis:names:tc:xliff:document:1.2"><string name="bold">Hi <xliff:g id="n"><b>%s</b></xliff:g></string></resources>"#,
    )
    .unwrap();
    let store = MemoryStore::default();
    let translator = FakeTranslator::default();
    let mut cache = TranslationCache::default();

    run(&translator, &store, &mut cache, options(false), &source, &[lang("fr")])
        .await
        .unwrap();

    let french = store.file(FR_PATH).unwrap();
    assert!(french.contains(r#"<string name="bold">[fr] Hi <xliff:g id="n"><b>%s</b></xliff:g></string>"#));
    assert_eq!(translator.texts(), vec!["Hi".to_string()]);
}
