use folio_client::storage::{KeyValueStore, THEME_KEY};
use folio_client::{FileStore, FilterStore, MemoryStore, ThemePreference};
use folio_core::{ArticleFilters, ArticleStatus, FileFilters, FileSort, ListFilters, PublishedFilter};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_filters_survive_a_reload() {
    let storage = Arc::new(MemoryStore::new());
    {
        let mut store = FilterStore::<ArticleFilters>::load(storage.clone());
        store.update(|f| {
            f.q = "climate".to_string();
            f.status = Some(ArticleStatus::Published);
        });
    }

    let store = FilterStore::<ArticleFilters>::load(storage.clone());
    assert_eq!(store.filters().q, "climate");
    assert_eq!(store.filters().status, Some(ArticleStatus::Published));
    assert_eq!(store.filters().page, 1);
}

#[test]
fn test_restored_filters_start_at_first_page() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = FilterStore::<FileFilters>::load(storage.clone());
    store.update(|f| f.published = PublishedFilter::True);
    store.set_page(4);
    assert_eq!(store.filters().page(), 4);

    let restored = FilterStore::<FileFilters>::load(storage);
    assert_eq!(restored.filters().page(), 1);
    assert_eq!(restored.filters().published, PublishedFilter::True);
}

#[test]
fn test_malformed_stored_filters_fall_back_to_defaults() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(FileFilters::STORAGE_KEY, "{not json");

    let store = FilterStore::<FileFilters>::load(storage);
    assert_eq!(store.filters(), &FileFilters::default());
    assert_eq!(store.filters().sort, FileSort::CreatedDesc);
}

#[test]
fn test_partial_stored_filters_fill_missing_fields() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(ArticleFilters::STORAGE_KEY, r#"{"q":"climate","page":3}"#);

    let store = FilterStore::<ArticleFilters>::load(storage);
    assert_eq!(store.filters().q, "climate");
    assert_eq!(store.filters().page, 1);
    assert_eq!(store.filters().limit, folio_core::DEFAULT_PAGE_SIZE);
}

#[test]
fn test_clear_forgets_stored_filters() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = FilterStore::<ArticleFilters>::load(storage.clone());
    store.update(|f| f.q = "dams".to_string());
    assert!(storage.contains(ArticleFilters::STORAGE_KEY));

    store.clear();
    assert!(!storage.contains(ArticleFilters::STORAGE_KEY));
    assert_eq!(store.filters(), &ArticleFilters::default());
}

#[test]
fn test_article_and_file_filters_are_stored_separately() {
    let storage = Arc::new(MemoryStore::new());
    let mut articles = FilterStore::<ArticleFilters>::load(storage.clone());
    let mut files = FilterStore::<FileFilters>::load(storage.clone());
    articles.update(|f| f.q = "articles".to_string());
    files.update(|f| f.q = "files".to_string());

    assert_eq!(FilterStore::<ArticleFilters>::load(storage.clone()).filters().q, "articles");
    assert_eq!(FilterStore::<FileFilters>::load(storage).filters().q, "files");
}

#[test]
fn test_theme_persists_in_state_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");

    let theme = ThemePreference::new(Arc::new(FileStore::open(&path)));
    assert!(!theme.is_dark());
    assert!(theme.toggle());

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("true"));
    assert!(ThemePreference::new(Arc::new(reopened)).is_dark());
}

#[test]
fn test_unexpected_theme_value_reads_as_light() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(THEME_KEY, "yes");
    assert!(!ThemePreference::new(storage).is_dark());
}
