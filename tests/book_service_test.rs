use std::sync::Arc;
use std::time::Duration;

use library_catalog::db;
use library_catalog::domain::{BookFilter, BookPatch, DomainError, NewBook, PaginationParams};
use library_catalog::infrastructure::SeaOrmBookRepository;
use library_catalog::openlibrary::OpenLibraryClient;
use library_catalog::services::BookService;

// Enrichment is exercised in enrichment_test.rs; here the client points at a
// closed port so lookups fail fast and get downgraded to "no metadata".
fn dead_openlibrary() -> OpenLibraryClient {
    OpenLibraryClient::new("http://127.0.0.1:9", Duration::from_millis(200))
}

async fn setup_service() -> BookService {
    let db = db::init_db("sqlite::memory:", 1)
        .await
        .expect("Failed to init DB");
    BookService::new(
        Arc::new(SeaOrmBookRepository::new(db)),
        dead_openlibrary(),
    )
}

fn new_book(title: &str, author: &str, genre: &str, year: i32) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        year,
        genre: genre.to_string(),
        pages: 300,
        available: None,
        isbn: None,
        description: None,
    }
}

#[tokio::test]
async fn test_create_and_get_book() {
    let service = setup_service().await;

    let mut input = new_book("Clean Code", "Robert Martin", "Programming", 2008);
    input.isbn = Some("978-0132350884".to_string());
    input.description = Some("A Handbook of Agile Software Craftsmanship".to_string());

    let created = service.create_book(input).await.expect("create failed");
    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Clean Code");
    // ISBN is stored normalized, separators stripped
    assert_eq!(created.isbn.as_deref(), Some("9780132350884"));
    // Availability defaults to true, no enrichment data was reachable
    assert!(created.available);
    assert!(created.extra.is_none());

    let fetched = service.get_book(&created.id).await.expect("get failed");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let service = setup_service().await;

    let result = service.get_book("no-such-id").await;
    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn test_duplicate_isbn_is_conflict() {
    let service = setup_service().await;

    let mut first = new_book("Dune", "Frank Herbert", "Science Fiction", 1965);
    first.isbn = Some("9780441013593".to_string());
    service.create_book(first).await.expect("create failed");

    // Same ISBN, differently formatted
    let mut second = new_book("Dune (reissue)", "Frank Herbert", "Science Fiction", 1990);
    second.isbn = Some("978-0-441-01359-3".to_string());

    let result = service.create_book(second).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_persistence() {
    let service = setup_service().await;

    let mut input = new_book("Dune", "Frank Herbert", "Science Fiction", 1965);
    input.isbn = Some("12345".to_string());
    assert!(matches!(
        service.create_book(input).await,
        Err(DomainError::Validation(msg)) if msg.contains("isbn")
    ));

    let input = new_book("", "Frank Herbert", "Science Fiction", 1965);
    assert!(matches!(
        service.create_book(input).await,
        Err(DomainError::Validation(msg)) if msg.contains("title")
    ));

    let input = new_book("Dune", "Frank Herbert", "Science Fiction", 999);
    assert!(matches!(
        service.create_book(input).await,
        Err(DomainError::Validation(msg)) if msg.contains("year")
    ));

    // Nothing was persisted
    let all = service
        .search_books(BookFilter::default(), PaginationParams::default())
        .await
        .expect("search failed");
    assert_eq!(all.total, 0);
}

#[tokio::test]
async fn test_partial_update_touches_only_supplied_fields() {
    let service = setup_service().await;

    let created = service
        .create_book(new_book("Dune", "Frank Herbert", "Science Fiction", 1965))
        .await
        .expect("create failed");

    let patch = BookPatch {
        year: Some(1966),
        description: Some(Some("Award winner".to_string())),
        ..Default::default()
    };
    let updated = service
        .update_book(&created.id, patch)
        .await
        .expect("update failed");

    assert_eq!(updated.year, 1966);
    assert_eq!(updated.description.as_deref(), Some("Award winner"));
    // Everything else is untouched
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.author, created.author);
    assert_eq!(updated.genre, created.genre);
    assert_eq!(updated.pages, created.pages);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_empty_patch_only_refreshes_updated_at() {
    let service = setup_service().await;

    let created = service
        .create_book(new_book("Dune", "Frank Herbert", "Science Fiction", 1965))
        .await
        .expect("create failed");

    let updated = service
        .update_book(&created.id, BookPatch::default())
        .await
        .expect("update failed");

    assert_eq!(updated.title, created.title);
    assert_eq!(updated.year, created.year);
    assert_eq!(updated.created_at, created.created_at);
    // Equal only if clock resolution coincides
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_missing_book_is_not_found() {
    let service = setup_service().await;

    let patch = BookPatch {
        year: Some(2000),
        ..Default::default()
    };
    let result = service.update_book("no-such-id", patch).await;
    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn test_update_to_taken_isbn_is_conflict() {
    let service = setup_service().await;

    let mut first = new_book("Dune", "Frank Herbert", "Science Fiction", 1965);
    first.isbn = Some("9780441013593".to_string());
    service.create_book(first).await.expect("create failed");

    let mut second = new_book("Dune Messiah", "Frank Herbert", "Science Fiction", 1969);
    second.isbn = Some("9780441013623".to_string());
    let second = service.create_book(second).await.expect("create failed");

    let patch = BookPatch {
        isbn: Some(Some("9780441013593".to_string())),
        ..Default::default()
    };
    let result = service.update_book(&second.id, patch).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));

    // Re-asserting its own ISBN is not a collision
    let patch = BookPatch {
        isbn: Some(Some("978-0441013623".to_string())),
        ..Default::default()
    };
    let updated = service
        .update_book(&second.id, patch)
        .await
        .expect("update failed");
    assert_eq!(updated.isbn.as_deref(), Some("9780441013623"));
}

#[tokio::test]
async fn test_delete_reports_existence() {
    let service = setup_service().await;

    let created = service
        .create_book(new_book("Dune", "Frank Herbert", "Science Fiction", 1965))
        .await
        .expect("create failed");

    assert!(service.delete_book(&created.id).await.expect("delete failed"));
    // Deleting again is a false signal, not an error
    assert!(!service.delete_book(&created.id).await.expect("delete failed"));
    assert!(matches!(
        service.get_book(&created.id).await,
        Err(DomainError::NotFound)
    ));
}

async fn seed_fixture(service: &BookService) {
    let books = [
        ("Clean Code", "Robert Martin", "Programming", 2008, true),
        ("The Clean Coder", "Robert Martin", "Programming", 2011, true),
        ("Dune", "Frank Herbert", "Science Fiction", 1965, false),
        ("Dune Messiah", "Frank Herbert", "Science Fiction", 1969, true),
        ("Refactoring", "Martin Fowler", "Programming", 1999, true),
    ];
    for (title, author, genre, year, available) in books {
        let mut input = new_book(title, author, genre, year);
        input.available = Some(available);
        service.create_book(input).await.expect("create failed");
    }
}

async fn titles_for(service: &BookService, filter: BookFilter) -> Vec<String> {
    let page = service
        .search_books(filter, PaginationParams::default())
        .await
        .expect("search failed");
    page.items.into_iter().map(|b| b.title).collect()
}

#[tokio::test]
async fn test_filters_narrow_to_matching_subset() {
    let service = setup_service().await;
    seed_fixture(&service).await;

    // No filters: everything, most recent creation first
    let all = service
        .search_books(BookFilter::default(), PaginationParams::default())
        .await
        .expect("search failed");
    assert_eq!(all.total, 5);
    assert_eq!(all.items.len(), 5);
    assert_eq!(all.items[0].title, "Refactoring");
    for pair in all.items.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    // Case-insensitive substring on title
    let filter = BookFilter {
        title: Some("clean".to_string()),
        ..Default::default()
    };
    let mut titles = titles_for(&service, filter).await;
    titles.sort();
    assert_eq!(titles, ["Clean Code", "The Clean Coder"]);

    // Substring on author spans both Martins
    let filter = BookFilter {
        author: Some("martin".to_string()),
        ..Default::default()
    };
    assert_eq!(titles_for(&service, filter).await.len(), 3);

    // Genre substring
    let filter = BookFilter {
        genre: Some("science".to_string()),
        ..Default::default()
    };
    let mut titles = titles_for(&service, filter).await;
    titles.sort();
    assert_eq!(titles, ["Dune", "Dune Messiah"]);

    // Exact year
    let filter = BookFilter {
        year: Some(2008),
        ..Default::default()
    };
    assert_eq!(titles_for(&service, filter).await, ["Clean Code"]);

    // Exact availability
    let filter = BookFilter {
        available: Some(false),
        ..Default::default()
    };
    assert_eq!(titles_for(&service, filter).await, ["Dune"]);

    // Filters combine
    let filter = BookFilter {
        author: Some("herbert".to_string()),
        available: Some(true),
        ..Default::default()
    };
    assert_eq!(titles_for(&service, filter).await, ["Dune Messiah"]);
}

#[tokio::test]
async fn test_pagination_over_45_records() {
    let service = setup_service().await;

    for i in 1..=45 {
        service
            .create_book(new_book(
                &format!("Book {:02}", i),
                "Prolific Author",
                "Fiction",
                2000,
            ))
            .await
            .expect("create failed");
    }

    let page1 = service
        .search_books(
            BookFilter::default(),
            PaginationParams::new(1, 20).unwrap(),
        )
        .await
        .expect("search failed");
    assert_eq!(page1.items.len(), 20);
    assert_eq!(page1.total, 45);
    assert_eq!(page1.pages, 3);
    assert_eq!(page1.page, 1);
    assert_eq!(page1.page_size, 20);

    let page3 = service
        .search_books(
            BookFilter::default(),
            PaginationParams::new(3, 20).unwrap(),
        )
        .await
        .expect("search failed");
    assert_eq!(page3.items.len(), 5);
    assert_eq!(page3.total, 45);

    // Pages partition the collection without overlap
    let page2 = service
        .search_books(
            BookFilter::default(),
            PaginationParams::new(2, 20).unwrap(),
        )
        .await
        .expect("search failed");
    let mut seen: Vec<String> = page1
        .items
        .iter()
        .chain(page2.items.iter())
        .chain(page3.items.iter())
        .map(|b| b.id.clone())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 45);
}
