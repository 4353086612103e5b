use shelfsync_core::{
    BookCatalog, BookImage, BookRecord, CacheConfig, CatalogState, Category, CounterPolicy,
    Counters, StoreError,
};

fn book(id: &str, title: Option<&str>, counters: Counters) -> BookRecord {
    BookRecord::new(
        id,
        title.map(str::to_string),
        counters,
        BookImage::placeholder("placeholder.png"),
    )
}

fn seeded(config: CacheConfig) -> BookCatalog {
    let mut fiction = book("b2", Some("Warcraft Lore"), Counters::new(1, 1, 0));
    fiction.categories.fiction = true;
    fiction.subjects = vec!["Games".to_string(), "Fantasy".to_string()];

    let mut classic = book("b3", Some("Anna Karenina"), Counters::new(4, 0, 4));
    classic.categories.fiction = true;
    classic.subjects = vec!["Russian literature".to_string()];

    let books = vec![
        book("b1", Some("War and Peace"), Counters::new(5, 3, 2)),
        fiction,
        classic,
        book("b4", None, Counters::new(2, 1, 1)),
    ];
    BookCatalog::with_state(
        config,
        CatalogState::new(books, vec!["Games".to_string()]),
    )
}

#[test]
fn takeout_then_return_restores_counters_for_every_record() {
    let catalog = seeded(CacheConfig {
        counter_policy: CounterPolicy::AllowNegative,
        ..CacheConfig::default()
    });

    for original in catalog.all_books() {
        catalog.takeout_one(&original.id).expect("record exists");
        catalog.return_out_one(&original.id).expect("record exists");

        let after = catalog.book_details(&original.id).expect("record exists");
        assert_eq!(after.counters, original.counters, "record {}", original.id);
    }
}

#[test]
fn borrow_return_pair_preserves_total() {
    let catalog = seeded(CacheConfig::default());
    let before = catalog.book_details("b1").expect("b1 exists").counters;

    let borrowed = catalog.takeout_one("b1").expect("b1 exists");
    assert!(borrowed.applied);
    assert_eq!(borrowed.after, Counters::new(5, 2, 3));
    assert_eq!(
        borrowed.after.on_shelf + borrowed.after.out,
        before.on_shelf + before.out
    );

    let returned = catalog.return_out_one("b1").expect("b1 exists");
    assert_eq!(returned.after, before);
    assert!(returned.after.is_balanced());
}

#[test]
fn clamp_refuses_borrow_with_empty_shelf() {
    let catalog = seeded(CacheConfig::default());

    let change = catalog.takeout_one("b3").expect("b3 exists");

    assert!(!change.applied);
    assert_eq!(change.after, change.before);
    assert_eq!(
        catalog.book_details("b3").expect("b3 exists").counters,
        Counters::new(4, 0, 4)
    );
}

#[test]
fn clamp_refuses_return_with_nothing_out() {
    let catalog = seeded(CacheConfig::default());

    let change = catalog.return_out_one("b2").expect("b2 exists");

    assert!(!change.applied);
    assert_eq!(
        catalog.book_details("b2").expect("b2 exists").counters,
        Counters::new(1, 1, 0)
    );
}

#[test]
fn allow_negative_lets_counters_go_below_zero() {
    let catalog = seeded(CacheConfig {
        counter_policy: CounterPolicy::AllowNegative,
        ..CacheConfig::default()
    });

    let change = catalog.takeout_one("b3").expect("b3 exists");

    assert!(change.applied);
    assert_eq!(change.after, Counters::new(4, -1, 5));
}

#[test]
fn actions_on_unknown_id_fail_without_changes() {
    let catalog = seeded(CacheConfig::default());
    let before = catalog.all_books();

    let takeout = catalog.takeout_one("missing").expect_err("missing id must fail");
    let giveback = catalog
        .return_out_one("missing")
        .expect_err("missing id must fail");

    assert_eq!(takeout, StoreError::BookNotFound("missing".to_string()));
    assert!(matches!(giveback, StoreError::BookNotFound(_)));
    assert_eq!(catalog.all_books(), before);
}

#[test]
fn title_search_is_case_insensitive_and_skips_untitled() {
    let catalog = seeded(CacheConfig::default());

    let hits = catalog.search_for_title("War");
    let ids: Vec<&str> = hits.iter().map(|book| book.id.as_str()).collect();
    assert_eq!(ids, ["b1", "b2"]);

    let lower = catalog.search_for_title("war");
    assert_eq!(lower, hits);
    assert!(catalog.search_for_title("tolstoy").is_empty());
}

#[test]
fn empty_query_matches_every_titled_record() {
    let catalog = seeded(CacheConfig::default());
    let ids: Vec<String> = catalog
        .search_for_title("")
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, ["b1", "b2", "b3"]);
}

#[test]
fn book_details_miss_is_none() {
    let catalog = seeded(CacheConfig::default());
    assert!(catalog.book_details("b404").is_none());
    assert_eq!(
        catalog.book_details("b4").expect("b4 exists").title,
        None
    );
}

#[test]
fn category_and_subject_views_filter_in_order() {
    let catalog = seeded(CacheConfig::default());

    let fiction: Vec<String> = catalog
        .books_in_category(Category::Fiction)
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(fiction, ["b2", "b3"]);
    assert!(catalog.books_in_category(Category::Reserve).is_empty());

    let games = catalog.books_with_subject(" games ");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, "b2");
    assert_eq!(catalog.all_subjects(), ["Games"]);
}

#[test]
fn snapshot_stays_consistent_across_actions() {
    let catalog = seeded(CacheConfig::default());
    let snapshot = catalog.snapshot();

    catalog.takeout_one("b1").expect("b1 exists");

    assert_eq!(
        snapshot.find("b1").expect("b1 in snapshot").counters,
        Counters::new(5, 3, 2)
    );
    assert_eq!(snapshot.search_title("war").len(), 2);
}
