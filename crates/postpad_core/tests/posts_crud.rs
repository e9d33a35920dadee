use postpad_core::db::open_db_in_memory;
use postpad_core::{
    PostDraft, PostRepository, PostService, PostServiceError, PostUpdate, SqlitePostRepository,
};

fn draft(title: &str, content: &str, tags: &[&str]) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let created = service
        .create(&draft("First post", "hello world", &[]))
        .unwrap();
    assert!(created.id > 0);
    assert!(created.tags.is_empty());

    let loaded = service.get(created.id).unwrap();
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.title, "First post");
    assert_eq!(loaded.content, "hello world");
    assert!(loaded.tags.is_empty());
}

#[test]
fn post_ids_are_monotonic() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let first = service.create(&draft("a", "a", &[])).unwrap();
    let second = service.create(&draft("b", "b", &[])).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn get_missing_post_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let repo = SqlitePostRepository::new(&mut conn);
        assert!(repo.get_post(99999, true).unwrap().is_none());
    }

    let service = PostService::new(SqlitePostRepository::new(&mut conn));
    let err = service.get(99999).unwrap_err();
    assert!(matches!(err, PostServiceError::PostNotFound(99999)));
}

#[test]
fn non_positive_ids_are_rejected_before_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    assert!(matches!(
        service.get(0).unwrap_err(),
        PostServiceError::InvalidId(0)
    ));
    assert!(matches!(
        service.delete_by_id(-1).unwrap_err(),
        PostServiceError::InvalidId(-1)
    ));
    let err = service
        .update_by_id(&PostUpdate {
            id: 0,
            title: "t".to_string(),
            content: "c".to_string(),
            tags: vec![],
        })
        .unwrap_err();
    assert!(matches!(err, PostServiceError::InvalidId(0)));
}

#[test]
fn get_all_on_empty_store_returns_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&mut conn));

    let posts = service.get_all().unwrap();
    assert!(posts.is_empty());
}

#[test]
fn get_all_lists_posts_in_id_order_with_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let first = service.create(&draft("one", "1", &["alpha"])).unwrap();
    let second = service.create(&draft("two", "2", &[])).unwrap();

    let posts = service.get_all().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, first.id);
    assert_eq!(posts[0].tags, vec!["Alpha".to_string()]);
    assert_eq!(posts[1].id, second.id);
    assert!(posts[1].tags.is_empty());
}

#[test]
fn shallow_get_skips_tag_assembly() {
    let mut conn = open_db_in_memory().unwrap();

    let id = {
        let mut service = PostService::new(SqlitePostRepository::new(&mut conn));
        service.create(&draft("tagged", "body", &["alpha"])).unwrap().id
    };

    let repo = SqlitePostRepository::new(&mut conn);
    let shallow = repo.get_post(id, false).unwrap().unwrap();
    assert!(shallow.tags.is_empty());

    let full = repo.get_post(id, true).unwrap().unwrap();
    assert_eq!(full.tags, vec!["Alpha".to_string()]);
}

#[test]
fn update_replaces_title_and_content() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let created = service.create(&draft("draft", "old body", &[])).unwrap();
    let updated = service
        .update_by_id(&PostUpdate {
            id: created.id,
            title: "final".to_string(),
            content: "new body".to_string(),
            tags: vec![],
        })
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "final");
    assert_eq!(updated.content, "new body");
}

#[test]
fn update_missing_post_returns_not_found_and_mutates_nothing() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let mut service = PostService::new(SqlitePostRepository::new(&mut conn));
        let err = service
            .update_by_id(&PostUpdate {
                id: 99999,
                title: "ghost".to_string(),
                content: "ghost".to_string(),
                tags: vec!["ghost".to_string()],
            })
            .unwrap_err();
        assert!(matches!(err, PostServiceError::PostNotFound(99999)));
    }

    let posts: i64 = conn
        .query_row("SELECT COUNT(*) FROM post;", [], |row| row.get(0))
        .unwrap();
    let tags: i64 = conn
        .query_row("SELECT COUNT(*) FROM tag;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(posts, 0);
    assert_eq!(tags, 0);
}

#[test]
fn delete_removes_post() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let created = service.create(&draft("temp", "body", &[])).unwrap();
    service.delete_by_id(created.id).unwrap();

    let err = service.get(created.id).unwrap_err();
    assert!(matches!(err, PostServiceError::PostNotFound(_)));
}

#[test]
fn delete_missing_post_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let err = service.delete_by_id(99999).unwrap_err();
    assert!(matches!(err, PostServiceError::PostNotFound(99999)));
}

#[test]
fn post_detail_serializes_empty_tags_as_empty_array() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = PostService::new(SqlitePostRepository::new(&mut conn));

    let created = service.create(&draft("bare", "body", &[])).unwrap();
    let loaded = service.get(created.id).unwrap();

    let json = serde_json::to_value(&loaded).unwrap();
    assert_eq!(json["tags"], serde_json::json!([]));
}
