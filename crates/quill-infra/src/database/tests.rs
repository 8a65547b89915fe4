use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use quill_core::domain::{Comment, NewPost, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostFilter, PostRepository};

use crate::database::entity::{comment, post};
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresPostRepository};

fn post_model(id: i64, published: bool) -> post::Model {
    let created = Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        author_id: 7,
        created_at: created.into(),
        published_at: published.then(|| (created + Duration::seconds(30)).into()),
    }
}

/// SQL the repository sent, with parameters inlined.
fn executed_sql(repo: PostgresPostRepository) -> Vec<String> {
    let db = Arc::try_unwrap(repo.db)
        .ok()
        .expect("connection is not shared");
    db.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.to_string()))
        .collect()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model(1, false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, i64>::find_by_id(&repo, 1).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.author_id, 7);
    assert!(!post.is_published());
}

#[tokio::test]
async fn test_create_post_returns_generated_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(42, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo
        .create(NewPost::new("Test Post", "Content", 7).unwrap())
        .await
        .unwrap();

    assert_eq!(post.id, 42);
    assert!(post.published_at.is_none());
}

#[tokio::test]
async fn test_publish_keeps_existing_timestamp() {
    let model = post_model(3, true);
    let stamped = model.published_at;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.publish(3, Utc::now() + Duration::days(1)).await.unwrap();

    assert_eq!(post.published_at, stamped.map(|t| t.with_timezone(&Utc)));
}

#[tokio::test]
async fn test_publish_draft() {
    let draft = post_model(4, false);
    let published = post::Model {
        published_at: Some(Utc::now().into()),
        ..draft.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![draft]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results(vec![vec![published]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.publish(4, Utc::now()).await.unwrap();

    assert!(post.is_published());
}

#[tokio::test]
async fn test_publish_unknown_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.publish(404, Utc::now()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_missing_comment() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result = BaseRepository::<Comment, i64>::delete(&repo, 9).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_comments_by_post() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            comment::Model {
                id: 1,
                post_id: 5,
                author: "ann".to_owned(),
                content: "first".to_owned(),
                created_at: now.into(),
            },
            comment::Model {
                id: 2,
                post_id: 5,
                author: "bob".to_owned(),
                content: "second".to_owned(),
                created_at: (now + Duration::seconds(1)).into(),
            },
        ]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.find_by_post_id(5).await.unwrap();

    let authors: Vec<&str> = comments.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, vec!["ann", "bob"]);
    assert_eq!(comments[0].created_at, now);
}

#[tokio::test]
async fn test_list_published_skips_drafts_newest_first() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(2, true), post_model(1, true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list_published().await.unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);

    let sql = executed_sql(repo);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].contains(r#"WHERE "posts"."published_at" IS NOT NULL"#), "{}", sql[0]);
    assert!(
        sql[0].ends_with(r#"ORDER BY "posts"."created_at" DESC, "posts"."id" DESC"#),
        "{}",
        sql[0]
    );
}

#[tokio::test]
async fn test_list_drafts_matching_search() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(5, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let filter = PostFilter {
        published: Some(false),
        search: Some("rust".to_owned()),
    };
    let posts = repo.list(&filter).await.unwrap();
    assert_eq!(posts.len(), 1);

    let sql = executed_sql(repo);
    assert!(sql[0].contains(r#""posts"."published_at" IS NULL AND"#), "{}", sql[0]);
    assert!(
        sql[0].contains(r#"("posts"."title" LIKE '%rust%' OR "posts"."content" LIKE '%rust%')"#),
        "{}",
        sql[0]
    );
    assert!(sql[0].contains(r#"ORDER BY "posts"."created_at" DESC, "posts"."id" DESC"#));
}

#[tokio::test]
async fn test_list_without_filter_has_no_where_clause() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(2, false), post_model(1, true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list(&PostFilter::default()).await.unwrap();
    assert_eq!(posts.len(), 2);

    let sql = executed_sql(repo);
    assert!(!sql[0].contains("WHERE"), "{}", sql[0]);
}

#[tokio::test]
async fn test_connection_failure_is_connection_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![sea_orm::DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "pool closed".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.list_published().await;

    assert!(matches!(result, Err(RepoError::Connection(_))));
}

#[tokio::test]
async fn test_repositories_share_one_connection() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(1, true)]])
            .append_query_results(vec![Vec::<comment::Model>::new()])
            .into_connection(),
    );

    let posts = PostgresPostRepository::new(Arc::clone(&db));
    let comments = PostgresCommentRepository::new(Arc::clone(&db));

    assert_eq!(posts.list_published().await.unwrap().len(), 1);
    assert!(comments.find_by_post_id(1).await.unwrap().is_empty());
    assert_eq!(Arc::strong_count(&db), 3);
}
