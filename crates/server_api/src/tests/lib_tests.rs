use super::*;

async fn setup(contents: &[&str]) -> (ApiContext, Vec<TodoId>) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ctx = ApiContext { storage };
    let mut ids = Vec::new();
    for content in contents {
        let todo = create_todo(&ctx, CreateTodoRequest::new(*content))
            .await
            .expect("create");
        ids.push(todo.id);
    }
    (ctx, ids)
}

#[tokio::test]
async fn create_trims_content_and_rejects_blank() {
    let (ctx, _) = setup(&[]).await;

    let created = create_todo(&ctx, CreateTodoRequest::new("  buy milk  "))
        .await
        .expect("create");
    assert_eq!(created.content, "buy milk");
    assert_eq!(created.position, 0);

    let err = create_todo(&ctx, CreateTodoRequest::new("   "))
        .await
        .expect_err("blank content");
    assert_eq!(err.code, ErrorCode::Validation);

    let err = create_todo(&ctx, CreateTodoRequest::default())
        .await
        .expect_err("missing content");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn create_rejects_overlong_content() {
    let (ctx, _) = setup(&[]).await;
    let err = create_todo(&ctx, CreateTodoRequest::new("x".repeat(MAX_CONTENT_CHARS + 1)))
        .await
        .expect_err("too long");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.contains("exceeds"));
}

#[tokio::test]
async fn create_parses_naive_due_date_as_utc() {
    let (ctx, _) = setup(&[]).await;
    let created = create_todo(
        &ctx,
        CreateTodoRequest {
            content: Some("file taxes".into()),
            due_date: Some("2030-04-15T09:30:00".into()),
            priority: Some(2),
        },
    )
    .await
    .expect("create");
    assert_eq!(
        created.due_date,
        Some(
            "2030-04-15T09:30:00Z"
                .parse::<DateTime<Utc>>()
                .expect("timestamp")
        )
    );
    assert_eq!(created.priority, 2);
}

#[test]
fn parse_due_date_accepts_supported_shapes() {
    let expected = "2030-04-15T00:00:00Z"
        .parse::<DateTime<Utc>>()
        .expect("timestamp");
    assert_eq!(parse_due_date("2030-04-15").expect("date"), expected);
    assert_eq!(
        parse_due_date("2030-04-15T02:00:00+02:00").expect("rfc3339"),
        expected
    );
    assert_eq!(
        parse_due_date("2030-04-15 00:00:00").expect("space separated"),
        expected
    );
    let err = parse_due_date("next tuesday").expect_err("garbage");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn update_unknown_todo_is_not_found() {
    let (ctx, _) = setup(&[]).await;
    let err = update_todo(&ctx, TodoId(77), UpdateTodoRequest::completed(true))
        .await
        .expect_err("unknown");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn update_rejects_blank_content_and_keeps_position_on_toggle() {
    let (ctx, ids) = setup(&["a", "b"]).await;

    let err = update_todo(
        &ctx,
        ids[0],
        UpdateTodoRequest {
            content: Some("  ".into()),
            ..UpdateTodoRequest::default()
        },
    )
    .await
    .expect_err("blank");
    assert_eq!(err.code, ErrorCode::Validation);

    let toggled = update_todo(&ctx, ids[1], UpdateTodoRequest::completed(true))
        .await
        .expect("toggle");
    assert!(toggled.is_completed);
    assert_eq!(toggled.position, 1);
}

#[tokio::test]
async fn reorder_round_trip_matches_submitted_order() {
    let (ctx, ids) = setup(&["A", "B", "C"]).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    let response = reorder_todos(
        &ctx,
        ReorderRequest {
            ordered_ids: vec![a, c, b],
        },
    )
    .await
    .expect("reorder");
    assert_eq!(response.reordered, 3);

    let listed: Vec<(TodoId, i64)> = list_todos(&ctx)
        .await
        .expect("list")
        .into_iter()
        .map(|todo| (todo.id, todo.position))
        .collect();
    assert_eq!(listed, vec![(a, 0), (c, 1), (b, 2)]);
}

#[tokio::test]
async fn reorder_reports_missing_ids() {
    let (ctx, ids) = setup(&["A", "B"]).await;
    let err = reorder_todos(
        &ctx,
        ReorderRequest {
            ordered_ids: vec![ids[1], TodoId(999), ids[0]],
        },
    )
    .await
    .expect_err("missing id");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.missing_ids(), vec![TodoId(999)]);

    let positions: Vec<i64> = list_todos(&ctx)
        .await
        .expect("list")
        .into_iter()
        .map(|todo| todo.position)
        .collect();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn reorder_with_repeated_id_is_not_found() {
    let (ctx, ids) = setup(&["A", "B"]).await;
    let err = reorder_todos(
        &ctx,
        ReorderRequest {
            ordered_ids: vec![ids[0], ids[1], ids[0]],
        },
    )
    .await
    .expect_err("duplicates");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(
        err.details,
        Some(serde_json::json!({ "duplicate_ids": [ids[0]] }))
    );

    let listed = list_todos(&ctx).await.expect("list");
    assert_eq!(
        listed.iter().map(|todo| todo.position).collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let (ctx, ids) = setup(&["A"]).await;
    delete_todo(&ctx, ids[0]).await.expect("delete");
    let err = delete_todo(&ctx, ids[0]).await.expect_err("gone");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn empty_update_returns_stored_todo_untouched() {
    let (ctx, ids) = setup(&["A", "B"]).await;
    let before = list_todos(&ctx).await.expect("list");

    let todo = update_todo(&ctx, ids[1], UpdateTodoRequest::default())
        .await
        .expect("empty update");
    assert_eq!(todo, before[1]);
    assert_eq!(list_todos(&ctx).await.expect("list"), before);

    let err = update_todo(&ctx, TodoId(404), UpdateTodoRequest::default())
        .await
        .expect_err("unknown");
    assert_eq!(err.code, ErrorCode::NotFound);
}
