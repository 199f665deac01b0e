use super::*;

#[tokio::test]
async fn bare_path_opens_database_in_new_directory() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("todos.db");

    let ctx = open_context(db_path.to_string_lossy().as_ref())
        .await
        .expect("open");
    let created = server_api::create_todo(&ctx, CreateTodoRequest::new("A"))
        .await
        .expect("create");
    assert_eq!(created.position, 0);
    assert!(db_path.is_file(), "missing {}", db_path.display());
}

#[tokio::test]
async fn reorder_ids_from_cli_are_applied_in_order() {
    let ctx = open_context("sqlite::memory:").await.expect("open");
    let mut ids = Vec::new();
    for content in ["A", "B"] {
        let todo = server_api::create_todo(&ctx, CreateTodoRequest::new(content))
            .await
            .expect("create");
        ids.push(todo.id.0);
    }

    let args = ["todo-tools", "--database-url", "sqlite::memory:", "reorder"]
        .into_iter()
        .map(String::from)
        .chain([ids[1], ids[0]].iter().map(i64::to_string));
    let cli = Cli::try_parse_from(args).expect("parse");
    let Command::Reorder { ids: parsed } = cli.command else {
        panic!("expected reorder command");
    };
    let response = server_api::reorder_todos(
        &ctx,
        ReorderRequest {
            ordered_ids: parsed.into_iter().map(TodoId).collect(),
        },
    )
    .await
    .expect("reorder");
    assert_eq!(response.reordered, 2);

    let listed = server_api::list_todos(&ctx).await.expect("list");
    assert_eq!(
        listed.iter().map(|todo| todo.content.as_str()).collect::<Vec<_>>(),
        vec!["B", "A"]
    );
}
