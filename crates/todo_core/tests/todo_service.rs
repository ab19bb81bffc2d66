use std::collections::HashSet;
use todo_core::db::open_db_in_memory;
use todo_core::model::todo::now_millis;
use todo_core::{
    NewTodo, SqliteTodoRepository, TodoListQuery, TodoRepository, TodoSaveRequest, TodoService,
    TodoServiceError, TodoStatus,
};

#[test]
fn upsert_without_id_creates_in_progress_item() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.upsert(&TodoSaveRequest::create("buy milk")).unwrap();
    assert_eq!(created.text, "buy milk");
    assert_eq!(created.completed_at, None);

    let second = service.upsert(&TodoSaveRequest::create("buy bread")).unwrap();
    assert_ne!(second.id, created.id);
}

#[test]
fn upsert_with_id_replaces_text_and_keeps_completion() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.upsert(&TodoSaveRequest::create("draft")).unwrap();
    let completed = service.complete(created.id).unwrap();

    let updated = service
        .upsert(&TodoSaveRequest::update(created.id, "final"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.text, "final");
    assert_eq!(updated.completed_at, completed.completed_at);

    let loaded = service.get_one(created.id).unwrap();
    assert_eq!(loaded, updated);
}

#[test]
fn upsert_with_unknown_id_fails_and_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let err = service
        .upsert(&TodoSaveRequest::update(404, "ghost"))
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::TodoNotFound(404)));
    assert!(service.get_all(None).unwrap().is_empty());
}

#[test]
fn upsert_rejects_blank_text() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let err = service.upsert(&TodoSaveRequest::create("   ")).unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));
    assert!(service.get_all(None).unwrap().is_empty());
}

#[test]
fn complete_sets_timestamp_not_earlier_than_invocation() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.upsert(&TodoSaveRequest::create("ship it")).unwrap();

    let invoked_at = now_millis();
    let completed = service.complete(created.id).unwrap();

    let loaded = service.get_one(created.id).unwrap();
    let completed_at = loaded.completed_at.expect("completed_at should be set");
    assert!(completed_at >= invoked_at);
    assert_eq!(completed.completed_at, Some(completed_at));
}

#[test]
fn complete_twice_keeps_item_completed() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.upsert(&TodoSaveRequest::create("again")).unwrap();

    let first = service.complete(created.id).unwrap();
    let second = service.complete(created.id).unwrap();

    assert!(second.completed_at.unwrap() >= first.completed_at.unwrap());
}

#[test]
fn cancel_clears_timestamp_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.upsert(&TodoSaveRequest::create("undo me")).unwrap();
    service.complete(created.id).unwrap();

    let cancelled = service.cancel(created.id).unwrap();
    assert_eq!(cancelled.completed_at, None);
    assert_eq!(service.get_one(created.id).unwrap().completed_at, None);

    let again = service.cancel(created.id).unwrap();
    assert_eq!(again.completed_at, None);
}

#[test]
fn operations_on_missing_item_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    assert!(matches!(service.get_one(7), Err(TodoServiceError::TodoNotFound(7))));
    assert!(matches!(service.complete(7), Err(TodoServiceError::TodoNotFound(7))));
    assert!(matches!(service.cancel(7), Err(TodoServiceError::TodoNotFound(7))));
}

#[test]
fn delete_one_succeeds_for_missing_item() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.delete_one(12345).unwrap();
}

#[test]
fn delete_all_empties_the_store() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    service.upsert(&TodoSaveRequest::create("one")).unwrap();
    let two = service.upsert(&TodoSaveRequest::create("two")).unwrap();
    service.complete(two.id).unwrap();

    service.delete_all().unwrap();

    assert!(service.get_all(None).unwrap().is_empty());
}

#[test]
fn get_all_filters_partition_seeded_items() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let done = NewTodo::new("done");
    let done_at = done.created_at;
    repo.insert_todo(&done.completed(done_at)).unwrap();
    repo.insert_todo(&NewTodo::new("open")).unwrap();
    repo.insert_todo(&NewTodo::new("also open")).unwrap();
    let service = TodoService::new(repo);

    let all: HashSet<_> = service
        .get_all(None)
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    let completed = service.get_all(Some(TodoStatus::Completed)).unwrap();
    let in_progress = service.get_all(Some(TodoStatus::InProgress)).unwrap();

    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].text, "done");
    assert!(completed[0].completed_at.is_some());
    assert_eq!(in_progress.len(), 2);
    assert!(in_progress.iter().all(|todo| todo.completed_at.is_none()));

    let combined: HashSet<_> = completed
        .iter()
        .chain(in_progress.iter())
        .map(|todo| todo.id)
        .collect();
    assert_eq!(combined, all);
}

#[test]
fn buy_milk_lifecycle_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.upsert(&TodoSaveRequest::create("buy milk")).unwrap();
    assert_eq!(created.completed_at, None);

    let completed = service.complete(created.id).unwrap();
    assert!(completed.completed_at.is_some());
    let listed = service.get_all(Some(TodoStatus::Completed)).unwrap();
    assert_eq!(listed, vec![completed]);

    let cancelled = service.cancel(created.id).unwrap();
    assert_eq!(cancelled.completed_at, None);
    let listed = service.get_all(Some(TodoStatus::InProgress)).unwrap();
    assert_eq!(listed, vec![cancelled]);

    service.delete_one(created.id).unwrap();
    assert!(matches!(
        service.get_one(created.id),
        Err(TodoServiceError::TodoNotFound(id)) if id == created.id
    ));
}

#[test]
fn service_leaves_other_rows_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let keep = repo.insert_todo(&NewTodo::new("keep")).unwrap();
    let service = TodoService::new(repo);

    let other = service.upsert(&TodoSaveRequest::create("other")).unwrap();
    service.complete(other.id).unwrap();
    service.delete_one(other.id).unwrap();

    let reader = SqliteTodoRepository::try_new(&conn).unwrap();
    let remaining = reader.list_todos(&TodoListQuery::default()).unwrap();
    assert_eq!(remaining, vec![keep]);
}
