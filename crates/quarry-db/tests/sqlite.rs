use quarry_db::{
    record, BuilderConfig, DbError, FromRow, Outcome, QueryBuilder, RowView, Shape, SqliteDriver,
    Value,
};
use tempfile::tempdir;

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
    age: Option<i64>,
}

impl FromRow for User {
    fn from_row(row: &RowView) -> quarry_db::Result<Self> {
        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
        })
    }
}

fn setup(cache_dir: &std::path::Path) -> QueryBuilder<SqliteDriver> {
    let driver = SqliteDriver::open_in_memory().unwrap();
    let mut db = QueryBuilder::new(
        driver,
        BuilderConfig::default()
            .with_prefix("app_")
            .with_cache_dir(cache_dir),
    );
    db.raw(
        "CREATE TABLE app_users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER,
            visits INTEGER NOT NULL DEFAULT 0
        )",
        &[],
    )
    .unwrap();
    db
}

#[test]
fn test_insert_and_read_back() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());

    let id = db
        .table("users")
        .insert(&record! { "name" => "ada", "age" => 36 })
        .unwrap();
    assert_eq!(id, Some(Value::Integer(1)));

    db.table("users")
        .insert_many(&[
            record! { "name" => "grace", "age" => 45 },
            record! { "name" => "o'neil", "age" => None::<i64> },
        ])
        .unwrap();
    assert_eq!(db.num_rows(), 2);

    let row = db.table("users").where_("name", "o'neil").get().unwrap().unwrap();
    assert_eq!(row.get("age"), Some(&Value::Null));

    let names = db
        .table("users")
        .select("name")
        .where_op("age", ">", 40)
        .or_where_raw("age IS NULL")
        .order_by("id")
        .get_all()
        .unwrap();
    let names: Vec<_> = names.iter().filter_map(|r| r.get("name")).cloned().collect();
    assert_eq!(names, vec![Value::from("grace"), Value::from("o'neil")]);
}

#[test]
fn test_update_increment_delete() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    for name in ["a", "b", "c"] {
        db.table("users").insert(&record! { "name" => name }).unwrap();
    }

    let affected = db
        .table("users")
        .in_("name", ["a", "b"])
        .update(&record! { "age" => 20 })
        .unwrap();
    assert_eq!(affected, 2);

    db.table("users").where_("name", "a").increment_field("visits", 3).unwrap();
    db.table("users").where_("name", "a").increment_field_with("visits", "-", 1).unwrap();
    let row = db.table("users").where_("name", "a").get().unwrap().unwrap();
    assert_eq!(row.get("visits"), Some(&Value::Integer(2)));

    let deleted = db.table("users").where_("age", 20).delete().unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(db.table("users").get_all().unwrap().len(), 1);
}

#[test]
fn test_grouped_conditions() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    db.table("users")
        .insert_many(&[
            record! { "name" => "a", "age" => 10 },
            record! { "name" => "b", "age" => 20 },
            record! { "name" => "c", "age" => 30 },
        ])
        .unwrap();

    let rows = db
        .table("users")
        .grouped(|q| {
            q.where_("name", "a").or_where("name", "c");
        })
        .where_op("age", ">", 15)
        .get_all()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("c")));
}

#[test]
fn test_typed_fetch() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    db.table("users").insert(&record! { "name" => "ada", "age" => 36 }).unwrap();
    db.table("users").insert(&record! { "name" => "bob" }).unwrap();

    let users: Vec<User> = db.table("users").order_by("id").get_all_as().unwrap();
    assert_eq!(
        users,
        vec![
            User { id: 1, name: "ada".into(), age: Some(36) },
            User { id: 2, name: "bob".into(), age: None },
        ]
    );

    let one: Option<User> = db.table("users").where_("id", 2).get_as().unwrap();
    assert_eq!(one.map(|u| u.name), Some("bob".to_string()));
}

#[test]
fn test_nested_transactions() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());

    db.transaction().unwrap();
    db.table("users").insert(&record! { "name" => "kept" }).unwrap();
    db.transaction().unwrap();
    db.table("users").insert(&record! { "name" => "dropped" }).unwrap();
    db.rollback().unwrap();
    db.commit().unwrap();
    assert_eq!(db.transaction_depth(), 0);

    let rows = db.table("users").shape(Shape::Tuple).select("name").get_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_index(0), Some(&Value::from("kept")));

    db.transaction().unwrap();
    db.table("users").insert(&record! { "name" => "gone" }).unwrap();
    db.rollback().unwrap();
    assert_eq!(db.table("users").get_all().unwrap().len(), 1);
}

#[test]
fn test_cached_read_survives_writes_until_expiry() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    db.table("users").insert(&record! { "name" => "ada" }).unwrap();

    let first = db.cache(60).unwrap().table("users").get_all().unwrap();
    db.table("users").insert(&record! { "name" => "bob" }).unwrap();
    let cached = db.cache(60).unwrap().table("users").get_all().unwrap();
    let live = db.table("users").get_all().unwrap();

    assert_eq!(first, cached);
    assert_eq!(cached.len(), 1);
    assert_eq!(live.len(), 2);
}

#[test]
fn test_raw_and_staged_statements() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());

    let outcome = db
        .raw("INSERT INTO app_users (name, age) VALUES (?, ?)", &[Value::from("ada"), Value::Integer(3)])
        .unwrap();
    assert_eq!(outcome, Outcome::Affected(1));
    assert_eq!(db.insert_id(), Some(&Value::Integer(1)));

    let row = db
        .query("SELECT name FROM app_users WHERE age = ?", &[Value::Integer(3)])
        .fetch()
        .unwrap()
        .unwrap();
    assert_eq!(row.get("name"), Some(&Value::from("ada")));

    let affected = db
        .query("UPDATE app_users SET age = ? WHERE id = ?", &[Value::Integer(4), Value::Integer(1)])
        .exec()
        .unwrap();
    assert_eq!(affected, Some(1));
    assert_eq!(db.query_count(), 4);
}

#[test]
fn test_failed_statement_reports_error() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());

    let err = db.table("ghosts").get_all().unwrap_err();
    assert!(matches!(err, DbError::Execution { .. }));
    assert!(db.last_error().unwrap().contains("no such table"));
    assert_eq!(db.last_query(), Some("SELECT * FROM `app_ghosts`"));
}

#[test]
fn test_text_whitespace_round_trips() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    let body = "a  b\n\nc\t\td";

    db.table("users").insert(&record! { "name" => body }).unwrap();
    let row = db.table("users").where_("name", body).get().unwrap().unwrap();
    assert_eq!(row.get("name"), Some(&Value::from(body)));

    db.table("users")
        .where_("id", 1)
        .update(&record! { "name" => "x   y" })
        .unwrap();
    let row = db
        .query("SELECT name FROM app_users WHERE name = ?", &[Value::from("x   y")])
        .fetch()
        .unwrap()
        .unwrap();
    assert_eq!(row.get("name"), Some(&Value::from("x   y")));
}

#[test]
fn test_delete_without_where_never_deletes_unconditionally() {
    let dir = tempdir().unwrap();
    let mut db = setup(dir.path());
    db.table("users").insert(&record! { "name" => "ada" }).unwrap();

    // SQLite has no TRUNCATE, so the substituted statement fails and the row survives.
    assert!(db.table("users").order_by("id").limit(1).delete().is_err());
    assert_eq!(db.last_query(), Some("TRUNCATE TABLE `app_users`"));
    assert_eq!(db.table("users").get_all().unwrap().len(), 1);
}
