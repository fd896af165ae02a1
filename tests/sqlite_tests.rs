// tests/sqlite_tests.rs
//
// Runs compiled fragments against an in-memory SQLite database to check that
// the generated SQL actually selects what the expression says.

use docexpr::{
    CompileOptions, Direction, Env, Fragment, Param, Selection, compile, compile_expr, parse,
};
use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

//--------------------------------------------------------------------------------------------------
// Helpers
//--------------------------------------------------------------------------------------------------

/// Fresh database with a `records` table holding `docs`, with ids 1..=n.
async fn records(docs: &[&str]) -> Pool<Sqlite> {
    // One connection, so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query("CREATE TABLE records (id INTEGER PRIMARY KEY, data TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();

    for (i, doc) in docs.iter().enumerate() {
        sqlx::query("INSERT INTO records (id, data) VALUES (?, json(?))")
            .bind(i as i64 + 1)
            .bind(*doc)
            .execute(&pool)
            .await
            .unwrap();
    }

    pool
}

/// Ids of the records selected by `SELECT ... FROM records <clause>`.
async fn select_ids(pool: &Pool<Sqlite>, clause: &Fragment) -> Vec<i64> {
    let sql = format!("SELECT records.id FROM records {}", clause.sql);
    let mut query = sqlx::query_scalar::<Sqlite, i64>(&sql);
    for param in &clause.params {
        query = match param {
            Param::Text(s) => query.bind(s.clone()),
            Param::Integer(i) => query.bind(*i),
            Param::Real(f) => query.bind(*f),
        };
    }
    query.fetch_all(pool).await.unwrap()
}

/// Ids of the records in `docs` for which `expression` holds.
async fn matching(docs: &[&str], expression: &str) -> Vec<i64> {
    let pool = records(docs).await;
    let filter = compile_expr(expression, "data").unwrap();
    let clause = Fragment {
        sql: format!("WHERE {} ORDER BY records.id", filter.sql),
        params: filter.params,
    };
    select_ids(&pool, &clause).await
}

//--------------------------------------------------------------------------------------------------
// Tests: Comparison
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_numeric_comparison() {
    let docs = [r#"{"size": 3}"#, r#"{"size": 2}"#, r#"{"size": 10}"#, r#"{}"#];
    assert_eq!(matching(&docs, "_.size >= 3").await, vec![1, 3]);
    assert_eq!(matching(&docs, "_.size < 3").await, vec![2]);
    assert_eq!(matching(&docs, "_.size != 3").await, vec![2, 3]);
}

#[tokio::test]
async fn test_float_comparison() {
    let docs = [r#"{"x": 0.25}"#, r#"{"x": 0.75}"#];
    assert_eq!(matching(&docs, "_.x < 0.5").await, vec![1]);
}

#[tokio::test]
async fn test_string_equality() {
    let docs = [r#"{"color": "red"}"#, r#"{"color": "blue"}"#];
    assert_eq!(matching(&docs, r#"_.color == "red""#).await, vec![1]);
    assert_eq!(matching(&docs, "_.color == 'blue'").await, vec![2]);
}

#[tokio::test]
async fn test_nested_property() {
    let docs = [
        r#"{"a": {"b": {"c": 1}}}"#,
        r#"{"a": {"b": {"c": 2}}}"#,
        r#"{"a": 1}"#,
    ];
    assert_eq!(matching(&docs, "_.a.b.c == 1").await, vec![1]);
}

#[tokio::test]
async fn test_row_id() {
    let docs = [r#"{}"#, r#"{}"#, r#"{}"#];
    assert_eq!(matching(&docs, "id >= 2").await, vec![2, 3]);
    assert_eq!(matching(&docs, "id == 1 || id == 3").await, vec![1, 3]);
}

#[tokio::test]
async fn test_boolean_operators() {
    let docs = [
        r#"{"a": 1, "b": 1}"#,
        r#"{"a": 1, "b": 2}"#,
        r#"{"a": 2, "b": 2}"#,
    ];
    assert_eq!(matching(&docs, "_.a == 1 && _.b == 2").await, vec![2]);
    assert_eq!(matching(&docs, "_.a == 2 || _.b == 1").await, vec![1, 3]);
}

#[tokio::test]
async fn test_prefix_operators() {
    let docs = [r#"{"a": 1, "x": 3}"#, r#"{"a": 2, "x": -3}"#];
    assert_eq!(matching(&docs, "!(_.a == 1)").await, vec![2]);
    assert_eq!(matching(&docs, "-_.x == -3").await, vec![1]);
}

//--------------------------------------------------------------------------------------------------
// Tests: Literals
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_string_literal_round_trip() {
    let value = "it's \"q\" \\ é 😀";
    let doc = serde_json::json!({ "s": value }).to_string();
    let expression = r#"_.s == "it's \"q\" \\ é 😀""#;
    assert_eq!(matching(&[doc.as_str()], expression).await, vec![1]);
}

#[tokio::test]
async fn test_large_integer_literal() {
    let docs = [r#"{"n": 9007199254740993}"#, r#"{"n": 9007199254740992}"#];
    assert_eq!(matching(&docs, "_.n == 9007199254740993").await, vec![1]);
}

#[tokio::test]
async fn test_array_literal_includes() {
    let docs = [r#"{"n": 1}"#, r#"{"n": 3}"#, r#"{"n": 2}"#];
    assert_eq!(matching(&docs, "[1, 2].includes(_.n)").await, vec![1, 3]);

    let docs = [r#"{"c": "red"}"#, r#"{"c": "green"}"#];
    assert_eq!(
        matching(&docs, r#"["red", "blue"].includes(_.c)"#).await,
        vec![1]
    );
}

//--------------------------------------------------------------------------------------------------
// Tests: Arrays
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_includes() {
    let docs = [
        r#"{"tags": ["red", "blue"]}"#,
        r#"{"tags": ["blue"]}"#,
        r#"{}"#,
    ];
    assert_eq!(matching(&docs, r#"_.tags.includes("red")"#).await, vec![1]);
}

#[tokio::test]
async fn test_some_with_method_in_predicate() {
    let docs = [r#"{"tags": ["red"]}"#, r#"{"tags": ["blue"]}"#];
    assert_eq!(
        matching(&docs, r#"_.tags.some(t => t.toUpperCase() == "RED")"#).await,
        vec![1]
    );
}

#[tokio::test]
async fn test_every_is_vacuously_true() {
    let docs = [r#"{"n": [1, 2, 3]}"#, r#"{"n": [1, 5]}"#, r#"{"n": []}"#];
    assert_eq!(matching(&docs, "_.n.every(x => x < 4)").await, vec![1, 3]);
}

#[tokio::test]
async fn test_nested_closures() {
    let docs = [
        r#"{"groups": [{"members": ["a", "b"]}, {"members": ["c"]}]}"#,
        r#"{"groups": [{"members": ["c"]}]}"#,
    ];
    assert_eq!(
        matching(&docs, r#"_.groups.some(g => g.members.includes("a"))"#).await,
        vec![1]
    );
    assert_eq!(
        matching(&docs, r#"_.groups.some(g => g.members.some(m => m == "c"))"#).await,
        vec![1, 2]
    );
    assert_eq!(
        matching(&docs, r#"_.groups.every(g => g.members.includes("c"))"#).await,
        vec![2]
    );
}

#[tokio::test]
async fn test_closure_sees_outer_document() {
    let docs = [
        r#"{"want": "b", "tags": ["a", "b"]}"#,
        r#"{"want": "z", "tags": ["a", "b"]}"#,
    ];
    assert_eq!(
        matching(&docs, "_.tags.some(t => t == _.want)").await,
        vec![1]
    );
}

#[tokio::test]
async fn test_index_access() {
    let docs = [r#"{"tags": ["red", "blue"]}"#, r#"{"tags": ["blue", "red"]}"#];
    assert_eq!(matching(&docs, r#"_.tags[0] == "red""#).await, vec![1]);
}

#[tokio::test]
async fn test_computed_key() {
    let docs = [
        r#"{"key": "bar", "foo": {"bar": "baz"}}"#,
        r#"{"key": "bar", "foo": {"bar": "box"}}"#,
        r#"{"key": "qux", "foo": {"qux": "baz"}}"#,
    ];
    assert_eq!(matching(&docs, r#"_.foo[_.key] == "baz""#).await, vec![1, 3]);
}

//--------------------------------------------------------------------------------------------------
// Tests: Length, Case, Patterns
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_length_is_polymorphic() {
    let docs = [
        r#"{"v": "abcd"}"#,
        r#"{"v": [1, 2, 3, 4]}"#,
        r#"{"v": {"length": 4}}"#,
        r#"{"v": "ab"}"#,
        r#"{}"#,
    ];
    assert_eq!(matching(&docs, "_.v.length == 4").await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_length_of_closure_element() {
    let docs = [r#"{"names": ["abc", "de"]}"#, r#"{"names": ["x"]}"#];
    assert_eq!(
        matching(&docs, "_.names.some(n => n.length == 3)").await,
        vec![1]
    );
}

#[tokio::test]
async fn test_length_of_computed_key() {
    let docs = [
        r#"{"key": "a", "foo": {"a": "xyz"}}"#,
        r#"{"key": "b", "foo": {"b": [1, 2, 3]}}"#,
        r#"{"key": "a", "foo": {"a": [1, 2]}}"#,
        r#"{"key": "b", "foo": {"a": "xyz"}}"#,
    ];
    assert_eq!(matching(&docs, "_.foo[_.key].length == 3").await, vec![1, 2]);
}

#[tokio::test]
async fn test_length_on_both_sides() {
    let docs = [
        r#"{"i": 0, "names": ["ab", "c"]}"#,
        r#"{"i": 1, "names": ["ab", "c"]}"#,
        r#"{"i": 2, "names": ["x", "y", "abc"]}"#,
    ];
    assert_eq!(
        matching(&docs, "_.names[_.i].length == _.names.length").await,
        vec![1, 3]
    );
}

#[tokio::test]
async fn test_chained_length_runs() {
    // A number has no length, so nothing matches; the query must still run.
    let docs = [r#"{"v": "abcd"}"#, r#"{"v": [1]}"#];
    let expression = format!("_.v{} == 1", ".length".repeat(8));
    assert_eq!(matching(&docs, &expression).await, Vec::<i64>::new());
    assert_eq!(matching(&docs, "_.v.length.length == 1").await, Vec::<i64>::new());
}

#[tokio::test]
async fn test_case_conversion() {
    let docs = [r#"{"name": "Alice"}"#, r#"{"name": "BOB"}"#];
    assert_eq!(matching(&docs, r#"_.name.toLowerCase() == "alice""#).await, vec![1]);
    assert_eq!(matching(&docs, r#"_.name.toUpperCase() == "BOB""#).await, vec![2]);
}

#[tokio::test]
async fn test_like_and_glob() {
    let docs = [r#"{"name": "Alice"}"#, r#"{"name": "bob"}"#];
    assert_eq!(matching(&docs, r#"like(_.name, "a%")"#).await, vec![1]);
    assert_eq!(matching(&docs, r#"glob(_.name, "A*")"#).await, vec![1]);
    assert!(matching(&docs, r#"glob(_.name, "a*")"#).await.is_empty());
}

//--------------------------------------------------------------------------------------------------
// Tests: Optimization and Selection
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_flattened_and_nested_paths_agree() {
    let docs = [
        r#"{"a": {"b": {"c": 1}}}"#,
        r#"{"a": {"b": {"c": 2}}}"#,
        r#"{"a": {"b": [1]}}"#,
    ];
    let pool = records(&docs).await;
    let env = Env::root("data", "records.id");
    let expression = "_.a.b.c == 1";

    let nested = compile(&parse(expression).unwrap(), &env).unwrap();
    let flat = compile_expr(expression, "data").unwrap();
    assert_ne!(nested.sql, flat.sql);

    let by_id = |f: Fragment| Fragment {
        sql: format!("WHERE {} ORDER BY records.id", f.sql),
        params: f.params,
    };
    assert_eq!(
        select_ids(&pool, &by_id(nested)).await,
        select_ids(&pool, &by_id(flat)).await
    );
}

#[tokio::test]
async fn test_selection_filters_and_orders() {
    let docs = [
        r#"{"name": "b", "size": 5}"#,
        r#"{"name": "a", "size": 1}"#,
        r#"{"name": "c", "size": 4}"#,
        r#"{"name": "d", "size": 9}"#,
    ];
    let pool = records(&docs).await;

    let clause = Selection::new(CompileOptions::default())
        .filter("_.size >= 4")
        .unwrap()
        .order_by("_.name", Direction::Desc)
        .unwrap()
        .build();
    assert_eq!(select_ids(&pool, &clause).await, vec![4, 3, 1]);

    let clause = Selection::new(CompileOptions::default())
        .order_by("_.size", Direction::Asc)
        .unwrap()
        .build();
    assert_eq!(select_ids(&pool, &clause).await, vec![2, 3, 1, 4]);
}
