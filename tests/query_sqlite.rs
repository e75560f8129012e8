use docq::{
    count, count_table, parse_filters, query, query_limit, query_table, FilterClause, FilterValue,
    FromRow, Model, Operator, Pagination, QueryError, Record,
};
use rusqlite::{Connection, Row};
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: i64,
    name: String,
    age: Option<i64>,
}

impl FromRow for Person {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Person {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
        })
    }
}

impl Model for Person {
    const TABLE: &'static str = "people";
}

fn fixture() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER,
            city TEXT,
            joined TEXT NOT NULL
        );
        INSERT INTO people VALUES
            (1, 'Ada', 25, 'London', '2022-11-05 00:00:00'),
            (2, 'Ben', 30, 'Paris', '2023-01-01 00:00:00'),
            (3, 'Cy', 35, NULL, '2023-01-15 00:00:00'),
            (4, 'Dee', 40, 'Berlin', '2023-02-01 00:00:00'),
            (5, 'Eve', 30, 'London', '2023-03-10 00:00:00'),
            (6, 'Fay', NULL, 'Paris', '2023-04-01 00:00:00'),
            (7, 'Gus', 28, 'Berlin', '2022-12-31 00:00:00'),
            (8, 'Hal', 45, 'London', '2023-05-20 00:00:00'),
            (9, 'Ivy', 22, NULL, '2023-06-01 00:00:00'),
            (10, 'Jon', 33, 'Paris', '2023-07-04 00:00:00');",
    )
    .unwrap();
    conn
}

fn by_id() -> Pagination {
    Pagination::default().sorted_by("id", "ASC")
}

fn ids(conn: &Connection, clauses: &[FilterClause], pagination: &Pagination) -> Vec<i64> {
    query::<Person>(conn, Some(clauses), Some(pagination))
        .unwrap()
        .fetch()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect()
}

fn matching(field: &str, op: Operator, value: FilterValue) -> Vec<i64> {
    let conn = fixture();
    ids(&conn, &[FilterClause::new().with(field, op, value)], &by_id())
}

#[test_case(Operator::Eq, 30 => vec![2, 5]; "equals")]
#[test_case(Operator::Ne, 30 => vec![1, 3, 4, 7, 8, 9, 10]; "not equals")]
#[test_case(Operator::Gt, 30 => vec![3, 4, 8, 10]; "greater than")]
#[test_case(Operator::Gte, 30 => vec![2, 3, 4, 5, 8, 10]; "greater than or equal")]
#[test_case(Operator::Lt, 30 => vec![1, 7, 9]; "less than")]
#[test_case(Operator::Lte, 30 => vec![1, 2, 5, 7, 9]; "less than or equal")]
fn age_comparison(op: Operator, age: i64) -> Vec<i64> {
    matching("age", op, age.into())
}

#[test_case(Operator::In => vec![1, 4]; "in set")]
#[test_case(Operator::Nin => vec![2, 3, 5, 7, 8, 9, 10]; "not in set")]
fn age_membership(op: Operator) -> Vec<i64> {
    matching("age", op, FilterValue::list([25, 40]))
}

#[test]
fn gte_includes_boundary_once() {
    let found = matching("age", Operator::Gte, 30.into());
    assert_eq!(found.iter().filter(|id| **id == 2).count(), 1);
    assert_eq!(found.iter().filter(|id| **id == 5).count(), 1);
}

#[test]
fn equals_null_matches_null_rows() {
    assert_eq!(matching("city", Operator::Eq, FilterValue::null()), vec![3, 9]);
}

#[test]
fn not_equals_null_matches_non_null_rows() {
    assert_eq!(
        matching("city", Operator::Ne, FilterValue::null()),
        vec![1, 2, 4, 5, 6, 7, 8, 10]
    );
}

#[test]
fn text_equality() {
    assert_eq!(matching("city", Operator::Eq, "London".into()), vec![1, 5, 8]);
}

#[test]
fn date_comparison() {
    assert_eq!(
        matching("joined", Operator::Lt, FilterValue::date("2023-01-01")),
        vec![1, 7]
    );
    assert_eq!(
        matching("joined", Operator::Gte, FilterValue::date("2023-01-01")),
        vec![2, 3, 4, 5, 6, 8, 9, 10]
    );
}

#[test]
fn date_membership() {
    assert_eq!(
        matching(
            "joined",
            Operator::In,
            FilterValue::dates(["2023-01-01", "2023-02-01"])
        ),
        vec![2, 4]
    );
}

#[test]
fn malformed_date_fails_before_execution() {
    let conn = fixture();
    let clauses = [FilterClause::new().with("joined", Operator::Gt, FilterValue::date("yesterday"))];
    let err = query::<Person>(&conn, Some(&clauses[..]), None).err().unwrap();
    assert!(matches!(err, QueryError::InvalidDate { .. }));
}

#[test]
fn clauses_are_all_applied() {
    let conn = fixture();
    let clauses = parse_filters(r#"[{"age": {"$gte": 30}}, {"city": {"$eq": "London"}}]"#).unwrap();
    assert_eq!(ids(&conn, &clauses, &by_id()), vec![5, 8]);
}

#[test]
fn operators_on_one_field_combine() {
    let conn = fixture();
    let clauses = parse_filters(r#"[{"age": {"$gt": 25, "$lt": 40}}]"#).unwrap();
    assert_eq!(ids(&conn, &clauses, &by_id()), vec![2, 3, 5, 7, 10]);
}

#[test]
fn sort_descending() {
    let conn = fixture();
    let pagination = Pagination {
        sort: vec![vec![
            ("age".to_string(), "DESC".to_string()),
            ("id".to_string(), "asc".to_string()),
        ]],
        ..Pagination::default()
    };
    assert_eq!(ids(&conn, &[], &pagination), vec![8, 4, 3, 10, 2, 5, 7, 1, 9, 6]);
}

#[test]
fn invalid_sort_direction_fails() {
    let conn = fixture();
    let pagination = Pagination::default().sorted_by("age", "UP");
    let err = query::<Person>(&conn, None, Some(&pagination)).err().unwrap();
    assert!(matches!(err, QueryError::UnsupportedOrdering(ref t) if t == "UP"));
}

#[test]
fn offset_and_limit_window() {
    let conn = fixture();
    let pagination = Pagination { offset: 2, limit: 3, ..by_id() };
    assert_eq!(ids(&conn, &[], &pagination), vec![3, 4, 5]);
}

#[test]
fn zero_bounds_return_everything() {
    let conn = fixture();
    let pagination = Pagination { offset: 0, limit: 0, ..by_id() };
    assert_eq!(ids(&conn, &[], &pagination), (1..=10).collect::<Vec<_>>());
}

#[test]
fn offset_without_limit() {
    let conn = fixture();
    let pagination = Pagination { offset: 7, ..by_id() };
    assert_eq!(ids(&conn, &[], &pagination), vec![8, 9, 10]);
}

#[test]
fn query_limit_on_existing_query() {
    let conn = fixture();
    let base = query::<Person>(&conn, None, Some(&by_id())).unwrap();
    let people = query_limit(base, Some(&Pagination::new(0, 2))).fetch().unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Ben"]);
    assert_eq!(people[0].age, Some(25));
}

#[test]
fn count_all_rows() {
    let conn = fixture();
    assert_eq!(count::<Person>(&conn, None).unwrap().count, 10);
}

#[test]
fn count_with_filters() {
    let conn = fixture();
    let clauses = [FilterClause::new().with("age", Operator::Gte, 30)];
    assert_eq!(count::<Person>(&conn, Some(&clauses[..])).unwrap().count, 6);
}

#[test]
fn count_without_matches_is_zero() {
    let conn = fixture();
    let clauses = [FilterClause::new().with("age", Operator::Gt, 100)];
    let result = count_table(&conn, "people", Some(&clauses[..])).unwrap();
    assert_eq!(result.count, 0);
    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"count":0}"#);
}

#[test]
fn count_respects_bounds_on_query() {
    let conn = fixture();
    let query = query::<Person>(&conn, None, Some(&Pagination::new(8, 5))).unwrap();
    assert_eq!(query.count().unwrap(), 2);
}

#[test]
fn repeated_queries_are_identical() {
    let conn = fixture();
    let clauses = parse_filters(r#"[{"city": {"$in": ["London", "Paris"]}}]"#).unwrap();
    let pagination = Pagination::default().sorted_by("age", "desc");
    let first = query::<Person>(&conn, Some(&clauses[..]), Some(&pagination)).unwrap();
    let second = query::<Person>(&conn, Some(&clauses[..]), Some(&pagination)).unwrap();
    assert_eq!(first.to_sql(), second.to_sql());
    assert_eq!(first.fetch().unwrap(), second.fetch().unwrap());
}

#[test]
fn unknown_column_surfaces_engine_error() {
    let conn = fixture();
    let clauses = [FilterClause::new().with("nope", Operator::Eq, 1)];
    let query = query::<Person>(&conn, Some(&clauses[..]), None).unwrap();
    let err = query.fetch().unwrap_err();
    assert!(matches!(err, QueryError::Sqlite(_)));
    assert!(err.to_string().contains("no such column"));
}

#[test]
fn untyped_records() {
    let conn = fixture();
    let clauses = [FilterClause::new().with("name", Operator::Eq, "Fay")];
    let records: Vec<Record> = query_table(&conn, "people", Some(&clauses[..]), None)
        .unwrap()
        .fetch()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("age"), Some(&serde_json::Value::Null));
    assert_eq!(
        serde_json::to_string(&records[0]).unwrap(),
        r#"{"id":6,"name":"Fay","age":null,"city":"Paris","joined":"2023-04-01 00:00:00"}"#
    );
}

fn events() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE events (id INTEGER PRIMARY KEY, day DATE, stamp TEXT);
        INSERT INTO events VALUES
            (1, '2022-12-31', '2022-12-31T00:00:00'),
            (2, '2023-01-01', '2023-01-01T00:00:00'),
            (3, '2023-01-02', '2023-01-02T00:00:00');",
    )
    .unwrap();
    conn
}

fn event_ids(field: &str, op: Operator, value: FilterValue) -> Vec<i64> {
    let conn = events();
    let clauses = [FilterClause::new().with(field, op, value)];
    query_table::<Record>(&conn, "events", Some(&clauses[..]), Some(&by_id()))
        .unwrap()
        .fetch()
        .unwrap()
        .iter()
        .filter_map(|r| r.get("id").and_then(serde_json::Value::as_i64))
        .collect()
}

#[test_case("day", Operator::Eq, "2023-01-01" => vec![2]; "date only equals")]
#[test_case("day", Operator::Gte, "2023-01-01" => vec![2, 3]; "date only gte")]
#[test_case("day", Operator::Lt, "2023-01-01" => vec![1]; "date only lt")]
#[test_case("day", Operator::Lte, "2023-01-01" => vec![1, 2]; "date only lte")]
#[test_case("stamp", Operator::Eq, "2023-01-01" => vec![2]; "iso stamp equals")]
#[test_case("stamp", Operator::Lte, "2023-01-01T00:00:00" => vec![1, 2]; "iso stamp lte")]
#[test_case("stamp", Operator::Gt, "2023-01-01 00:00:00" => vec![3]; "iso stamp gt")]
fn dates_compare_across_storage_formats(field: &str, op: Operator, date: &str) -> Vec<i64> {
    event_ids(field, op, FilterValue::date(date))
}

#[test]
fn date_membership_across_storage_formats() {
    let dates = || FilterValue::dates(["2023-01-01", "2023-01-02T00:00:00"]);
    assert_eq!(event_ids("day", Operator::In, dates()), vec![2, 3]);
    assert_eq!(event_ids("stamp", Operator::Nin, dates()), vec![1]);
}
