//! Tests for statements rendered by the MySQL grammar: clause ordering,
//! condition shapes, joins, inserts with conflict handling, updates and
//! deletes.

mod common;
use common::*;

use sqlgram_core::query::{Direction, Operand};
use sqlgram_core::{Error, Row, SqlValue};

#[test]
fn select_with_where_pair() {
    let (sql, params) = build(&mysql("users").where_(("name", "John")).select("email"));
    assert_eq!(sql, "SELECT email FROM users WHERE name=?");
    assert_eq!(params, vec![text("John")]);
}

#[test]
fn group_by_and_having() {
    let (sql, params) = build(
        &mysql("users")
            .group_by(&["registered", "created"])
            .having(("id", ">=", 5)),
    );
    assert_eq!(
        sql,
        "SELECT * FROM users GROUP BY registered, created HAVING id>=?"
    );
    assert_eq!(params, vec![int(5)]);
}

#[test]
fn full_clause_order() {
    let (sql, params) = build(
        &mysql("users")
            .distinct()
            .select("users.id")
            .select_as("COUNT(posts.id)", "total")
            .left_join("posts", "posts.user_id", "=", "users.id")
            .where_(("users.active", true))
            .group_by(&["users.id"])
            .having(("total", ">", 3))
            .order_by("total", Direction::Desc)
            .limit(10)
            .offset(20),
    );
    assert_eq!(
        sql,
        "SELECT DISTINCT users.id, COUNT(posts.id) AS total FROM users \
         LEFT JOIN posts ON posts.user_id = users.id \
         WHERE users.active=? GROUP BY users.id HAVING total>? \
         ORDER BY total DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(params, vec![int(1), int(3)]);
}

#[test]
fn raw_condition_has_no_placeholder() {
    let (sql, params) = build(&mysql("scores").where_("score > bonus").where_(("id", 7)));
    assert_eq!(sql, "SELECT * FROM scores WHERE score > bonus AND id=?");
    assert_eq!(params, vec![int(7)]);
}

#[test]
fn null_pair_uses_null_safe_operator() {
    let (sql, params) = build(&mysql("users").where_(("deleted", SqlValue::Null)));
    assert_eq!(sql, "SELECT * FROM users WHERE deleted<=>?");
    assert_eq!(params, vec![SqlValue::Null]);
}

#[test]
fn word_operators_are_spaced() {
    let (sql, _) = build(
        &mysql("users")
            .where_(("name", "LIKE", "J%"))
            .where_null("deleted")
            .where_not_null("verified"),
    );
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE name LIKE ? AND deleted IS NULL AND verified IS NOT NULL"
    );
}

#[test]
fn or_group_is_parenthesized() {
    let (sql, params) = build(
        &mysql("users")
            .where_(("active", 1))
            .where_(vec![("role", "admin"), ("role", "owner")])
            .or_where(("id", 1)),
    );
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE active=? AND (role=? OR role=?) OR id=?"
    );
    assert_eq!(params, vec![int(1), text("admin"), text("owner"), int(1)]);
}

#[test]
fn where_in_and_between() {
    let (sql, params) = build(
        &mysql("orders")
            .where_in("status", ["paid", "shipped"])
            .where_not_in("id", Vec::<i64>::new())
            .where_between("total", 10, 20),
    );
    assert_eq!(
        sql,
        "SELECT * FROM orders WHERE status IN (?, ?) AND id NOT IN (NULL) \
         AND total BETWEEN 10 AND 20"
    );
    assert_eq!(params, vec![text("paid"), text("shipped")]);
}

#[test]
fn raw_operand_compares_columns() {
    let (sql, params) = build(&mysql("a").where_(("a.x", "=", Operand::raw("a.y"))));
    assert_eq!(sql, "SELECT * FROM a WHERE a.x=a.y");
    assert!(params.is_empty());
}

#[test]
fn placeholders_follow_textual_order() {
    let builder = mysql("t")
        .where_(("a", 1))
        .where_(("b", "<", 2))
        .where_(("c", "!=", "x"))
        .where_between("d", 1, 9);
    let (sql, params) = build(&builder);
    assert_eq!(count_placeholders(&sql), params.len());
    assert_eq!(params, vec![int(1), int(2), text("x")]);
}

#[test]
fn cross_join() {
    let (sql, _) = build(&mysql("sizes").cross_join("colors"));
    assert_eq!(sql, "SELECT * FROM sizes CROSS JOIN colors");
}

#[test]
fn offset_without_limit() {
    let (sql, _) = build(&mysql("users").offset(5));
    assert_eq!(sql, "SELECT * FROM users LIMIT 18446744073709551615 OFFSET 5");
}

#[test]
fn multi_row_insert_binds_in_first_row_order() {
    let (sql, params) = build(
        &mysql("users")
            .insert(vec![
                Row::from([("name", text("a")), ("age", int(1))]),
                Row::from([("age", int(2)), ("name", text("b"))]),
            ])
            .unwrap(),
    );
    assert_eq!(sql, "INSERT INTO users (name, age) VALUES (?, ?), (?, ?)");
    assert_eq!(params, vec![text("a"), int(1), text("b"), int(2)]);
}

#[test]
fn insert_conflict_modes() {
    let row = || Row::new().with("id", 1).with("name", "x");

    let (sql, _) = build(&mysql("users").insert_or_ignore(row()).unwrap());
    assert_eq!(sql, "INSERT IGNORE INTO users (id, name) VALUES (?, ?)");

    let (sql, _) = build(&mysql("users").insert_or_update(row()).unwrap());
    assert_eq!(
        sql,
        "INSERT INTO users (id, name) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE id = VALUES(id), name = VALUES(name)"
    );

    let (sql, _) = build(&mysql("users").insert_or_replace(row()).unwrap());
    assert_eq!(sql, "REPLACE INTO users (id, name) VALUES (?, ?)");
}

#[test]
fn mismatched_insert_rows() {
    let err = mysql("t")
        .insert(vec![
            Row::from([("a", 1), ("b", 2)]),
            Row::from([("a", 3), ("c", 4)]),
        ])
        .unwrap_err();
    assert!(err.is_logic_error());
    assert!(matches!(err, Error::MismatchedRowColumns { .. }));
}

#[test]
fn update_with_join_and_limit() {
    let (sql, params) = build(
        &mysql("users")
            .join("teams", "teams.id", "=", "users.team_id")
            .update(Row::new().with("users.active", false).with("users.note", "gone"))
            .unwrap()
            .where_(("teams.name", "old"))
            .order_by("users.id", Direction::Asc)
            .limit(5),
    );
    assert_eq!(
        sql,
        "UPDATE users JOIN teams ON teams.id = users.team_id \
         SET users.active = ?, users.note = ? WHERE teams.name=? \
         ORDER BY users.id ASC LIMIT 5"
    );
    assert_eq!(params, vec![int(0), text("gone"), text("old")]);
}

#[test]
fn delete_ignores_joins() {
    let (sql, params) = build(
        &mysql("sessions")
            .join("users", "users.id", "=", "sessions.user_id")
            .where_(("expired", true))
            .delete(),
    );
    assert_eq!(sql, "DELETE FROM sessions WHERE expired=?");
    assert_eq!(params, vec![int(1)]);
}

#[test]
fn missing_table() {
    let err = sqlgram_core::QueryBuilder::mysql()
        .select("1")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MissingTable));
}

#[test]
fn build_is_idempotent() {
    let builder = mysql("users")
        .where_(("name", "John"))
        .where_in("id", [1, 2, 3])
        .limit(3);
    assert_eq!(build(&builder), build(&builder));
}
