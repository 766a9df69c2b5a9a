//! Tests for DDL compiled from blueprints by the MySQL and SQLite schema
//! grammars, through the `Schema` recorder.

use sqlgram_core::schema::{ColumnType, ForeignKeyAction, Schema, SchemaGrammar};
use sqlgram_core::{Blueprint, Error, MySqlDialect, SqlValue, SqliteDialect};

fn users(table: &mut Blueprint) {
    table.id("id");
    table.string("email").unique();
    table.tiny("age").unsigned().nullable();
    table.enumeration("role", &["admin", "user"]).default("user");
    table.timestamps();
}

#[test]
fn mysql_create_table() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .create("users", |t| {
            users(t);
            Ok(())
        })
        .unwrap();

    assert_eq!(
        schema.statements(),
        [
            "CREATE TABLE `users` (\
             `id` INT(11) UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             `email` VARCHAR(255) NOT NULL UNIQUE, \
             `age` TINYINT UNSIGNED NULL, \
             `role` ENUM('admin', 'user') NOT NULL DEFAULT 'user', \
             `created` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP, \
             `updated` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP)"
        ]
    );
}

#[test]
fn sqlite_create_table() {
    let grammar = SqliteDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .create("users", |t| {
            users(t);
            Ok(())
        })
        .unwrap();

    assert_eq!(
        schema.statements(),
        [
            "CREATE TABLE \"users\" (\
             \"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
             \"email\" TEXT NOT NULL UNIQUE, \
             \"age\" INTEGER NULL, \
             \"role\" TEXT CHECK (\"role\" IN ('admin', 'user')) NOT NULL DEFAULT 'user', \
             \"created\" TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP, \
             \"updated\" TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP)"
        ]
    );
}

#[test]
fn index_placement_differs_by_dialect() {
    let build = |t: &mut Blueprint| {
        t.id("id");
        t.string("slug").index();
        Ok(())
    };

    let mysql = MySqlDialect::new();
    let mut schema = Schema::new(&mysql);
    schema.create("posts", build).unwrap();
    assert_eq!(
        schema.statements(),
        [
            "CREATE TABLE `posts` (\
             `id` INT(11) UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             `slug` VARCHAR(255) NOT NULL, \
             INDEX `posts_slug_index` (`slug`))"
        ]
    );

    let sqlite = SqliteDialect::new();
    let mut schema = Schema::new(&sqlite);
    schema.create("posts", build).unwrap();
    assert_eq!(
        schema.statements()[1],
        "CREATE INDEX \"posts_slug_index\" ON \"posts\" (\"slug\")"
    );
}

#[test]
fn foreign_key_with_explicit_column() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .create("posts", |t| {
            t.id("id");
            t.int("author").unsigned();
            t.foreign("author")
                .on("users")
                .on_delete("cascade")?
                .on_update_action(ForeignKeyAction::Restrict);
            Ok(())
        })
        .unwrap();

    assert!(schema.statements()[0].ends_with(
        "CONSTRAINT `FK_users_posts` FOREIGN KEY (`author`) REFERENCES `users` (`id`) \
         ON DELETE CASCADE ON UPDATE RESTRICT)"
    ));
}

#[test]
fn foreign_key_guessed_from_convention() {
    let grammar = SqliteDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .create("comments", |t| {
            t.id("id");
            t.int("posts_id");
            t.foreign_guessed().on("posts");
            Ok(())
        })
        .unwrap();

    assert!(schema.statements()[0].ends_with(
        "CONSTRAINT \"FK_posts_comments\" FOREIGN KEY (\"posts_id\") REFERENCES \"posts\" (\"id\"))"
    ));
}

#[test]
fn foreign_key_guess_failure() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    let err = schema
        .create("comments", |t| {
            t.id("id");
            t.int("post");
            t.foreign_guessed().on("posts").name("comment_post");
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, Error::GuessFailed { .. }));
    assert!(schema.statements().is_empty());

    schema
        .create("comments", |t| {
            t.id("id");
            t.int("post");
            t.foreign_guessed()
                .on("posts")
                .name("comment_post")
                .column("post");
            Ok(())
        })
        .unwrap();
    assert_eq!(schema.statements().len(), 1);
}

#[test]
fn foreign_key_without_referenced_table() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    let err = schema
        .create("posts", |t| {
            t.int("user_id");
            t.foreign("user_id");
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, Error::IncompleteForeignKey { .. }));
}

#[test]
fn invalid_action_aborts_callback() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    let err = schema
        .create("posts", |t| {
            t.foreign("user_id").on("users").on_delete("obliterate")?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidForeignKeyAction(_)));
}

#[test]
fn mysql_alter_is_one_statement() {
    let grammar = MySqlDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .table("users", |t| {
            t.string("nickname").nullable().after("email");
            t.text("bio").change();
            t.timestamp("seen").nullable().use_current_on_update().first();
            t.drop_column("legacy");
            t.rename_column("mail", "email");
            t.foreign("team_id").on("teams");
            t.drop_foreign("FK_old_users");
            Ok(())
        })
        .unwrap();

    assert_eq!(
        schema.statements(),
        [
            "ALTER TABLE `users` \
             ADD COLUMN `nickname` VARCHAR(255) NULL AFTER `email`, \
             MODIFY COLUMN `bio` TEXT NOT NULL, \
             ADD COLUMN `seen` TIMESTAMP NULL ON UPDATE CURRENT_TIMESTAMP FIRST, \
             DROP COLUMN `legacy`, \
             RENAME COLUMN `mail` TO `email`, \
             ADD CONSTRAINT `FK_teams_users` FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`), \
             DROP FOREIGN KEY `FK_old_users`"
        ]
    );
}

#[test]
fn sqlite_alter_adds_and_renames() {
    let grammar = SqliteDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .table("users", |t| {
            t.string("nickname").nullable().after("email").index();
            t.rename_column("mail", "email");
            Ok(())
        })
        .unwrap();

    assert_eq!(
        schema.statements(),
        [
            "ALTER TABLE \"users\" ADD COLUMN \"nickname\" TEXT NULL",
            "CREATE INDEX \"users_nickname_index\" ON \"users\" (\"nickname\")",
            "ALTER TABLE \"users\" RENAME COLUMN \"mail\" TO \"email\"",
        ]
    );
}

#[test]
fn sqlite_alter_adds_not_null_column_with_default() {
    let grammar = SqliteDialect::new();
    let mut schema = Schema::new(&grammar);
    schema
        .table("users", |t| {
            t.int("score").default(0);
            t.string("status").default_raw("'new'");
            Ok(())
        })
        .unwrap();

    assert_eq!(
        schema.statements(),
        [
            "ALTER TABLE \"users\" ADD COLUMN \"score\" INTEGER NOT NULL DEFAULT 0",
            "ALTER TABLE \"users\" ADD COLUMN \"status\" TEXT NOT NULL DEFAULT 'new'",
        ]
    );
}

#[test]
fn sqlite_alter_rejects_unsupported_actions() {
    let grammar = SqliteDialect::new();
    let cases: Vec<(&str, Box<dyn Fn(&mut Blueprint)>)> = vec![
        (
            "change",
            Box::new(|t: &mut Blueprint| {
                t.text("bio").change();
            }),
        ),
        (
            "drop column",
            Box::new(|t: &mut Blueprint| t.drop_column("legacy")),
        ),
        (
            "add foreign key",
            Box::new(|t: &mut Blueprint| {
                t.foreign("team_id").on("teams");
            }),
        ),
        (
            "drop foreign key",
            Box::new(|t: &mut Blueprint| t.drop_foreign("FK_teams_users")),
        ),
        (
            "primary column",
            Box::new(|t: &mut Blueprint| {
                t.int("code").primary();
            }),
        ),
        (
            "unique column",
            Box::new(|t: &mut Blueprint| {
                t.string("slug").unique();
            }),
        ),
        (
            "on update",
            Box::new(|t: &mut Blueprint| {
                t.timestamp("seen").nullable().use_current_on_update();
            }),
        ),
        (
            "current timestamp default",
            Box::new(|t: &mut Blueprint| {
                t.timestamp("seen").nullable().use_current();
            }),
        ),
        (
            "not null without default",
            Box::new(|t: &mut Blueprint| {
                t.string("bio");
            }),
        ),
        (
            "not null with null default",
            Box::new(|t: &mut Blueprint| {
                t.int("score").default(SqlValue::Null);
            }),
        ),
    ];

    for (label, fill) in cases {
        let mut schema = Schema::new(&grammar);
        let err = schema
            .table("users", |t| {
                t.string("valid").nullable();
                fill(t);
                Ok(())
            })
            .unwrap_err();
        assert!(err.is_unsupported(), "{label}: expected unsupported, got {err}");
        assert!(schema.statements().is_empty(), "{label}: emitted SQL");
    }
}

#[test]
fn drop_and_rename_tables() {
    let mysql = MySqlDialect::new();
    let mut schema = Schema::new(&mysql);
    schema.drop("a");
    schema.drop_if_exists("b");
    schema.rename("c", "d");
    assert_eq!(
        schema.take_statements(),
        [
            "DROP TABLE `a`",
            "DROP TABLE IF EXISTS `b`",
            "RENAME TABLE `c` TO `d`",
        ]
    );
    assert!(schema.statements().is_empty());

    let sqlite = SqliteDialect::new();
    let mut schema = Schema::new(&sqlite);
    schema.rename("c", "d");
    assert_eq!(schema.statements(), ["ALTER TABLE \"c\" RENAME TO \"d\""]);
}

#[test]
fn defaults_are_escaped_by_dialect() {
    let build = |t: &mut Blueprint| {
        t.string("motto").default("it's");
        t.float("ratio").default(0.5);
        t.date_time("seen").default_raw("NOW()");
        t.int("flag").default(SqlValue::Null).nullable();
        Ok(())
    };

    let mysql = MySqlDialect::new();
    let mut schema = Schema::new(&mysql);
    schema.create("t", build).unwrap();
    let sql = &schema.statements()[0];
    assert!(sql.contains("`motto` VARCHAR(255) NOT NULL DEFAULT 'it\\'s'"), "{sql}");
    assert!(sql.contains("`ratio` FLOAT NOT NULL DEFAULT 0.5"), "{sql}");
    assert!(sql.contains("`seen` DATETIME NOT NULL DEFAULT NOW()"), "{sql}");
    assert!(sql.contains("`flag` INT NULL DEFAULT NULL"), "{sql}");

    let sqlite = SqliteDialect::new();
    let mut schema = Schema::new(&sqlite);
    schema.create("t", build).unwrap();
    assert!(schema.statements()[0].contains("\"motto\" TEXT NOT NULL DEFAULT 'it''s'"));
}

#[test]
fn unmapped_type_in_custom_dialect() {
    use sqlgram_core::schema::Column;
    use sqlgram_core::Dialect;

    struct Partial;

    impl Dialect for Partial {
        fn name(&self) -> &'static str {
            "partial"
        }
    }

    impl SchemaGrammar for Partial {
        fn type_map(&self) -> &'static [(ColumnType, &'static str)] {
            &[(ColumnType::Int, "INTEGER")]
        }

        fn type_definition(&self, column: &Column) -> sqlgram_core::Result<String> {
            self.native_type(column.column_type).map(String::from)
        }

        fn autoincrement_definition(&self, _: &Column) -> sqlgram_core::Result<Option<String>> {
            Ok(None)
        }

        fn compile_alter(&self, _: &Blueprint) -> sqlgram_core::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    let mut schema = Schema::new(&Partial);
    schema
        .create("t", |t| {
            t.int("n");
            Ok(())
        })
        .unwrap();
    let err = schema
        .create("t", |t| {
            t.date("d");
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnmappedType {
            dialect: "partial",
            column_type: "date"
        }
    ));
}
