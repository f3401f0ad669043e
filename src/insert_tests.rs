#[cfg(test)]
mod tests {
    use crate::{Arg, Dialect, Expr, InsertBuilder, Querier, SqlValue, insert, raw};
    use pretty_assertions::assert_eq;

    #[test]
    fn multi_row_insert() {
        let mut ib = insert("users");
        ib.columns(["name", "age"])
            .values([Arg::from("a8m"), Arg::from(10)])
            .values([Arg::from("nati"), Arg::from(20)]);
        let (sql, args) = ib.query();
        assert_eq!(
            sql,
            "INSERT INTO `users` (`name`, `age`) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::from("a8m"),
                SqlValue::I64(10),
                SqlValue::from("nati"),
                SqlValue::I64(20),
            ]
        );
        assert_eq!(ib.rows(), 2);
    }

    #[test]
    fn set_single_row() {
        let mut ib = insert("users");
        ib.set("name", "a8m").set("age", 10).set("ctime", raw("NOW()"));
        let (sql, args) = ib.query();
        assert_eq!(
            sql,
            "INSERT INTO `users` (`name`, `age`, `ctime`) VALUES (?, ?, NOW())"
        );
        assert_eq!(args.len(), 2);
        assert_eq!(ib.rows(), 1);
    }

    #[test]
    fn schema_and_table() {
        let mut ib = InsertBuilder::new("tmp");
        ib.table("users").schema("db").set("id", 1_u64);
        assert_eq!(ib.query().0, "INSERT INTO `db`.`users` (`id`) VALUES (?)");
    }

    #[test]
    fn upsert_columns() {
        let mut ib = insert("users");
        ib.columns(["id", "name", "age"])
            .values([Arg::from(1), Arg::from("a8m"), Arg::from(10)])
            .on_duplicate_key_update(["name", "age"]);
        assert_eq!(
            ib.query().0,
            "INSERT INTO `users` (`id`, `name`, `age`) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE `name` = VALUES(`name`), `age` = VALUES(`age`)"
        );
    }

    #[test]
    fn upsert_expressions() {
        let mut ib = insert("counters");
        ib.set("id", 1).set("cnt", 1)
            .on_duplicate_key_update(["id"])
            .on_duplicate_key_update_expr([Expr::new("`cnt` = `cnt` + ?", [1])]);
        let (sql, args) = ib.query();
        assert_eq!(
            sql,
            "INSERT INTO `counters` (`id`, `cnt`) VALUES (?, ?) ON DUPLICATE KEY UPDATE `id` = VALUES(`id`), `cnt` = `cnt` + ?"
        );
        assert_eq!(args, vec![SqlValue::I64(1), SqlValue::I64(1), SqlValue::I64(1)]);
    }

    #[test]
    fn empty_upsert_is_ignored() {
        let mut ib = insert("t");
        ib.set("a", 1).on_duplicate_key_update(Vec::<&str>::new());
        assert_eq!(ib.query().0, "INSERT INTO `t` (`a`) VALUES (?)");
    }

    #[test]
    fn default_values_by_dialect() {
        let mut ib = insert("t");
        ib.default_values();
        assert_eq!(ib.query().0, "INSERT INTO `t` VALUES ()");

        ib.set_dialect(Dialect::PostgreSQL);
        assert_eq!(ib.query().0, r#"INSERT INTO "t" DEFAULT VALUES"#);
    }

    #[test]
    fn postgres_numbering_across_rows() {
        let mut ib = insert("users");
        ib.set_dialect(Dialect::PostgreSQL)
            .columns(["name", "age"])
            .values([Arg::from("a"), Arg::from(1)])
            .values([Arg::from("b"), Arg::from(2)]);
        assert_eq!(
            ib.query().0,
            r#"INSERT INTO "users" ("name", "age") VALUES ($1, $2), ($3, $4)"#
        );
    }
}
