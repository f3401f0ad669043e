#[cfg(test)]
mod tests {
    use crate::{
        Builder, Dialect, Expr, Predicate, Querier, SqlValue, and, build_predicate, composite_gt,
        composite_lt, contains, eq, equal_fold, expr_p, false_, gt, gte, has_prefix, has_suffix,
        in_, in_select, is_null, like, lt, lte, neq, not, not_in, not_in_select, not_null, or, p,
        select, table,
    };
    use pretty_assertions::assert_eq;

    fn pg(pred: &Predicate) -> (String, Vec<SqlValue>) {
        let mut b = Builder::with_dialect(Dialect::PostgreSQL);
        pred.render(&mut b);
        b.into_parts()
    }

    #[test]
    fn leaf_operators() {
        let cases = [
            (eq("a", 1_i64), "`a` = ?"),
            (neq("a", 1_i64), "`a` <> ?"),
            (gt("a", 1_i64), "`a` > ?"),
            (gte("a", 1_i64), "`a` >= ?"),
            (lt("a", 1_i64), "`a` < ?"),
            (lte("a", 1_i64), "`a` <= ?"),
            (in_("a", [1_i64, 2, 3]), "`a` IN (?, ?, ?)"),
            (not_in("a", [1_i64]), "`a` NOT IN (?)"),
            (like("a", "x%"), "`a` LIKE ?"),
            (is_null("a"), "`a` IS NULL"),
            (not_null("a"), "`a` IS NOT NULL"),
            (false_(), "FALSE"),
        ];
        for (pred, want) in cases {
            assert_eq!(pred.query().0, want);
        }
    }

    #[test]
    fn like_helpers() {
        let (sql, args) = has_prefix("name", "a8").query();
        assert_eq!(sql, "`name` LIKE ?");
        assert_eq!(args, vec![SqlValue::from("a8%")]);
        assert_eq!(has_suffix("name", "m").query().1, vec![SqlValue::from("%m")]);
        assert_eq!(contains("name", "8").query().1, vec![SqlValue::from("%8%")]);
    }

    #[test]
    fn equal_fold_lowers_both_sides() {
        let (sql, args) = equal_fold("name", "A8M").query();
        assert_eq!(sql, "LOWER(`name`) = ?");
        assert_eq!(args, vec![SqlValue::from("a8m")]);
    }

    #[test]
    fn empty_membership_is_false() {
        let (sql, args) = in_("id", Vec::<i64>::new()).query();
        assert_eq!(sql, "FALSE");
        assert!(args.is_empty());
        let (sql, args) = not_in("id", Vec::<i64>::new()).query();
        assert_eq!(sql, "FALSE");
        assert!(args.is_empty());
    }

    #[test]
    fn composite_compare() {
        let (sql, args) = composite_gt(["a", "b"], [1_i64, 2]).query();
        assert_eq!(sql, "(`a`, `b`) > (?, ?)");
        assert_eq!(args.len(), 2);
        assert_eq!(
            composite_lt(["a", "b"], [1_i64, 2]).query().0,
            "(`a`, `b`) < (?, ?)"
        );
    }

    #[test]
    fn chained_steps() {
        let pred = p().eq("a", 1_i64).and().gt("b", 2_i64).or().is_null("c");
        assert_eq!(pred.query().0, "`a` = ? AND `b` > ? OR `c` IS NULL");
        assert_eq!(pred.steps().len(), 5);
        assert_eq!(p().not().eq("a", 1_i64).query().0, "NOT `a` = ?");
    }

    #[test]
    fn or_arity() {
        let (sql, args) = or([eq("a", 1_i64), eq("b", 2_i64), eq("c", 3_i64)]).query();
        assert_eq!(sql, "`a` = ? OR `b` = ? OR `c` = ?");
        assert_eq!(sql.matches(" OR ").count(), 2);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn single_child_is_unwrapped() {
        assert_eq!(or([eq("a", 1_i64)]).query().0, "`a` = ?");
        assert_eq!(and([eq("a", 1_i64)]).query().0, "`a` = ?");
        assert_eq!(
            and([or([eq("a", 1_i64)]), eq("b", 2_i64)]).query().0,
            "`a` = ? AND `b` = ?"
        );
        assert_eq!(and(Vec::new()).query().0, "");
    }

    #[test]
    fn nested_combinators() {
        let pred = and([or([eq("a", 1_i64), eq("b", 2_i64)]), eq("c", 3_i64)]);
        assert_eq!(pred.query().0, "(`a` = ? OR `b` = ?) AND `c` = ?");

        let pred = or([
            and([eq("a", 1_i64), eq("b", 2_i64)]),
            and([eq("c", 3_i64), or([eq("d", 4_i64), eq("e", 5_i64)])]),
        ]);
        let (sql, args) = pred.query();
        assert_eq!(
            sql,
            "(`a` = ? AND `b` = ?) OR (`c` = ? AND (`d` = ? OR `e` = ?))"
        );
        assert_eq!(
            args,
            (1..=5).map(SqlValue::I64).collect::<Vec<_>>()
        );
    }

    #[test]
    fn multi_step_child_is_wrapped() {
        let pred = or([p().eq("a", 1_i64).and().eq("b", 2_i64), eq("c", 3_i64)]);
        assert_eq!(pred.query().0, "(`a` = ? AND `b` = ?) OR `c` = ?");
    }

    #[test]
    fn negation() {
        assert_eq!(
            not(or([eq("a", 1_i64), eq("b", 2_i64)])).query().0,
            "NOT (`a` = ? OR `b` = ?)"
        );
        assert_eq!(
            and([not(eq("a", 1_i64)), eq("b", 2_i64)]).query().0,
            "NOT (`a` = ?) AND `b` = ?"
        );
    }

    #[test]
    fn rendering_is_repeatable() {
        let pred = and([
            or([eq("a", 1_i64), in_("b", [2_i64, 3])]),
            not(is_null("c")),
        ]);
        let first = pred.query();
        let second = pred.query();
        assert_eq!(first, second);
        assert_eq!(pg(&pred), pg(&pred));
    }

    #[test]
    fn placeholders_match_args() {
        // 逐层嵌套 AND/OR，叶子数与参数、占位符数量保持一致
        let mut pred = eq("x", 0_i64);
        for i in 1..=8_i64 {
            let leaf = in_(format!("c{i}"), [i, i + 1]);
            pred = if i % 2 == 0 {
                and([pred, leaf, not(gt("y", i))])
            } else {
                or([leaf, pred])
            };
        }
        let (sql, args) = pred.query();
        assert_eq!(sql.matches('?').count(), args.len());

        let (sql, pg_args) = pg(&pred);
        assert_eq!(pg_args, args);
        for n in 1..=args.len() {
            assert!(sql.contains(&format!("${n}")), "${n} missing in {sql}");
        }
        assert!(!sql.contains(&format!("${}", args.len() + 1)));
    }

    #[test]
    fn postgres_numbering() {
        let pred = and([eq("a", 1_i64), in_("b", [2_i64, 3]), or([eq("c", 4_i64), eq("d", 5_i64)])]);
        let (sql, _) = pg(&pred);
        assert_eq!(
            sql,
            r#""a" = $1 AND "b" IN ($2, $3) AND ("c" = $4 OR "d" = $5)"#
        );
    }

    #[test]
    fn sub_select() {
        let mut sub = select(["uid"]);
        sub.from(table("groups")).where_(eq("name", "admin"));
        let (sql, args) = and([in_select("id", sub.clone()), gt("age", 18_i64)]).query();
        assert_eq!(
            sql,
            "`id` IN (SELECT `uid` FROM `groups` WHERE `name` = ?) AND `age` > ?"
        );
        assert_eq!(args, vec![SqlValue::from("admin"), SqlValue::I64(18)]);
        assert_eq!(
            not_in_select("id", sub).query().0,
            "`id` NOT IN (SELECT `uid` FROM `groups` WHERE `name` = ?)"
        );
    }

    #[test]
    fn expression_predicate() {
        let pred = and([
            expr_p(Expr::new("JSON_CONTAINS(`tags`, ?)", ["\"a\""])),
            eq("b", 1_i64),
        ]);
        assert_eq!(pred.query().0, "JSON_CONTAINS(`tags`, ?) AND `b` = ?");
        assert_eq!(pred.query().1.len(), 2);
    }

    #[test]
    fn build_from_strings() {
        let (sql, args) = build_predicate("age", " in ", "1,2").unwrap().query();
        assert_eq!(sql, "`age` IN (?, ?)");
        assert_eq!(args, vec![SqlValue::from("1"), SqlValue::from("2")]);

        assert_eq!(
            build_predicate("name", "LIKE", "a%").unwrap().query().0,
            "`name` LIKE ?"
        );
        assert_eq!(
            build_predicate("age", ">=", "18").unwrap().query().0,
            "`age` >= ?"
        );

        let err = build_predicate("age", "between", "1").unwrap_err();
        assert_eq!(err.to_string(), "op:between is not support");
    }

    #[test]
    fn build_predicate_quotes_hostile_field() {
        let (sql, args) = build_predicate("id` = 1 OR `1", "=", "x")
            .unwrap()
            .query();
        assert_eq!(sql, "`id`` = 1 OR ``1` = ?");
        assert_eq!(args, vec![SqlValue::from("x")]);

        let (sql, _) = pg(&eq("a\" OR \"b", 1));
        assert_eq!(sql, "\"a\"\" OR \"\"b\" = $1");
    }

    #[test]
    fn empty_children_are_skipped() {
        let (sql, args) = and([p(), eq("a", 1)]).query();
        assert_eq!(sql, "`a` = ?");
        assert_eq!(args, vec![SqlValue::I64(1)]);

        assert_eq!(
            or([p(), eq("a", 1), p(), eq("b", 2)]).query().0,
            "`a` = ? OR `b` = ?"
        );
        assert_eq!(
            and([or([p(), eq("a", 1)]), eq("b", 2)]).query().0,
            "`a` = ? AND `b` = ?"
        );
        assert_eq!(and([p(), p()]).query().0, "");
    }
}
