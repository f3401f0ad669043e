#[cfg(test)]
mod tests {
    use crate::{
        Arg, BuildError, Builder, Column, Dialect, Expr, Op, ParamFormatter, Querier, SqlValue,
        StmtInfo, eq, param, raw,
    };
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone)]
    struct Geom;

    impl ParamFormatter for Geom {
        fn format_param(&self, placeholder: &str, info: &StmtInfo) -> String {
            match info.dialect {
                Dialect::MySQL => format!("ST_GeomFromWKB({placeholder})"),
                _ => format!("ST_GeomFromWKB({placeholder}, 4326)"),
            }
        }
    }

    #[test]
    fn ident_and_args() {
        let mut b = Builder::new();
        b.ident(&Column::from("name"))
            .write_op(Op::Eq)
            .arg("a8m")
            .write_str(" AND ")
            .ident(&Column::from("age"))
            .write_op(Op::IsNull);
        let (sql, args) = b.into_parts();
        assert_eq!(sql, "`name` = ? AND `age` IS NULL");
        assert_eq!(args, vec![SqlValue::from("a8m")]);
    }

    #[test]
    fn args_are_comma_separated() {
        let mut b = Builder::new();
        b.args([1_i64, 2, 3]);
        assert_eq!(b.as_str(), "?, ?, ?");
        assert_eq!(b.total(), 3);
    }

    #[test]
    fn nested_continues_numbering() {
        let mut b = Builder::with_dialect(Dialect::PostgreSQL);
        b.arg(1_i64).write_str(" IN ").nested(|nb| {
            nb.args([2_i64, 3]);
            nb.write_str(" OR ").nested(|nb| {
                nb.arg(4_i64);
            });
        });
        b.write_str(" ").arg(5_i64);
        assert_eq!(b.as_str(), "$1 IN ($2, $3 OR ($4)) $5");
        assert_eq!(b.total(), 5);
        let (_, args) = b.into_parts();
        assert_eq!(
            args,
            vec![
                SqlValue::I64(1),
                SqlValue::I64(2),
                SqlValue::I64(3),
                SqlValue::I64(4),
                SqlValue::I64(5),
            ]
        );
    }

    #[test]
    fn raw_and_expr_args() {
        let mut b = Builder::new();
        b.arg(raw("NOW()"))
            .comma()
            .arg(Expr::new("COALESCE(?, ?)", [1_i64, 2]));
        let (sql, args) = b.into_parts();
        assert_eq!(sql, "NOW(), COALESCE(?, ?)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn param_formatter_hook() {
        let mut b = Builder::new();
        b.arg(param(vec![1_u8, 2], Geom));
        assert_eq!(b.as_str(), "ST_GeomFromWKB(?)");

        let mut b = Builder::with_dialect(Dialect::PostgreSQL);
        b.arg(1_i64).comma().arg(param(vec![1_u8], Geom));
        assert_eq!(b.as_str(), "$1, ST_GeomFromWKB($2, 4326)");
        assert_eq!(b.total(), 2);
    }

    #[test]
    fn join_comma_fragments() {
        let a = eq("a", 1_i64);
        let c = Expr::raw("TRUE");
        let mut b = Builder::new();
        b.join_comma(&[&a, &c]);
        assert_eq!(b.as_str(), "`a` = ?, TRUE");
    }

    #[test]
    fn errors_are_joined() {
        let mut b = Builder::new();
        assert!(b.err().is_ok());
        b.add_error(BuildError::UnsupportedOp("~".into()));
        b.add_error(BuildError::ArgCount {
            expected: 2,
            got: 1,
        });
        let err = b.err().unwrap_err();
        assert_eq!(
            err.to_string(),
            "op:~ is not support; expression expects 2 args, got 1"
        );
    }

    #[test]
    fn nested_merges_errors() {
        let mut b = Builder::new();
        b.nested(|nb| {
            nb.join(&Expr::new("a = ?", Vec::<Arg>::new()));
        });
        assert_eq!(b.errors().len(), 1);
    }

    #[test]
    fn op_parse() {
        assert_eq!(" not in ".parse::<Op>(), Ok(Op::NotIn));
        assert_eq!("like".parse::<Op>(), Ok(Op::Like));
        assert_eq!(
            "IS NULL".parse::<Op>(),
            Err(BuildError::UnsupportedOp("IS NULL".into()))
        );
    }

    #[test]
    fn prebuilt_builder_is_joinable() {
        let mut inner = Builder::new();
        inner.write_str("x = ").arg(1_i64);
        let mut outer = Builder::new();
        outer.write_str("WHERE ").join(&inner).write_str(" AND y = ").arg(2_i64);
        assert_eq!(outer.total(), 2);
        assert_eq!(outer.query().1.len(), 2);
        assert_eq!(outer.to_string(), "WHERE x = ? AND y = ?");
    }
}
