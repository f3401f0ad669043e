//! SQL 函数包装与列修饰辅助函数。

use crate::column::{Column, IntoColumns, collect_columns};

/// 用名为 `name` 的 SQL 函数包装若干列。
pub fn func(name: impl Into<String>, args: impl IntoColumns) -> Column {
    Column::Func {
        name: name.into(),
        args: collect_columns(args),
    }
}

fn by_name(name: &str, col: Column) -> Column {
    Column::Func {
        name: name.to_string(),
        args: vec![col],
    }
}

/// `COUNT(col)`；传入空列表时为 `COUNT(*)`。
pub fn count(cols: impl IntoColumns) -> Column {
    let args: Vec<Column> = collect_columns(cols)
        .into_iter()
        .filter(|c| *c != Column::Star)
        .collect();
    Column::Func {
        name: "COUNT".to_string(),
        args,
    }
}

pub fn sum(col: impl Into<Column>) -> Column {
    by_name("SUM", col.into())
}

pub fn max(col: impl Into<Column>) -> Column {
    by_name("MAX", col.into())
}

pub fn min(col: impl Into<Column>) -> Column {
    by_name("MIN", col.into())
}

pub fn avg(col: impl Into<Column>) -> Column {
    by_name("AVG", col.into())
}

pub fn lower(col: impl Into<Column>) -> Column {
    by_name("LOWER", col.into())
}

/// `col AS alias`
pub fn as_(col: impl Into<Column>, alias: impl Into<String>) -> Column {
    Column::As {
        col: Box::new(col.into()),
        alias: alias.into(),
    }
}

/// `DISTINCT a, b`
pub fn distinct(cols: impl IntoColumns) -> Column {
    Column::Distinct(collect_columns(cols))
}

pub fn asc(col: impl Into<Column>) -> Column {
    Column::Order {
        col: Box::new(col.into()),
        desc: false,
    }
}

pub fn desc(col: impl Into<Column>) -> Column {
    Column::Order {
        col: Box::new(col.into()),
        desc: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dialect;
    use pretty_assertions::assert_eq;

    fn sql(c: Column) -> String {
        c.to_sql(Dialect::MySQL)
    }

    #[test]
    fn aggregate_wrappers() {
        assert_eq!(sql(count("*")), "COUNT(*)");
        assert_eq!(sql(count(Vec::<&str>::new())), "COUNT(*)");
        assert_eq!(sql(count(["a", "b"])), "COUNT(`a`, `b`)");
        assert_eq!(sql(sum("age")), "SUM(`age`)");
        assert_eq!(sql(max("age")), "MAX(`age`)");
        assert_eq!(sql(min("age")), "MIN(`age`)");
        assert_eq!(sql(avg("age")), "AVG(`age`)");
        assert_eq!(sql(lower("name")), "LOWER(`name`)");
    }

    #[test]
    fn modifiers() {
        assert_eq!(sql(as_(count("*"), "total")), "COUNT(*) AS `total`");
        assert_eq!(sql(distinct(["a", "b"])), "DISTINCT `a`, `b`");
        assert_eq!(sql(desc("id")), "`id` DESC");
        assert_eq!(sql(asc(lower("name"))), "LOWER(`name`) ASC");
    }
}
