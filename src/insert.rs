//! InsertBuilder：构建 INSERT 语句。

use crate::arg::Arg;
use crate::builder::{Builder, Querier};
use crate::column::{Column, IntoColumns, collect_columns};
use crate::dialect::Dialect;
use crate::expr::Expr;

#[derive(Debug, Clone, PartialEq)]
enum Upsert {
    /// `col = VALUES(col), ...`
    Values(Vec<Column>),
    Expr(Expr),
}

/// INSERT 语句构建器。所有行在一条语句里批量写入。
///
/// ```
/// use xsql::{Arg, Querier, insert};
/// let mut ib = insert("users");
/// ib.columns(["name", "age"])
///     .values([Arg::from("a8m"), Arg::from(10)]);
/// let (sql, args) = ib.query();
/// assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    dialect: Dialect,
    table: String,
    schema: String,
    columns: Vec<Column>,
    default_values: bool,
    values: Vec<Vec<Arg>>,
    upsert: Vec<Upsert>,
}

pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder::new(table)
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn set_dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    pub fn schema(&mut self, name: impl Into<String>) -> &mut Self {
        self.schema = name.into();
        self
    }

    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.table = name.into();
        self
    }

    /// 单行写入的简写：追加一列并把值放入第一行。
    pub fn set(&mut self, col: impl Into<Column>, v: impl Into<Arg>) -> &mut Self {
        self.columns.push(col.into());
        match self.values.first_mut() {
            Some(row) => row.push(v.into()),
            None => self.values.push(vec![v.into()]),
        }
        self
    }

    pub fn columns(&mut self, cols: impl IntoColumns) -> &mut Self {
        self.columns.extend(collect_columns(cols));
        self
    }

    /// 追加一行。
    pub fn values<I>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.values.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// 没有任何列时写入默认值行。
    pub fn default_values(&mut self) -> &mut Self {
        self.default_values = true;
        self
    }

    /// 已追加的行数。
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    /// `ON DUPLICATE KEY UPDATE col = VALUES(col), ...`
    pub fn on_duplicate_key_update(&mut self, cols: impl IntoColumns) -> &mut Self {
        let cols = collect_columns(cols);
        if !cols.is_empty() {
            self.upsert.push(Upsert::Values(cols));
        }
        self
    }

    /// 以自定义表达式作为 `ON DUPLICATE KEY UPDATE` 的赋值，
    /// 例如 `` Expr::raw("`c` = VALUES(`a`) + VALUES(`b`)") ``。
    pub fn on_duplicate_key_update_expr(
        &mut self,
        exprs: impl IntoIterator<Item = Expr>,
    ) -> &mut Self {
        self.upsert.extend(exprs.into_iter().map(Upsert::Expr));
        self
    }

    fn write_upsert(&self, b: &mut Builder) {
        b.write_str(" ON DUPLICATE KEY UPDATE ");
        let mut first = true;
        for item in &self.upsert {
            match item {
                Upsert::Values(cols) => {
                    for c in cols {
                        if !first {
                            b.comma();
                        }
                        first = false;
                        b.ident(c).write_str(" = VALUES").nested(|nb| {
                            nb.ident(c);
                        });
                    }
                }
                Upsert::Expr(e) => {
                    if !first {
                        b.comma();
                    }
                    first = false;
                    e.render(b);
                }
            }
        }
    }
}

impl Querier for InsertBuilder {
    fn render(&self, b: &mut Builder) {
        b.write_str("INSERT INTO ")
            .write_schema(&self.schema)
            .ident(&Column::name(self.table.as_str()))
            .pad();
        if self.default_values && self.columns.is_empty() {
            b.write_str(match b.dialect() {
                Dialect::MySQL => "VALUES ()",
                Dialect::SQLite | Dialect::PostgreSQL => "DEFAULT VALUES",
            });
            return;
        }
        b.nested(|nb| {
            nb.ident_comma(&self.columns);
        });
        b.write_str(" VALUES ");
        for (i, row) in self.values.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.nested(|nb| {
                nb.args_ref(row);
            });
        }
        if !self.upsert.is_empty() {
            self.write_upsert(b);
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
