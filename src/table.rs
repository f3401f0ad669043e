//! FROM / JOIN 的数据源：普通表或子查询。

use crate::builder::{Builder, Querier};
use crate::column::Column;
use crate::select::Selector;

/// 普通表引用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectTable {
    pub(crate) name: String,
    pub(crate) schema: String,
    pub(crate) as_: String,
    quote: bool,
}

/// `table("users").as_("u")`
pub fn table(name: impl Into<String>) -> SelectTable {
    SelectTable::new(name)
}

impl SelectTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: String::new(),
            as_: String::new(),
            quote: true,
        }
    }

    pub fn schema(mut self, name: impl Into<String>) -> Self {
        self.schema = name.into();
        self
    }

    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.as_ = alias.into();
        self
    }

    /// 表名原样输出，不加引号也不带别名，
    /// 例如 MySQL 的 `INFORMATION_SCHEMA.TABLE_CONSTRAINTS`。
    pub fn unquote(mut self) -> Self {
        self.quote = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.as_
    }

    /// 限定到本表的列：有别名时为 `alias.col`，否则为 `[schema.]table.col`。
    pub fn c(&self, column: &str) -> Column {
        if !self.as_.is_empty() {
            return Column::path([self.as_.as_str(), column]);
        }
        Column::path([self.schema.as_str(), self.name.as_str(), column])
    }

    pub fn columns(&self, columns: &[&str]) -> Vec<Column> {
        columns.iter().map(|c| self.c(c)).collect()
    }
}

impl Querier for SelectTable {
    fn render(&self, b: &mut Builder) {
        if !self.quote {
            b.write_str(&self.name);
            return;
        }
        b.write_schema(&self.schema)
            .ident(&Column::name(self.name.as_str()));
        if !self.as_.is_empty() {
            b.write_str(" AS ").ident(&Column::name(self.as_.as_str()));
        }
    }
}

/// FROM / JOIN 位置上可出现的数据源。
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Table(SelectTable),
    Select(Box<Selector>),
}

impl TableView {
    pub(crate) fn alias(&self) -> &str {
        match self {
            Self::Table(t) => &t.as_,
            Self::Select(s) => s.alias(),
        }
    }
}

impl Querier for TableView {
    fn render(&self, b: &mut Builder) {
        match self {
            Self::Table(t) => t.render(b),
            Self::Select(s) => {
                b.nested(|nb| s.render(nb));
                if !s.alias().is_empty() {
                    b.write_str(" AS ").ident(&Column::name(s.alias()));
                }
            }
        }
    }
}

impl From<SelectTable> for TableView {
    fn from(t: SelectTable) -> Self {
        Self::Table(t)
    }
}

impl From<Selector> for TableView {
    fn from(s: Selector) -> Self {
        Self::Select(Box::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::table;
    use crate::{Dialect, Querier};
    use pretty_assertions::assert_eq;

    #[test]
    fn table_ref() {
        assert_eq!(table("users").query().0, "`users`");
        assert_eq!(
            table("users").schema("db").as_("u").query().0,
            "`db`.`users` AS `u`"
        );
        assert_eq!(
            table("INFORMATION_SCHEMA.TABLE_CONSTRAINTS")
                .unquote()
                .query()
                .0,
            "INFORMATION_SCHEMA.TABLE_CONSTRAINTS"
        );
    }

    #[test]
    fn column_reference() {
        let t = table("users");
        assert_eq!(t.c("id").to_sql(Dialect::MySQL), "`users`.`id`");
        let t = table("users").schema("db");
        assert_eq!(t.c("id").to_sql(Dialect::MySQL), "`db`.`users`.`id`");
        let t = t.as_("u");
        assert_eq!(
            t.columns(&["id", "name"])
                .iter()
                .map(|c| c.to_sql(Dialect::PostgreSQL))
                .collect::<Vec<_>>(),
            vec!["\"u\".\"id\"", "\"u\".\"name\""]
        );
    }
}
