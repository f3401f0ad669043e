//! DeleteBuilder：构建 DELETE 语句。

use crate::builder::{Builder, Querier};
use crate::column::Column;
use crate::dialect::Dialect;
use crate::predicate::{Predicate, and};
use crate::select::Selector;

/// DELETE 语句构建器。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    dialect: Dialect,
    table: String,
    schema: String,
    where_: Option<Predicate>,
}

pub fn delete(table: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table)
}

impl DeleteBuilder {
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

    pub fn where_(&mut self, pred: Predicate) -> &mut Self {
        self.where_ = Some(match self.where_.take() {
            None => pred,
            Some(w) => and([w, pred]),
        });
        self
    }

    /// 删除子查询匹配的行。
    pub fn from_select(&mut self, s: &Selector) -> &mut Self {
        if let Some(w) = s.p() {
            self.where_(w.clone());
        }
        if let Some(t) = s.table() {
            self.table = t.name.clone();
        }
        self
    }
}

impl Querier for DeleteBuilder {
    fn render(&self, b: &mut Builder) {
        b.write_str("DELETE FROM ")
            .write_schema(&self.schema)
            .ident(&Column::name(self.table.as_str()));
        if let Some(w) = &self.where_ {
            b.write_str(" WHERE ");
            w.render(b);
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
