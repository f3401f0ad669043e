//! UpdateBuilder：构建 UPDATE 语句。

use crate::arg::Arg;
use crate::builder::{Builder, Querier};
use crate::column::Column;
use crate::dialect::Dialect;
use crate::predicate::{Predicate, and};
use crate::select::Selector;

#[derive(Debug, Clone, PartialEq)]
enum Assign {
    /// `col = ?` 或 `col = <expr>`
    Value(Arg),
    /// `col = COALESCE(col, 0) + ?`
    Add(Arg),
}

/// UPDATE 语句构建器。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    dialect: Dialect,
    table: String,
    schema: String,
    where_: Option<Predicate>,
    nulls: Vec<Column>,
    sets: Vec<(Column, Assign)>,
}

/// `update("users").set("name", "foo").set("age", 10)`
pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

impl UpdateBuilder {
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

    /// 设置列的值；传入 [`crate::Expr`] 时就地渲染为子表达式。
    pub fn set(&mut self, col: impl Into<Column>, v: impl Into<Arg>) -> &mut Self {
        self.sets.push((col.into(), Assign::Value(v.into())));
        self
    }

    /// 在原值基础上累加，原值为 NULL 时按 0 计算。
    pub fn add(&mut self, col: impl Into<Column>, v: impl Into<Arg>) -> &mut Self {
        self.sets.push((col.into(), Assign::Add(v.into())));
        self
    }

    pub fn set_null(&mut self, col: impl Into<Column>) -> &mut Self {
        self.nulls.push(col.into());
        self
    }

    /// 追加 WHERE 条件，与已有条件以 AND 组合。
    pub fn where_(&mut self, pred: Predicate) -> &mut Self {
        self.where_ = Some(match self.where_.take() {
            None => pred,
            Some(w) => and([w, pred]),
        });
        self
    }

    /// 更新子查询匹配的行：复制其 WHERE 条件，FROM 为普通表时同时采用其表名。
    pub fn from_select(&mut self, s: &Selector) -> &mut Self {
        if let Some(w) = s.p() {
            self.where_(w.clone());
        }
        if let Some(t) = s.table() {
            self.table = t.name.clone();
        }
        self
    }

    /// 没有任何待更新的列。
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.nulls.is_empty()
    }
}

impl Querier for UpdateBuilder {
    fn render(&self, b: &mut Builder) {
        b.write_str("UPDATE ")
            .write_schema(&self.schema)
            .ident(&Column::name(self.table.as_str()))
            .write_str(" SET ");
        for (i, c) in self.nulls.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.ident(c).write_str(" = NULL");
        }
        if !self.nulls.is_empty() && !self.sets.is_empty() {
            b.comma();
        }
        for (i, (c, assign)) in self.sets.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.ident(c).write_str(" = ");
            match assign {
                Assign::Value(v) => {
                    b.arg_ref(v);
                }
                Assign::Add(v) => {
                    b.write_str("COALESCE")
                        .nested(|nb| {
                            nb.ident(c).write_str(", 0");
                        })
                        .write_str(" + ")
                        .arg_ref(v);
                }
            }
        }
        if let Some(w) = &self.where_ {
            b.write_str(" WHERE ");
            w.render(b);
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
