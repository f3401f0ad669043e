//! Column：结构化的标识符。
//!
//! 构造时就区分“需要加引号的名字”“函数调用”“原样 SQL 片段”等形态，
//! 渲染阶段不再根据字符串内容去猜测是否需要加引号。

use crate::dialect::Dialect;

/// 可出现在列位置上的标识符/表达式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// `*`
    Star,
    /// 单个名字，渲染时加引号。
    Name(String),
    /// 点号限定的名字：`schema`.`table`.`col`。
    Path(Vec<String>),
    /// `NAME(arg, ...)`，参数为空时渲染为 `NAME(*)`。
    Func { name: String, args: Vec<Column> },
    /// `DISTINCT a, b`
    Distinct(Vec<Column>),
    /// `col AS alias`
    As { col: Box<Column>, alias: String },
    /// `col ASC` / `col DESC`
    Order { col: Box<Column>, desc: bool },
    /// 原样写入。
    Raw(String),
}

impl Column {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// 由若干段组成的限定名，空段会被忽略。
    pub fn path(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let parts: Vec<String> = parts
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        match parts.len() {
            1 => Self::Name(parts.into_iter().next().unwrap_or_default()),
            _ => Self::Path(parts),
        }
    }

    /// 空名字渲染为空串（对应“未设置”的列）。
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Name(s) | Self::Raw(s) => s.is_empty(),
            Self::Path(p) => p.is_empty(),
            Self::Distinct(cols) => cols.is_empty(),
            _ => false,
        }
    }

    pub(crate) fn write_to(&self, dialect: Dialect, out: &mut String) {
        match self {
            Self::Star => out.push('*'),
            Self::Name(s) => {
                if !s.is_empty() {
                    out.push_str(&dialect.quote(s));
                }
            }
            Self::Path(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&dialect.quote(p));
                }
            }
            Self::Func { name, args } => {
                out.push_str(name);
                out.push('(');
                if args.is_empty() {
                    out.push('*');
                }
                write_comma(args, dialect, out);
                out.push(')');
            }
            Self::Distinct(cols) => {
                out.push_str("DISTINCT ");
                write_comma(cols, dialect, out);
            }
            Self::As { col, alias } => {
                col.write_to(dialect, out);
                out.push_str(" AS ");
                out.push_str(&dialect.quote(alias));
            }
            Self::Order { col, desc } => {
                col.write_to(dialect, out);
                out.push_str(if *desc { " DESC" } else { " ASC" });
            }
            Self::Raw(s) => out.push_str(s),
        }
    }

    /// 按给定方言渲染成字符串。
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut s = String::new();
        self.write_to(dialect, &mut s);
        s
    }
}

fn write_comma(cols: &[Column], dialect: Dialect, out: &mut String) {
    for (i, c) in cols.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        c.write_to(dialect, out);
    }
}

impl From<&str> for Column {
    fn from(s: &str) -> Self {
        if s == "*" {
            Self::Star
        } else {
            Self::Name(s.to_string())
        }
    }
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        if s == "*" {
            Self::Star
        } else {
            Self::Name(s)
        }
    }
}

impl From<&String> for Column {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&Column> for Column {
    fn from(c: &Column) -> Self {
        c.clone()
    }
}

/// 允许 builder 方法同时接受单个列、数组、切片或 `Vec`。
pub trait IntoColumns {
    fn extend_into_columns(self, dst: &mut Vec<Column>);
}

impl IntoColumns for Column {
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.push(self);
    }
}

impl IntoColumns for String {
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.push(self.into());
    }
}

impl<'a> IntoColumns for &'a str {
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.push(self.into());
    }
}

impl<const N: usize, T> IntoColumns for [T; N]
where
    T: Into<Column>,
{
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

impl<'a, T> IntoColumns for &'a [T]
where
    T: Into<Column> + Clone,
{
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.extend(self.iter().cloned().map(Into::into));
    }
}

impl<T> IntoColumns for Vec<T>
where
    T: Into<Column>,
{
    fn extend_into_columns(self, dst: &mut Vec<Column>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

#[doc(hidden)]
pub fn collect_columns<T: IntoColumns>(value: T) -> Vec<Column> {
    let mut dst = Vec::new();
    value.extend_into_columns(&mut dst);
    dst
}

#[cfg(test)]
mod tests {
    use super::{Column, collect_columns};
    use crate::Dialect;
    use pretty_assertions::assert_eq;

    #[test]
    fn star_is_not_quoted() {
        assert_eq!(Column::from("*").to_sql(Dialect::MySQL), "*");
        assert_eq!(Column::from("id").to_sql(Dialect::MySQL), "`id`");
    }

    #[test]
    fn names_are_never_sniffed() {
        // 看起来像函数调用的名字仍然按名字处理
        assert_eq!(
            Column::from("COUNT(id)").to_sql(Dialect::MySQL),
            "`COUNT(id)`"
        );
        assert_eq!(
            Column::raw("COUNT(id)").to_sql(Dialect::MySQL),
            "COUNT(id)"
        );
    }

    #[test]
    fn path_skips_empty_parts() {
        assert_eq!(
            Column::path(["", "users", "id"]).to_sql(Dialect::PostgreSQL),
            "\"users\".\"id\""
        );
        assert_eq!(Column::path(["", "id"]), Column::name("id"));
    }

    #[test]
    fn collect_from_single_array_and_vec() {
        assert_eq!(collect_columns("a").len(), 1);
        assert_eq!(collect_columns(["a", "b"]).len(), 2);
        assert_eq!(collect_columns(vec![String::from("a")]).len(), 1);
        assert!(collect_columns(Vec::<&str>::new()).is_empty());
    }
}
