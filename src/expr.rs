//! SQL 表达式片段。

use crate::arg::Arg;
use crate::builder::{BuildError, Builder, Querier};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Part {
    Sql(String),
    Arg(Arg),
}

/// 一个可组合的 SQL 片段表达式。
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub(crate) parts: Vec<Part>,
    mismatch: Option<BuildError>,
}

impl Expr {
    /// 按 `?` 切分 `format`，依次绑定 `args`。
    ///
    /// 占位符会按方言重写（PostgreSQL 下为 `$n`）；个数不一致时在渲染时记录
    /// [`BuildError::ArgCount`]，多余的 `?` 原样保留。
    ///
    /// ```
    /// use xsql::{Expr, Querier};
    /// let (sql, args) = Expr::new("a = ? AND b > ?", [1, 2]).query();
    /// assert_eq!(sql, "a = ? AND b > ?");
    /// assert_eq!(args.len(), 2);
    /// ```
    pub fn new<I>(format: &str, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let args: Vec<Arg> = args.into_iter().map(Into::into).collect();
        let pieces: Vec<&str> = format.split('?').collect();
        let expected = pieces.len() - 1;

        let mut parts = Vec::with_capacity(pieces.len() * 2);
        let mut it = args.iter().cloned();
        for (i, piece) in pieces.iter().enumerate() {
            if !piece.is_empty() {
                parts.push(Part::Sql((*piece).to_string()));
            }
            if i == expected {
                break;
            }
            match it.next() {
                Some(a) => parts.push(Part::Arg(a)),
                None => parts.push(Part::Sql("?".to_string())),
            }
        }

        let mismatch = (expected != args.len()).then_some(BuildError::ArgCount {
            expected,
            got: args.len(),
        });
        Self { parts, mismatch }
    }

    /// 直接插入一段 SQL 文本（不会变成参数）。
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Sql(sql.into())],
            mismatch: None,
        }
    }

    /// 追加 SQL 文本。
    pub fn push_raw(&mut self, sql: impl Into<String>) {
        self.parts.push(Part::Sql(sql.into()));
    }

    /// 追加一个参数（构建时会生成占位符）。
    pub fn push_arg(&mut self, v: impl Into<Arg>) {
        self.parts.push(Part::Arg(v.into()));
    }

    /// 将当前表达式与另一个表达式连接（不自动添加空格）。
    pub fn concat(mut self, other: Expr) -> Self {
        self.parts.extend(other.parts);
        if self.mismatch.is_none() {
            self.mismatch = other.mismatch;
        }
        self
    }
}

impl Querier for Expr {
    fn render(&self, b: &mut Builder) {
        for part in &self.parts {
            match part {
                Part::Sql(s) => {
                    b.write_str(s);
                }
                Part::Arg(a) => {
                    b.arg_ref(a);
                }
            }
        }
        if let Some(err) = &self.mismatch {
            b.add_error(err.clone());
        }
    }
}

/// 以空格连接的一组表达式。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queries(pub Vec<Expr>);

impl Querier for Queries {
    fn render(&self, b: &mut Builder) {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                b.pad();
            }
            e.render(b);
        }
    }
}
