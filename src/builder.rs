//! Builder：SQL 文本与参数的累加器。
//!
//! 所有语句/谓词最终都渲染进一个 `Builder`；占位符编号由 `total` 统一维护，
//! 因此任意深度的嵌套渲染都能保证“第 N 个占位符对应第 N 个参数”。

use crate::arg::{Arg, StmtInfo};
use crate::column::Column;
use crate::dialect::Dialect;
use crate::value::SqlValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 构建阶段的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("op:{0} is not support")]
    UnsupportedOp(String),
    #[error("expression expects {expected} args, got {got}")]
    ArgCount { expected: usize, got: usize },
}

/// 多个构建错误拼接后的结果，消息以 `"; "` 分隔。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct BuildErrors(pub Vec<BuildError>);

fn join_messages(errs: &[BuildError]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 谓词运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
    IsNull,
    NotNull,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::IsNull => "IS NULL",
            Self::NotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析用户输入的运算符（忽略大小写与首尾空白）。`IS NULL` 类运算符不接受字符串形式。
impl FromStr for Op {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" => Ok(Self::Eq),
            "<>" => Ok(Self::Neq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            "IN" => Ok(Self::In),
            "NOT IN" => Ok(Self::NotIn),
            "LIKE" => Ok(Self::Like),
            _ => Err(BuildError::UnsupportedOp(s.to_string())),
        }
    }
}

/// 可渲染为 SQL 片段的对象。
pub trait Querier {
    /// 把自身写入 `b`，参数编号接续 `b` 当前的 total。
    fn render(&self, b: &mut Builder);

    /// 独立渲染时使用的方言。
    fn dialect(&self) -> Dialect {
        Dialect::default()
    }

    /// 从一个全新的 builder 开始渲染，便于检查累积的错误。
    fn build(&self) -> Builder {
        let mut b = Builder::with_dialect(self.dialect());
        self.render(&mut b);
        b
    }

    /// 返回 `(sql, args)`；重复调用结果一致。
    fn query(&self) -> (String, Vec<SqlValue>) {
        self.build().into_parts()
    }
}

impl<T: Querier + ?Sized> Querier for &T {
    fn render(&self, b: &mut Builder) {
        (**self).render(b)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

/// SQL 文本累加器。
#[derive(Debug, Clone, Default)]
pub struct Builder {
    buf: String,
    dialect: Dialect,
    args: Vec<SqlValue>,
    total: usize,
    errs: Vec<BuildError>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 到目前为止写入的参数个数（含嵌套作用域）。
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.buf, self.args)
    }

    pub fn write_str(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    pub fn write_char(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    pub fn comma(&mut self) -> &mut Self {
        self.write_str(", ")
    }

    pub fn pad(&mut self) -> &mut Self {
        self.write_char(' ')
    }

    /// 写入标识符。
    pub fn ident(&mut self, col: &Column) -> &mut Self {
        col.write_to(self.dialect, &mut self.buf);
        self
    }

    /// 以逗号分隔写入多个标识符。
    pub fn ident_comma(&mut self, cols: &[Column]) -> &mut Self {
        for (i, c) in cols.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.ident(c);
        }
        self
    }

    /// 写入 `schema.`（schema 为空时不写）。
    pub(crate) fn write_schema(&mut self, schema: &str) -> &mut Self {
        if !schema.is_empty() {
            self.buf.push_str(&self.dialect.quote(schema));
            self.buf.push('.');
        }
        self
    }

    /// 写入一个参数。
    pub fn arg(&mut self, a: impl Into<Arg>) -> &mut Self {
        let a = a.into();
        self.arg_ref(&a)
    }

    pub(crate) fn arg_ref(&mut self, a: &Arg) -> &mut Self {
        match a {
            Arg::Value(v) => {
                self.total += 1;
                self.dialect.write_placeholder(self.total, &mut self.buf);
                self.args.push(v.clone());
            }
            Arg::Param(p) => {
                self.total += 1;
                let mut placeholder = String::new();
                self.dialect.write_placeholder(self.total, &mut placeholder);
                let info = StmtInfo {
                    dialect: self.dialect,
                };
                let formatted = p.formatter.format_param(&placeholder, &info);
                self.buf.push_str(&formatted);
                self.args.push(p.value.clone());
            }
            Arg::Raw(s) => self.buf.push_str(s),
            Arg::Expr(e) => e.render(self),
        }
        self
    }

    /// 以逗号分隔写入多个参数。
    pub fn args<I>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for (i, a) in args.into_iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.arg(a);
        }
        self
    }

    pub(crate) fn args_ref(&mut self, args: &[Arg]) -> &mut Self {
        for (i, a) in args.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.arg_ref(a);
        }
        self
    }

    /// 在独立的子 builder 中渲染 `f`，用括号包裹后合并回当前 builder。
    pub fn nested(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
        let mut nb = Builder {
            buf: String::from("("),
            dialect: self.dialect,
            args: Vec::new(),
            total: self.total,
            errs: Vec::new(),
        };
        f(&mut nb);
        nb.buf.push(')');
        self.buf.push_str(&nb.buf);
        self.args.append(&mut nb.args);
        self.total = nb.total;
        self.errs.append(&mut nb.errs);
        self
    }

    pub fn join(&mut self, q: &dyn Querier) -> &mut Self {
        q.render(self);
        self
    }

    /// 依次渲染多个片段，中间以逗号分隔。
    pub fn join_comma(&mut self, qs: &[&dyn Querier]) -> &mut Self {
        for (i, q) in qs.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            q.render(self);
        }
        self
    }

    /// 二元运算符两侧补空格；`IS NULL` / `IS NOT NULL` 只在左侧补空格。
    pub fn write_op(&mut self, op: Op) -> &mut Self {
        self.pad().write_str(op.as_str());
        if !matches!(op, Op::IsNull | Op::NotNull) {
            self.pad();
        }
        self
    }

    pub fn add_error(&mut self, err: BuildError) -> &mut Self {
        self.errs.push(err);
        self
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errs
    }

    /// 构建期间累积的所有错误。
    pub fn err(&self) -> Result<(), BuildErrors> {
        if self.errs.is_empty() {
            Ok(())
        } else {
            Err(BuildErrors(self.errs.clone()))
        }
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

/// builder 本身也可以作为片段被 join（例如预先拼好的一段 SQL）。
impl Querier for Builder {
    fn render(&self, b: &mut Builder) {
        b.buf.push_str(&self.buf);
        b.args.extend(self.args.iter().cloned());
        b.total += self.args.len();
        b.errs.extend(self.errs.iter().cloned());
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
