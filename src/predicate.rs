//! Predicate：可组合的 WHERE / ON / HAVING 条件。
//!
//! 谓词由若干 step 组成，每个 step 是一串显式的 [`Command`]；渲染时按顺序
//! 在 builder 上执行。嵌套深度只在渲染时作为参数传递，用于决定是否加括号，
//! 谓词本身不保存任何渲染状态，因此同一个谓词可以反复渲染。

use crate::arg::Arg;
use crate::builder::{BuildError, Builder, Op, Querier};
use crate::column::{Column, IntoColumns, collect_columns};
use crate::expr::Expr;
use crate::func;
use crate::select::Selector;

/// AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conj {
    And,
    Or,
}

impl Conj {
    fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// 被 join 进谓词的子片段。
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Predicate(Predicate),
    Select(Box<Selector>),
    Expr(Expr),
}

/// 单条渲染指令。
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ident(Column),
    IdentList(Vec<Column>),
    Raw(String),
    Op(Op),
    Arg(Arg),
    Args(Vec<Arg>),
    /// 在括号内执行。
    Nested(Vec<Command>),
    Join(Node),
    /// 用 AND/OR 组合子谓词。
    Combine(Conj, Vec<Predicate>),
}

impl Command {
    fn exec(&self, b: &mut Builder, depth: usize) {
        match self {
            Self::Ident(c) => {
                b.ident(c);
            }
            Self::IdentList(cols) => {
                b.ident_comma(cols);
            }
            Self::Raw(s) => {
                b.write_str(s);
            }
            Self::Op(op) => {
                b.write_op(*op);
            }
            Self::Arg(a) => {
                b.arg_ref(a);
            }
            Self::Args(args) => {
                b.args_ref(args);
            }
            Self::Nested(cmds) => {
                b.nested(|nb| {
                    for c in cmds {
                        c.exec(nb, depth);
                    }
                });
            }
            Self::Join(node) => match node {
                Node::Predicate(p) => p.render_at(b, 0),
                Node::Select(s) => s.render(b),
                Node::Expr(e) => e.render(b),
            },
            Self::Combine(conj, preds) => may_wrap(preds, b, *conj, depth),
        }
    }
}

/// 一个 step：若干条按序执行的指令。
pub type Step = Vec<Command>;

/// 空谓词不参与连接，也不计入是否加括号。
fn may_wrap(preds: &[Predicate], b: &mut Builder, conj: Conj, depth: usize) {
    let preds: Vec<&Predicate> = preds.iter().filter(|p| !p.is_empty()).collect();
    match preds.len() {
        0 => return,
        1 => {
            preds[0].render_at(b, depth);
            return;
        }
        _ => {}
    }
    if depth > 0 {
        b.write_char('(');
    }
    for (i, p) in preds.iter().enumerate() {
        if i > 0 {
            b.pad().write_str(conj.keyword()).pad();
        }
        if p.steps.len() > 1 {
            b.nested(|nb| p.render_at(nb, depth + 1));
        } else {
            p.render_at(b, depth + 1);
        }
    }
    if depth > 0 {
        b.write_char(')');
    }
}

/// WHERE 条件。
///
/// ```
/// use xsql::{Querier, eq, gt, or};
/// let (sql, args) = or([gt("id", 10), eq("name", "x")]).query();
/// assert_eq!(sql, "`id` > ? OR `name` = ?");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    steps: Vec<Step>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 追加一个自定义 step。
    pub fn append(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    fn render_at(&self, b: &mut Builder, depth: usize) {
        for step in &self.steps {
            for c in step {
                c.exec(b, depth);
            }
        }
    }

    fn binary(self, col: impl Into<Column>, op: Op, v: impl Into<Arg>) -> Self {
        self.append(vec![
            Command::Ident(col.into()),
            Command::Op(op),
            Command::Arg(v.into()),
        ])
    }

    pub fn eq(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Eq, v)
    }

    pub fn neq(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Neq, v)
    }

    pub fn lt(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Lt, v)
    }

    pub fn lte(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Lte, v)
    }

    pub fn gt(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Gt, v)
    }

    pub fn gte(self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.binary(col, Op::Gte, v)
    }

    fn membership<I>(self, col: impl Into<Column>, op: Op, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let values: Vec<Arg> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            // 空集合不能渲染成 `IN ()`
            return self.false_();
        }
        self.append(vec![
            Command::Ident(col.into()),
            Command::Op(op),
            Command::Nested(vec![Command::Args(values)]),
        ])
    }

    /// `col IN (?, ...)`；空集合渲染为 `FALSE`。
    pub fn in_<I>(self, col: impl Into<Column>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.membership(col, Op::In, values)
    }

    /// `col NOT IN (?, ...)`；空集合同样渲染为 `FALSE`。
    pub fn not_in<I>(self, col: impl Into<Column>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.membership(col, Op::NotIn, values)
    }

    /// `col IN (SELECT ...)`
    pub fn in_select(self, col: impl Into<Column>, sel: Selector) -> Self {
        self.append(vec![
            Command::Ident(col.into()),
            Command::Op(Op::In),
            Command::Nested(vec![Command::Join(Node::Select(Box::new(sel)))]),
        ])
    }

    pub fn not_in_select(self, col: impl Into<Column>, sel: Selector) -> Self {
        self.append(vec![
            Command::Ident(col.into()),
            Command::Op(Op::NotIn),
            Command::Nested(vec![Command::Join(Node::Select(Box::new(sel)))]),
        ])
    }

    pub fn like(self, col: impl Into<Column>, pattern: impl Into<String>) -> Self {
        self.binary(col, Op::Like, pattern.into())
    }

    pub fn has_prefix(self, col: impl Into<Column>, prefix: &str) -> Self {
        self.like(col, format!("{prefix}%"))
    }

    pub fn has_suffix(self, col: impl Into<Column>, suffix: &str) -> Self {
        self.like(col, format!("%{suffix}"))
    }

    pub fn contains(self, col: impl Into<Column>, sub: &str) -> Self {
        self.like(col, format!("%{sub}%"))
    }

    /// `LOWER(col) = ?`，参数取小写。
    pub fn equal_fold(self, col: impl Into<Column>, sub: &str) -> Self {
        self.binary(func::lower(col), Op::Eq, sub.to_lowercase())
    }

    pub fn is_null(self, col: impl Into<Column>) -> Self {
        self.append(vec![Command::Ident(col.into()), Command::Op(Op::IsNull)])
    }

    pub fn not_null(self, col: impl Into<Column>) -> Self {
        self.append(vec![Command::Ident(col.into()), Command::Op(Op::NotNull)])
    }

    fn composite<I>(self, op: &str, cols: impl IntoColumns, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.append(vec![
            Command::Nested(vec![Command::IdentList(collect_columns(cols))]),
            Command::Raw(op.to_string()),
            Command::Nested(vec![Command::Args(
                values.into_iter().map(Into::into).collect(),
            )]),
        ])
    }

    /// `(a, b) > (?, ?)`
    pub fn composite_gt<I>(self, cols: impl IntoColumns, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.composite(" > ", cols, values)
    }

    /// `(a, b) < (?, ?)`
    pub fn composite_lt<I>(self, cols: impl IntoColumns, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.composite(" < ", cols, values)
    }

    pub fn false_(self) -> Self {
        self.append(vec![Command::Raw("FALSE".to_string())])
    }

    /// 追加 `NOT `，作用于后续 step。
    pub fn not(self) -> Self {
        self.append(vec![Command::Raw("NOT ".to_string())])
    }

    /// 追加 ` AND `，用于 `eq(..).and().eq(..)` 这样的链式写法。
    pub fn and(self) -> Self {
        self.append(vec![Command::Raw(" AND ".to_string())])
    }

    /// 追加 ` OR `。
    pub fn or(self) -> Self {
        self.append(vec![Command::Raw(" OR ".to_string())])
    }

    pub fn expr(self, e: Expr) -> Self {
        self.append(vec![Command::Join(Node::Expr(e))])
    }
}

impl Querier for Predicate {
    fn render(&self, b: &mut Builder) {
        self.render_at(b, 0);
    }
}

/// 空谓词，用于链式构造：`p().eq("a", 1).and().eq("b", 2)`。
pub fn p() -> Predicate {
    Predicate::new()
}

pub fn eq(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().eq(col, v)
}

pub fn neq(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().neq(col, v)
}

pub fn lt(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().lt(col, v)
}

pub fn lte(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().lte(col, v)
}

pub fn gt(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().gt(col, v)
}

pub fn gte(col: impl Into<Column>, v: impl Into<Arg>) -> Predicate {
    p().gte(col, v)
}

pub fn in_<I>(col: impl Into<Column>, values: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    p().in_(col, values)
}

pub fn not_in<I>(col: impl Into<Column>, values: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    p().not_in(col, values)
}

pub fn in_select(col: impl Into<Column>, sel: Selector) -> Predicate {
    p().in_select(col, sel)
}

pub fn not_in_select(col: impl Into<Column>, sel: Selector) -> Predicate {
    p().not_in_select(col, sel)
}

pub fn like(col: impl Into<Column>, pattern: impl Into<String>) -> Predicate {
    p().like(col, pattern)
}

pub fn has_prefix(col: impl Into<Column>, prefix: &str) -> Predicate {
    p().has_prefix(col, prefix)
}

pub fn has_suffix(col: impl Into<Column>, suffix: &str) -> Predicate {
    p().has_suffix(col, suffix)
}

pub fn contains(col: impl Into<Column>, sub: &str) -> Predicate {
    p().contains(col, sub)
}

pub fn equal_fold(col: impl Into<Column>, sub: &str) -> Predicate {
    p().equal_fold(col, sub)
}

pub fn is_null(col: impl Into<Column>) -> Predicate {
    p().is_null(col)
}

pub fn not_null(col: impl Into<Column>) -> Predicate {
    p().not_null(col)
}

pub fn composite_gt<I>(cols: impl IntoColumns, values: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    p().composite_gt(cols, values)
}

pub fn composite_lt<I>(cols: impl IntoColumns, values: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    p().composite_lt(cols, values)
}

/// `FALSE`
pub fn false_() -> Predicate {
    p().false_()
}

/// 由原始表达式构造谓词：`expr_p(Expr::new("a = ? AND b > ?", [1, 2]))`。
pub fn expr_p(e: Expr) -> Predicate {
    p().expr(e)
}

/// 用 AND 连接所有谓词。
pub fn and(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    p().append(vec![Command::Combine(
        Conj::And,
        preds.into_iter().collect(),
    )])
}

/// 用 OR 连接所有谓词。
pub fn or(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    p().append(vec![Command::Combine(
        Conj::Or,
        preds.into_iter().collect(),
    )])
}

/// `NOT (pred)`
pub fn not(pred: Predicate) -> Predicate {
    p().append(vec![
        Command::Raw("NOT ".to_string()),
        Command::Nested(vec![Command::Join(Node::Predicate(pred))]),
    ])
}

/// 由字段、运算符字符串与值构造谓词。`IN` / `NOT IN` 的值按 `,` 切分。
pub fn build_predicate(field: &str, op: &str, value: &str) -> Result<Predicate, BuildError> {
    let op: Op = op.parse()?;
    let pred = match op {
        Op::Eq => eq(field, value.to_string()),
        Op::Neq => neq(field, value.to_string()),
        Op::Gt => gt(field, value.to_string()),
        Op::Gte => gte(field, value.to_string()),
        Op::Lt => lt(field, value.to_string()),
        Op::Lte => lte(field, value.to_string()),
        Op::In => in_(field, value.split(',').map(str::to_string)),
        Op::NotIn => not_in(field, value.split(',').map(str::to_string)),
        Op::Like => like(field, value),
        Op::IsNull | Op::NotNull => {
            return Err(BuildError::UnsupportedOp(op.as_str().to_string()));
        }
    };
    Ok(pred)
}
