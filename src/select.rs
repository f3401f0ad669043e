//! Selector：构建 SELECT 语句。

use crate::builder::{Builder, Querier};
use crate::column::{Column, IntoColumns, collect_columns};
use crate::dialect::Dialect;
use crate::expr::Expr;
use crate::func;
use crate::predicate::{Command, Predicate, and, not, or, p};
use crate::table::{SelectTable, TableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    kind: JoinKind,
    view: TableView,
    on: Option<Predicate>,
}

/// 行锁强度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    Share,
    Update,
}

/// 遇到已被锁定的行时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAction {
    /// 不等待，直接报错。
    NoWait,
    /// 不等待，跳过被锁定的行。
    SkipLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lock {
    strength: LockStrength,
    action: Option<LockAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAction {
    Use,
    Force,
    Ignore,
}

impl IndexAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Use => "USE INDEX",
            Self::Force => "FORCE INDEX",
            Self::Ignore => "IGNORE INDEX",
        }
    }
}

/// 索引提示的作用范围。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFor {
    Join,
    OrderBy,
    GroupBy,
}

impl IndexFor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Join => "FOR JOIN",
            Self::OrderBy => "FOR ORDER BY",
            Self::GroupBy => "FOR GROUP BY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IndexHint {
    action: IndexAction,
    for_what: Option<IndexFor>,
    names: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
enum OrderTerm {
    Column(Column),
    Expr(Expr),
}

/// SELECT 语句构建器。
///
/// `not()` / `or()` 只影响紧随其后的一次 `where_` 调用，之后自动复位；
/// 需要明确语义时优先使用 [`and`] / [`or`] / [`not`] 组合谓词。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    dialect: Dialect,
    as_: String,
    columns: Vec<Column>,
    from: Option<TableView>,
    joins: Vec<Join>,
    where_: Option<Predicate>,
    or: bool,
    not: bool,
    order: Vec<OrderTerm>,
    group: Vec<Column>,
    having: Option<Predicate>,
    limit: Option<u64>,
    offset: Option<u64>,
    distinct: bool,
    lock: Option<Lock>,
    index: Option<IndexHint>,
}

/// `select(["id", "name"])`；空列表表示 `*`。
pub fn select(cols: impl IntoColumns) -> Selector {
    let mut s = Selector::new();
    s.select(cols);
    s
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// 替换选择的列，空列表表示 `*`。
    pub fn select(&mut self, cols: impl IntoColumns) -> &mut Self {
        self.columns = collect_columns(cols)
            .into_iter()
            .filter(|c| *c != Column::Star)
            .collect();
        self
    }

    /// 设置 FROM；未命名的子查询默认别名为 `t0`，JOIN 的子查询从 `t1` 开始编号。
    pub fn from(&mut self, view: impl Into<TableView>) -> &mut Self {
        let mut view = view.into();
        if let TableView::Select(s) = &mut view {
            if s.as_.is_empty() {
                s.as_ = "t0".to_string();
            }
        }
        self.from = Some(view);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    pub fn set_distinct(&mut self, v: bool) -> &mut Self {
        self.distinct = v;
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// 追加 WHERE 条件：默认以 AND 与已有条件组合。
    pub fn where_(&mut self, pred: Predicate) -> &mut Self {
        let pred = if std::mem::take(&mut self.not) {
            not(pred)
        } else {
            pred
        };
        let use_or = std::mem::take(&mut self.or);
        self.where_ = Some(match self.where_.take() {
            None => pred,
            Some(w) if use_or => or([w, pred]),
            Some(w) => and([w, pred]),
        });
        self
    }

    /// 下一次 `where_` 以 NOT 包裹。
    pub fn not(&mut self) -> &mut Self {
        self.not = true;
        self
    }

    /// 下一次 `where_` 以 OR 与已有条件组合。
    pub fn or(&mut self) -> &mut Self {
        self.or = true;
        self
    }

    pub fn p(&self) -> Option<&Predicate> {
        self.where_.as_ref()
    }

    /// 直接替换 WHERE 条件，并清除未消费的 NOT/OR 标记。
    pub fn set_p(&mut self, pred: Option<Predicate>) -> &mut Self {
        self.where_ = pred;
        self.or = false;
        self.not = false;
        self
    }

    /// 复制另一个 selector 的 WHERE 条件。
    pub fn from_select(&mut self, other: &Selector) -> &mut Self {
        self.where_ = other.where_.clone();
        self
    }

    pub fn table(&self) -> Option<&SelectTable> {
        match &self.from {
            Some(TableView::Table(t)) => Some(t),
            _ => None,
        }
    }

    pub fn join(&mut self, view: impl Into<TableView>) -> &mut Self {
        self.join_kind(JoinKind::Inner, view.into())
    }

    pub fn left_join(&mut self, view: impl Into<TableView>) -> &mut Self {
        self.join_kind(JoinKind::Left, view.into())
    }

    pub fn right_join(&mut self, view: impl Into<TableView>) -> &mut Self {
        self.join_kind(JoinKind::Right, view.into())
    }

    fn join_kind(&mut self, kind: JoinKind, mut view: TableView) -> &mut Self {
        // 未命名的表默认别名 t0，子查询为 t{序号}
        if view.alias().is_empty() {
            match &mut view {
                TableView::Table(t) => t.as_ = "t0".to_string(),
                TableView::Select(s) => s.as_ = format!("t{}", self.joins.len() + 1),
            }
        }
        self.joins.push(Join {
            kind,
            view,
            on: None,
        });
        self
    }

    /// 为最近一次 JOIN 追加 ON 条件。
    pub fn on_p(&mut self, pred: Predicate) -> &mut Self {
        if let Some(join) = self.joins.last_mut() {
            join.on = Some(match join.on.take() {
                None => pred,
                Some(on) => and([on, pred]),
            });
        }
        self
    }

    /// `ON c1 = c2`
    pub fn on(&mut self, c1: impl Into<Column>, c2: impl Into<Column>) -> &mut Self {
        self.on_p(p().append(vec![
            Command::Ident(c1.into()),
            Command::Op(crate::Op::Eq),
            Command::Ident(c2.into()),
        ]))
    }

    pub fn as_(&mut self, alias: impl Into<String>) -> &mut Self {
        self.as_ = alias.into();
        self
    }

    pub fn alias(&self) -> &str {
        &self.as_
    }

    /// 本查询结果中的列：有别名时为 `alias.col`，否则按 FROM 的表限定。
    pub fn c(&self, column: &str) -> Column {
        if !self.as_.is_empty() {
            return Column::path([self.as_.as_str(), column]);
        }
        match self.table() {
            Some(t) => t.c(column),
            None => Column::name(column),
        }
    }

    pub fn columns(&self, columns: &[&str]) -> Vec<Column> {
        columns.iter().map(|c| self.c(c)).collect()
    }

    pub fn selected_columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    pub fn select_columns_len(&self) -> usize {
        self.columns.len()
    }

    /// 把选择列替换为 `COUNT(..)`，不传列时为 `COUNT(*)`。
    pub fn count(&mut self, cols: impl IntoColumns) -> &mut Self {
        self.columns = vec![func::count(cols)];
        self
    }

    pub fn order_by(&mut self, cols: impl IntoColumns) -> &mut Self {
        self.order
            .extend(collect_columns(cols).into_iter().map(OrderTerm::Column));
        self
    }

    pub fn order_expr(&mut self, e: Expr) -> &mut Self {
        self.order.push(OrderTerm::Expr(e));
        self
    }

    pub fn group_by(&mut self, cols: impl IntoColumns) -> &mut Self {
        self.group.extend(collect_columns(cols));
        self
    }

    pub fn having(&mut self, pred: Predicate) -> &mut Self {
        self.having = Some(pred);
        self
    }

    fn index_hint(
        &mut self,
        action: IndexAction,
        for_what: Option<IndexFor>,
        names: impl IntoColumns,
    ) -> &mut Self {
        self.index = Some(IndexHint {
            action,
            for_what,
            names: collect_columns(names),
        });
        self
    }

    pub fn use_index(&mut self, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Use, None, names)
    }

    pub fn force_index(&mut self, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Force, None, names)
    }

    pub fn ignore_index(&mut self, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Ignore, None, names)
    }

    pub fn use_index_for(&mut self, for_what: IndexFor, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Use, Some(for_what), names)
    }

    pub fn force_index_for(&mut self, for_what: IndexFor, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Force, Some(for_what), names)
    }

    pub fn ignore_index_for(&mut self, for_what: IndexFor, names: impl IntoColumns) -> &mut Self {
        self.index_hint(IndexAction::Ignore, Some(for_what), names)
    }

    /// `FOR UPDATE` / `FOR SHARE`
    pub fn for_(&mut self, strength: LockStrength) -> &mut Self {
        self.lock = Some(Lock {
            strength,
            action: None,
        });
        self
    }

    pub fn for_update(&mut self) -> &mut Self {
        self.for_(LockStrength::Update)
    }

    pub fn for_share(&mut self) -> &mut Self {
        self.for_(LockStrength::Share)
    }

    /// 设置锁等待策略；需先调用 `for_update` / `for_share`。
    pub fn lock_action(&mut self, action: LockAction) -> &mut Self {
        if let Some(lock) = &mut self.lock {
            lock.action = Some(action);
        }
        self
    }

    fn write_index(&self, b: &mut Builder) {
        let Some(index) = &self.index else {
            return;
        };
        if index.names.is_empty() {
            return;
        }
        b.pad().write_str(index.action.as_str());
        if let Some(f) = index.for_what {
            b.pad().write_str(f.as_str());
        }
        b.pad().nested(|nb| {
            nb.ident_comma(&index.names);
        });
    }

    fn write_order(&self, b: &mut Builder) {
        b.write_str(" ORDER BY ");
        for (i, term) in self.order.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            match term {
                OrderTerm::Column(c) => {
                    b.ident(c);
                }
                OrderTerm::Expr(e) => {
                    b.join(e);
                }
            }
        }
    }

    fn write_lock(&self, b: &mut Builder) {
        let Some(lock) = &self.lock else {
            return;
        };
        b.write_str(match lock.strength {
            LockStrength::Update => " FOR UPDATE",
            LockStrength::Share => " FOR SHARE",
        });
        match lock.action {
            Some(LockAction::NoWait) => {
                b.write_str(" NOWAIT");
            }
            Some(LockAction::SkipLocked) => {
                b.write_str(" SKIP LOCKED");
            }
            None => {}
        }
    }
}

impl Querier for Selector {
    fn render(&self, b: &mut Builder) {
        b.write_str("SELECT ");
        if self.distinct {
            b.write_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            b.write_char('*');
        } else {
            b.ident_comma(&self.columns);
        }
        if let Some(from) = &self.from {
            b.write_str(" FROM ");
            from.render(b);
        }
        self.write_index(b);
        for join in &self.joins {
            b.pad().write_str(join.kind.as_str()).pad();
            join.view.render(b);
            if let Some(on) = &join.on {
                b.write_str(" ON ");
                on.render(b);
            }
        }
        if let Some(w) = &self.where_ {
            b.write_str(" WHERE ");
            w.render(b);
        }
        if !self.group.is_empty() {
            b.write_str(" GROUP BY ").ident_comma(&self.group);
        }
        if let Some(h) = &self.having {
            b.write_str(" HAVING ");
            h.render(b);
        }
        if !self.order.is_empty() {
            self.write_order(b);
        }
        if let Some(limit) = self.limit {
            b.write_str(" LIMIT ").write_str(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            b.write_str(" OFFSET ").write_str(&offset.to_string());
        }
        self.write_lock(b);
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
