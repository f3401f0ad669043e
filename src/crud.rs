//! 面向单表实体的 Create / Find / Update / Delete 入口。
//!
//! 每个入口内部构造对应的语句构建器，渲染后交给 [`ExecQuerier`] 执行，
//! 并通过 [`shrink`] 为单次调用设置超时。

use crate::arg::Arg;
use crate::builder::Querier;
use crate::column::{Column, IntoColumns};
use crate::db::ExecQuerier;
use crate::delete::DeleteBuilder;
use crate::func;
use crate::insert::InsertBuilder;
use crate::predicate::Predicate;
use crate::select::Selector;
use crate::table::table;
use crate::timeout::{Context, ContextError, shrink};
use crate::update::UpdateBuilder;
use crate::value::SqlValue;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;
use thiserror::Error;

/// 映射到一张表的实体。
pub trait Entity: Send + Sync {
    const TABLE: &'static str;
    /// 全部列，顺序与 [`Entity::values`] 一致。
    const COLUMNS: &'static [&'static str];
    /// 自增主键列。
    const PRIMARY_KEY: &'static str;

    fn values(&self) -> Vec<SqlValue>;

    /// 当前主键值，0 表示未设置。
    fn primary_key(&self) -> u64;

    fn set_primary_key(&mut self, id: u64);
}

/// 从驱动返回的行解码。
pub trait FromRow<R>: Sized {
    fn from_row(row: &R) -> Result<Self, RowError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("decode column {column}: {message}")]
    Decode { column: String, message: String },
}

/// 执行入口的错误。驱动错误原样保存在 `Exec` 中。
#[derive(Debug, Error)]
pub enum CrudError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Exec(E),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("no rows in result set")]
    NoRows,
    #[error("nothing to {0}")]
    Empty(&'static str),
}

impl<E: std::error::Error + 'static> CrudError<E> {
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }
}

async fn bounded<F, T, E>(
    ctx: &Context,
    timeout: Duration,
    fut: F,
) -> Result<T, CrudError<E>>
where
    F: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    let (_, ctx, _cancel) = shrink(ctx, timeout);
    ctx.run(fut).await?.map_err(CrudError::Exec)
}

/// INSERT 入口。
pub struct Create<'a, Q, T> {
    eq: &'a Q,
    upsert: bool,
    timeout: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, Q: ExecQuerier, T: Entity> Create<'a, Q, T> {
    pub fn new(eq: &'a Q) -> Self {
        Self {
            eq,
            upsert: false,
            timeout: Duration::ZERO,
            _entity: PhantomData,
        }
    }

    /// 主键冲突时更新全部列。
    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }

    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// 一次写入所有行，返回影响行数。
    ///
    /// 只写入一行且主键未设置时，用驱动返回的自增 id 回填主键；多行写入不回填。
    pub async fn save(self, ctx: &Context, rows: &mut [T]) -> Result<u64, CrudError<Q::Error>> {
        if rows.is_empty() {
            return Err(CrudError::Empty("insert"));
        }
        let mut ib = InsertBuilder::new(T::TABLE);
        ib.columns(T::COLUMNS);
        if self.upsert {
            ib.on_duplicate_key_update(T::COLUMNS);
        }
        for row in rows.iter() {
            ib.values(row.values());
        }
        let (sql, args) = ib.query();
        let res = bounded(ctx, self.timeout, self.eq.exec(&sql, &args)).await?;

        if let [row] = rows {
            if row.primary_key() == 0 && res.last_insert_id > 0 {
                row.set_primary_key(res.last_insert_id);
            }
        }
        Ok(res.rows_affected)
    }
}

/// SELECT 入口。
pub struct Find<'a, Q, T> {
    eq: &'a Q,
    builder: Selector,
    timeout: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, Q: ExecQuerier, T: Entity> Find<'a, Q, T> {
    pub fn new(eq: &'a Q) -> Self {
        let mut builder = Selector::new();
        builder.from(table(T::TABLE));
        Self {
            eq,
            builder,
            timeout: Duration::ZERO,
            _entity: PhantomData,
        }
    }

    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    pub fn select(mut self, cols: impl IntoColumns) -> Self {
        self.builder.select(cols);
        self
    }

    pub fn count(mut self, cols: impl IntoColumns) -> Self {
        self.builder.count(cols);
        self
    }

    pub fn where_(mut self, pred: Predicate) -> Self {
        self.builder.where_(pred);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.builder.offset(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.builder.limit(limit);
        self
    }

    pub fn order_desc(mut self, col: impl Into<Column>) -> Self {
        self.builder.order_by(func::desc(col));
        self
    }

    pub fn order_asc(mut self, col: impl Into<Column>) -> Self {
        self.builder.order_by(func::asc(col));
        self
    }

    pub fn force_index(mut self, names: impl IntoColumns) -> Self {
        self.builder.force_index(names);
        self
    }

    pub fn group_by(mut self, cols: impl IntoColumns) -> Self {
        self.builder.group_by(cols);
        self
    }

    pub fn having(mut self, pred: Predicate) -> Self {
        self.builder.having(pred);
        self
    }

    /// 底层的 selector，用于设置上面没有覆盖到的子句。
    pub fn builder_mut(&mut self) -> &mut Selector {
        &mut self.builder
    }

    /// 按当前设置查询，返回驱动的原始行。
    pub async fn rows(&self, ctx: &Context) -> Result<Vec<Q::Row>, CrudError<Q::Error>> {
        let (sql, args) = self.builder.query();
        bounded(ctx, self.timeout, self.eq.query(&sql, &args)).await
    }

    /// 未指定列时查询实体的全部列。
    pub async fn all(mut self, ctx: &Context) -> Result<Vec<T>, CrudError<Q::Error>>
    where
        T: FromRow<Q::Row>,
    {
        if self.builder.select_columns_len() == 0 {
            self.builder.select(T::COLUMNS);
        }
        let rows = self.rows(ctx).await?;
        rows.iter()
            .map(|r| T::from_row(r).map_err(CrudError::from))
            .collect()
    }

    /// 只取一行；没有结果时返回 [`CrudError::NoRows`]。
    pub async fn one(mut self, ctx: &Context) -> Result<T, CrudError<Q::Error>>
    where
        T: FromRow<Q::Row>,
    {
        self.builder.limit(1);
        self.all(ctx)
            .await?
            .into_iter()
            .next()
            .ok_or(CrudError::NoRows)
    }
}

/// UPDATE 入口。
pub struct Update<'a, Q, T> {
    eq: &'a Q,
    builder: UpdateBuilder,
    timeout: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, Q: ExecQuerier, T: Entity> Update<'a, Q, T> {
    pub fn new(eq: &'a Q) -> Self {
        Self {
            eq,
            builder: UpdateBuilder::new(T::TABLE),
            timeout: Duration::ZERO,
            _entity: PhantomData,
        }
    }

    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    pub fn set(mut self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.builder.set(col, v);
        self
    }

    /// `col = COALESCE(col, 0) + v`
    pub fn add(mut self, col: impl Into<Column>, v: impl Into<Arg>) -> Self {
        self.builder.add(col, v);
        self
    }

    pub fn set_null(mut self, col: impl Into<Column>) -> Self {
        self.builder.set_null(col);
        self
    }

    pub fn where_(mut self, pred: Predicate) -> Self {
        self.builder.where_(pred);
        self
    }

    /// 执行更新，返回影响行数。
    pub async fn save(self, ctx: &Context) -> Result<u64, CrudError<Q::Error>> {
        if self.builder.is_empty() {
            return Err(CrudError::Empty("update"));
        }
        let (sql, args) = self.builder.query();
        let res = bounded(ctx, self.timeout, self.eq.exec(&sql, &args)).await?;
        Ok(res.rows_affected)
    }
}

/// DELETE 入口。
pub struct Delete<'a, Q, T> {
    eq: &'a Q,
    builder: DeleteBuilder,
    timeout: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, Q: ExecQuerier, T: Entity> Delete<'a, Q, T> {
    pub fn new(eq: &'a Q) -> Self {
        Self {
            eq,
            builder: DeleteBuilder::new(T::TABLE),
            timeout: Duration::ZERO,
            _entity: PhantomData,
        }
    }

    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    pub fn where_(mut self, pred: Predicate) -> Self {
        self.builder.where_(pred);
        self
    }

    /// 执行删除，返回影响行数。
    pub async fn exec(self, ctx: &Context) -> Result<u64, CrudError<Q::Error>> {
        let (sql, args) = self.builder.query();
        let res = bounded(ctx, self.timeout, self.eq.exec(&sql, &args)).await?;
        Ok(res.rows_affected)
    }
}
