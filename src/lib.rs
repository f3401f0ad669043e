//! xsql：可组合的 SQL 语句/谓词构建器，以及读写分离的连接路由。
//!
//! ```
//! use xsql::{Querier, Selector, desc, eq, gt, or, table};
//!
//! let mut s = Selector::new();
//! s.from(table("t"))
//!     .where_(or([gt("id", 10), eq("name", "x")]))
//!     .order_by(desc("id"))
//!     .limit(3);
//! let (sql, args) = s.query();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM `t` WHERE `id` > ? OR `name` = ? ORDER BY `id` DESC LIMIT 3"
//! );
//! assert_eq!(args.len(), 2);
//! ```

pub mod arg;
pub mod builder;
#[cfg(test)]
mod builder_tests;
pub mod column;
pub mod crud;
pub mod db;
pub mod debug;
pub mod delete;
pub mod dialect;
pub mod expr;
pub mod func;
pub mod insert;
#[cfg(test)]
mod insert_tests;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod predicate;
#[cfg(test)]
mod predicate_tests;
pub mod select;
pub mod table;
pub mod timeout;
pub mod update;
pub mod value;

pub use crate::arg::{Arg, Param, ParamFormatter, StmtInfo, param, raw};
pub use crate::builder::{BuildError, BuildErrors, Builder, Op, Querier};
pub use crate::column::{Column, IntoColumns};
pub use crate::crud::{Create, CrudError, Delete, Entity, Find, FromRow, RowError, Update};
pub use crate::db::{Config, Conn, DB, ExecQuerier, ExecResult, Transaction};
pub use crate::debug::{Debug, debug};
pub use crate::delete::{DeleteBuilder, delete};
pub use crate::dialect::Dialect;
pub use crate::expr::{Expr, Queries};
pub use crate::func::{as_, asc, avg, count, desc, distinct, func, lower, max, min, sum};
pub use crate::insert::{InsertBuilder, insert};
#[cfg(feature = "mysql")]
pub use crate::mysql::{MySqlConn, MySqlTx};
pub use crate::predicate::{
    Command, Conj, Node, Predicate, Step, and, build_predicate, composite_gt, composite_lt,
    contains, eq, equal_fold, expr_p, false_, gt, gte, has_prefix, has_suffix, in_, in_select,
    is_null, like, lt, lte, neq, not, not_in, not_in_select, not_null, or, p,
};
pub use crate::select::{
    IndexAction, IndexFor, JoinKind, LockAction, LockStrength, Selector, select,
};
pub use crate::table::{SelectTable, TableView, table};
pub use crate::timeout::{CancelFunc, Context, ContextError, shrink};
pub use crate::update::{UpdateBuilder, update};
pub use crate::value::SqlValue;

/// 常用 trait 的便捷导入：`use xsql::prelude::*;`。
pub mod prelude {
    pub use crate::{Conn, ExecQuerier, IntoColumns, Querier, Transaction};
}
