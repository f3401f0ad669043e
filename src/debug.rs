//! Debug：记录每次执行的 SQL 与参数后原样转发的包装器。

use crate::db::{Conn, ExecQuerier, ExecResult, Transaction};
use crate::value::SqlValue;
use std::fmt;

/// 透明的调试包装：通过 `tracing`（target `xsql::debug`）记录 SQL 与参数，
/// 结果和错误不做任何改动。
#[derive(Debug, Clone)]
pub struct Debug<C> {
    inner: C,
}

pub fn debug<C>(inner: C) -> Debug<C> {
    Debug::new(inner)
}

impl<C> Debug<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

struct Args<'a>(&'a [SqlValue]);

impl fmt::Display for Args<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

impl<C: ExecQuerier> ExecQuerier for Debug<C> {
    type Row = C::Row;
    type Error = C::Error;

    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, Self::Error> {
        tracing::debug!(target: "xsql::debug", sql, args = %Args(args), "exec");
        self.inner.exec(sql, args).await
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Self::Row>, Self::Error> {
        tracing::debug!(target: "xsql::debug", sql, args = %Args(args), "query");
        self.inner.query(sql, args).await
    }
}

impl<C: Conn> Conn for Debug<C> {
    type Tx = Debug<C::Tx>;

    async fn begin(&self) -> Result<Self::Tx, Self::Error> {
        tracing::debug!(target: "xsql::debug", "begin");
        self.inner.begin().await.map(Debug::new)
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        self.inner.ping().await
    }
}

impl<T: Transaction> Transaction for Debug<T> {
    async fn commit(self) -> Result<(), Self::Error> {
        tracing::debug!(target: "xsql::debug", "commit");
        self.inner.commit().await
    }

    async fn rollback(self) -> Result<(), Self::Error> {
        tracing::debug!(target: "xsql::debug", "rollback");
        self.inner.rollback().await
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use crate::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn args_display() {
        let args = [SqlValue::from(5_i64), SqlValue::from("x"), SqlValue::Null];
        assert_eq!(Args(&args).to_string(), "[5, 'x', NULL]");
        assert_eq!(Args(&[]).to_string(), "[]");
    }
}
