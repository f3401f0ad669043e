//! 基于 sqlx 连接池的 MySQL 实现。

use crate::crud::RowError;
use crate::db::{Config, Conn, DB, ExecQuerier, ExecResult, Transaction};
use crate::value::SqlValue;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Connection, Row};
use tokio::sync::Mutex;

fn bind<'q>(
    mut q: Query<'q, MySql, MySqlArguments>,
    args: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for a in args {
        q = match a {
            SqlValue::Null => q.bind(None::<i64>),
            SqlValue::Bool(v) => q.bind(*v),
            SqlValue::I64(v) => q.bind(*v),
            SqlValue::U64(v) => q.bind(*v),
            SqlValue::F64(v) => q.bind(*v),
            SqlValue::String(v) => q.bind(&**v),
            SqlValue::Bytes(v) => q.bind(v.as_slice()),
            SqlValue::DateTime(v) => q.bind(*v),
        };
    }
    q
}

/// 按列名读取一个值。
pub fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, RowError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(column).map_err(|e| match e {
        sqlx::Error::ColumnNotFound(c) => RowError::ColumnNotFound(c),
        other => RowError::Decode {
            column: column.to_string(),
            message: other.to_string(),
        },
    })
}

/// 单个 MySQL 连接池。
#[derive(Debug, Clone)]
pub struct MySqlConn {
    pool: MySqlPool,
}

impl MySqlConn {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 惰性建立连接池，首次使用时才真正连接。
    pub fn connect_lazy(dsn: &str, c: &Config) -> Result<Self, sqlx::Error> {
        let mut opts = MySqlPoolOptions::new();
        if c.active > 0 {
            opts = opts.max_connections(c.active);
        }
        if c.idle > 0 {
            let idle = if c.active > 0 { c.idle.min(c.active) } else { c.idle };
            opts = opts.min_connections(idle);
        }
        if !c.idle_timeout.is_zero() {
            opts = opts.idle_timeout(c.idle_timeout);
        }
        Ok(Self {
            pool: opts.connect_lazy(dsn)?,
        })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl ExecQuerier for MySqlConn {
    type Row = MySqlRow;
    type Error = sqlx::Error;

    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, Self::Error> {
        let res = bind(sqlx::query(sql), args).execute(&self.pool).await?;
        Ok(ExecResult {
            rows_affected: res.rows_affected(),
            last_insert_id: res.last_insert_id(),
        })
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Self::Row>, Self::Error> {
        bind(sqlx::query(sql), args).fetch_all(&self.pool).await
    }
}

impl Conn for MySqlConn {
    type Tx = MySqlTx;

    async fn begin(&self) -> Result<Self::Tx, Self::Error> {
        let tx = self.pool.begin().await?;
        Ok(MySqlTx { tx: Mutex::new(tx) })
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }
}

/// MySQL 事务。
#[derive(Debug)]
pub struct MySqlTx {
    tx: Mutex<sqlx::Transaction<'static, MySql>>,
}

impl ExecQuerier for MySqlTx {
    type Row = MySqlRow;
    type Error = sqlx::Error;

    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, Self::Error> {
        let mut tx = self.tx.lock().await;
        let res = bind(sqlx::query(sql), args).execute(&mut **tx).await?;
        Ok(ExecResult {
            rows_affected: res.rows_affected(),
            last_insert_id: res.last_insert_id(),
        })
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Self::Row>, Self::Error> {
        let mut tx = self.tx.lock().await;
        bind(sqlx::query(sql), args).fetch_all(&mut **tx).await
    }
}

impl Transaction for MySqlTx {
    async fn commit(self) -> Result<(), Self::Error> {
        self.tx.into_inner().commit().await
    }

    async fn rollback(self) -> Result<(), Self::Error> {
        self.tx.into_inner().rollback().await
    }
}

impl DB<MySqlConn> {
    /// 按配置创建主库与只读库连接池。
    pub fn connect(c: &Config) -> Result<Self, sqlx::Error> {
        let master = MySqlConn::connect_lazy(&c.dsn, c)?;
        let slaves = c
            .read_dsn
            .iter()
            .map(|dsn| MySqlConn::connect_lazy(dsn, c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DB::new(master, slaves).with_config(c.clone()))
    }
}
