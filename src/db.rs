//! 读写分离的连接路由。
//!
//! 写操作与事务固定走主库；读操作在只读连接之间轮询，未配置只读连接时回落到主库。
//! 刚写入的数据需要立即读到时，调用方应通过 [`DB::master`] 显式读主库。

use crate::value::SqlValue;
use serde::{Deserialize, Deserializer};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 执行写语句的结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// 单行插入时驱动返回的自增主键。
    pub last_insert_id: u64,
}

/// 执行/查询能力。错误类型由驱动决定，本库原样透传。
pub trait ExecQuerier: Send + Sync {
    type Row: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    fn exec(
        &self,
        sql: &str,
        args: &[SqlValue],
    ) -> impl Future<Output = Result<ExecResult, Self::Error>> + Send;

    fn query(
        &self,
        sql: &str,
        args: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;
}

/// 事务。
pub trait Transaction: ExecQuerier {
    fn commit(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
    fn rollback(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// 可开启事务的连接。
pub trait Conn: ExecQuerier {
    type Tx: Transaction<Row = Self::Row, Error = Self::Error>;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, Self::Error>> + Send;

    fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// 连接配置，时长字段以毫秒表示。
///
/// ```
/// use std::time::Duration;
/// use xsql::Config;
/// let c = Config::new("mysql://root@localhost/test")
///     .read_dsn(["mysql://root@replica/test"])
///     .query_timeout(Duration::from_millis(500));
/// assert_eq!(c.read_dsn.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 主库 DSN。
    pub dsn: String,
    /// 只读库 DSN，为空时读主库。
    pub read_dsn: Vec<String>,
    /// 连接池最大连接数。
    pub active: u32,
    /// 连接池最大空闲连接数。
    pub idle: u32,
    #[serde(deserialize_with = "millis")]
    pub idle_timeout: Duration,
    #[serde(deserialize_with = "millis")]
    pub query_timeout: Duration,
    #[serde(deserialize_with = "millis")]
    pub exec_timeout: Duration,
}

fn millis<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_millis)
}

impl Config {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    pub fn read_dsn<I, S>(mut self, dsn: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_dsn = dsn.into_iter().map(Into::into).collect();
        self
    }

    pub fn active(mut self, n: u32) -> Self {
        self.active = n;
        self
    }

    pub fn idle(mut self, n: u32) -> Self {
        self.idle = n;
        self
    }

    pub fn idle_timeout(mut self, d: Duration) -> Self {
        self.idle_timeout = d;
        self
    }

    pub fn query_timeout(mut self, d: Duration) -> Self {
        self.query_timeout = d;
        self
    }

    pub fn exec_timeout(mut self, d: Duration) -> Self {
        self.exec_timeout = d;
        self
    }
}

/// 读写分离路由。
#[derive(Debug)]
pub struct DB<C> {
    master: Arc<C>,
    slaves: Vec<Arc<C>>,
    idx: AtomicU64,
    config: Config,
}

impl<C: Conn> DB<C> {
    /// `slaves` 为空时读请求回落到 `master`。
    pub fn new(master: C, slaves: Vec<C>) -> Self {
        let master = Arc::new(master);
        let mut slaves: Vec<Arc<C>> = slaves.into_iter().map(Arc::new).collect();
        if slaves.is_empty() {
            slaves.push(master.clone());
        }
        Self {
            master,
            slaves,
            idx: AtomicU64::new(0),
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 主库连接，用于需要读到最新写入的场景。
    pub fn master(&self) -> &C {
        &self.master
    }

    /// 轮询选择一个只读连接。
    pub fn slave(&self) -> &C {
        let v = self.idx.fetch_add(1, Ordering::Relaxed);
        let i = (v % self.slaves.len() as u64) as usize;
        tracing::trace!(target: "xsql::db", replica = i, "route read");
        &self.slaves[i]
    }

    pub fn slaves_len(&self) -> usize {
        self.slaves.len()
    }
}

impl<C: Conn> ExecQuerier for DB<C> {
    type Row = C::Row;
    type Error = C::Error;

    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, Self::Error> {
        self.master.exec(sql, args).await
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Self::Row>, Self::Error> {
        self.slave().query(sql, args).await
    }
}

impl<C: Conn> Conn for DB<C> {
    type Tx = C::Tx;

    async fn begin(&self) -> Result<Self::Tx, Self::Error> {
        self.master.begin().await
    }

    /// 依次 ping 主库与所有只读库，遇到第一个错误即返回。
    async fn ping(&self) -> Result<(), Self::Error> {
        self.master.ping().await?;
        for s in &self.slaves {
            s.ping().await?;
        }
        Ok(())
    }
}
