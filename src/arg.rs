//! Arg：写入 builder 的参数，以及自定义占位符格式的扩展点。

use crate::dialect::Dialect;
use crate::expr::Expr;
use crate::value::SqlValue;
use dyn_clone::DynClone;
use std::fmt;

/// 传给 [`ParamFormatter`] 的语句信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StmtInfo {
    pub dialect: Dialect,
}

/// 为某类参数自定义占位符，例如把 MySQL 的 `?` 改写为 `ST_GeomFromWKB(?)`。
pub trait ParamFormatter: DynClone + fmt::Debug + Send + Sync {
    fn format_param(&self, placeholder: &str, info: &StmtInfo) -> String;
}

dyn_clone::clone_trait_object!(ParamFormatter);

/// 带自定义占位符格式的参数值。
#[derive(Debug, Clone)]
pub struct Param {
    pub value: SqlValue,
    pub formatter: Box<dyn ParamFormatter>,
}

/// 构造一个带自定义占位符格式的参数。
pub fn param(value: impl Into<SqlValue>, formatter: impl ParamFormatter + 'static) -> Arg {
    Arg::Param(Param {
        value: value.into(),
        formatter: Box::new(formatter),
    })
}

/// 标记为原样拼入 SQL（不会成为参数占位符）。
pub fn raw(sql: impl Into<String>) -> Arg {
    Arg::Raw(sql.into())
}

/// builder 接受的参数形态。
#[derive(Clone)]
pub enum Arg {
    /// 普通参数：写占位符并绑定值。
    Value(SqlValue),
    /// 经 [`ParamFormatter`] 改写占位符的参数。
    Param(Param),
    /// 原样写入的 SQL 片段。
    Raw(String),
    /// 子表达式：就地渲染，参数并入外层。
    Expr(Expr),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Param(p) => f.debug_tuple("Param").field(&p.value).finish(),
            Self::Raw(s) => f.debug_tuple("Raw").field(s).finish(),
            Self::Expr(e) => f.debug_tuple("Expr").field(e).finish(),
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Param(_), _) | (_, Self::Param(_)) => false,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Expr(a), Self::Expr(b)) => a == b,
            _ => false,
        }
    }
}

impl From<SqlValue> for Arg {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Expr> for Arg {
    fn from(v: Expr) -> Self {
        Self::Expr(v)
    }
}

impl From<Param> for Arg {
    fn from(v: Param) -> Self {
        Self::Param(v)
    }
}

macro_rules! arg_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    SqlValue::from(v).into()
                }
            }
        )*
    };
}

arg_from_value!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &'static str,
    Vec<u8>,
    time::OffsetDateTime,
);

impl<T> From<Option<T>> for Arg
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        SqlValue::from_option(v).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone)]
    struct Geom;

    impl ParamFormatter for Geom {
        fn format_param(&self, placeholder: &str, _info: &StmtInfo) -> String {
            format!("ST_GeomFromWKB({placeholder})")
        }
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Arg::from(1_i32), Arg::Value(SqlValue::I64(1)));
        assert_eq!(Arg::from(None::<i64>), Arg::Value(SqlValue::Null));
        assert_eq!(Arg::from(Some("a")), Arg::Value(SqlValue::from("a")));
        assert_eq!(raw("NOW()"), Arg::Raw("NOW()".into()));
    }

    #[test]
    fn param_is_cloneable_and_never_equal() {
        let p = param(vec![0_u8; 4], Geom);
        let q = p.clone();
        assert_ne!(p, q);
        match q {
            Arg::Param(p) => assert_eq!(p.value, SqlValue::Bytes(vec![0; 4])),
            other => panic!("unexpected {other:?}"),
        }
    }
}
