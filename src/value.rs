//! SQL 参数值类型。

use std::borrow::Cow;
use std::fmt;
use time::format_description::well_known::Rfc3339;

/// 绑定到占位符上的参数值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    DateTime(time::OffsetDateTime),
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// 以接近 SQL 字面量的形式输出，仅用于日志。
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::DateTime(v) => match v.format(&Rfc3339) {
                Ok(s) => write!(f, "'{s}'"),
                Err(_) => write!(f, "{v:?}"),
            },
        }
    }
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

/// 按位宽无损提升到 64 位的数值类型。
macro_rules! value_from_widen {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for SqlValue {
                fn from(v: $t) -> Self {
                    Self::$variant(<$wide>::from(v))
                }
            }
        )+
    };
}

value_from_widen!(I64 as i64: i8, i16, i32, i64);
value_from_widen!(U64 as u64: u8, u16, u32, u64);
value_from_widen!(F64 as f64: f32, f64);

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<time::OffsetDateTime> for SqlValue {
    fn from(v: time::OffsetDateTime) -> Self {
        Self::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlValue;
    use time::macros::datetime;

    #[test]
    fn from_option_some() {
        assert_eq!(SqlValue::from_option(Some(123_i64)), SqlValue::I64(123));
    }

    #[test]
    fn from_option_none() {
        assert_eq!(SqlValue::from_option::<i64>(None), SqlValue::Null);
        assert!(SqlValue::from(()).is_null());
    }

    #[test]
    fn numbers_widen() {
        assert_eq!(SqlValue::from(-3_i8), SqlValue::I64(-3));
        assert_eq!(SqlValue::from(3_u16), SqlValue::U64(3));
        assert_eq!(SqlValue::from(1.5_f32), SqlValue::F64(1.5));
    }

    #[test]
    fn from_string_borrowed_and_owned() {
        let a: SqlValue = "abc".into();
        let b: SqlValue = String::from("abc").into();
        assert_eq!(a, b);
    }

    #[test]
    fn display_is_literal_like() {
        assert_eq!(SqlValue::from("it's").to_string(), "'it''s'");
        assert_eq!(SqlValue::from(7_i32).to_string(), "7");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::from(vec![1_u8, 2]).to_string(), "<2 bytes>");
        assert_eq!(
            SqlValue::from(datetime!(2024-01-02 03:04:05 UTC)).to_string(),
            "'2024-01-02T03:04:05Z'"
        );
    }
}
