//! SQL 方言：控制标识符引号与占位符风格。

use std::fmt;

/// SQL 方言。
///
/// 渲染协议默认固定为 MySQL 风格（反引号 + `?`），其余方言只影响引号和占位符，
/// `ON DUPLICATE KEY UPDATE`、锁子句等语法不随方言改变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    MySQL,
    SQLite,
    PostgreSQL,
}

impl Dialect {
    fn quote_char(self) -> char {
        match self {
            Self::MySQL => '`',
            Self::SQLite | Self::PostgreSQL => '"',
        }
    }

    /// 为标识符加引号，名字中的引号字符写两次。
    pub fn quote(self, ident: &str) -> String {
        let q = self.quote_char();
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(q);
        for ch in ident.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// 写入第 `index_1_based` 个参数的占位符。
    pub(crate) fn write_placeholder(self, index_1_based: usize, out: &mut String) {
        match self {
            Self::MySQL | Self::SQLite => out.push('?'),
            Self::PostgreSQL => {
                out.push('$');
                out.push_str(&index_1_based.to_string());
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite3",
            Self::PostgreSQL => "postgres",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::Dialect;

    #[test]
    fn write_placeholder_question_mark() {
        let mut s = String::new();
        Dialect::MySQL.write_placeholder(1, &mut s);
        Dialect::SQLite.write_placeholder(2, &mut s);
        assert_eq!(s, "??");
    }

    #[test]
    fn write_placeholder_dollar_numbered() {
        let mut s = String::new();
        Dialect::PostgreSQL.write_placeholder(12, &mut s);
        assert_eq!(s, "$12");
    }

    #[test]
    fn quote_by_dialect() {
        assert_eq!(Dialect::MySQL.quote("users"), "`users`");
        assert_eq!(Dialect::PostgreSQL.quote("users"), "\"users\"");
        assert_eq!(Dialect::SQLite.quote("users"), "\"users\"");
        assert_eq!(Dialect::default(), Dialect::MySQL);
    }

    #[test]
    fn quote_escapes_embedded_quotes() {
        assert_eq!(Dialect::MySQL.quote("a`b"), "`a``b`");
        assert_eq!(Dialect::MySQL.quote("a\"b"), "`a\"b`");
        assert_eq!(Dialect::PostgreSQL.quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::SQLite.quote("x`y"), "\"x`y\"");
    }
}
