//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 核心层只返回结构化错误，面向用户的文案由路由层负责转换。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_jury_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum JuryError {
            $($variant(String),)*
        }

        impl JuryError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(JuryError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(JuryError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(JuryError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl JuryError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        JuryError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_jury_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    Storage("E003", "Storage Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Conflict Error"),
    Permission("E007", "Permission Error"),
    Authentication("E008", "Authentication Error"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
}

impl JuryError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否在写入任何数据之前就被拒绝（校验、权限类错误）
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            JuryError::Validation(_) | JuryError::Permission(_) | JuryError::Authentication(_)
        )
    }
}

impl fmt::Display for JuryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for JuryError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for JuryError {
    fn from(err: sea_orm::DbErr) -> Self {
        JuryError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for JuryError {
    fn from(err: serde_json::Error) -> Self {
        JuryError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for JuryError {
    fn from(err: chrono::ParseError) -> Self {
        JuryError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JuryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(JuryError::database_config("test").code(), "E001");
        assert_eq!(JuryError::storage("test").code(), "E003");
        assert_eq!(JuryError::validation("test").code(), "E004");
        assert_eq!(JuryError::conflict("test").code(), "E006");
        assert_eq!(JuryError::permission("test").code(), "E007");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(JuryError::not_found("test").error_type(), "Resource Not Found");
        assert_eq!(JuryError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_error_message() {
        let err = JuryError::conflict("already evaluated");
        assert_eq!(err.message(), "already evaluated");
    }

    #[test]
    fn test_format_simple() {
        let err = JuryError::validation("score out of range");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("score out of range"));
    }

    #[test]
    fn test_rejection_classification() {
        assert!(JuryError::validation("x").is_rejection());
        assert!(JuryError::permission("x").is_rejection());
        assert!(!JuryError::storage("x").is_rejection());
        assert!(!JuryError::conflict("x").is_rejection());
    }

    #[test]
    fn test_db_err_maps_to_storage() {
        let err: JuryError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E003");
    }
}
