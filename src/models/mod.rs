//! 业务数据模型
//!
//! 每个领域拆分为 `entities`（业务实体）、`requests`（请求载荷）和 `responses`（响应载荷）。

use serde::{Deserialize, Serialize};

/// 定义与字符串一一对应的枚举，生成 `as_str`、`Display`、`FromStr` 以及 serde 映射
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    _ => Err(format!(
                        "无效的 {}: '{s}'. 支持: {}",
                        stringify!($name),
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}

pub mod assignments;
pub mod audit;
pub mod auth;
pub mod backups;
pub mod candidates;
pub mod common;
pub mod evaluations;
pub mod evaluators;
pub mod phases;
pub mod resets;
pub mod votes;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    ReplayDetected = 1010,
    InternalServerError = 1500,
}
