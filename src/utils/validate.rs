use once_cell::sync::Lazy;
use regex::Regex;

static PHASE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,31}$").expect("Invalid phase name regex"));

/// 原因字段最大长度（字符）
pub const MAX_REASON_CHARS: usize = 500;

/// 名称字段最大长度（字符）
pub const MAX_NAME_CHARS: usize = 200;

pub fn validate_phase_name(name: &str) -> Result<(), &'static str> {
    // 阶段名：小写字母开头，只含小写字母、数字、下划线，最长 32
    if !PHASE_NAME_RE.is_match(name) {
        return Err("Phase name must start with a lowercase letter and contain only a-z, 0-9 or _");
    }
    Ok(())
}

/// 校验并规整原因字段，返回去除首尾空白后的文本
pub fn validate_reason(reason: &str) -> Result<String, &'static str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err("Reason is required");
    }
    if reason.chars().count() > MAX_REASON_CHARS {
        return Err("Reason must not exceed 500 characters");
    }
    Ok(reason.to_string())
}

/// 校验并规整名称字段
pub fn validate_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty");
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err("Name must not exceed 200 characters");
    }
    Ok(name.to_string())
}
