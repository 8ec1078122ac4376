//! namespace 字符串工具
//!
//! namespace 形如 `Scope/Module` 或 `Scope/SubScope/Module`，
//! 大小写敏感，容器不做任何规范化。

/// 段分隔符
pub const SEPARATOR: char = '/';

/// 判断 `prefix` 是否为 `namespace` 的段前缀
///
/// `App` 是 `App/Services/Foo` 的段前缀，但不是 `Application/Foo` 的；
/// 前缀必须在段边界上对齐。
pub fn is_segment_prefix(prefix: &str, namespace: &str) -> bool {
    if prefix.is_empty() || !namespace.starts_with(prefix) {
        return false;
    }
    let rest = &namespace[prefix.len()..];
    rest.is_empty() || rest.starts_with(SEPARATOR)
}

/// 去掉段前缀，返回剩余的段（不含开头分隔符）；前缀不匹配时返回 `None`
pub fn strip_segment_prefix<'a>(prefix: &str, namespace: &'a str) -> Option<&'a str> {
    if !is_segment_prefix(prefix, namespace) {
        return None;
    }
    let rest = &namespace[prefix.len()..];
    Some(rest.strip_prefix(SEPARATOR).unwrap_or(rest))
}
