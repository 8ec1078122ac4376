//! 错误类型定义
//!
//! 管线自身只产生 `NotFound` / `CyclicAlias` / `CircularDependency` /
//! `AmbiguousAutoloadMount` 几类错误；工厂和加载器的失败原样透传，
//! 容器不做任何翻译或重试。

use std::path::PathBuf;

use thiserror::Error;

/// 工厂与加载器可携带的任意错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 解析错误
#[derive(Debug, Error)]
pub enum ResolveError {
    /// 没有任何一级（Fake/Binding/Alias/Autoload/回退加载）能解析该 namespace
    #[error("namespace '{namespace}' is not bound, aliased, autoloadable or loadable")]
    NotFound { namespace: String },

    /// Alias 链回到了本次解析已经访问过的 namespace
    #[error("cyclic alias chain: {}", chain.join(" -> "))]
    CyclicAlias { chain: Vec<String> },

    /// 工厂在构造期间（直接或间接）重新解析了正在解析中的 namespace
    #[error("circular dependency while resolving: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// 同一前缀重复挂载，挂载时立即失败而不是留到解析时
    #[error("autoload prefix '{prefix}' is already mounted at '{}'", existing.display())]
    AmbiguousAutoloadMount {
        prefix: String,
        existing: PathBuf,
        conflicting: PathBuf,
    },

    /// 工厂本身执行失败，原始错误保留在 source 中
    #[error("factory for '{namespace}' failed: {source}")]
    Factory {
        namespace: String,
        #[source]
        source: BoxError,
    },

    /// 模块加载器报告了「存在但加载失败」之外的错误
    #[error("module loader failed for '{specifier}': {source}")]
    Loader {
        specifier: String,
        #[source]
        source: BoxError,
    },

    /// `resolve_as` 下转型失败
    #[error("value resolved at '{namespace}' is not a {expected}")]
    TypeMismatch {
        namespace: String,
        expected: &'static str,
    },
}

/// 模块加载器错误
///
/// `NotFound` 参与管线回退（autoload 未命中继续走通用加载），
/// `Failed` 表示模块存在但加载失败，立即终止解析。
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module not found")]
    NotFound,
    #[error(transparent)]
    Failed(#[from] BoxError),
}
