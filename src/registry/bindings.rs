//! Binding 注册表
//!
//! namespace → 工厂 + 生命周期。namespace 在注册表内全局唯一，
//! 重复注册直接覆盖（last write wins），不产生重复条目。

use dashmap::DashMap;

use super::DynFactory;

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// 单例 - 首次解析后缓存，Binding 生命周期内工厂至多执行一次
    Singleton,
    /// 瞬态 - 每次解析都重新执行工厂，从不缓存
    Transient,
}

/// 注册条目
#[derive(Clone)]
pub struct Binding {
    pub factory: DynFactory,
    pub lifetime: Lifetime,
}

/// Binding 注册表
///
/// 本层不产生错误：缺失以 `None` 报告给解析引擎，由引擎决定如何回退。
#[derive(Default)]
pub struct BindingRegistry {
    entries: DashMap<String, Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册/覆盖
    pub fn insert(&self, namespace: &str, binding: Binding) {
        self.entries.insert(namespace.to_string(), binding);
    }

    /// 纯读取；克隆出条目以便在释放分片锁后再调用工厂
    pub fn lookup(&self, namespace: &str) -> Option<Binding> {
        self.entries.get(namespace).map(|entry| entry.clone())
    }

    pub fn remove(&self, namespace: &str) -> bool {
        self.entries.remove(namespace).is_some()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    pub fn lifetime_of(&self, namespace: &str) -> Option<Lifetime> {
        self.entries.get(namespace).map(|entry| entry.lifetime)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
