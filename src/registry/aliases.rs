//! Alias 表
//!
//! alias → 目标 namespace 的单跳查表。多跳链（alias → alias）由解析引擎
//! 循环完成，环检测集中在引擎一处，本层不感知。

use dashmap::DashMap;

/// Alias 表；多对一，多个 alias 可以指向同一 namespace
#[derive(Default)]
pub struct AliasTable {
    entries: DashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册/覆盖
    pub fn insert(&self, name: &str, target: &str) {
        self.entries.insert(name.to_string(), target.to_string());
    }

    /// 单跳解析
    pub fn target(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|entry| entry.clone())
    }

    pub fn remove(&self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
