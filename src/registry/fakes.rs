//! Fake 注册表
//!
//! 测试用的临时覆盖层，优先级永远高于正常解析。Fake 默认每次解析
//! 重新执行工厂（瞬态等价）；`cache_fake` 打开时缓存首次结果，
//! `clear_fake` / `clear_all_fakes` 连同缓存一起丢弃。

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::{DynFactory, SharedValue};

/// 单个 fake 的配置
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeOptions {
    /// 缓存首次执行结果，后续解析直接返回
    pub cache_fake: bool,
}

/// Fake 条目；`cached` 槽只在 `cache` 打开时使用
#[derive(Clone)]
pub struct FakeEntry {
    pub factory: DynFactory,
    pub cache: bool,
    pub cached: Arc<Mutex<Option<SharedValue>>>,
}

#[derive(Default)]
pub struct FakeRegistry {
    entries: DashMap<String, FakeEntry>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册/覆盖；覆盖会重置缓存槽
    pub fn insert(&self, namespace: &str, factory: DynFactory, options: FakeOptions) {
        self.entries.insert(
            namespace.to_string(),
            FakeEntry {
                factory,
                cache: options.cache_fake,
                cached: Arc::new(Mutex::new(None)),
            },
        );
    }

    pub fn lookup(&self, namespace: &str) -> Option<FakeEntry> {
        self.entries.get(namespace).map(|entry| entry.clone())
    }

    /// 移除单个 fake，连同其缓存值
    pub fn remove(&self, namespace: &str) -> bool {
        self.entries.remove(namespace).is_some()
    }

    /// 一次性移除全部 fake
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
