//! Autoload 根目录注册表
//!
//! namespace 前缀 → 目录根的映射，把一棵虚拟 namespace 子树映射到真实
//! 路径子树。解析取最长段前缀；两个根只有前缀完全相同才可能并列，
//! 因此并列在挂载时就按重复前缀拒绝，不留到解析时。

use std::path::PathBuf;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::errors::ResolveError;
use crate::namespace;

#[derive(Default)]
pub struct AutoloadResolver {
    roots: DashMap<String, PathBuf>,
}

impl AutoloadResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 挂载一个根；重复前缀立即报 `AmbiguousAutoloadMount`
    pub fn mount(&self, prefix: &str, dir: impl Into<PathBuf>) -> Result<(), ResolveError> {
        let dir = dir.into();
        match self.roots.entry(prefix.to_string()) {
            Entry::Occupied(occupied) => Err(ResolveError::AmbiguousAutoloadMount {
                prefix: prefix.to_string(),
                existing: occupied.get().clone(),
                conflicting: dir,
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(dir);
                Ok(())
            }
        }
    }

    pub fn unmount(&self, prefix: &str) -> bool {
        self.roots.remove(prefix).is_some()
    }

    /// 最长段前缀匹配；把剩余段按文件系统分隔符拼到根目录下
    pub fn resolve(&self, namespace: &str) -> Option<PathBuf> {
        let mut best: Option<(usize, PathBuf, String)> = None;
        for entry in self.roots.iter() {
            let prefix = entry.key();
            if let Some(rest) = namespace::strip_segment_prefix(prefix, namespace) {
                let better = best
                    .as_ref()
                    .map_or(true, |(len, _, _)| prefix.len() > *len);
                if better {
                    best = Some((prefix.len(), entry.value().clone(), rest.to_string()));
                }
            }
        }

        best.map(|(_, mut path, rest)| {
            if !rest.is_empty() {
                for segment in rest.split(namespace::SEPARATOR) {
                    path.push(segment);
                }
            }
            path
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
