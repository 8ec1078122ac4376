//! 依赖注入容器与解析管线
//!
//! 对给定 namespace 严格按序尝试：
//! 1. Fake 覆盖层
//! 2. Binding（单例走缓存，瞬态每次新建）
//! 3. Alias（重入整条管线，集中做环检测）
//! 4. Autoload（最长前缀映射到路径后交给模块加载器）
//! 5. 通用模块加载回退
//!
//! 每一步每次解析只尝试一次，没有重试。注册期写入约定发生在单线程
//! 引导阶段；解析期的单例缓存是并发安全的（每个 namespace 的工厂
//! 至多执行一次，竞争者阻塞等待胜者的结果）。

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::errors::{BoxError, LoadError, ResolveError};
use crate::loader::{ModuleLoader, StaticModuleLoader};
use crate::registry::aliases::AliasTable;
use crate::registry::autoload::AutoloadResolver;
use crate::registry::bindings::{Binding, BindingRegistry, Lifetime};
use crate::registry::fakes::{FakeEntry, FakeOptions, FakeRegistry};
use crate::registry::{DynFactory, SharedValue};

/// 容器配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// fake 未显式传 `FakeOptions` 时是否缓存其结果
    ///
    /// fake 一经注册会一直生效到 `clear_fake` / `clear_all_fakes`，
    /// 不会在一次解析后自动失效。
    pub cache_fakes_default: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self { cache_fakes_default: false }
    }
}

/// 单例缓存槽
///
/// 首个解析者持锁执行工厂，并发竞争者阻塞在同一把锁上直接取到结果，
/// 保证 Binding 生命周期内工厂至多成功执行一次。重新注册会换掉整个
/// 槽，等同于失效。
struct SingletonCell {
    slot: Mutex<Option<SharedValue>>,
}

impl SingletonCell {
    fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }
}

/// 内部统计信息（原子计数器）
#[derive(Default)]
struct InnerStats {
    total_resolutions: AtomicUsize,
    singleton_hits: AtomicUsize,
    singleton_misses: AtomicUsize,
    transient_creations: AtomicUsize,
    fake_hits: AtomicUsize,
    autoload_hits: AtomicUsize,
    fallback_hits: AtomicUsize,
}

/// 容器统计快照
#[derive(Debug, Clone)]
pub struct ContainerStats {
    pub total_resolutions: usize,
    pub singleton_hits: usize,
    pub singleton_misses: usize,
    pub transient_creations: usize,
    pub fake_hits: usize,
    pub autoload_hits: usize,
    pub fallback_hits: usize,
}

impl ContainerStats {
    /// 单例缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.singleton_hits + self.singleton_misses;
        if total == 0 {
            0.0
        } else {
            self.singleton_hits as f64 / total as f64
        }
    }
}

thread_local! {
    // 当前线程正在解析（工厂执行中）的 namespace 栈；
    // 工厂内嵌套解析绕回自身时据此报循环依赖，而不是死锁在单例槽锁上
    static RESOLUTION_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// 栈守卫，工厂 panic 时也能恢复栈
struct StackGuard;

impl StackGuard {
    fn enter(namespace: &str) -> Self {
        RESOLUTION_STACK.with(|stack| stack.borrow_mut().push(namespace.to_string()));
        StackGuard
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn stack_contains(namespace: &str) -> bool {
    RESOLUTION_STACK.with(|stack| stack.borrow().iter().any(|entry| entry == namespace))
}

fn stack_chain_with(namespace: &str) -> Vec<String> {
    RESOLUTION_STACK.with(|stack| {
        let mut chain = stack.borrow().clone();
        chain.push(namespace.to_string());
        chain
    })
}

/// 依赖注入容器
///
/// 进程内通常只有一个实例，在应用引导阶段构造并完成全部注册；
/// 测试可以随意构造相互隔离的实例。跨线程共享用 `Arc<Container>`。
pub struct Container {
    bindings: BindingRegistry,
    aliases: AliasTable,
    fakes: FakeRegistry,
    autoload: AutoloadResolver,
    /// 单例实例缓存，按 namespace 建槽
    singletons: DashMap<String, Arc<SingletonCell>>,
    loader: Arc<dyn ModuleLoader>,
    options: ContainerOptions,
    stats: InnerStats,
}

impl Container {
    /// 创建新的容器实例（空的内存加载器）
    pub fn new() -> Self {
        Self::with_parts(ContainerOptions::default(), Arc::new(StaticModuleLoader::new()))
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        Self::with_parts(options, Arc::new(StaticModuleLoader::new()))
    }

    pub fn with_loader(loader: Arc<dyn ModuleLoader>) -> Self {
        Self::with_parts(ContainerOptions::default(), loader)
    }

    pub fn with_parts(options: ContainerOptions, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            bindings: BindingRegistry::new(),
            aliases: AliasTable::new(),
            fakes: FakeRegistry::new(),
            autoload: AutoloadResolver::new(),
            singletons: DashMap::new(),
            loader,
            options,
            stats: InnerStats::default(),
        }
    }

    // ===== 注册API（引导阶段） =====

    /// 注册瞬态 Binding；重复注册覆盖并使旧单例缓存失效
    pub fn bind<F>(&self, namespace: &str, factory: F)
    where
        F: Fn(&Container) -> Result<SharedValue, BoxError> + Send + Sync + 'static,
    {
        self.register(namespace, Lifetime::Transient, Arc::new(factory));
    }

    /// 注册单例 Binding；同样的覆盖与失效规则
    pub fn singleton<F>(&self, namespace: &str, factory: F)
    where
        F: Fn(&Container) -> Result<SharedValue, BoxError> + Send + Sync + 'static,
    {
        self.register(namespace, Lifetime::Singleton, Arc::new(factory));
    }

    /// 类型化的瞬态注册 - 便捷方法
    pub fn bind_fn<T, F>(&self, namespace: &str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.bind(namespace, move |container| {
            Ok(Arc::new(factory(container)?) as SharedValue)
        });
    }

    /// 类型化的单例注册 - 便捷方法
    pub fn singleton_fn<T, F>(&self, namespace: &str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.singleton(namespace, move |container| {
            Ok(Arc::new(factory(container)?) as SharedValue)
        });
    }

    /// 把现成值按单例语义挂进容器
    pub fn bind_value<T: Send + Sync + 'static>(&self, namespace: &str, value: T) {
        let shared: SharedValue = Arc::new(value);
        self.singleton(namespace, move |_| Ok(shared.clone()));
    }

    fn register(&self, namespace: &str, lifetime: Lifetime, factory: DynFactory) {
        debug!(namespace, ?lifetime, "registering binding");
        self.bindings.insert(namespace, Binding { factory, lifetime });
        // 重新注册使缓存的单例失效
        self.singletons.remove(namespace);
    }

    /// 移除 Binding 及其缓存单例
    pub fn unbind(&self, namespace: &str) -> bool {
        self.singletons.remove(namespace);
        self.bindings.remove(namespace)
    }

    /// 显式清除某个缓存单例，下次解析重新执行工厂
    pub fn forget_singleton(&self, namespace: &str) -> bool {
        self.singletons.remove(namespace).is_some()
    }

    /// 注册/覆盖 alias
    pub fn alias(&self, name: &str, target: &str) {
        debug!(alias = name, target, "registering alias");
        self.aliases.insert(name, target);
    }

    /// 注册 fake，缓存策略取容器默认值
    pub fn fake<F>(&self, namespace: &str, factory: F)
    where
        F: Fn(&Container) -> Result<SharedValue, BoxError> + Send + Sync + 'static,
    {
        self.fake_with(
            namespace,
            factory,
            FakeOptions { cache_fake: self.options.cache_fakes_default },
        );
    }

    /// 注册 fake，显式指定缓存策略
    pub fn fake_with<F>(&self, namespace: &str, factory: F, options: FakeOptions)
    where
        F: Fn(&Container) -> Result<SharedValue, BoxError> + Send + Sync + 'static,
    {
        debug!(namespace, cache_fake = options.cache_fake, "registering fake");
        self.fakes.insert(namespace, Arc::new(factory), options);
    }

    pub fn clear_fake(&self, namespace: &str) -> bool {
        debug!(namespace, "clearing fake");
        self.fakes.remove(namespace)
    }

    pub fn clear_all_fakes(&self) {
        debug!("clearing all fakes");
        self.fakes.clear();
    }

    /// 挂载 autoload 根；重复前缀立即失败
    pub fn mount_autoload(&self, prefix: &str, dir: impl Into<PathBuf>) -> Result<(), ResolveError> {
        let dir = dir.into();
        debug!(prefix, dir = %dir.display(), "mounting autoload root");
        self.autoload.mount(prefix, dir)
    }

    pub fn unmount_autoload(&self, prefix: &str) -> bool {
        self.autoload.unmount(prefix)
    }

    // ===== 只读查询 =====

    /// 检查 namespace 是否有 Binding
    pub fn has(&self, namespace: &str) -> bool {
        self.bindings.contains(namespace)
    }

    pub fn is_singleton(&self, namespace: &str) -> bool {
        matches!(self.bindings.lifetime_of(namespace), Some(Lifetime::Singleton))
    }

    /// 获取容器统计快照
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.stats.total_resolutions.load(Ordering::Relaxed),
            singleton_hits: self.stats.singleton_hits.load(Ordering::Relaxed),
            singleton_misses: self.stats.singleton_misses.load(Ordering::Relaxed),
            transient_creations: self.stats.transient_creations.load(Ordering::Relaxed),
            fake_hits: self.stats.fake_hits.load(Ordering::Relaxed),
            autoload_hits: self.stats.autoload_hits.load(Ordering::Relaxed),
            fallback_hits: self.stats.fallback_hits.load(Ordering::Relaxed),
        }
    }

    // ===== 解析 =====

    /// 解析 namespace - 主要API
    pub fn resolve(&self, namespace: &str) -> Result<SharedValue, ResolveError> {
        self.stats.total_resolutions.fetch_add(1, Ordering::Relaxed);
        self.resolve_pipeline(namespace)
    }

    /// 解析并下转型
    pub fn resolve_as<T: Send + Sync + 'static>(&self, namespace: &str) -> Result<Arc<T>, ResolveError> {
        let value = self.resolve(namespace)?;
        value.downcast::<T>().map_err(|_| ResolveError::TypeMismatch {
            namespace: namespace.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    fn resolve_pipeline(&self, namespace: &str) -> Result<SharedValue, ResolveError> {
        // 本次解析访问过的 alias 链，用于环检测
        let mut visited: Vec<String> = Vec::new();
        let mut current = namespace.to_string();

        loop {
            if stack_contains(&current) {
                let chain = stack_chain_with(&current);
                warn!(namespace = %current, "circular dependency detected");
                return Err(ResolveError::CircularDependency { chain });
            }

            // 1. Fake 覆盖层
            if let Some(entry) = self.fakes.lookup(&current) {
                trace!(namespace = %current, "resolved by fake");
                self.stats.fake_hits.fetch_add(1, Ordering::Relaxed);
                return self.eval_fake(&current, entry);
            }

            // 2. Binding
            if let Some(binding) = self.bindings.lookup(&current) {
                return match binding.lifetime {
                    Lifetime::Singleton => self.eval_singleton(&current, &binding),
                    Lifetime::Transient => {
                        trace!(namespace = %current, "creating transient instance");
                        self.stats.transient_creations.fetch_add(1, Ordering::Relaxed);
                        self.invoke(&current, &binding.factory)
                    }
                };
            }

            // 3. Alias：重入整条管线
            if let Some(target) = self.aliases.target(&current) {
                trace!(alias = %current, target = %target, "following alias");
                visited.push(current);
                if visited.iter().any(|seen| *seen == target) {
                    let mut chain = visited;
                    chain.push(target);
                    warn!(chain = ?chain, "cyclic alias chain");
                    return Err(ResolveError::CyclicAlias { chain });
                }
                current = target;
                continue;
            }

            // 4. Autoload
            if let Some(path) = self.autoload.resolve(&current) {
                let specifier = path.to_string_lossy().into_owned();
                match self.loader.load(&specifier) {
                    Ok(value) => {
                        trace!(namespace = %current, path = %specifier, "resolved by autoload");
                        self.stats.autoload_hits.fetch_add(1, Ordering::Relaxed);
                        return Ok(value);
                    }
                    // 前缀匹配不代表模块存在，继续走通用回退
                    Err(LoadError::NotFound) => {
                        trace!(namespace = %current, path = %specifier, "autoload path absent");
                    }
                    Err(LoadError::Failed(source)) => {
                        return Err(ResolveError::Loader { specifier, source });
                    }
                }
            }

            // 5. 通用模块加载回退
            return match self.loader.load(&current) {
                Ok(value) => {
                    trace!(namespace = %current, "resolved by module loader fallback");
                    self.stats.fallback_hits.fetch_add(1, Ordering::Relaxed);
                    Ok(value)
                }
                Err(LoadError::NotFound) => Err(ResolveError::NotFound { namespace: current }),
                Err(LoadError::Failed(source)) => Err(ResolveError::Loader { specifier: current, source }),
            };
        }
    }

    fn eval_singleton(&self, namespace: &str, binding: &Binding) -> Result<SharedValue, ResolveError> {
        // 先克隆槽并释放 DashMap 分片守卫，工厂内的嵌套解析才不会撞上分片锁
        let cell = self
            .singletons
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(SingletonCell::new()))
            .clone();

        let mut slot = cell.slot.lock();
        if let Some(value) = slot.as_ref() {
            trace!(namespace, "singleton cache hit");
            self.stats.singleton_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }

        self.stats.singleton_misses.fetch_add(1, Ordering::Relaxed);
        trace!(namespace, "singleton cache miss, invoking factory");
        let value = self.invoke(namespace, &binding.factory)?;
        *slot = Some(value.clone());
        Ok(value)
    }

    fn eval_fake(&self, namespace: &str, entry: FakeEntry) -> Result<SharedValue, ResolveError> {
        if entry.cache {
            let mut slot = entry.cached.lock();
            if let Some(value) = slot.as_ref() {
                return Ok(value.clone());
            }
            let value = self.invoke(namespace, &entry.factory)?;
            *slot = Some(value.clone());
            Ok(value)
        } else {
            self.invoke(namespace, &entry.factory)
        }
    }

    /// 执行工厂；工厂错误原样透传，只包上出错的 namespace
    fn invoke(&self, namespace: &str, factory: &DynFactory) -> Result<SharedValue, ResolveError> {
        let _guard = StackGuard::enter(namespace);
        factory(self).map_err(|source| ResolveError::Factory {
            namespace: namespace.to_string(),
            source,
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    // 测试用的服务
    #[derive(Debug)]
    struct TestService {
        id: usize,
    }

    fn counting_factory(counter: Arc<AtomicUsize>) -> impl Fn(&Container) -> Result<SharedValue, BoxError> {
        move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(TestService { id }) as SharedValue)
        }
    }

    #[test]
    fn transient_binding_creates_fresh_instances() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.bind("My/Redis", counting_factory(counter.clone()));

        let first = container.resolve_as::<TestService>("My/Redis").unwrap();
        let second = container.resolve_as::<TestService>("My/Redis").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn singleton_binding_caches_first_instance() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.singleton("My/Redis", counting_factory(counter.clone()));

        let first = container.resolve_as::<TestService>("My/Redis").unwrap();
        let second = container.resolve_as::<TestService>("My/Redis").unwrap();

        // 同一实例，工厂只执行一次
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rebinding_invalidates_cached_singleton() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.singleton("My/Redis", counting_factory(counter.clone()));
        let first = container.resolve_as::<TestService>("My/Redis").unwrap();

        container.singleton("My/Redis", counting_factory(counter.clone()));
        let second = container.resolve_as::<TestService>("My/Redis").unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn forget_singleton_forces_recomputation() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.singleton("My/Redis", counting_factory(counter.clone()));

        container.resolve("My/Redis").unwrap();
        assert!(container.forget_singleton("My/Redis"));
        container.resolve("My/Redis").unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unresolvable_namespace_reports_not_found() {
        let container = Container::new();
        let result = container.resolve("My/Missing");
        assert!(matches!(result, Err(ResolveError::NotFound { .. })));
    }

    #[test]
    fn alias_resolves_through_full_pipeline() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.singleton("My/Redis", counting_factory(counter.clone()));
        container.alias("Redis", "My/Redis");

        let via_alias = container.resolve_as::<TestService>("Redis").unwrap();
        let direct = container.resolve_as::<TestService>("My/Redis").unwrap();

        assert!(Arc::ptr_eq(&via_alias, &direct));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn alias_chains_are_followed() {
        let container = Container::new();
        container.bind_value("My/Redis", 42u32);
        container.alias("Cache", "Redis");
        container.alias("Redis", "My/Redis");

        let value = container.resolve_as::<u32>("Cache").unwrap();
        assert_eq!(*value, 42);
    }

    #[test]
    fn cyclic_alias_fails_instead_of_looping() {
        let container = Container::new();
        container.alias("A", "B");
        container.alias("B", "A");

        match container.resolve("A").err().unwrap() {
            ResolveError::CyclicAlias { chain } => {
                assert_eq!(chain, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
            }
            other => panic!("expected CyclicAlias, got {other:?}"),
        }
    }

    #[test]
    fn self_alias_is_a_cycle() {
        let container = Container::new();
        container.alias("A", "A");
        assert!(matches!(container.resolve("A"), Err(ResolveError::CyclicAlias { .. })));
    }

    #[test]
    fn fake_takes_priority_and_clear_restores() {
        let container = Container::new();
        container.bind_value("My/Redis", "real".to_string());
        container.fake("My/Redis", |_| Ok(Arc::new("fake".to_string()) as SharedValue));

        assert_eq!(*container.resolve_as::<String>("My/Redis").unwrap(), "fake");

        assert!(container.clear_fake("My/Redis"));
        assert_eq!(*container.resolve_as::<String>("My/Redis").unwrap(), "real");
    }

    #[test]
    fn fakes_shadow_aliases() {
        let container = Container::new();
        container.alias("Redis", "My/Redis");
        container.bind_value("My/Redis", 1u32);
        container.fake("Redis", |_| Ok(Arc::new(2u32) as SharedValue));

        // alias 名本身被 fake 时不再进入 alias 展开
        assert_eq!(*container.resolve_as::<u32>("Redis").unwrap(), 2);
        assert_eq!(*container.resolve_as::<u32>("My/Redis").unwrap(), 1);
    }

    #[test]
    fn uncached_fake_runs_factory_each_time() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.fake("My/Redis", counting_factory(counter.clone()));

        container.resolve("My/Redis").unwrap();
        container.resolve("My/Redis").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cached_fake_runs_factory_once() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.fake_with(
            "My/Redis",
            counting_factory(counter.clone()),
            FakeOptions { cache_fake: true },
        );

        let first = container.resolve_as::<TestService>("My/Redis").unwrap();
        let second = container.resolve_as::<TestService>("My/Redis").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_fakes_default_applies_to_plain_fakes() {
        let container = Container::with_options(ContainerOptions { cache_fakes_default: true });
        let counter = Arc::new(AtomicUsize::new(0));
        container.fake("My/Redis", counting_factory(counter.clone()));

        container.resolve("My/Redis").unwrap();
        container.resolve("My/Redis").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_all_fakes_restores_bindings() {
        let container = Container::new();
        container.bind_value("A", 1u32);
        container.bind_value("B", 2u32);
        container.fake("A", |_| Ok(Arc::new(10u32) as SharedValue));
        container.fake("B", |_| Ok(Arc::new(20u32) as SharedValue));

        container.clear_all_fakes();
        assert_eq!(*container.resolve_as::<u32>("A").unwrap(), 1);
        assert_eq!(*container.resolve_as::<u32>("B").unwrap(), 2);
    }

    #[test]
    fn factory_error_passes_through_unchanged() {
        let container = Container::new();
        container.bind("My/Broken", |_| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom").into())
        });

        match container.resolve("My/Broken").err().unwrap() {
            ResolveError::Factory { namespace, source } => {
                assert_eq!(namespace, "My/Broken");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected Factory error, got {other:?}"),
        }
    }

    #[test]
    fn failed_singleton_factory_is_retried_next_resolve() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        container.singleton("My/Flaky", move |_| {
            let attempt = counter_clone.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                Err("first attempt fails".into())
            } else {
                Ok(Arc::new(attempt) as SharedValue)
            }
        });

        assert!(container.resolve("My/Flaky").is_err());
        // 失败不占据缓存槽
        assert_eq!(*container.resolve_as::<usize>("My/Flaky").unwrap(), 1);
    }

    #[test]
    fn nested_resolution_injects_dependencies() {
        let container = Container::new();
        container.bind_value("App/Config", "redis://localhost".to_string());
        container.singleton_fn("App/Redis", |app| {
            let url = app.resolve_as::<String>("App/Config")?;
            Ok(format!("connected to {url}"))
        });

        let redis = container.resolve_as::<String>("App/Redis").unwrap();
        assert_eq!(*redis, "connected to redis://localhost");
    }

    #[test]
    fn self_referential_factory_is_a_circular_dependency() {
        let container = Container::new();
        container.singleton_fn("App/Loop", |app| {
            app.resolve("App/Loop")?;
            Ok(0u32)
        });

        match container.resolve("App/Loop").err().unwrap() {
            ResolveError::Factory { source, .. } => {
                let inner = source.downcast::<ResolveError>().unwrap();
                assert!(matches!(*inner, ResolveError::CircularDependency { .. }));
            }
            other => panic!("expected nested CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn mutually_recursive_factories_are_detected() {
        let container = Container::new();
        container.singleton_fn("App/A", |app| {
            app.resolve("App/B")?;
            Ok("a".to_string())
        });
        container.singleton_fn("App/B", |app| {
            app.resolve("App/A")?;
            Ok("b".to_string())
        });

        assert!(container.resolve("App/A").is_err());
    }

    #[test]
    fn typed_resolution_reports_mismatch() {
        let container = Container::new();
        container.bind_value("My/Number", 7u32);

        let result = container.resolve_as::<String>("My/Number");
        assert!(matches!(result, Err(ResolveError::TypeMismatch { .. })));
        // 失败的下转型不影响缓存值
        assert_eq!(*container.resolve_as::<u32>("My/Number").unwrap(), 7);
    }

    #[test]
    fn introspection_reflects_registrations() {
        let container = Container::new();
        assert!(!container.has("My/Redis"));

        container.bind("My/Redis", |_| Ok(Arc::new(()) as SharedValue));
        assert!(container.has("My/Redis"));
        assert!(!container.is_singleton("My/Redis"));

        container.singleton("My/Redis", |_| Ok(Arc::new(()) as SharedValue));
        assert!(container.is_singleton("My/Redis"));

        assert!(container.unbind("My/Redis"));
        assert!(!container.has("My/Redis"));
    }

    #[test]
    fn stats_track_hit_and_miss_sequences() {
        let container = Container::new();
        container.singleton_fn("App/Config", |_| Ok(42u32));
        container.bind_fn("App/Request", |_| Ok("req".to_string()));

        container.resolve("App/Config").unwrap();
        container.resolve("App/Config").unwrap();
        container.resolve("App/Request").unwrap();

        let stats = container.stats();
        assert_eq!(stats.total_resolutions, 3);
        assert_eq!(stats.singleton_misses, 1);
        assert_eq!(stats.singleton_hits, 1);
        assert_eq!(stats.transient_creations, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
