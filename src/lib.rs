//! namespace 键控的 IoC 容器
//!
//! 以字符串 namespace（形如 `Scope/Module`）为键的服务注册与解析，
//! 解析顺序固定：Fake → Binding → Alias（重入管线）→ Autoload → 模块加载回退。

pub mod container;
pub mod errors;
pub mod loader;
pub mod namespace;
pub mod registry;

// Re-export commonly used items for convenience
pub use container::{Container, ContainerOptions, ContainerStats};
pub use errors::{BoxError, LoadError, ResolveError};
pub use loader::{FsModuleLoader, ModuleLoader, StaticModuleLoader};
pub use registry::bindings::Lifetime;
pub use registry::fakes::FakeOptions;
pub use registry::{DynFactory, SharedValue};
