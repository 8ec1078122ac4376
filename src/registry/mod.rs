//! 各注册表组件
//!
//! 所有注册表都是 DashMap 的薄包装。约定：注册（写入）发生在单线程的
//! 应用引导阶段，解析阶段只读；并发重注册不会破坏内存安全，但顺序不保证。

pub mod aliases;
pub mod autoload;
pub mod bindings;
pub mod fakes;

use std::any::Any;
use std::sync::Arc;

use crate::container::Container;
use crate::errors::BoxError;

/// 解析产出的共享值
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// 类型擦除的工厂
///
/// 入参是容器自身，工厂可以在构造期间通过 `resolve` 解析自己的依赖，
/// 这就是组合的表达方式，而不是显式接线。
pub type DynFactory = Arc<dyn Fn(&Container) -> Result<SharedValue, BoxError> + Send + Sync>;
