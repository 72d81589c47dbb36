//! 事件子系统（eventing）
//!
//! 控制器与展示层之间的订阅通道：控制器发布 `CollectionEvent`，
//! 展示层以 `'static` 事件流订阅并据此重新渲染。
//!
mod bus_inmemory;

pub use bus_inmemory::InMemoryEventBus;
