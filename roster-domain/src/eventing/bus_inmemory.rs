//! 内存版事件总线（InMemoryEventBus）
//!
//! 基于 `tokio::sync::broadcast` 实现的轻量事件总线：
//! - `publish`：同步克隆并广播事件，可在非异步的提交路径中调用；
//! - `subscribe`：返回 `'static` 生命周期事件流，便于在 `tokio::spawn` 中使用。
//!
//! 注意：若无订阅者，发送将被忽略；订阅者落后超过缓冲区容量时跳过丢失的事件。

use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

/// 简单的内存事件总线实现
#[derive(Debug, Clone)]
pub struct InMemoryEventBus<E> {
    tx: broadcast::Sender<E>,
}

impl<E> InMemoryEventBus<E>
where
    E: Clone + Send + 'static,
{
    /// 创建一个内存总线，`capacity` 为广播缓冲区容量（至少为 1）
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布事件，返回当前接收到该事件的订阅者数量
    pub fn publish(&self, event: E) -> usize {
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn subscribe(&self) -> BoxStream<'static, E> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx).filter_map(|r| async move {
            match r {
                Ok(event) => Some(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged; skipping missed events");
                    None
                }
            }
        });
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = InMemoryEventBus::new(8);
        let mut stream = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        assert_eq!(bus.publish(1_u32), 1);
        assert_eq!(bus.publish(2_u32), 1);

        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_ignored() {
        let bus = InMemoryEventBus::<String>::new(4);
        assert_eq!(bus.publish("nobody".into()), 0);
    }

    #[tokio::test]
    async fn lagged_subscriber_skips_to_latest() {
        let bus = InMemoryEventBus::new(2);
        let mut stream = bus.subscribe();
        for i in 0..5_u32 {
            bus.publish(i);
        }
        // 容量为 2：只保留最后两条
        assert_eq!(stream.next().await, Some(3));
        assert_eq!(stream.next().await, Some(4));
    }
}
