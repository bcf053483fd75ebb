use std::time::Duration;

use async_trait::async_trait;
use deadpool_lapin::{Config as PoolConfig, Pool, Runtime};
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions,
    ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, ExchangeKind};
use sl_domain::error::{Error, Result};

use crate::binding::Binding;

/// Fire-and-forget publisher used by distillation to hand a context off
/// and by the orchestrator to nudge the skill-agent consumer.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, binding: &Binding, payload: &[u8]) -> Result<()>;
}

/// `lapin`-backed message bus. Holds a pooled connection; channels are
/// opened per-operation since AMQP channels are cheap and this keeps the
/// publisher safe to share across tasks without a mutex.
pub struct AmqpBus {
    pool: Pool,
}

impl AmqpBus {
    pub fn connect(url: &str) -> Result<Self> {
        let cfg = PoolConfig {
            url: Some(url.to_owned()),
            ..PoolConfig::default()
        };
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::Bus(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn channel(&self) -> Result<Channel> {
        let conn = self.pool.get().await.map_err(|e| Error::Bus(e.to_string()))?;
        conn.create_channel()
            .await
            .map_err(|e| Error::Bus(e.to_string()))
    }

    /// Declare the exchange, queue, and binding. Idempotent — safe to call
    /// from every process that touches this binding.
    pub async fn declare(&self, binding: &Binding) -> Result<()> {
        let channel = self.channel().await?;
        channel
            .exchange_declare(
                binding.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        channel
            .queue_declare(
                binding.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        channel
            .queue_bind(
                binding.queue,
                binding.exchange,
                binding.routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        Ok(())
    }

    /// Open a consumer bound to `binding.queue` with the given prefetch.
    pub async fn consumer(&self, binding: &Binding, prefetch: u16) -> Result<BusConsumer> {
        self.declare(binding).await?;
        let channel = self.channel().await?;
        channel
            .basic_qos(prefetch, lapin::options::BasicQosOptions::default())
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        let consumer_tag = format!("{}-consumer", binding.queue);
        let inner = channel
            .basic_consume(
                binding.queue,
                &consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        Ok(BusConsumer {
            channel,
            inner,
            queue: binding.queue.to_owned(),
        })
    }
}

#[async_trait]
impl MessageBus for AmqpBus {
    async fn publish(&self, binding: &Binding, payload: &[u8]) -> Result<()> {
        self.declare(binding).await?;
        let channel = self.channel().await?;
        channel
            .basic_publish(
                binding.exchange,
                binding.routing_key,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))?
            .await
            .map_err(|e| Error::Bus(e.to_string()))?;
        Ok(())
    }
}

/// A single-queue consumer with a per-`recv` timeout. The orchestrator's
/// consumer loops call `recv` in a `loop`, treating a timeout as "nothing
/// to do this tick" rather than an error.
pub struct BusConsumer {
    channel: Channel,
    inner: lapin::Consumer,
    queue: String,
}

impl BusConsumer {
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Wait up to `timeout` for the next delivery. `Ok(None)` on timeout,
    /// at-least-once semantics: redelivery happens if the process dies
    /// before `ack`.
    pub async fn recv(&mut self, timeout: Duration) -> Result<Option<Delivery>> {
        use futures_util::StreamExt;
        match tokio::time::timeout(timeout, self.inner.next()).await {
            Ok(Some(Ok(delivery))) => Ok(Some(Delivery {
                channel: self.channel.clone(),
                delivery_tag: delivery.delivery_tag,
                data: delivery.data,
                routing_key: delivery.routing_key.to_string(),
            })),
            Ok(Some(Err(e))) => Err(Error::Bus(e.to_string())),
            Ok(None) => Err(Error::Bus(format!("consumer channel closed for {}", self.queue))),
            Err(_) => Ok(None),
        }
    }
}

/// A received message, detached from the stream so handlers can hold it
/// across `.await` points (e.g. a multi-second LM call) before acking.
pub struct Delivery {
    channel: Channel,
    delivery_tag: u64,
    pub data: Vec<u8>,
    pub routing_key: String,
}

impl Delivery {
    pub async fn ack(&self) -> Result<()> {
        self.channel
            .basic_ack(self.delivery_tag, BasicAckOptions::default())
            .await
            .map_err(|e| Error::Bus(e.to_string()))
    }

    /// Reject and requeue — used when a handler fails for a reason that
    /// might succeed on retry (lock contention, a transient LM error).
    pub async fn nack_requeue(&self) -> Result<()> {
        self.channel
            .basic_nack(
                self.delivery_tag,
                BasicNackOptions {
                    requeue: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| Error::Bus(e.to_string()))
    }
}
