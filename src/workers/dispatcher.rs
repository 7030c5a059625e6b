// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::NotifierSettings;
use crate::domain::messaging::MessageGateway;
use crate::domain::models::comic::Comic;
use crate::domain::models::notification::NotificationTask;
use crate::domain::repositories::subscriber_repository::SubscriberRepository;
use futures::StreamExt;
use metrics::counter;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// 通知生产者句柄
///
/// 成功更新后由调度器的工作器调用：查询订阅者清单，
/// 为每个订阅者向有界新任务队列提交一个通知任务。
/// 队列满时丢弃并记录日志，绝不阻塞爬取。
pub struct Notifier<S: SubscriberRepository> {
    subscribers: Arc<S>,
    tx: mpsc::Sender<NotificationTask>,
    list_timeout: Duration,
}

impl<S: SubscriberRepository> Notifier<S> {
    /// 创建新的通知生产者句柄
    ///
    /// # 参数
    ///
    /// * `subscribers` - 订阅者仓库
    /// * `tx` - 新任务队列的发送端
    /// * `list_timeout` - 订阅者查询超时时间
    ///
    /// # 返回值
    ///
    /// 返回新的通知生产者句柄
    pub fn new(
        subscribers: Arc<S>,
        tx: mpsc::Sender<NotificationTask>,
        list_timeout: Duration,
    ) -> Self {
        Self {
            subscribers,
            tx,
            list_timeout,
        }
    }

    /// 对一次成功更新执行通知扇出
    pub async fn notify(&self, comic: &Comic) {
        let lookup = timeout(
            self.list_timeout,
            self.subscribers.list_subscribers(comic.id),
        )
        .await;

        let recipients = match lookup {
            Ok(Ok(recipients)) => recipients,
            Ok(Err(e)) => {
                error!("Subscriber lookup failed for comic {}: {}", comic.id, e);
                return;
            }
            Err(_) => {
                error!("Subscriber lookup timed out for comic {}", comic.id);
                return;
            }
        };

        if recipients.is_empty() {
            debug!("Comic {} has no subscribers", comic.id);
            return;
        }

        let snapshot = comic.snapshot();
        for recipient in recipients {
            let task = NotificationTask::new(recipient, snapshot.clone());
            match self.tx.try_send(task) {
                Ok(()) => {}
                Err(TrySendError::Full(dropped)) => {
                    warn!(
                        "Notification queue full, shedding task for {}",
                        dropped.recipient
                    );
                    counter!("notification_shed_total").increment(1);
                }
                Err(TrySendError::Closed(dropped)) => {
                    error!(
                        "Notification dispatcher stopped, dropping task for {}",
                        dropped.recipient
                    );
                }
            }
        }
    }
}

/// 通知分发器
///
/// 长驻分发循环：每个周期先把重试队列全部移入工作批次，再把
/// 新任务队列全部移入同一批次（重试优先于新任务），然后以有界
/// 并发对整个批次各执行一次投递尝试。失败任务递增计数后重新入队，
/// 达到上限则丢弃并记录终态失败。
pub struct NotificationDispatcher<G: MessageGateway + 'static> {
    gateway: Arc<G>,
    rx: mpsc::Receiver<NotificationTask>,
    retry_queue: VecDeque<NotificationTask>,
    settings: NotifierSettings,
}

impl<G: MessageGateway + 'static> NotificationDispatcher<G> {
    /// 创建新的通知分发器实例
    ///
    /// # 参数
    ///
    /// * `gateway` - 消息网关
    /// * `rx` - 新任务队列的接收端
    /// * `settings` - 通知分发配置
    ///
    /// # 返回值
    ///
    /// 返回新的通知分发器实例
    pub fn new(
        gateway: Arc<G>,
        rx: mpsc::Receiver<NotificationTask>,
        settings: NotifierSettings,
    ) -> Self {
        Self {
            gateway,
            rx,
            retry_queue: VecDeque::new(),
            settings,
        }
    }

    /// 运行分发循环
    pub async fn run(mut self) {
        info!("Notification dispatcher started");

        loop {
            self.run_cycle().await;
            sleep(Duration::from_secs(self.settings.cycle_interval_secs)).await;
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一个完整的分发周期
    pub async fn run_cycle(&mut self) {
        let mut batch: Vec<NotificationTask> = self.retry_queue.drain(..).collect();
        let retries = batch.len();
        while let Ok(task) = self.rx.try_recv() {
            batch.push(task);
        }

        if batch.is_empty() {
            return;
        }

        info!(
            "Delivering {} notifications ({} retries)",
            batch.len(),
            retries
        );

        let gateway = self.gateway.clone();
        let failures: Vec<NotificationTask> = futures::stream::iter(batch)
            .map(|task| {
                let gateway = gateway.clone();
                async move {
                    counter!("notification_delivery_attempts_total").increment(1);
                    match gateway.deliver(&task.recipient, &task.comic).await {
                        Ok(()) => {
                            counter!("notification_delivery_success_total").increment(1);
                            None
                        }
                        Err(e) => {
                            warn!("Delivery to {} failed: {}", task.recipient, e);
                            Some(task)
                        }
                    }
                }
            })
            .buffer_unordered(self.settings.delivery_concurrency)
            .filter_map(|failed| async move { failed })
            .collect()
            .await;

        for task in failures {
            self.handle_failure(task);
        }
    }

    fn handle_failure(&mut self, mut task: NotificationTask) {
        task.attempt_count += 1;

        if task.can_retry(self.settings.max_retries) {
            self.retry_queue.push_back(task);
            counter!("notification_retry_total").increment(1);
        } else {
            error!(
                "Notification dropped after {} attempts: recipient={} comic={}",
                task.attempt_count, task.recipient, task.comic.name
            );
            counter!("notification_dead_total").increment(1);
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
