//! # 模拟进程
//!
//! [`Process`] 只记录两种剩余工作量：CPU 时间与阻塞 (I/O) 时间。
//! 执行原语消耗时间，并在进程需要换队时返回 [`Interrupt`]。
//!
//! ## 进程状态转换
//!
//! ```text
//!            blocking_time_needed > 0
//!  ┌─────────┐ ── ProcessBlocked ──► ┌─────────┐
//!  │ Running │                       │ Blocked │
//!  └────┬────┘ ◄── ProcessReady ──── └─────────┘
//!       │        blocking_time_needed == 0
//!       │ cpu_time_needed == 0
//!       ▼
//!  ┌──────────┐
//!  │ Finished │
//!  └──────────┘
//! ```
//!
//! 阻塞时间不会被重新设置，每个进程一生中最多阻塞一次。

use super::Interrupt;
use super::queue::QueueId;
use crate::config::{MAX_BLOCKING_TIME, MAX_CPU_TIME};
use rand::Rng;

/// 进程标识符，由调用方分配
pub type Pid = usize;

/// 模拟进程
///
/// 进程在任意时刻只属于一个队列，`parent` 记录该队列的句柄，
/// 每次入队时由队列更新。
#[derive(Debug, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    /// 剩余 CPU 时间，不会小于 0
    cpu_time_needed: u64,
    /// 剩余阻塞时间，为 0 表示纯 CPU 型进程或阻塞已完成
    blocking_time_needed: u64,
    /// 本次执行是否发生了阻塞/就绪状态切换
    state_changed: bool,
    parent: Option<QueueId>,
}

impl Process {
    /// 创建进程
    ///
    /// `cpu_time_needed` 为 `None` 时随机取 `1..=MAX_CPU_TIME`；
    /// `blocking` 为真时阻塞时间随机取 `1..=MAX_BLOCKING_TIME`。
    pub fn new(pid: Pid, cpu_time_needed: Option<u64>, blocking: bool) -> Self {
        Self::with_rng(pid, cpu_time_needed, blocking, &mut rand::thread_rng())
    }

    /// 使用给定的随机数生成器创建进程，便于复现
    pub fn with_rng<R: Rng>(
        pid: Pid,
        cpu_time_needed: Option<u64>,
        blocking: bool,
        rng: &mut R,
    ) -> Self {
        let cpu_time_needed = cpu_time_needed.unwrap_or_else(|| rng.gen_range(1..=MAX_CPU_TIME));
        let blocking_time_needed = if blocking {
            rng.gen_range(1..=MAX_BLOCKING_TIME)
        } else {
            0
        };
        Self::with_times(pid, cpu_time_needed, blocking_time_needed)
    }

    /// 以确定的 CPU 时间和阻塞时间创建进程
    pub fn with_times(pid: Pid, cpu_time_needed: u64, blocking_time_needed: u64) -> Self {
        Self {
            pid,
            cpu_time_needed,
            blocking_time_needed,
            state_changed: false,
            parent: None,
        }
    }

    /// 获取进程标识符
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// 剩余 CPU 时间
    pub fn cpu_time_needed(&self) -> u64 {
        self.cpu_time_needed
    }

    /// 剩余阻塞时间
    pub fn blocking_time_needed(&self) -> u64 {
        self.blocking_time_needed
    }

    /// 当前所在队列
    pub fn parent_queue(&self) -> Option<QueueId> {
        self.parent
    }

    /// 更新所在队列，由 [`Queue::enqueue`](super::Queue::enqueue) 调用
    pub fn set_parent_queue(&mut self, queue: QueueId) {
        self.parent = Some(queue);
    }

    /// CPU 时间与阻塞时间都已耗尽
    pub fn is_finished(&self) -> bool {
        self.cpu_time_needed == 0 && self.blocking_time_needed == 0
    }

    pub fn is_state_changed(&self) -> bool {
        self.state_changed
    }

    /// 执行一步 CPU 工作
    ///
    /// 没有阻塞需求时消耗 `time` 的 CPU 时间，不产生中断；
    /// 仍有阻塞需求时不消耗时间，返回 [`Interrupt::ProcessBlocked`]，
    /// 并标记状态已切换，使所在队列不为这一步计时。
    ///
    /// ## Arguments
    ///
    /// * `time` - 本轮调度分配的执行时间，剩余 CPU 时间不足时截断为 0
    ///
    /// ## Returns
    ///
    /// 需要阻塞时返回 `Some(Interrupt::ProcessBlocked)`，否则返回 `None`
    pub fn execute_process(&mut self, time: u64) -> Option<Interrupt> {
        // 从阻塞队列回来的进程重新开始计时
        self.state_changed = false;
        if self.blocking_time_needed == 0 {
            self.cpu_time_needed = self.cpu_time_needed.saturating_sub(time);
            None
        } else {
            self.state_changed = true;
            Some(Interrupt::ProcessBlocked)
        }
    }

    /// 执行一步阻塞等待
    ///
    /// 阻塞时间耗尽时返回 [`Interrupt::ProcessReady`] 并标记状态已切换。
    ///
    /// ## Arguments
    ///
    /// * `time` - 本轮经过的等待时间
    ///
    /// ## Returns
    ///
    /// 阻塞结束时返回 `Some(Interrupt::ProcessReady)`，仍需等待时返回 `None`
    pub fn execute_blocking_process(&mut self, time: u64) -> Option<Interrupt> {
        // 刚被移入阻塞队列的进程仍带着上一步的切换标记
        self.state_changed = false;
        self.blocking_time_needed = self.blocking_time_needed.saturating_sub(time);
        if self.blocking_time_needed == 0 {
            self.state_changed = true;
            Some(Interrupt::ProcessReady)
        } else {
            None
        }
    }
}
