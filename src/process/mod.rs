//! # 进程调度模块
//!
//! 多级反馈队列 (MLFQ) 调度模拟的核心实现。
//!
//! ## 核心组件
//!
//! - [`Process`] - 模拟进程，记录剩余的 CPU 时间与阻塞时间
//! - [`Queue`] - 同一优先级进程的 FIFO 队列，负责时间片统计
//! - [`Scheduler`] - 持有一个阻塞队列和多个运行队列，驱动调度循环
//!
//! ## 中断路由
//!
//! 进程与队列之间的状态迁移通过同步的 [`Interrupt`] 通知完成：
//!
//! ```text
//!   Process ──ProcessBlocked/ProcessReady──► Queue ──► Scheduler
//!                                             │          │
//!          quantum exhausted ── LowerPriority ┘          ▼
//!                                              re-enqueue into target queue
//! ```
//!
//! 中断不是异步信号，而是在同一次工作调用中返回给调度器处理的值。

mod manager;
mod process;
mod queue;

pub use manager::{Completion, Scheduler, SchedulerStats};
pub use process::{Pid, Process};
pub use queue::{Queue, QueueEvent, QueueId, QueueInterrupt, QueueType};

/// 调度中断
///
/// 进程或队列请求状态迁移时发出的通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// 运行中的进程需要等待 I/O，移入阻塞队列
    ProcessBlocked,
    /// 阻塞进程的 I/O 已完成，回到最高优先级运行队列
    ProcessReady,
    /// 进程用完时间片仍未结束，降低一级优先级
    LowerPriority,
}
