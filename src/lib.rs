//! # MLFQ 调度模拟器
//!
//! 模拟一个基于优先级的抢占式多级反馈队列 (MLFQ) CPU 调度器：
//! CPU 密集型进程用完时间片后逐级降低优先级，I/O 型进程在阻塞队列中
//! 等待，完成后回到最高优先级队列。
//!
//! ## 模块
//!
//! - [`process`] - 进程、队列与调度器
//! - [`config`] - 默认参数与 [`SchedulerConfig`](config::SchedulerConfig)
//! - [`timer`] - 调度循环使用的时间源
//! - [`log`] - `log` crate 的彩色输出后端

pub mod config;
pub mod log;
pub mod process;
pub mod timer;

// 重新导出常用类型
pub use config::{ConfigError, ConfigResult, SchedulerConfig};
pub use process::{Interrupt, Pid, Process, Queue, QueueId, QueueType, Scheduler, SchedulerStats};
