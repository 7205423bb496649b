//! # 调度器模块
//!
//! 维护一个阻塞队列和多个优先级不同的运行队列，驱动模拟时钟，
//! 并根据队列转发的中断在队列之间移动进程。
//! 采用多级反馈队列 (MLFQ) 调度策略，实现可降低优先级的抢占式调度。
//!
//! ## 设计原理
//!
//! ### 调度策略
//!
//! - **优先级分级**：维护多个优先级不同的运行队列，0 为最高优先级
//! - **严格优先级**：每轮只有第一个非空运行队列获得 CPU 时间
//! - **动态降级**：用完时间片仍未完成的进程降到下一级队列
//! - **响应性优化**：新进程和 I/O 完成的进程总是进入最高优先级队列
//! - **优先级提升**：可选地定期把所有进程提回最高优先级，避免饥饿
//!
//! ### 所有权
//!
//! 调度器拥有所有队列，队列按值拥有进程。进程在队列之间移动就是
//! `Process` 值的移动，因此一个进程在任意时刻只可能属于一个队列。
//!
//! ## 调度流程
//!
//! ```text
//!   ┌──────────── Scheduler::step ─────────────┐
//!   │ slice = now - clock                      │
//!   │                                          │
//!   │ Blocking Queue ── do_blocking_work ──┐   │
//!   │                                      │   │
//!   │ Queue 0 (10) ─┐                      │   │
//!   │ Queue 1 (30) ─┼─ first non-empty ────┤   │
//!   │ Queue 2 (50) ─┘   do_cpu_work        │   │
//!   │                                      ▼   │
//!   │                          handle_interrupt│
//!   └──────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use mlfq_sim::config::SchedulerConfig;
//! use mlfq_sim::process::{Process, Scheduler};
//! use mlfq_sim::timer::StepClock;
//!
//! let mut scheduler =
//!     Scheduler::with_config(SchedulerConfig::default(), Box::new(StepClock::new(5))).unwrap();
//! scheduler.add_new_process(Process::with_times(1, 40, 0));
//! scheduler.add_new_process(Process::with_times(2, 10, 20));
//!
//! let stats = scheduler.run();
//! assert!(scheduler.all_queues_empty());
//! assert_eq!(stats.completed.len(), 2);
//! ```

use super::Interrupt;
use super::process::{Pid, Process};
use super::queue::{Queue, QueueEvent, QueueId, QueueInterrupt, QueueType};
use crate::config::{ConfigResult, SchedulerConfig};
use crate::timer::{Clock, WallClock};
use log::{debug, info};

/// 一个进程的完成记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    /// 完成时刻，自调度器创建起的逻辑时间
    pub finished_at: u64,
}

/// 调度统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// 调度循环执行的轮数
    pub iterations: u64,
    /// 累计经过的逻辑时间
    pub elapsed: u64,
    /// 按完成顺序排列的完成记录
    pub completed: Vec<Completion>,
    /// `ProcessBlocked` 中断次数
    pub blocked: u64,
    /// `ProcessReady` 中断次数
    pub readied: u64,
    /// 运行队列之间的降级次数
    pub demoted: u64,
    /// 优先级提升次数
    pub boosts: u64,
}

/// MLFQ 调度器
///
/// ## 队列布局
///
/// ```text
/// running_queues[0]  quantum = base            ◄── 新进程 / I/O 完成
/// running_queues[1]  quantum = base + step
/// ...
/// running_queues[N-1] quantum = base + (N-1)*step  ◄── 最低优先级，降级到此为止
///
/// blocking_queue     quantum = blocking_quantum    ◄── 等待 I/O 的进程
/// ```
///
/// 高优先级队列时间片短，保证交互型进程的响应；
/// 低优先级队列时间片长，减少 CPU 密集型进程的切换次数。
pub struct Scheduler {
    /// 上一次读取的时间
    clock: u64,
    time_source: Box<dyn Clock>,
    config: SchedulerConfig,
    blocking_queue: Queue,
    /// 多级运行队列，索引 0 为最高优先级
    running_queues: Vec<Queue>,
    /// 距离上一次优先级提升经过的时间
    since_boost: u64,
    stats: SchedulerStats,
}

impl Scheduler {
    /// 使用默认配置和墙上时钟创建调度器
    pub fn new() -> Self {
        Self::build(SchedulerConfig::default(), Box::new(WallClock::new()))
    }

    /// 使用默认配置和给定时间源创建调度器
    pub fn with_clock(time_source: Box<dyn Clock>) -> Self {
        Self::build(SchedulerConfig::default(), time_source)
    }

    /// 使用给定配置和时间源创建调度器
    ///
    /// 配置不合法时返回对应的 [`ConfigError`](crate::config::ConfigError)。
    pub fn with_config(config: SchedulerConfig, time_source: Box<dyn Clock>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config, time_source))
    }

    fn build(config: SchedulerConfig, mut time_source: Box<dyn Clock>) -> Self {
        let running_queues = (0..config.priority_levels)
            .map(|level| Queue::new(config.quantum_for(level), level, QueueType::CpuQueue))
            .collect();
        let blocking_queue = Queue::new(config.blocking_quantum, 0, QueueType::BlockingQueue);

        Self {
            clock: time_source.now(),
            time_source,
            config,
            blocking_queue,
            running_queues,
            since_boost: 0,
            stats: SchedulerStats::default(),
        }
    }

    /// 调度器使用的配置
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 到目前为止的统计信息
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn priority_levels(&self) -> usize {
        self.running_queues.len()
    }

    /// 指定优先级的运行队列
    pub fn cpu_queue(&self, priority_level: usize) -> Option<&Queue> {
        self.running_queues.get(priority_level)
    }

    pub fn blocking_queue(&self) -> &Queue {
        &self.blocking_queue
    }

    /// 查找进程当前所在的队列
    pub fn locate(&self, pid: Pid) -> Option<QueueId> {
        core::iter::once(&self.blocking_queue)
            .chain(self.running_queues.iter())
            .find(|queue| queue.contains(pid))
            .map(Queue::id)
    }

    /// 尚未完成的进程数量
    pub fn process_count(&self) -> usize {
        self.blocking_queue.len() + self.running_queues.iter().map(Queue::len).sum::<usize>()
    }

    pub fn all_queues_empty(&self) -> bool {
        self.blocking_queue.is_empty() && self.running_queues.iter().all(Queue::is_empty)
    }

    /// 运行调度循环直到所有队列为空
    ///
    /// 返回本次运行结束时的统计信息。
    pub fn run(&mut self) -> SchedulerStats {
        info!(
            "scheduler started with {} processes, quanta {:?}",
            self.process_count(),
            self.running_queues.iter().map(Queue::quantum).collect::<Vec<_>>()
        );
        while !self.all_queues_empty() {
            self.step();
        }
        info!(
            "scheduler finished: {} processes in {} iterations, elapsed {}",
            self.stats.completed.len(),
            self.stats.iterations,
            self.stats.elapsed
        );
        self.stats.clone()
    }

    /// 执行一轮调度
    ///
    /// 阻塞队列非空时先推进阻塞队列，再让第一个非空运行队列执行 CPU 工作。
    /// 低优先级队列只有在所有更高优先级队列都为空时才会运行。
    pub fn step(&mut self) {
        let now = self.time_source.now();
        let slice = now.saturating_sub(self.clock);
        self.clock = now;
        self.stats.iterations += 1;
        self.stats.elapsed += slice;

        if !self.blocking_queue.is_empty() {
            let event = self.blocking_queue.do_blocking_work(slice);
            self.dispatch(event);
        }

        if let Some(queue) = self.running_queues.iter_mut().find(|queue| !queue.is_empty()) {
            let event = queue.do_cpu_work(slice);
            self.dispatch(event);
        }

        if let Some(interval) = self.config.boost_interval {
            self.since_boost += slice;
            if self.since_boost >= interval {
                self.since_boost = 0;
                self.boost_priorities();
            }
        }
    }

    /// 向最高优先级队列添加进程
    ///
    /// 新进程和完成 I/O 的进程都从这里进入，保证其响应性。
    /// 已经没有任何剩余工作的进程直接记为完成，不参与调度。
    ///
    /// ## Arguments
    ///
    /// * `process` - 新创建的进程，或阻塞结束后就绪的进程
    pub fn add_new_process(&mut self, process: Process) {
        if process.is_finished() {
            info!("pid {} has no work left, retired without running", process.pid());
            self.retire(process);
            return;
        }
        self.running_queues[0].enqueue(process);
    }

    /// 调度器的中断处理
    ///
    /// - `ProcessBlocked`: 进入阻塞队列
    /// - `ProcessReady`: 回到最高优先级运行队列
    /// - `LowerPriority`: 来自阻塞队列的回到阻塞队列队尾；来自运行队列的
    ///   降一级，已在最低优先级的回到同一队列队尾
    ///
    /// ## Arguments
    ///
    /// * `queue` - 发出中断的队列
    /// * `process` - 已从该队列移出的进程
    /// * `interrupt` - 中断类型
    pub fn handle_interrupt(&mut self, queue: QueueId, process: Process, interrupt: Interrupt) {
        debug!("{:?} from {:?}: pid {}", interrupt, queue, process.pid());
        match interrupt {
            Interrupt::ProcessBlocked => {
                self.stats.blocked += 1;
                self.blocking_queue.enqueue(process);
            }
            Interrupt::ProcessReady => {
                self.stats.readied += 1;
                self.add_new_process(process);
            }
            Interrupt::LowerPriority if queue.is_blocking() => {
                self.blocking_queue.enqueue(process);
            }
            Interrupt::LowerPriority => {
                let next = (queue.priority_level() + 1).min(self.config.lowest_priority());
                if next != queue.priority_level() {
                    self.stats.demoted += 1;
                }
                self.running_queues[next].enqueue(process);
            }
        }
    }

    /// 优先级提升
    ///
    /// 把所有低优先级运行队列中的进程按优先级顺序移到最高优先级队列队尾，
    /// 阻塞队列保持不变。返回被移动的进程数量。
    pub fn boost_priorities(&mut self) -> usize {
        let Some((top, lower)) = self.running_queues.split_first_mut() else {
            return 0;
        };
        let mut moved = 0;
        for queue in lower {
            for process in queue.drain() {
                top.enqueue(process);
                moved += 1;
            }
        }
        self.stats.boosts += 1;
        info!("priority boost moved {} processes to queue 0", moved);
        moved
    }

    fn dispatch(&mut self, event: Option<QueueEvent>) {
        match event {
            Some(QueueEvent::Interrupt(QueueInterrupt {
                queue,
                process,
                interrupt,
            })) => self.handle_interrupt(queue, process, interrupt),
            Some(QueueEvent::Retired(process)) => self.retire(process),
            None => {}
        }
    }

    fn retire(&mut self, process: Process) {
        info!("pid {} finished at {}", process.pid(), self.stats.elapsed);
        self.stats.completed.push(Completion {
            pid: process.pid(),
            finished_at: self.stats.elapsed,
        });
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
