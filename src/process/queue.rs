//! # 进程队列
//!
//! 同一优先级的进程按 FIFO 顺序排队，每次工作调用只驱动队首进程执行，
//! 并用 `quantum_clock` 统计队首进程已使用的时间片。
//!
//! ## 时间片轮转
//!
//! ```text
//!          ┌───---──┐  ┌────---─┐  ┌─---────┐
//! Enqueue ►│Process3│◄─│Process2│◄─│Process1│◄─── do_cpu_work / do_blocking_work
//!          └─────---┘  └───---──┘  └────---─┘
//!                                      │
//!          quantum_clock >= quantum ───┴──► dequeue, LowerPriority
//! ```
//!
//! 进程只在两种情况下离开队列：
//! 1. 自身发生阻塞/就绪切换，通过 [`Queue::emit_interrupt`] 立即移出；
//! 2. 用完时间片（或在时间片内完成），由 [`Queue::manage_time_slice`] 移出。

use super::Interrupt;
use super::process::{Pid, Process};
use log::trace;
use std::collections::VecDeque;

/// 队列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueType {
    /// 运行队列，执行 CPU 工作
    CpuQueue,
    /// 阻塞队列，执行 I/O 等待
    BlockingQueue,
}

/// 队列句柄
///
/// 进程通过它记录所在队列，调度器通过它定位目标队列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId {
    queue_type: QueueType,
    priority_level: usize,
}

impl QueueId {
    pub fn cpu(priority_level: usize) -> Self {
        Self {
            queue_type: QueueType::CpuQueue,
            priority_level,
        }
    }

    /// 阻塞队列的优先级固定为 0，不参与运行队列的排序
    pub fn blocking() -> Self {
        Self {
            queue_type: QueueType::BlockingQueue,
            priority_level: 0,
        }
    }

    pub fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    pub fn priority_level(&self) -> usize {
        self.priority_level
    }

    pub fn is_blocking(&self) -> bool {
        self.queue_type == QueueType::BlockingQueue
    }
}

/// 队列转发给调度器的中断
///
/// 携带已经移出队列的进程，调度器据此将其放入目标队列。
#[derive(Debug)]
pub struct QueueInterrupt {
    /// 发出中断的队列
    pub queue: QueueId,
    pub process: Process,
    pub interrupt: Interrupt,
}

/// 一次工作调用的结果
#[derive(Debug)]
pub enum QueueEvent {
    /// 需要调度器重新安置的进程
    Interrupt(QueueInterrupt),
    /// 已完成并离开队列的进程
    Retired(Process),
}

/// 进程队列
#[derive(Debug)]
pub struct Queue {
    id: QueueId,
    processes: VecDeque<Process>,
    /// 队首进程可连续使用的时间
    quantum: u64,
    /// 当前队首进程已使用的时间，队首变化时清零
    quantum_clock: u64,
}

impl Queue {
    /// 创建空队列
    ///
    /// ## Arguments
    ///
    /// * `quantum` - 队首进程可连续使用的时间
    /// * `priority_level` - 运行队列的优先级，阻塞队列忽略此参数
    /// * `queue_type` - 运行队列或阻塞队列
    pub fn new(quantum: u64, priority_level: usize, queue_type: QueueType) -> Self {
        let id = match queue_type {
            QueueType::CpuQueue => QueueId::cpu(priority_level),
            QueueType::BlockingQueue => QueueId::blocking(),
        };
        Self {
            id,
            processes: VecDeque::new(),
            quantum,
            quantum_clock: 0,
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn priority_level(&self) -> usize {
        self.id.priority_level()
    }

    pub fn queue_type(&self) -> QueueType {
        self.id.queue_type()
    }

    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    /// 队首进程已使用的时间
    pub fn quantum_clock(&self) -> u64 {
        self.quantum_clock
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// 按队列顺序遍历进程，队首在前
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// 检查进程是否在本队列中
    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.iter().any(|process| process.pid() == pid)
    }

    /// 将进程加入队尾，并把它的所属队列设为本队列
    pub fn enqueue(&mut self, mut process: Process) -> &Process {
        process.set_parent_queue(self.id);
        self.processes.push_back(process);
        &self.processes[self.processes.len() - 1]
    }

    /// 移出队首进程，空队列返回 `None`
    pub fn dequeue(&mut self) -> Option<Process> {
        self.processes.pop_front()
    }

    pub fn peek(&self) -> Option<&Process> {
        self.processes.front()
    }

    /// 取出全部进程并清零时间片计数
    pub fn drain(&mut self) -> VecDeque<Process> {
        self.quantum_clock = 0;
        std::mem::take(&mut self.processes)
    }

    /// 时间片统计
    ///
    /// 在队首进程执行一步之后调用，`state_changed` 为该进程这一步是否
    /// 发生了阻塞/就绪切换。
    ///
    /// - 发生切换：进程已经通过中断离开，不为这一步计时，计数清零；
    /// - 否则累加 `time`，用满时间片时移出队首，未完成的进程以
    ///   [`Interrupt::LowerPriority`] 交给调度器降级；
    /// - 在时间片内完成的队首进程立即移出。
    ///
    /// ## Arguments
    ///
    /// * `state_changed` - 队首进程这一步是否发生了状态切换
    /// * `time` - 这一步执行的时间
    ///
    /// ## Returns
    ///
    /// - `Some(QueueEvent::Interrupt(..))` - 用满时间片的未完成进程，需要降级
    /// - `Some(QueueEvent::Retired(..))` - 已完成并移出的进程
    /// - `None` - 队首进程继续运行
    pub fn manage_time_slice(&mut self, state_changed: bool, time: u64) -> Option<QueueEvent> {
        if state_changed {
            self.quantum_clock = 0;
            return None;
        }

        self.quantum_clock += time;
        if self.quantum_clock >= self.quantum {
            self.quantum_clock = 0;
            let process = self.dequeue()?;
            if process.is_finished() {
                return Some(QueueEvent::Retired(process));
            }
            return Some(QueueEvent::Interrupt(QueueInterrupt {
                queue: self.id,
                process,
                interrupt: Interrupt::LowerPriority,
            }));
        }

        if self.peek().is_some_and(Process::is_finished) {
            self.quantum_clock = 0;
            return self.dequeue().map(QueueEvent::Retired);
        }
        None
    }

    /// 对队首进程执行一步 CPU 工作
    pub fn do_cpu_work(&mut self, time: u64) -> Option<QueueEvent> {
        self.work(time, Process::execute_process)
    }

    /// 对队首进程执行一步阻塞等待
    pub fn do_blocking_work(&mut self, time: u64) -> Option<QueueEvent> {
        self.work(time, Process::execute_blocking_process)
    }

    fn work<F>(&mut self, time: u64, execute: F) -> Option<QueueEvent>
    where
        F: FnOnce(&mut Process, u64) -> Option<Interrupt>,
    {
        let head = self.processes.front_mut()?;
        let pid = head.pid();
        trace!("{:?}: run pid {} for {}", self.id, pid, time);

        let raised = execute(head, time);
        let state_changed = head.is_state_changed();
        let forwarded = raised.map(|interrupt| self.emit_interrupt(pid, interrupt));
        let accounted = self.manage_time_slice(state_changed, time);
        forwarded.map(QueueEvent::Interrupt).or(accounted)
    }

    /// 队列的中断处理
    ///
    /// 进程自身发生状态切换时调用：按 pid 找到并移出该进程，
    /// 连同中断一起转发给调度器。
    ///
    /// ## Arguments
    ///
    /// * `source` - 发生状态切换的进程
    /// * `interrupt` - 需要调度器处理的中断
    ///
    /// ## Returns
    ///
    /// 携带被移出进程的 [`QueueInterrupt`]
    ///
    /// ## Panics
    ///
    /// 进程不在本队列中说明所属关系记录已损坏。
    pub fn emit_interrupt(&mut self, source: Pid, interrupt: Interrupt) -> QueueInterrupt {
        let index = self
            .processes
            .iter()
            .position(|process| process.pid() == source);
        let Some(process) = index.and_then(|index| self.processes.remove(index)) else {
            panic!("cannot find pid {} in {:?}!", source, self.id);
        };
        QueueInterrupt {
            queue: self.id,
            process,
            interrupt,
        }
    }
}
