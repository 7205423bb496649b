//! # 时间源模块
//!
//! 调度循环每轮都会读取一次时间源，以两次读数的差值作为本轮的执行时间片。
//! 时间源被抽象为 [`Clock`] trait，以便在墙上时钟与确定性的虚拟时钟之间切换。
//!
//! - [`WallClock`] - 真实经过的毫秒数，每轮执行时间不确定
//! - [`StepClock`] - 每次读取前进固定步长，适合可复现的模拟
//! - [`ManualClock`] - 由外部显式设置时间，适合逐步驱动的测试

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// 逻辑时间源
///
/// `now` 返回单调不减的逻辑毫秒数。
pub trait Clock {
    fn now(&mut self) -> u64;
}

/// 墙上时钟，返回创建以来经过的毫秒数
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// 固定步长时钟
///
/// 第一次读取返回 0，此后每次读取前进 `step`，
/// 因此调度循环每一轮得到的时间片都恰好为 `step`。
#[derive(Debug, Clone, Copy)]
pub struct StepClock {
    step: u64,
    current: u64,
    started: bool,
}

impl StepClock {
    pub fn new(step: u64) -> Self {
        Self {
            step,
            current: 0,
            started: false,
        }
    }
}

impl Clock for StepClock {
    fn now(&mut self) -> u64 {
        if self.started {
            self.current += self.step;
        } else {
            self.started = true;
        }
        self.current
    }
}

/// 手动时钟
///
/// 克隆出的句柄共享同一个时间值，测试代码持有一个句柄推进时间，
/// 调度器持有另一个句柄读取时间。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, time: u64) {
        self.time.set(time);
    }

    pub fn advance(&self, delta: u64) {
        self.time.set(self.time.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> u64 {
        self.time.get()
    }
}
