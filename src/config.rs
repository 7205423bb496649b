//! # 调度器配置
//!
//! 定义了 MLFQ 调度模拟器使用的默认参数，以及可覆盖这些默认值的
//! [`SchedulerConfig`]。所有时间单位均为逻辑毫秒。

use core::fmt;

/// 运行队列数量（优先级级数）
///
/// 队列 0 为最高优先级，队列 `PRIORITY_LEVELS - 1` 为最低优先级。
pub const PRIORITY_LEVELS: usize = 3;

/// 最高优先级队列的时间片
pub const BASE_QUANTUM: u64 = 10;

/// 每降低一级优先级，时间片增加的长度
///
/// 默认配置下各队列时间片为 10 / 30 / 50。
pub const QUANTUM_STEP: u64 = 20;

/// 阻塞队列的时间片
pub const BLOCKING_QUANTUM: u64 = 50;

/// 随机生成进程时 CPU 时间的上界（含）
pub const MAX_CPU_TIME: u64 = 1000;

/// 随机生成阻塞进程时阻塞时间的上界（含）
pub const MAX_BLOCKING_TIME: u64 = 100;

/// 配置错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// 至少需要一个运行队列
    NoPriorityLevels,
    /// 时间片长度为 0，队首进程会在未执行前就被驱逐
    ZeroQuantum,
    /// 多级队列的时间片差为 0，各级时间片不再严格递增
    ZeroQuantumStep,
    /// 最低优先级队列的时间片超出 `u64` 范围
    QuantumOverflow,
    /// 优先级提升间隔为 0
    ZeroBoostInterval,
}

/// 配置结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoPriorityLevels => write!(f, "at least one priority level is required"),
            ConfigError::ZeroQuantum => write!(f, "queue quantum must be greater than zero"),
            ConfigError::ZeroQuantumStep => {
                write!(f, "quantum step must be greater than zero with several levels")
            }
            ConfigError::QuantumOverflow => write!(f, "lowest priority quantum overflows u64"),
            ConfigError::ZeroBoostInterval => {
                write!(f, "priority boost interval must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// 调度器配置
///
/// 第 `i` 级运行队列的时间片为 `base_quantum + i * quantum_step`，
/// 高优先级队列时间片短、响应快，低优先级队列时间片长、切换少。
///
/// ## 示例
///
/// ```rust
/// use mlfq_sim::config::SchedulerConfig;
///
/// let config = SchedulerConfig::default();
/// assert_eq!(config.quantum_for(0), 10);
/// assert_eq!(config.quantum_for(2), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// 运行队列数量
    pub priority_levels: usize,
    /// 队列 0 的时间片
    pub base_quantum: u64,
    /// 相邻两级队列的时间片差
    pub quantum_step: u64,
    /// 阻塞队列的时间片
    pub blocking_quantum: u64,
    /// 优先级提升间隔，`None` 表示从不提升
    pub boost_interval: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            priority_levels: PRIORITY_LEVELS,
            base_quantum: BASE_QUANTUM,
            quantum_step: QUANTUM_STEP,
            blocking_quantum: BLOCKING_QUANTUM,
            boost_interval: None,
        }
    }
}

impl SchedulerConfig {
    /// 计算指定优先级队列的时间片
    ///
    /// 超出范围的优先级按最低优先级计算。
    ///
    /// ## Returns
    ///
    /// 队列时间片。未经 [`validate`](Self::validate) 的配置可能溢出，
    /// 此时结果饱和为 `u64::MAX`。
    pub fn quantum_for(&self, priority_level: usize) -> u64 {
        self.checked_quantum_for(priority_level).unwrap_or(u64::MAX)
    }

    fn checked_quantum_for(&self, priority_level: usize) -> Option<u64> {
        let level = priority_level.min(self.lowest_priority()) as u64;
        level
            .checked_mul(self.quantum_step)
            .and_then(|offset| offset.checked_add(self.base_quantum))
    }

    /// 最低优先级队列的编号
    pub fn lowest_priority(&self) -> usize {
        self.priority_levels.saturating_sub(1)
    }

    /// 检查配置是否可用于构造调度器
    pub fn validate(&self) -> ConfigResult<()> {
        if self.priority_levels == 0 {
            return Err(ConfigError::NoPriorityLevels);
        }
        if self.base_quantum == 0 || self.blocking_quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.priority_levels > 1 && self.quantum_step == 0 {
            return Err(ConfigError::ZeroQuantumStep);
        }
        // 时间片随优先级单调递增，最低优先级不溢出则全部不溢出
        if self.checked_quantum_for(self.lowest_priority()).is_none() {
            return Err(ConfigError::QuantumOverflow);
        }
        if self.boost_interval == Some(0) {
            return Err(ConfigError::ZeroBoostInterval);
        }
        Ok(())
    }
}
