//! # mlfq-sim
//!
//! 随机生成一批进程（其中一部分为阻塞型），交给 MLFQ 调度器运行，
//! 结束后打印调度统计。日志级别由环境变量 `LOG` 控制。

use clap::{App, Arg, ArgMatches, value_t};
use log::{debug, error, info};
use mlfq_sim::config::{self, SchedulerConfig};
use mlfq_sim::process::{Process, Scheduler, SchedulerStats};
use mlfq_sim::timer::{Clock, StepClock, WallClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

/// 第一个进程的 pid
const FIRST_PID: usize = 1000;

fn main() {
    mlfq_sim::log::init();

    let levels = config::PRIORITY_LEVELS.to_string();
    let base_quantum = config::BASE_QUANTUM.to_string();
    let quantum_step = config::QUANTUM_STEP.to_string();
    let blocking_quantum = config::BLOCKING_QUANTUM.to_string();

    let matches = App::new("mlfq-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-level feedback queue scheduler simulator")
        .arg(
            Arg::with_name("processes")
                .short("n")
                .long("processes")
                .takes_value(true)
                .default_value("100")
                .help("Number of processes to create"),
        )
        .arg(
            Arg::with_name("blocking-ratio")
                .short("b")
                .long("blocking-ratio")
                .takes_value(true)
                .default_value("0.25")
                .help("Probability that a created process is blocking"),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .takes_value(true)
                .help("Seed for the process generator"),
        )
        .arg(
            Arg::with_name("tick")
                .short("t")
                .long("tick")
                .takes_value(true)
                .help("Advance a virtual clock by this much per iteration instead of using wall time"),
        )
        .arg(
            Arg::with_name("levels")
                .long("levels")
                .takes_value(true)
                .default_value(&levels)
                .help("Number of CPU priority levels"),
        )
        .arg(
            Arg::with_name("base-quantum")
                .long("base-quantum")
                .takes_value(true)
                .default_value(&base_quantum)
                .help("Quantum of the highest priority queue"),
        )
        .arg(
            Arg::with_name("quantum-step")
                .long("quantum-step")
                .takes_value(true)
                .default_value(&quantum_step)
                .help("Quantum increase per priority level"),
        )
        .arg(
            Arg::with_name("blocking-quantum")
                .long("blocking-quantum")
                .takes_value(true)
                .default_value(&blocking_quantum)
                .help("Quantum of the blocking queue"),
        )
        .arg(
            Arg::with_name("boost-interval")
                .long("boost-interval")
                .takes_value(true)
                .help("Move every process back to the top queue after this much time"),
        )
        .get_matches();

    let process_count = value_t!(matches, "processes", usize).unwrap_or_else(|e| e.exit());
    let blocking_ratio = value_t!(matches, "blocking-ratio", f64).unwrap_or_else(|e| e.exit());
    if !(0.0..=1.0).contains(&blocking_ratio) {
        error!("blocking ratio must be within [0, 1], got {}", blocking_ratio);
        std::process::exit(1);
    }

    let config = SchedulerConfig {
        priority_levels: value_t!(matches, "levels", usize).unwrap_or_else(|e| e.exit()),
        base_quantum: value_t!(matches, "base-quantum", u64).unwrap_or_else(|e| e.exit()),
        quantum_step: value_t!(matches, "quantum-step", u64).unwrap_or_else(|e| e.exit()),
        blocking_quantum: value_t!(matches, "blocking-quantum", u64).unwrap_or_else(|e| e.exit()),
        boost_interval: optional_value(&matches, "boost-interval"),
    };

    let time_source: Box<dyn Clock> = match optional_value::<u64>(&matches, "tick") {
        Some(0) => {
            error!("tick must be greater than zero");
            std::process::exit(1);
        }
        Some(tick) => Box::new(StepClock::new(tick)),
        None => Box::new(WallClock::new()),
    };

    let mut scheduler = match Scheduler::with_config(config, time_source) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    debug!("scheduler configuration: {:?}", scheduler.config());

    let mut rng = match optional_value::<u64>(&matches, "seed") {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for i in 0..process_count {
        let blocking = rng.gen_bool(blocking_ratio);
        let process = Process::with_rng(FIRST_PID + i, None, blocking, &mut rng);
        info!(
            "created pid {}: cpu {}, blocking {}",
            process.pid(),
            process.cpu_time_needed(),
            process.blocking_time_needed()
        );
        scheduler.add_new_process(process);
    }

    let stats = scheduler.run();
    print_summary(&stats);
}

/// 读取可选参数，格式错误时由 clap 打印错误并退出
fn optional_value<T>(matches: &ArgMatches, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if matches.is_present(name) {
        Some(value_t!(matches, name, T).unwrap_or_else(|e| e.exit()))
    } else {
        None
    }
}

fn print_summary(stats: &SchedulerStats) {
    let completed = stats.completed.len();
    // 所有进程都在时刻 0 到达，完成时刻即周转时间
    let total_turnaround: u64 = stats.completed.iter().map(|c| c.finished_at).sum();
    let average_turnaround = if completed == 0 {
        0.0
    } else {
        total_turnaround as f64 / completed as f64
    };

    println!("processes completed : {}", completed);
    println!("iterations          : {}", stats.iterations);
    println!("elapsed time        : {}", stats.elapsed);
    println!("average turnaround  : {:.2}", average_turnaround);
    println!("blocked / readied   : {} / {}", stats.blocked, stats.readied);
    println!("demotions           : {}", stats.demoted);
    println!("priority boosts     : {}", stats.boosts);
}
