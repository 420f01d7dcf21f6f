//! Control loop: turns operator input into pool operations.
//!
//! Commands are whitespace-separated tokens, so `2 3` on one line behaves
//! the same as `2` then `3` on separate lines:
//!
//! | token | action                                   |
//! |-------|------------------------------------------|
//! | `1`   | start one worker                         |
//! | `2`   | prompt for a count, start that many      |
//! | `3`   | prompt for an identifier, stop that worker |
//! | `4`   | list active worker identifiers           |
//! | `0`   | shut the pool down and quit              |
//!
//! Anything else is reported as unknown and solicitation continues.
//! Malformed numeric input on a prompt, or end of the input stream, ends
//! only this loop; the pipeline then concludes through the producer's
//! completion path. A stop signal raised while waiting for input ends
//! solicitation immediately.

use std::collections::VecDeque;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio_util::sync::CancellationToken;

use crate::core::pool::WorkerPool;

/// Why the control loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlOutcome {
    /// Operator asked to quit; the pool has been shut down.
    Quit,
    /// Input ended or a numeric prompt got a malformed answer.
    InputEnded,
    /// The stop signal fired (producer finished first).
    Stopped,
}

/// One read from the operator, with the stop signal folded in.
enum Input {
    Token(String),
    Closed,
    Stopped,
}

/// Whitespace-token reader over any async input.
struct CommandReader<R> {
    lines: Lines<BufReader<R>>,
    pending: VecDeque<String>,
}

impl<R: AsyncRead + Unpin> CommandReader<R> {
    fn new(input: R) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    async fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            match self.lines.next_line().await {
                Ok(Some(line)) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_string)),
                Ok(None) | Err(_) => return None,
            }
        }
    }
}

fn print_menu() {
    println!("choose a command:");
    println!("1 - start a worker");
    println!("2 - start several workers");
    println!("3 - stop a worker by id");
    println!("4 - list running workers");
    println!("0 - quit");
}

async fn read_input<R: AsyncRead + Unpin>(
    commands: &mut CommandReader<R>,
    stop: &CancellationToken,
) -> Input {
    tokio::select! {
        // The stop signal is checked before soliciting: once the producer
        // finished, pending keystrokes must not be dispatched anymore.
        biased;
        _ = stop.cancelled() => Input::Stopped,
        token = commands.next_token() => match token {
            Some(token) => Input::Token(token),
            None => Input::Closed,
        },
    }
}

/// Solicits operator commands until quit, input end, or the stop signal.
pub(crate) async fn run<R: AsyncRead + Unpin>(
    pool: &WorkerPool,
    input: R,
    stop: &CancellationToken,
) -> ControlOutcome {
    let mut commands = CommandReader::new(input);
    print_menu();

    loop {
        let token = match read_input(&mut commands, stop).await {
            Input::Token(token) => token,
            Input::Closed => return ControlOutcome::InputEnded,
            Input::Stopped => return ControlOutcome::Stopped,
        };

        match token.as_str() {
            "1" => {
                pool.add_worker().await;
            }
            "2" => {
                println!("how many workers to start:");
                let count = match read_number(&mut commands, stop).await {
                    Ok(count) => count,
                    Err(outcome) => return outcome,
                };
                for _ in 0..count {
                    pool.add_worker().await;
                }
            }
            "3" => {
                if pool.worker_count().await == 0 {
                    println!("no running workers to stop");
                    continue;
                }
                println!("worker id to stop:");
                let id = match read_number(&mut commands, stop).await {
                    Ok(id) => id,
                    Err(outcome) => return outcome,
                };
                pool.remove_worker(id).await;
            }
            "4" => {
                let ids = pool.list_workers().await;
                if ids.is_empty() {
                    println!("no running workers");
                } else {
                    let list = ids
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!("active workers: {list}");
                }
            }
            "0" => {
                println!("shutting down");
                pool.shutdown().await;
                return ControlOutcome::Quit;
            }
            other => println!("unknown command: {other}"),
        }
    }
}

/// Reads one numeric answer to a prompt.
///
/// Malformed input terminates the control loop (mapped to `InputEnded`), it
/// never crashes the process.
async fn read_number<R: AsyncRead + Unpin>(
    commands: &mut CommandReader<R>,
    stop: &CancellationToken,
) -> Result<u32, ControlOutcome> {
    match read_input(commands, stop).await {
        Input::Token(token) => token.parse().map_err(|_| ControlOutcome::InputEnded),
        Input::Closed => Err(ControlOutcome::InputEnded),
        Input::Stopped => Err(ControlOutcome::Stopped),
    }
}
