//! Plain-text result table for finished tasks.

use std::fmt::Write;

use crate::core::{ExecutionStatus, FinishedTask};

const INDENT: &str = "    ";

/// Render finished tasks as the OUTPUT table, times with two decimals.
pub fn format_results(finished: &[FinishedTask]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "========== OUTPUT ==========");
    let _ = writeln!(
        out,
        "Task ID{INDENT}STATUS{INDENT}Resource ID{INDENT}Time{INDENT}Start Time{INDENT}Finish Time"
    );
    for task in finished {
        let status = match task.status {
            ExecutionStatus::Finished => "SUCCESS",
            ExecutionStatus::Active => "ACTIVE",
        };
        let _ = writeln!(
            out,
            "{INDENT}{:<7}{INDENT}{status:<7}{INDENT}{:<11}{INDENT}{:<8.2}{INDENT}{:<10.2}{INDENT}{:.2}",
            task.task_id,
            task.resource_id,
            task.cpu_time(),
            task.start_time,
            task.finish_time,
        );
    }
    out
}
