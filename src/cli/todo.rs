//! Direct todo commands: add, done/remove, list, show, tools.
//!
//! Duplicate, ambiguous, and not-found outcomes are regular messages and
//! exit successfully.

use serde::Serialize;

use super::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{TaskRef, TaskSummary};
use crate::tools::tool_specs;

pub struct AddOptions {
    pub items: Vec<String>,
    pub output: OutputOptions,
}

pub struct CompleteOptions {
    pub target: String,
    pub command: &'static str,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct AddReport {
    results: Vec<ItemResult>,
    tasks: Vec<TaskSummary>,
}

#[derive(Serialize)]
struct ItemResult {
    item: String,
    message: String,
}

#[derive(Serialize)]
struct CompleteReport {
    target: TaskRef,
    message: String,
    tasks: Vec<TaskSummary>,
}

#[derive(Serialize)]
struct ShowReport {
    text: String,
    tasks: Vec<TaskSummary>,
}

pub fn run_add(ctx: &Context, opts: AddOptions) -> Result<()> {
    let mut registry = ctx.open_registry();

    let mut results = Vec::with_capacity(opts.items.len());
    for item in opts.items {
        let message = registry.add(&item)?;
        results.push(ItemResult { item, message });
    }

    let mut human = HumanOutput::new(format!("tasktalk add: {} item(s)", results.len()));
    for result in &results {
        human.push_detail(result.message.clone());
        if result.message.starts_with("warning:") {
            human.push_warning(format!("\"{}\" was already on the list", result.item));
        }
    }

    let report = AddReport {
        results,
        tasks: registry.list(),
    };
    emit_success(opts.output, "add", &report, Some(&human))
}

pub fn run_complete(ctx: &Context, opts: CompleteOptions) -> Result<()> {
    let target: TaskRef = opts.target.parse()?;
    let mut registry = ctx.open_registry();

    let message = registry.complete(&target)?;

    let mut human = HumanOutput::new(format!("tasktalk {}: {target}", opts.command));
    human.push_detail(message.clone());

    let report = CompleteReport {
        target,
        message,
        tasks: registry.list(),
    };
    emit_success(opts.output, opts.command, &report, Some(&human))
}

pub fn run_list(ctx: &Context, output: OutputOptions) -> Result<()> {
    let registry = ctx.open_registry();
    let tasks = registry.list();

    let human = HumanOutput::new(serde_json::to_string_pretty(&tasks)?);
    emit_success(output, "list", &tasks, Some(&human))
}

pub fn run_show(ctx: &Context, output: OutputOptions) -> Result<()> {
    let registry = ctx.open_registry();
    let report = ShowReport {
        text: registry.format(),
        tasks: registry.list(),
    };

    let human = HumanOutput::new(report.text.clone());
    emit_success(output, "show", &report, Some(&human))
}

pub fn run_tools(output: OutputOptions) -> Result<()> {
    let specs = tool_specs();

    let mut human = HumanOutput::new("tasktalk tools");
    for spec in &specs {
        human.push_detail(format!("{}\n  {}", spec.name, spec.description));
    }

    emit_success(output, "tools", &specs, Some(&human))
}
