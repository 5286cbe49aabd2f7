//! `thinkloop demo` — run the predefined demonstration tasks.

use super::{Context, Overrides, build_agent, print_result, select_by_index};

pub const DEMO_TASKS: &[&str] = &[
    "How much does a Paris-London ticket cost?",
    "Calculate 15% of 200",
    "What time is it right now?",
    "Convert 100 EUR to USD",
];

/// Tasks selected by a 1-based `index`, or all of them.
pub fn select(index: Option<usize>) -> anyhow::Result<Vec<&'static str>> {
    select_by_index(DEMO_TASKS, index, "demo")
}

pub async fn run(ctx: &Context, index: Option<usize>) -> anyhow::Result<()> {
    let tasks = select(index)?;
    let agent = build_agent(ctx, Overrides::default())?;

    for task in tasks {
        println!("\n{}", "=".repeat(60));
        println!("Task: {task}");
        println!("{}", "=".repeat(60));

        let result = agent.execute(task).await?;
        print_result(&result, ctx.verbose);
    }
    Ok(())
}
