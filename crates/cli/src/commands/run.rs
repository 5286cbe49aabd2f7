//! `thinkloop run` — solve a single task.

use super::{Context, Overrides, build_agent, print_result};

pub async fn run(ctx: &Context, task: &str, overrides: Overrides) -> anyhow::Result<()> {
    let agent = build_agent(ctx, overrides)?;
    let result = agent.execute(task).await?;
    print_result(&result, ctx.verbose);
    Ok(())
}
