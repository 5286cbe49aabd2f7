//! `thinkloop chat` — interactive mode, one task per line.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{Context, Overrides, build_agent, print_result};

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let agent = build_agent(ctx, Overrides::default())?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Thinkloop Agent — Interactive Mode    ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", agent.config().model);
    println!("  Tools:     {}", agent.list_tools().join(", "));
    println!("  Budget:    {} iterations per task", agent.config().max_iterations);
    println!();
    println!("  Type a task and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  Task > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let task = line.trim();
        if task.is_empty() {
            continue;
        }
        if matches!(task, "exit" | "quit") {
            break;
        }

        // A failed reasoning call ends this task, not the session.
        match agent.execute(task).await {
            Ok(result) => {
                println!();
                print_result(&result, ctx.verbose);
                println!();
            }
            Err(e) => eprintln!("  [Error] {e}\n"),
        }
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}
