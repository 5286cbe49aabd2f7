//! `thinkloop scenarios` — scenario benchmark.
//!
//! Each scenario is a realistic task plus a list of keywords. A run passes
//! when its answer contains at least one keyword (case-insensitive). Agent
//! errors count as failures and do not stop the remaining scenarios.

use super::{Context, Overrides, build_agent, print_result, select_by_index};

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub task: &'static str,
    pub keywords: &'static [&'static str],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "Travel Planning - Budget",
        task: "Plan a trip to Paris with a budget of 1000€. Estimate the transport and accommodation costs.",
        keywords: &["paris", "€", "budget", "transport", "hotel", "cost"],
    },
    Scenario {
        name: "Complex Calculation - Discount",
        task: "A product costs 49€ and has a 20% discount. What is the final price?",
        keywords: &["39", "euro", "€", "price"],
    },
    Scenario {
        name: "Multi-step Research",
        task: "What is the capital of France and how many people live there?",
        keywords: &["paris", "capital", "inhabitants", "million"],
    },
    Scenario {
        name: "Currency Conversion",
        task: "Convert 500 EUR to USD. What is the amount?",
        keywords: &["usd", "dollar", "550", "amount"],
    },
    Scenario {
        name: "Time Query",
        task: "What are the current date and time?",
        keywords: &["202", ":", "time", "date"],
    },
    Scenario {
        name: "Price Comparison",
        task: "If a Paris-London ticket costs 120€ and a hotel costs 80€ per night for 2 nights, \
               what is the total cost?",
        keywords: &["280", "€", "total", "cost"],
    },
];

/// Keywords found in `answer`, in the scenario's order.
pub fn matched_keywords(answer: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    let answer = answer.to_lowercase();
    keywords
        .iter()
        .copied()
        .filter(|kw| answer.contains(&kw.to_lowercase()))
        .collect()
}

/// What one scenario produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub matched: Vec<&'static str>,
    pub error: Option<String>,
}

impl ScenarioReport {
    pub fn answered(scenario: &Scenario, answer: &str) -> Self {
        Self {
            name: scenario.name,
            matched: matched_keywords(answer, scenario.keywords),
            error: None,
        }
    }

    pub fn failed(scenario: &Scenario, error: impl ToString) -> Self {
        Self {
            name: scenario.name,
            matched: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none() && !self.matched.is_empty()
    }
}

/// Totals over a batch of reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
}

impl Summary {
    pub fn of(reports: &[ScenarioReport]) -> Self {
        Self {
            total: reports.len(),
            passed: reports.iter().filter(|r| r.passed()).count(),
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Percentage of passing scenarios; 0 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total as f64 * 100.0
    }
}

pub async fn run(ctx: &Context, index: Option<usize>) -> anyhow::Result<()> {
    let scenarios = select_by_index(SCENARIOS, index, "scenario")?;
    let agent = build_agent(ctx, Overrides::default())?;
    let mut reports = Vec::with_capacity(scenarios.len());

    for scenario in &scenarios {
        println!("\n{}", "=".repeat(60));
        println!("Scenario: {}", scenario.name);
        println!("{}", "=".repeat(60));
        println!("Task: {}\n", scenario.task);

        let report = match agent.execute(scenario.task).await {
            Ok(result) => {
                print_result(&result, ctx.verbose);
                ScenarioReport::answered(scenario, &result.answer)
            }
            Err(e) => ScenarioReport::failed(scenario, e),
        };

        if let Some(error) = &report.error {
            println!("❌ Error: {error}");
        } else if report.passed() {
            println!("✅ Passed, keywords found: {:?}", report.matched);
        } else {
            println!("⚠️  No keyword found among: {:?}", scenario.keywords);
        }
        reports.push(report);
    }

    print_summary(&reports);
    Ok(())
}

fn print_summary(reports: &[ScenarioReport]) {
    let summary = Summary::of(reports);

    println!("\n{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!("\nTotal:   {} scenario(s)", summary.total);
    println!("Passed:  {}", summary.passed);
    println!("Failed:  {}", summary.failed());
    println!("Success rate: {:.1}%\n", summary.success_rate());

    for (i, report) in reports.iter().enumerate() {
        let status = if report.passed() { "✅" } else { "❌" };
        println!("{}. {status} {}", i + 1, report.name);
    }
}
