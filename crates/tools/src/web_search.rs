//! Web search tool — offline stub backed by a small fact table.
//!
//! Stands in for a real search API. A query is scored against each entry by
//! counting the entry keywords it contains; the highest score wins and ties
//! go to the entry listed first.

use async_trait::async_trait;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::{Arguments, Tool, ToolParameter, sole_string_arg};
use tracing::debug;

struct Fact {
    keywords: &'static [&'static str],
    text: &'static str,
}

const FACTS: &[Fact] = &[
    Fact {
        keywords: &["paris", "london", "londres", "ticket", "billet", "price", "prix", "train"],
        text: "The average price of a Paris-London ticket is 80-150€ depending on the season.",
    },
    Fact {
        keywords: &["paris", "population", "habitants", "inhabitants"],
        text: "Paris has about 2.2 million inhabitants within the city limits.",
    },
    Fact {
        keywords: &["paris", "capital", "capitale", "france"],
        text: "Paris is the capital of France.",
    },
    Fact {
        keywords: &["paris", "hotel", "hôtel", "price", "prix", "night", "nuit"],
        text: "Hotels in Paris cost 100-200€ per night on average.",
    },
    Fact {
        keywords: &["paris", "restaurant", "meal", "repas", "price", "prix"],
        text: "A meal in a Parisian restaurant costs 15-40€ on average.",
    },
    Fact {
        keywords: &["paris", "new york", "flight", "vol"],
        text: "A Paris-New York flight costs between 400€ and 1200€ depending on the season.",
    },
    Fact {
        keywords: &["eiffel", "tower", "tour", "height", "hauteur"],
        text: "The Eiffel Tower is 330 metres tall.",
    },
    Fact {
        keywords: &["python", "language", "langage", "programming"],
        text: "Python is a programming language created by Guido van Rossum in 1991.",
    },
];

pub struct WebSearchTool;

impl WebSearchTool {
    /// Best-matching fact for `query`, if any keyword matches.
    pub fn lookup(query: &str) -> Option<&'static str> {
        let query = query.to_lowercase();
        let mut best: Option<(usize, &'static str)> = None;

        for fact in FACTS {
            let score = fact
                .keywords
                .iter()
                .filter(|k| query.contains(*k))
                .count();
            if score > 0 && best.is_none_or(|(top, _)| score > top) {
                best = Some((score, fact.text));
            }
        }

        best.map(|(_, text)| text)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information (demo knowledge base)."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::new("query", "string - the search query")]
    }

    async fn execute(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let query = sole_string_arg(arguments, "query")?;
        Ok(match Self::lookup(&query) {
            Some(fact) => format!("Search result: {fact}"),
            None => {
                debug!(query = %query, "No demo fact matched");
                format!(
                    "Search result for '{query}': information not available in the demo knowledge base."
                )
            }
        })
    }
}
