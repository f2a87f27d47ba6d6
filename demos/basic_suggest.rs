//! Example: Merged suggestions from the default providers.

use a3s_suggest::{providers::default_providers, Aggregator, SuggestionClient, SuggestionSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Fan out to baidu, google, bing, 360 and taobao
    let client = SuggestionClient::with_providers(default_providers());
    let aggregator = Aggregator::with_client(client);
    println!("Configured {} suggestion providers", aggregator.provider_count());

    let session = SuggestionSession::new(aggregator);

    for query in ["天气", "s rust"] {
        println!("Suggestions for: {}", query);
        println!();

        let snapshot = session.evaluate(query).await;
        if let Some(error) = &snapshot.error {
            println!("  ({}, showing hot searches)", error);
            for hot in &snapshot.suggestions {
                println!("  {}", hot.text);
            }
        }

        for (i, suggestion) in snapshot.merged_suggestions.iter().enumerate() {
            let sources: Vec<&str> = suggestion
                .sources
                .iter()
                .map(|id| session.aggregator().provider_name(id).unwrap_or(id.as_str()))
                .collect();
            println!("{}. {}", i + 1, suggestion.text);
            println!("   Sources: {}", sources.join(", "));
            if suggestion.is_quick_search {
                println!("   Quick search across all providers");
            }
        }
        println!();
    }

    Ok(())
}
