//! Run a three-step chain against jsonplaceholder.typicode.com.
//!
//! ```sh
//! cargo run --example chain
//! ```

use api_chain::{Chain, Step};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_chain=debug".into()),
        )
        .init();

    let mut chain = Chain::new("post-then-comment")
        .description("Fetch a post, comment on it, then list its comments")
        .step(Step::get("https://jsonplaceholder.typicode.com/posts/1"))
        .step(
            Step::post("https://jsonplaceholder.typicode.com/comments")
                .with_field("postId", "{id}")
                .with_field("body", "Great post!")
                .use_last_response(),
        )
        .step(Step::comments("1"))
        .build();

    let report = chain.run().await?;

    println!(
        "{}: {:?} after {} step(s) in {:.1}ms",
        chain.name, report.status, report.attempted, report.total_ms
    );

    for (index, step) in chain.steps.iter().enumerate() {
        match (step.result(), step.failure()) {
            (Some(value), _) => println!("  step {index}: {}", value),
            (_, Some(err)) => println!("  step {index}: failed: {err}"),
            _ => println!("  step {index}: not attempted"),
        }
    }

    Ok(())
}
