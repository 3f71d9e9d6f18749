use clap::Parser;
use gh_client::{GitHubClient, IssueRef};
use tracker::comment_body;

#[derive(Parser)]
#[command(name = "stint-cli", about = "Post a time-tracking comment on a GitHub issue")]
struct Opts {
    /// Issue URL, e.g. https://github.com/rust-lang/rust/issues/1
    issue_url: String,
    /// What was worked on
    note: String,
    /// Tracked time in seconds
    #[arg(long)]
    seconds: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();

    let opts = Opts::parse();

    let issue = IssueRef::from_url(&opts.issue_url)
        .map_err(|e| anyhow::anyhow!("Not a GitHub issue URL: {}", e))?;

    let token = std::env::var("GITHUB_TOKEN")
        .map_err(|_| anyhow::anyhow!("GITHUB_TOKEN is not set"))?;

    let body = comment_body(opts.seconds, &opts.note);

    let client = GitHubClient::new(token);
    let comment = client
        .create_issue_comment(&issue, &body)
        .await
        .map_err(|e| anyhow::anyhow!("Error posting comment: {}", e))?;

    println!("Commented on {}: {}", issue, comment.html_url);

    Ok(())
}
