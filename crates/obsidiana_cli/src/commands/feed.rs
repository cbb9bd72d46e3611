use miette::Result;
use owo_colors::OwoColorize;

use obsidiana_core::community::{CommunityFeed, ReactionOutcome, SUGGESTED_TAGS};
use obsidiana_core::id::PostId;
use obsidiana_core::store::Store;

use crate::commands::author_name;
use crate::output::{Output, format_relative_time};

/// Browse the circle, newest experiences first
pub async fn list(store: &Store) -> Result<()> {
    let output = Output::new();
    let feed = CommunityFeed::new(store.clone());
    let posts = feed.list().await?;

    output.section("Women's Circle");
    for post in &posts {
        println!();
        println!(
            "  {} · {}",
            post.author.bright_cyan().bold(),
            format_relative_time(post.posted_at)
        );
        println!("  {}", post.content);
        if !post.tags.is_empty() {
            let tags: Vec<String> = post.tags.iter().map(|tag| format!("#{tag}")).collect();
            println!("  {}", tags.join(" ").bright_blue());
        }

        let mut status = format!("❤️ {} · {} comments", post.likes, post.comments.len());
        if let Some(emoji) = feed.my_reaction(&post.id).await? {
            status.push_str(&format!(" · you reacted {}", emoji));
        }
        println!("  {}", status.dimmed());

        for comment in &post.comments {
            println!("    ↳ {}: {}", comment.author.bright_cyan(), comment.content);
        }
        output.kv("id", &post.id.to_string());
    }
    println!();
    Ok(())
}

/// Share an experience with the circle
pub async fn post(
    store: &Store,
    content: &str,
    tags: Vec<String>,
    author: Option<&str>,
) -> Result<()> {
    let output = Output::new();
    let author = author_name(store, author).await?;

    for tag in &tags {
        if !SUGGESTED_TAGS.contains(&tag.as_str()) {
            output.warning(&format!(
                "'{}' is not a suggested tag ({})",
                tag,
                SUGGESTED_TAGS.join(", ")
            ));
        }
    }

    let post = CommunityFeed::new(store.clone()).post(author, content, tags).await?;
    output.success("Shared with the circle");
    output.kv("id", &post.id.to_string());
    Ok(())
}

/// Toggle or switch a reaction on a post
pub async fn react(store: &Store, id: &str, emoji: &str) -> Result<()> {
    let output = Output::new();
    let id = PostId::parse(id)?;

    match CommunityFeed::new(store.clone()).react(&id, emoji).await? {
        ReactionOutcome::Added => output.success(&format!("Reacted with {}", emoji)),
        ReactionOutcome::Removed => output.success("Reaction removed"),
        ReactionOutcome::Switched => output.success(&format!("Reaction switched to {}", emoji)),
    }
    Ok(())
}

/// Leave a supportive comment under a post
pub async fn comment(store: &Store, id: &str, text: &str, author: Option<&str>) -> Result<()> {
    let output = Output::new();
    let id = PostId::parse(id)?;
    let author = author_name(store, author).await?;

    CommunityFeed::new(store.clone()).comment(&id, author, text).await?;
    output.success("Comment added");
    Ok(())
}
