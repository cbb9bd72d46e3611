//! The women's circle feed.
//!
//! Posts live in the local store. The circle starts with a few seeded
//! testimonies the first time it is read, the way the original community
//! opened before anyone had written.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::id::{CommentId, PostId};
use crate::store::{Store, StoreKey};

/// Tags offered when sharing an experience.
pub const SUGGESTED_TAGS: [&str; 7] = [
    "Testimony",
    "Physical",
    "Cramps",
    "Dreams",
    "Emotional",
    "Ritual",
    "General",
];

/// Reaction emojis offered on each post. Any emoji is accepted.
pub const SUGGESTED_REACTIONS: [&str; 3] = ["❤️", "✨", "🧘‍♀️"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: PostId,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Store schema: every post in the circle.
pub struct PostsKey;

impl StoreKey for PostsKey {
    const KEY: &'static str = "community_posts";
    type Value = Vec<CommunityPost>;
}

/// Store schema: the reader's own reaction per post.
pub struct ReactionsKey;

impl StoreKey for ReactionsKey {
    const KEY: &'static str = "reactions";
    type Value = BTreeMap<PostId, String>;
}

/// What a reaction call did to the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// First reaction on this post. Likes went up.
    Added,
    /// Same emoji again. Reaction withdrawn, likes went down.
    Removed,
    /// Different emoji. Likes unchanged.
    Switched,
}

#[derive(Debug, Clone)]
pub struct CommunityFeed {
    store: Store,
}

impl CommunityFeed {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Posts, newest first. An empty circle is seeded with the starter
    /// testimonies and persisted.
    pub async fn list(&self) -> Result<Vec<CommunityPost>> {
        let mut posts = self.store.get::<PostsKey>().await?;
        if posts.is_empty() {
            posts = seed_posts(Utc::now());
            self.store.put::<PostsKey>(&posts).await?;
            tracing::debug!(count = posts.len(), "seeded starter circle");
        }
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(posts)
    }

    /// Share a new experience. It lands at the top of the feed.
    pub async fn post(
        &self,
        author: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<CommunityPost> {
        let post = CommunityPost {
            id: PostId::generate(),
            author: author.into(),
            content: content.into().trim().to_string(),
            tags,
            likes: 0,
            posted_at: Utc::now(),
            comments: Vec::new(),
        };

        let stored = post.clone();
        self.store
            .update::<PostsKey, _, _>(move |posts| posts.insert(0, stored))
            .await?;
        Ok(post)
    }

    /// Append a supportive comment to a post.
    pub async fn comment(
        &self,
        post_id: &PostId,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Comment> {
        let comment = Comment {
            id: CommentId::generate(),
            author: author.into(),
            content: content.into().trim().to_string(),
            posted_at: Utc::now(),
        };

        let target = *post_id;
        let appended = comment.clone();
        let found = self
            .store
            .update::<PostsKey, _, _>(move |posts| {
                posts
                    .iter_mut()
                    .find(|post| post.id == target)
                    .map(|post| post.comments.push(appended))
                    .is_some()
            })
            .await?;

        if !found {
            return Err(CoreError::PostNotFound {
                id: post_id.to_string(),
            });
        }
        Ok(comment)
    }

    /// Toggle the reader's reaction on a post.
    ///
    /// Reacting twice with the same emoji withdraws it and takes the like
    /// back. Switching to a different emoji keeps the like count, the post
    /// was already counted once.
    pub async fn react(&self, post_id: &PostId, emoji: &str) -> Result<ReactionOutcome> {
        let reactions = self.store.get::<ReactionsKey>().await?;
        let previous = reactions.get(post_id).cloned();

        let outcome = match previous.as_deref() {
            Some(current) if current == emoji => ReactionOutcome::Removed,
            Some(_) => ReactionOutcome::Switched,
            None => ReactionOutcome::Added,
        };

        let target = *post_id;
        let found = self
            .store
            .update::<PostsKey, _, _>(move |posts| {
                posts
                    .iter_mut()
                    .find(|post| post.id == target)
                    .map(|post| match outcome {
                        ReactionOutcome::Added => post.likes += 1,
                        ReactionOutcome::Removed => post.likes = post.likes.saturating_sub(1),
                        ReactionOutcome::Switched => {}
                    })
                    .is_some()
            })
            .await?;

        if !found {
            return Err(CoreError::PostNotFound {
                id: post_id.to_string(),
            });
        }

        let emoji = emoji.to_string();
        self.store
            .update::<ReactionsKey, _, _>(move |reactions| match outcome {
                ReactionOutcome::Removed => {
                    reactions.remove(&target);
                }
                ReactionOutcome::Added | ReactionOutcome::Switched => {
                    reactions.insert(target, emoji);
                }
            })
            .await?;

        Ok(outcome)
    }

    /// The reader's reaction on a post, if any.
    pub async fn my_reaction(&self, post_id: &PostId) -> Result<Option<String>> {
        Ok(self
            .store
            .get::<ReactionsKey>()
            .await?
            .get(post_id)
            .cloned())
    }
}

fn seed_posts(now: DateTime<Utc>) -> Vec<CommunityPost> {
    vec![
        CommunityPost {
            id: PostId::generate(),
            author: "Ana M.".to_string(),
            content: "Goodbye, cramps! I've been using it for almost a month and, surprise: when my period came, the cramps were gone. It's magic.".to_string(),
            tags: vec!["Testimony".to_string(), "Physical".to_string(), "Cramps".to_string()],
            likes: 24,
            posted_at: now - Duration::hours(2),
            comments: vec![
                Comment {
                    id: CommentId::generate(),
                    author: "Maria L.".to_string(),
                    content: "How wonderful! The same happened to me on my third month.".to_string(),
                    posted_at: now - Duration::hours(1),
                },
                Comment {
                    id: CommentId::generate(),
                    author: "Sofía G.".to_string(),
                    content: "Thank you for sharing, you give me hope.".to_string(),
                    posted_at: now - Duration::minutes(30),
                },
            ],
        },
        CommunityPost {
            id: PostId::generate(),
            author: "Lucía R.".to_string(),
            content: "I had a very lucid dream where I entered a cave full of crystals. I felt I was recovering a part of myself I had lost.".to_string(),
            tags: vec!["Dreams".to_string(), "Unconscious".to_string()],
            likes: 15,
            posted_at: now - Duration::hours(5),
            comments: Vec::new(),
        },
        CommunityPost {
            id: PostId::generate(),
            author: "Carla S.".to_string(),
            content: "My mood changed a lot. I used to walk around furious, now I feel more patience and tolerance. I love it!".to_string(),
            tags: vec!["Emotional".to_string(), "Balance".to_string()],
            likes: 32,
            posted_at: now - Duration::days(1),
            comments: vec![Comment {
                id: CommentId::generate(),
                author: "Elena P.".to_string(),
                content: "Obsidian stirs all of that, keep going!".to_string(),
                posted_at: now - Duration::days(1),
            }],
        },
    ]
}
