//! Post filter pipeline.
//!
//! Each step is a lazy adapter over a post sequence and can be used on its
//! own. [`PostQuery`] chains the enabled steps in a fixed order:
//! published, by user, search, recent. Only `recent` buffers its input.

use uuid::Uuid;

use super::post::Post;

/// Keep published posts.
pub fn published<I>(posts: I) -> impl Iterator<Item = Post>
where
    I: IntoIterator<Item = Post>,
{
    posts.into_iter().filter(|post| post.published)
}

/// Keep posts owned by `user_id`.
pub fn by_user<I>(posts: I, user_id: Uuid) -> impl Iterator<Item = Post>
where
    I: IntoIterator<Item = Post>,
{
    posts.into_iter().filter(move |post| post.owner_id == user_id)
}

/// Keep posts whose title or content contains `term`, ignoring case.
///
/// A missing or blank term leaves the sequence untouched. The term is
/// trimmed before matching.
pub fn search<I>(posts: I, term: Option<&str>) -> impl Iterator<Item = Post> + use<I>
where
    I: IntoIterator<Item = Post>,
{
    let needle = term
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    posts
        .into_iter()
        .filter(move |post| needle.as_deref().is_none_or(|needle| matches(post, needle)))
}

/// Newest first. Posts created at the same instant keep their input order.
pub fn recent<I>(posts: I) -> std::vec::IntoIter<Post>
where
    I: IntoIterator<Item = Post>,
{
    let mut posts: Vec<Post> = posts.into_iter().collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts.into_iter()
}

fn matches(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle) || post.content.to_lowercase().contains(needle)
}

/// A composed view over posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    published_only: bool,
    owner: Option<Uuid>,
    search: Option<String>,
    recent: bool,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public listing: published posts, newest first.
    pub fn public() -> Self {
        Self::new().published().recent()
    }

    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }

    pub fn by_user(mut self, user_id: Uuid) -> Self {
        self.owner = Some(user_id);
        self
    }

    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = term.map(str::to_owned);
        self
    }

    pub fn recent(mut self) -> Self {
        self.recent = true;
        self
    }

    /// Run the enabled steps over `posts`.
    pub fn apply<'a, I>(&self, posts: I) -> Box<dyn Iterator<Item = Post> + 'a>
    where
        I: IntoIterator<Item = Post>,
        I::IntoIter: 'a,
    {
        let mut iter: Box<dyn Iterator<Item = Post> + 'a> = Box::new(posts.into_iter());

        if self.published_only {
            iter = Box::new(published(iter));
        }
        if let Some(owner) = self.owner {
            iter = Box::new(by_user(iter, owner));
        }
        if self.search.is_some() {
            iter = Box::new(search(iter, self.search.as_deref()));
        }
        if self.recent {
            iter = Box::new(recent(iter));
        }

        iter
    }
}
