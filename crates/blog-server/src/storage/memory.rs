//! In-memory store using DashMap
//!
//! Lives for the process lifetime. Tables are keyed by id; uniqueness of
//! emails and of one profile per user is enforced through the map entry
//! API so concurrent creates cannot both succeed.

use async_trait::async_trait;
use blog_core::ports::{PostStore, ProfileStore, UserStore};
use blog_core::{
    BlogError, NewPost, NewProfile, NewUser, Post, PostChanges, PostId, Profile, Result, User,
    UserId,
};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out ids starting at 1; ids are never reused after a delete
struct IdSequence(AtomicI64);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

pub struct MemoryStore {
    posts: DashMap<PostId, Post>,
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    profiles: DashMap<UserId, Profile>,
    post_ids: IdSequence,
    user_ids: IdSequence,
    profile_ids: IdSequence,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            posts: DashMap::new(),
            users: DashMap::new(),
            emails: DashMap::new(),
            profiles: DashMap::new(),
            post_ids: IdSequence::new(),
            user_ids: IdSequence::new(),
            profile_ids: IdSequence::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|e| e.value().clone()).collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|e| e.author_id == Some(author_id))
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|e| e.value().clone()))
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        if let Some(author_id) = post.author_id {
            if !self.users.contains_key(&author_id) {
                return Err(BlogError::not_found("User", author_id));
            }
        }

        let now = Utc::now();
        let post = Post {
            id: self.post_ids.next(),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(&id).map(|mut entry| {
            changes.apply_to(entry.value_mut());
            entry.updated_at = Utc::now();
            entry.value().clone()
        }))
    }

    async fn delete_post(&self, id: PostId) -> Result<bool> {
        Ok(self.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(BlogError::Conflict(format!(
                "Email already in use: {}",
                user.email
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.user_ids.next(),
                    email: user.email,
                    name: user.name,
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn delete_all_users(&self) -> Result<u64> {
        let ids: Vec<UserId> = self.users.iter().map(|e| *e.key()).collect();

        self.posts
            .retain(|_, post| post.author_id.map_or(true, |a| !ids.contains(&a)));
        for id in &ids {
            self.profiles.remove(id);
            if let Some((_, user)) = self.users.remove(id) {
                self.emails.remove(&user.email);
            }
        }

        Ok(ids.len() as u64)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile> {
        if !self.users.contains_key(&profile.user_id) {
            return Err(BlogError::not_found("User", profile.user_id));
        }

        match self.profiles.entry(profile.user_id) {
            Entry::Occupied(_) => Err(BlogError::Conflict(format!(
                "User {} already has a profile",
                profile.user_id
            ))),
            Entry::Vacant(slot) => {
                let profile = Profile {
                    id: self.profile_ids.next(),
                    bio: profile.bio,
                    user_id: profile.user_id,
                };
                slot.insert(profile.clone());
                Ok(profile)
            }
        }
    }

    async fn get_profile_by_user(&self, user_id: UserId) -> Result<Option<Profile>> {
        Ok(self.profiles.get(&user_id).map(|e| e.value().clone()))
    }
}
