//! Request validation
//!
//! Turns raw request bodies into the validated inputs the stores accept.
//! Required string fields must be present and non-blank; values are trimmed.

use crate::{
    BlogError, CreatePostRequest, CreateProfileRequest, CreateUserRequest, NewPost, NewProfile,
    NewUser, Result, UserId,
};

/// Collects missing required fields so one error can name all of them
#[derive(Debug, Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn field(&mut self, name: &'static str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(BlogError::Validation(format!(
                "Missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

pub fn new_post(req: CreatePostRequest) -> Result<NewPost> {
    let mut required = Required::default();
    let title = required.field("title", req.title);
    let content = required.field("content", req.content);
    required.finish()?;

    Ok(NewPost {
        title,
        content: Some(content),
        author_id: req.author_id,
    })
}

pub fn new_user(req: CreateUserRequest) -> Result<NewUser> {
    let mut required = Required::default();
    let email = required.field("email", req.email);
    let name = required.field("name", req.name);
    required.finish()?;

    Ok(NewUser { email, name })
}

pub fn new_profile(user_id: UserId, req: CreateProfileRequest) -> NewProfile {
    NewProfile {
        bio: req.bio,
        user_id,
    }
}
