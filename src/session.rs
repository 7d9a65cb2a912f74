use reqwest::blocking::Client;

use crate::api::{self, ApiError};
use crate::models::{Identifiable, NewTask, Task, UserProfile};
use crate::storage;
use crate::toast::ToastType;

/// Client-side session state: the credential gate plus the cached server
/// snapshots it authorizes.
///
/// Each cache is replaced wholesale on a successful fetch and never patched
/// in place; the server is always the source of truth.
pub struct Session {
    pub client: Client,
    pub base_url: String,
    pub profile: Option<UserProfile>,
    pub users: Vec<Identifiable>,
    pub groups: Vec<Identifiable>,
    pub tasks: Vec<Task>,
}

impl Session {
    pub fn new() -> Session {
        Session {
            client: Client::new(),
            base_url: api::base_url(),
            profile: None,
            users: Vec::new(),
            groups: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Runs `f` with the stored API key, if one is present.
    ///
    /// Every authorized request goes through here. With no stored key the
    /// action is silently skipped: the caller is expected to have steered
    /// the user to sign in already, so a missing key mid-session is not a
    /// reportable condition.
    pub fn with_api_key<T>(&self, f: impl FnOnce(&str) -> T) -> Option<T> {
        storage::load_api_key().map(|key| f(&key))
    }

    pub fn is_authenticated(&self) -> bool {
        storage::load_api_key().is_some()
    }

    /// Loads profile, users, groups and tasks once after sign-in.
    ///
    /// Returns `Ok(false)` without issuing any request when no key is
    /// stored.
    pub fn authorize(&mut self) -> Result<bool, ApiError> {
        if !self.is_authenticated() {
            return Ok(false);
        }
        self.refresh_profile()?;
        self.refresh_users()?;
        self.refresh_groups()?;
        self.refresh_tasks()?;
        Ok(true)
    }

    pub fn refresh_profile(&mut self) -> Result<(), ApiError> {
        let fetched = self.with_api_key(|key| api::fetch_profile(&self.client, &self.base_url, key));
        if let Some(profile) = fetched.transpose()? {
            self.profile = Some(profile);
        }
        Ok(())
    }

    pub fn refresh_users(&mut self) -> Result<(), ApiError> {
        let fetched = self.with_api_key(|key| api::fetch_users(&self.client, &self.base_url, key));
        if let Some(users) = fetched.transpose()? {
            self.users = users;
        }
        Ok(())
    }

    pub fn refresh_groups(&mut self) -> Result<(), ApiError> {
        let fetched = self.with_api_key(|key| api::fetch_groups(&self.client, &self.base_url, key));
        if let Some(groups) = fetched.transpose()? {
            self.groups = groups;
        }
        Ok(())
    }

    /// Replaces the task cache with a fresh server snapshot.
    pub fn refresh_tasks(&mut self) -> Result<(), ApiError> {
        let fetched = self.with_api_key(|key| api::fetch_tasks(&self.client, &self.base_url, key));
        if let Some(tasks) = fetched.transpose()? {
            self.tasks = tasks;
        }
        Ok(())
    }

    /// Creates a task and reports the outcome as a toast.
    ///
    /// Returns `None` without any network activity when not signed in.
    pub fn create_task(&mut self, task: &NewTask) -> Option<(ToastType, String)> {
        let result =
            self.with_api_key(|key| api::create_task(&self.client, &self.base_url, key, task))?;
        Some(self.finish_mutation(result))
    }

    pub fn complete_task(&mut self, id: u64) -> Option<(ToastType, String)> {
        self.modify_task(id, "complete")
    }

    pub fn delete_task(&mut self, id: u64) -> Option<(ToastType, String)> {
        self.modify_task(id, "delete")
    }

    fn modify_task(&mut self, id: u64, action: &str) -> Option<(ToastType, String)> {
        let result = self
            .with_api_key(|key| api::modify_task(&self.client, &self.base_url, key, id, action))?;
        Some(self.finish_mutation(result))
    }

    /// On success the task cache is re-fetched before the outcome is
    /// reported, so a success message never accompanies a stale list. A
    /// failed re-fetch keeps the previous snapshot.
    fn finish_mutation(&mut self, result: Result<String, ApiError>) -> (ToastType, String) {
        match result {
            Ok(message) => {
                let _ = self.refresh_tasks();
                (ToastType::Info, message)
            }
            Err(err) => (ToastType::Error, err.message()),
        }
    }

    /// True when the signed-in user may complete or delete the task.
    ///
    /// Display-layer convenience only; the server enforces the same rule
    /// on its side.
    pub fn can_modify(&self, task: &Task) -> bool {
        self.profile
            .as_ref()
            .map(|p| p.id == task.assigned_user)
            .unwrap_or(false)
    }

    /// Removes the stored key and drops all cached session data.
    pub fn sign_out(&mut self) -> std::io::Result<()> {
        self.profile = None;
        self.users.clear();
        self.groups.clear();
        self.tasks.clear();
        storage::clear_api_key()
    }
}
