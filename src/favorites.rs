//! Favorites list, persisted under its own key with the same
//! degrade-to-empty contract as the cart.

use crate::{
    error::AppError,
    storage::{self, FAVORITES_KEY, Store},
};

pub struct Favorites<S: Store> {
    ids: Vec<String>,
    store: S,
}

impl<S: Store> Favorites<S> {
    pub fn open(store: S) -> Self {
        let ids = storage::load_or_default(&store, FAVORITES_KEY);
        Self { ids, store }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|stored| stored == id)
    }

    /// Add `id` if absent, remove it if present. Returns whether the id is
    /// a favorite after the toggle.
    pub fn toggle(&mut self, id: &str) -> Result<bool, AppError> {
        match self.ids.iter().position(|stored| stored == id) {
            Some(pos) => {
                self.ids.remove(pos);
            }
            None => self.ids.push(id.to_string()),
        }

        storage::persist(&mut self.store, FAVORITES_KEY, &self.ids)?;
        Ok(self.contains(id))
    }
}
