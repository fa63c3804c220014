use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::{
    db::ProfileRepository,
    error::AppResult,
    models::{MatchSummary, SwipeOutcome, UserId, UserProfile},
};

#[derive(Default)]
struct MemoryStore {
    /// Insertion order doubles as the candidate listing order
    profiles: Vec<UserProfile>,
    index: HashMap<UserId, usize>,
    likes: HashMap<UserId, HashSet<UserId>>,
    dislikes: HashMap<UserId, HashSet<UserId>>,
    /// Per user, match partners in the order the matches happened
    matches: HashMap<UserId, Vec<UserId>>,
}

impl MemoryStore {
    fn get(&self, id: &UserId) -> Option<&UserProfile> {
        self.index.get(id).map(|&i| &self.profiles[i])
    }

    fn contains(set: &HashMap<UserId, HashSet<UserId>>, user: &UserId, other: &UserId) -> bool {
        set.get(user).is_some_and(|s| s.contains(other))
    }

    fn is_matched(&self, user: &UserId, other: &UserId) -> bool {
        self.matches.get(user).is_some_and(|m| m.contains(other))
    }
}

/// Process-local repository, used with `STORAGE_BACKEND=memory` and in tests
#[derive(Default)]
pub struct InMemoryProfileRepository {
    inner: RwLock<MemoryStore>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_profile(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        let store = self.inner.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn list_candidates(&self, current: &UserProfile) -> AppResult<Vec<UserProfile>> {
        let store = self.inner.read().await;
        let me = current.id;

        let candidates = store
            .profiles
            .iter()
            .filter(|p| p.id != me)
            .filter(|p| p.location == current.location)
            .filter(|p| !MemoryStore::contains(&store.likes, &me, &p.id))
            .filter(|p| !MemoryStore::contains(&store.dislikes, &me, &p.id))
            .filter(|p| !store.is_matched(&me, &p.id))
            .cloned()
            .collect();

        Ok(candidates)
    }

    async fn record_like(&self, user_id: UserId, target_id: UserId) -> AppResult<SwipeOutcome> {
        let mut store = self.inner.write().await;

        store.likes.entry(user_id).or_default().insert(target_id);

        let reciprocated = MemoryStore::contains(&store.likes, &target_id, &user_id);
        if reciprocated && !store.is_matched(&user_id, &target_id) {
            store.matches.entry(user_id).or_default().push(target_id);
            store.matches.entry(target_id).or_default().push(user_id);
        }

        Ok(SwipeOutcome {
            matched: reciprocated,
        })
    }

    async fn record_dislike(&self, user_id: UserId, target_id: UserId) -> AppResult<()> {
        let mut store = self.inner.write().await;
        store.dislikes.entry(user_id).or_default().insert(target_id);
        Ok(())
    }

    async fn list_matches(&self, user_id: UserId) -> AppResult<Vec<MatchSummary>> {
        let store = self.inner.read().await;
        let matches = store
            .matches
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| store.get(id))
                    .map(MatchSummary::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let mut store = self.inner.write().await;
        match store.index.get(&profile.id).copied() {
            Some(i) => store.profiles[i] = profile.clone(),
            None => {
                let i = store.profiles.len();
                store.profiles.push(profile.clone());
                store.index.insert(profile.id, i);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
