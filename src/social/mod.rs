//! Friend requests, friend lists, user search and recommendations.
//!
//! One edge per unordered pair of users, keyed `(min, max)`. All
//! check-then-write sequences go through the map's entry API, which holds
//! the shard lock for the pair.

use std::collections::{HashMap, HashSet};

use dashmap::{mapref::entry::Entry, DashMap};
use serde::Serialize;

use crate::{
    db::{
        models::{FriendEdge, FriendState, UserId, UserSummary},
        user_repo::UserStore,
    },
    error::{CoreError, CoreResult},
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recommendation {
    pub user_id: UserId,
    pub username: String,
    pub elo: i32,
    pub mutual_friends: usize,
}

fn pair_key(a: UserId, b: UserId) -> (UserId, UserId) {
    (a.min(b), a.max(b))
}

#[derive(Default)]
pub struct SocialGraph {
    edges: DashMap<(UserId, UserId), FriendEdge>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn send_request(&self, users: &UserStore, from: UserId, to: UserId) -> CoreResult<()> {
        if from == to {
            return Err(CoreError::SelfFriend);
        }
        if !users.exists(to).await {
            return Err(CoreError::UnknownUser(to));
        }

        match self.edges.entry(pair_key(from, to)) {
            Entry::Occupied(e) => match e.get().state {
                FriendState::Pending => Err(CoreError::AlreadyPending),
                FriendState::Accepted => Err(CoreError::AlreadyFriends),
            },
            Entry::Vacant(v) => {
                v.insert(FriendEdge {
                    requester_id: from,
                    target_id: to,
                    state: FriendState::Pending,
                });
                log::info!("friend request {from} -> {to}");
                Ok(())
            }
        }
    }

    /// Only the addressee of a pending request may accept it.
    pub fn accept_request(&self, user_id: UserId, requester_id: UserId) -> CoreResult<()> {
        let mut edge = self
            .edges
            .get_mut(&pair_key(user_id, requester_id))
            .ok_or(CoreError::NoSuchRequest)?;
        if edge.state != FriendState::Pending
            || edge.target_id != user_id
            || edge.requester_id != requester_id
        {
            return Err(CoreError::NoSuchRequest);
        }
        edge.state = FriendState::Accepted;
        log::info!("{user_id} accepted friend request from {requester_id}");
        Ok(())
    }

    /// Deletes a pending request between the two users in either direction,
    /// so the addressee can decline and the sender can withdraw. No-op when
    /// there is nothing pending.
    pub fn reject_request(&self, user_id: UserId, other_id: UserId) -> bool {
        self.edges
            .remove_if(&pair_key(user_id, other_id), |_, e| {
                e.state == FriendState::Pending
            })
            .is_some()
    }

    pub fn friends_of(&self, user_id: UserId) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .edges
            .iter()
            .filter(|e| {
                e.state == FriendState::Accepted
                    && (e.requester_id == user_id || e.target_id == user_id)
            })
            .map(|e| e.other(user_id))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Requesters with a pending request addressed to `user_id`.
    pub fn pending_for(&self, user_id: UserId) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .edges
            .iter()
            .filter(|e| e.state == FriendState::Pending && e.target_id == user_id)
            .map(|e| e.requester_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn edge_between(&self, a: UserId, b: UserId) -> Option<FriendEdge> {
        self.edges.get(&pair_key(a, b)).map(|e| e.value().clone())
    }

    /// Case-insensitive substring match on usernames, excluding the caller.
    pub async fn search_users(
        &self,
        users: &UserStore,
        searcher: UserId,
        query: &str,
        limit: usize,
    ) -> CoreResult<Vec<UserSummary>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CoreError::InvalidInput("search query must not be empty".into()));
        }

        let mut hits: Vec<UserSummary> = users
            .all()
            .await
            .iter()
            .filter(|u| u.id != searcher && u.username.to_lowercase().contains(&needle))
            .map(UserSummary::from)
            .collect();
        // prefix matches first, then alphabetical
        hits.sort_by_key(|u| {
            let name = u.username.to_lowercase();
            (!name.starts_with(&needle), name)
        });
        hits.truncate(limit);
        Ok(hits)
    }

    /// Users with no edge to `user_id`, ranked by mutual friends, then by
    /// closeness in rating, then by id.
    pub async fn recommendations(
        &self,
        users: &UserStore,
        user_id: UserId,
        limit: usize,
    ) -> CoreResult<Vec<Recommendation>> {
        let me = users.get(user_id).await.ok_or(CoreError::UnknownUser(user_id))?;

        let mut adjacency: HashMap<UserId, Vec<UserId>> = HashMap::new();
        let mut linked: HashSet<UserId> = HashSet::from([user_id]);
        for e in self.edges.iter() {
            if e.requester_id == user_id || e.target_id == user_id {
                linked.insert(e.other(user_id));
            }
            if e.state == FriendState::Accepted {
                adjacency.entry(e.requester_id).or_default().push(e.target_id);
                adjacency.entry(e.target_id).or_default().push(e.requester_id);
            }
        }

        let mut mutual: HashMap<UserId, usize> = HashMap::new();
        for friend in adjacency.get(&user_id).into_iter().flatten() {
            for fof in adjacency.get(friend).into_iter().flatten() {
                if !linked.contains(fof) {
                    *mutual.entry(*fof).or_default() += 1;
                }
            }
        }

        let mut recs: Vec<Recommendation> = users
            .all()
            .await
            .into_iter()
            .filter(|u| !linked.contains(&u.id))
            .map(|u| Recommendation {
                mutual_friends: mutual.get(&u.id).copied().unwrap_or(0),
                user_id: u.id,
                username: u.username,
                elo: u.elo,
            })
            .collect();
        recs.sort_by_key(|r| {
            (
                std::cmp::Reverse(r.mutual_friends),
                (r.elo - me.elo).abs(),
                r.user_id,
            )
        });
        recs.truncate(limit);
        Ok(recs)
    }

    pub fn edges(&self) -> Vec<FriendEdge> {
        self.edges.iter().map(|e| e.value().clone()).collect()
    }

    pub fn restore(&self, edges: Vec<FriendEdge>) {
        self.edges.clear();
        for e in edges {
            if e.requester_id != e.target_id {
                self.edges.insert(pair_key(e.requester_id, e.target_id), e);
            }
        }
    }
}
