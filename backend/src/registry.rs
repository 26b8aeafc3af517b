//! Per-game groups of live connections
//!
//! A group is keyed by game id and holds one transport per participant token.
//! The map sits behind a single mutex; every add or remove is applied whole
//! under the lock, so a group is never observed half-updated.
//!
//! Delivery happens outside the lock. A send snapshots the group's transports,
//! releases the lock, delivers, and only then re-locks to evict any transport
//! that turned out to be closed. A dead peer therefore costs one failed send
//! and is gone on the next sweep; it never blocks delivery to the others.
//! Groups that become empty are dropped immediately.

use crate::transport::Transport;
use parking_lot::Mutex;
use shared::{GameId, ServerMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type Group = HashMap<String, Arc<dyn Transport>>;

#[derive(Default)]
pub struct ConnectionRegistry {
    groups: Mutex<HashMap<GameId, Group>>,
}

/// Who a delivery sweep is aimed at
enum Audience<'a> {
    Caller(&'a str),
    AllExcept(&'a str),
    Everyone,
}

impl Audience<'_> {
    fn includes(&self, token: &str) -> bool {
        match self {
            Audience::Caller(caller) => token == *caller,
            Audience::AllExcept(caller) => token != *caller,
            Audience::Everyone => true,
        }
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transport` for `token` in the game's group, creating the group if absent
    ///
    /// A token already present in the group is replaced and its previous
    /// transport returned.
    pub fn add(&self, game_id: GameId, token: &str, transport: Arc<dyn Transport>) -> Option<Arc<dyn Transport>> {
        let mut groups = self.groups.lock();
        let group = groups.entry(game_id).or_default();
        let displaced = group.insert(token.to_string(), transport);
        debug!(game_id, size = group.len(), "[REGISTRY] connection added");
        displaced
    }

    /// Remove one connection, dropping the group once it is empty
    pub fn remove(&self, game_id: GameId, token: &str) -> bool {
        let mut groups = self.groups.lock();
        let Some(group) = groups.get_mut(&game_id) else {
            return false;
        };
        let removed = group.remove(token).is_some();
        if group.is_empty() {
            groups.remove(&game_id);
            debug!(game_id, "[REGISTRY] group emptied and removed");
        }
        removed
    }

    /// Remove `token`'s connection only if it is still the given transport
    ///
    /// Used when a socket closes: a newer registration under the same token is
    /// left alone.
    pub fn release(&self, game_id: GameId, token: &str, transport: &Arc<dyn Transport>) -> bool {
        let mut groups = self.groups.lock();
        let Some(group) = groups.get_mut(&game_id) else {
            return false;
        };
        let owned = group
            .get(token)
            .is_some_and(|current| Arc::ptr_eq(current, transport));
        if owned {
            group.remove(token);
        }
        if group.is_empty() {
            groups.remove(&game_id);
        }
        owned
    }

    /// Undo an `add` of `transport`, reinstating the registration it displaced
    ///
    /// Nothing happens if `token` has been re-registered since.
    pub fn restore(
        &self,
        game_id: GameId,
        token: &str,
        transport: &Arc<dyn Transport>,
        displaced: Option<Arc<dyn Transport>>,
    ) {
        let mut groups = self.groups.lock();
        let Some(group) = groups.get_mut(&game_id) else {
            return;
        };
        let owned = group
            .get(token)
            .is_some_and(|current| Arc::ptr_eq(current, transport));
        if !owned {
            return;
        }
        match displaced {
            Some(previous) => {
                group.insert(token.to_string(), previous);
            }
            None => {
                group.remove(token);
                if group.is_empty() {
                    groups.remove(&game_id);
                }
            }
        }
    }

    /// Deliver only to the caller's connection, if it is still registered
    pub fn inform_caller(&self, game_id: GameId, token: &str, message: &ServerMessage) -> bool {
        self.deliver(game_id, Audience::Caller(token), message) > 0
    }

    /// Deliver to every connection in the group except the caller's
    pub fn broadcast_except_caller(&self, game_id: GameId, token: &str, message: &ServerMessage) -> usize {
        self.deliver(game_id, Audience::AllExcept(token), message)
    }

    /// Deliver to every connection in the group, the caller included
    pub fn broadcast_all(&self, game_id: GameId, message: &ServerMessage) -> usize {
        self.deliver(game_id, Audience::Everyone, message)
    }

    /// Number of live registrations for a game
    pub fn group_size(&self, game_id: GameId) -> usize {
        self.groups.lock().get(&game_id).map_or(0, HashMap::len)
    }

    pub fn has_group(&self, game_id: GameId) -> bool {
        self.groups.lock().contains_key(&game_id)
    }

    /// Send to the audience, returning how many deliveries succeeded
    fn deliver(&self, game_id: GameId, audience: Audience<'_>, message: &ServerMessage) -> usize {
        let targets: Vec<(String, Arc<dyn Transport>)> = {
            let groups = self.groups.lock();
            let Some(group) = groups.get(&game_id) else {
                return 0;
            };
            group
                .iter()
                .filter(|(token, _)| audience.includes(token))
                .map(|(token, transport)| (token.clone(), Arc::clone(transport)))
                .collect()
        };
        if targets.is_empty() {
            return 0;
        }

        let payload = match message.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(game_id, "[REGISTRY] could not encode message: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (token, transport) in targets {
            if transport.is_open() && transport.send(&payload).is_ok() {
                delivered += 1;
            } else {
                closed.push((token, transport));
            }
        }

        if !closed.is_empty() {
            self.evict(game_id, closed);
        }
        delivered
    }

    /// Drop connections found closed, unless they were re-registered meanwhile
    fn evict(&self, game_id: GameId, closed: Vec<(String, Arc<dyn Transport>)>) {
        let mut groups = self.groups.lock();
        let Some(group) = groups.get_mut(&game_id) else {
            return;
        };
        for (token, transport) in closed {
            let same = group
                .get(&token)
                .is_some_and(|current| Arc::ptr_eq(current, &transport));
            if same {
                group.remove(&token);
                debug!(game_id, "[REGISTRY] evicted closed connection");
            }
        }
        if group.is_empty() {
            groups.remove(&game_id);
        }
    }
}
