use std::collections::{HashMap, HashSet};
use rand::Rng;

use super::types::{Player, PlayerId};

/// Matches played so far by each real player, for one schedule under construction
#[derive(Debug, Default, Clone)]
pub struct PlayCounts {
    counts: HashMap<PlayerId, u32>,
}

impl PlayCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PlayerId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Byes are never counted
    pub fn record(&mut self, player: &Player) {
        if player.is_real() {
            *self.counts.entry(player.id).or_insert(0) += 1;
        }
    }

    pub fn record_all<'a>(&mut self, players: impl IntoIterator<Item = &'a Player>) {
        for player in players {
            self.record(player);
        }
    }
}

/// How often each unordered pair of real players has shared a doubles team
#[derive(Debug, Default, Clone)]
pub struct PairingLedger {
    pairs: HashMap<(PlayerId, PlayerId), u32>,
}

impl PairingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs involving a bye always cost 0
    pub fn cost(&self, a: &Player, b: &Player) -> u32 {
        pair_key(a, b)
            .and_then(|key| self.pairs.get(&key).copied())
            .unwrap_or(0)
    }

    pub fn record(&mut self, a: &Player, b: &Player) {
        if let Some(key) = pair_key(a, b) {
            *self.pairs.entry(key).or_insert(0) += 1;
        }
    }
}

fn pair_key(a: &Player, b: &Player) -> Option<(PlayerId, PlayerId)> {
    if !a.is_real() || !b.is_real() {
        return None;
    }
    Some((a.id.min(b.id), a.id.max(b.id)))
}

/// Orders candidates least-played first, breaking ties uniformly at random
pub fn order_by_play_count<'a, R>(players: &[&'a Player], counts: &PlayCounts, rng: &mut R) -> Vec<&'a Player>
where
    R: Rng + ?Sized,
{
    let mut keyed: Vec<(u32, u64, &'a Player)> = players
        .iter()
        .map(|&p| (counts.get(p.id), rng.gen::<u64>(), p))
        .collect();
    keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    keyed.into_iter().map(|(_, _, p)| p).collect()
}

/// Takes the first `size` candidates who sat out the previous match, falling
/// back to the first `size` overall when not enough did.
pub fn pick_rested<'a>(ordered: &[&'a Player], previous: &HashSet<PlayerId>, size: usize) -> Vec<&'a Player> {
    let rested: Vec<&'a Player> = ordered
        .iter()
        .copied()
        .filter(|p| !previous.contains(&p.id))
        .take(size)
        .collect();

    if rested.len() < size {
        ordered.iter().copied().take(size).collect()
    } else {
        rested
    }
}

/// Real-player ids of a match, for next slot's repeat check
pub fn real_ids<'a>(players: impl IntoIterator<Item = &'a Player>) -> HashSet<PlayerId> {
    players.into_iter().filter(|p| p.is_real()).map(|p| p.id).collect()
}
