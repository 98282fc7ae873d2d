//! Combat cooldown and lockout counters
//!
//! Plain decrement-to-zero tick counters evaluated once per tick. No wall
//! clock, no error states.

use serde::{Deserialize, Serialize};

/// Blocks an action until it reaches zero; armed to a fixed constant on each
/// successful use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// One-shot damage guard scoped to a single swing or skill use.
///
/// Sized to outlast one full attack animation so a multi-frame swing cannot
/// land twice on the same target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockout {
    remaining: u32,
}

impl Lockout {
    pub fn armed(&self) -> bool {
        self.remaining > 0
    }

    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}
