//! Point values, the bonus fruit progression and the life counter.

pub const DOT_POINTS: u32 = 10;
pub const ENERGIZER_POINTS: u32 = 50;
pub const PURSUER_POINTS: u32 = 200;
pub const EXTRA_LIFE_EVERY: u32 = 10_000;
pub const STARTING_LIVES: u32 = 3;
pub const MAX_LIVES: u32 = 5;
/// Pellets remaining at which a fruit appears.
pub const FRUIT_THRESHOLDS: [u32; 2] = [174, 74];
/// Fruits kept on the HUD shelf.
pub const SHELF_LEN: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fruit {
    Cherry,
    Strawberry,
    Peach,
    Apple,
    Melon,
    Galaxian,
    Bell,
    Key,
}

const FRUIT_ORDER: [Fruit; 12] = [
    Fruit::Cherry,
    Fruit::Strawberry,
    Fruit::Peach,
    Fruit::Peach,
    Fruit::Apple,
    Fruit::Apple,
    Fruit::Melon,
    Fruit::Melon,
    Fruit::Galaxian,
    Fruit::Galaxian,
    Fruit::Bell,
    Fruit::Bell,
];

impl Fruit {
    /// The fruit offered after `eaten` fruits have already been collected.
    pub fn nth(eaten: usize) -> Fruit {
        FRUIT_ORDER.get(eaten).copied().unwrap_or(Fruit::Key)
    }

    pub fn points(self) -> u32 {
        match self {
            Fruit::Cherry => 100,
            Fruit::Strawberry => 300,
            Fruit::Peach => 500,
            Fruit::Apple => 700,
            Fruit::Melon => 1000,
            Fruit::Galaxian => 2000,
            Fruit::Bell => 3000,
            Fruit::Key => 5000,
        }
    }
}

/// Running score and lives for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    lives: u32,
    fruits_eaten: usize,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            fruits_eaten: 0,
        }
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds points. Returns true when this crossed a bonus boundary and a
    /// life was actually granted.
    pub fn award(&mut self, points: u32) -> bool {
        let band = self.score / EXTRA_LIFE_EVERY;
        self.score = self.score.saturating_add(points);
        if self.score / EXTRA_LIFE_EVERY != band && self.lives < MAX_LIVES {
            self.lives += 1;
            return true;
        }
        false
    }

    pub fn next_fruit(&self) -> Fruit {
        Fruit::nth(self.fruits_eaten)
    }

    /// Records the current fruit as eaten and returns it.
    pub fn eat_fruit(&mut self) -> Fruit {
        let fruit = self.next_fruit();
        self.fruits_eaten += 1;
        fruit
    }

    /// Most recently eaten fruits, oldest first.
    pub fn fruit_shelf(&self) -> Vec<Fruit> {
        (self.fruits_eaten.saturating_sub(SHELF_LEN)..self.fruits_eaten)
            .map(Fruit::nth)
            .collect()
    }

    /// Takes a life and returns how many remain.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }
}
