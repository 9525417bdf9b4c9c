//! The four targeting personalities and their pen release rules.

use crate::grid::{Dir, Pos};

/// Path length to the player at or below which the Shy pursuer backs off.
const SHY_RADIUS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Leader,
    Ambusher,
    Flanker,
    Shy,
}

/// What a targeting strategy may look at when choosing a chase target.
#[derive(Clone, Copy, Debug)]
pub struct TargetView {
    pub player: Pos,
    pub player_dir: Dir,
    pub leader: Pos,
    pub corner: Pos,
    /// Steps on the current route to the player, `None` when unreachable.
    pub path_to_player: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    Immediately,
    AfterSecs(f64),
    AfterPellets(u32),
}

impl Release {
    pub fn is_due(self, active_secs: f64, pellets_eaten: u32) -> bool {
        match self {
            Release::Immediately => true,
            Release::AfterSecs(secs) => active_secs >= secs,
            Release::AfterPellets(count) => pellets_eaten >= count,
        }
    }
}

impl Archetype {
    /// Fixed stepping order within a tick.
    pub const ALL: [Archetype; 4] = [
        Archetype::Leader,
        Archetype::Ambusher,
        Archetype::Flanker,
        Archetype::Shy,
    ];

    pub fn index(self) -> usize {
        match self {
            Archetype::Leader => 0,
            Archetype::Ambusher => 1,
            Archetype::Flanker => 2,
            Archetype::Shy => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Leader => "leader",
            Archetype::Ambusher => "ambusher",
            Archetype::Flanker => "flanker",
            Archetype::Shy => "shy",
        }
    }

    /// Whether this archetype needs the route length to the player before
    /// choosing a target.
    pub fn needs_path_to_player(self) -> bool {
        self == Archetype::Shy
    }

    /// Chase-phase target cell. May fall outside the grid.
    pub fn pursue_target(self, view: &TargetView) -> Pos {
        match self {
            Archetype::Leader => view.player,
            Archetype::Ambusher => view.player.ahead(view.player_dir, 4),
            Archetype::Flanker => {
                let pivot = view.player.ahead(view.player_dir, 2);
                Pos::new(
                    view.leader.x + 2 * (pivot.x - view.leader.x),
                    view.leader.y + 2 * (pivot.y - view.leader.y),
                )
            }
            Archetype::Shy => match view.path_to_player {
                Some(len) if len > SHY_RADIUS => view.player,
                _ => view.corner,
            },
        }
    }

    pub fn release(self, level: u32) -> Release {
        match self {
            Archetype::Leader => Release::Immediately,
            Archetype::Ambusher => Release::AfterSecs((7.0 - 0.4375 * f64::from(level)).max(0.0)),
            Archetype::Flanker => Release::AfterPellets(54u32.saturating_sub(4 * level)),
            Archetype::Shy => Release::AfterPellets(96u32.saturating_sub(6 * level)),
        }
    }

    /// Whether the pursuer moves at the faster angry gait.
    pub fn is_angry(self, level: u32, pellets_left: u32) -> bool {
        match self {
            Archetype::Leader => pellets_left <= 20 + 14 * level,
            Archetype::Ambusher => level >= 16,
            Archetype::Flanker => level >= 14,
            Archetype::Shy => level >= 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(player: Pos, player_dir: Dir) -> TargetView {
        TargetView {
            player,
            player_dir,
            leader: Pos::new(0, 0),
            corner: Pos::new(7, 23),
            path_to_player: None,
        }
    }

    #[test]
    fn leader_targets_the_player() {
        let v = view(Pos::new(3, 4), Dir::Up);
        assert_eq!(Archetype::Leader.pursue_target(&v), Pos::new(3, 4));
    }

    #[test]
    fn ambusher_leads_the_player() {
        let v = view(Pos::new(10, 10), Dir::Right);
        assert_eq!(Archetype::Ambusher.pursue_target(&v), Pos::new(14, 10));
        let v = view(Pos::new(1, 2), Dir::Up);
        assert_eq!(Archetype::Ambusher.pursue_target(&v), Pos::new(1, -2));
    }

    #[test]
    fn flanker_doubles_the_leader_vector() {
        let v = TargetView {
            leader: Pos::new(5, 5),
            ..view(Pos::new(10, 8), Dir::Right)
        };
        assert_eq!(Archetype::Flanker.pursue_target(&v), Pos::new(19, 11));
    }

    #[test]
    fn shy_backs_off_when_close() {
        let far = TargetView {
            path_to_player: Some(9),
            ..view(Pos::new(1, 1), Dir::Left)
        };
        assert_eq!(Archetype::Shy.pursue_target(&far), Pos::new(1, 1));

        let near = TargetView {
            path_to_player: Some(8),
            ..far
        };
        assert_eq!(Archetype::Shy.pursue_target(&near), Pos::new(7, 23));

        let lost = TargetView {
            path_to_player: None,
            ..far
        };
        assert_eq!(Archetype::Shy.pursue_target(&lost), Pos::new(7, 23));
    }

    #[test]
    fn release_thresholds_scale_with_level() {
        assert_eq!(Archetype::Leader.release(1), Release::Immediately);
        assert_eq!(Archetype::Ambusher.release(4), Release::AfterSecs(5.25));
        assert_eq!(Archetype::Ambusher.release(20), Release::AfterSecs(0.0));
        assert_eq!(Archetype::Flanker.release(1), Release::AfterPellets(50));
        assert_eq!(Archetype::Flanker.release(15), Release::AfterPellets(0));
        assert_eq!(Archetype::Shy.release(2), Release::AfterPellets(84));

        assert!(!Release::AfterPellets(50).is_due(100.0, 49));
        assert!(Release::AfterPellets(50).is_due(0.0, 50));
        assert!(Release::AfterSecs(6.5625).is_due(6.6, 0));
    }

    #[test]
    fn angry_gait_thresholds() {
        assert!(Archetype::Leader.is_angry(1, 34));
        assert!(!Archetype::Leader.is_angry(1, 35));
        assert!(!Archetype::Shy.is_angry(11, 0));
        assert!(Archetype::Shy.is_angry(12, 200));
    }
}
