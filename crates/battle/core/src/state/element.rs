/// Elemental affinity of combatants and skills.
///
/// Advantage runs in a closed cycle: Wind beats Ash, Ash beats Ice, Ice beats
/// Tide and Tide beats Wind. Every other pairing is neutral.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    #[default]
    Wind,
    Ash,
    Ice,
    Tide,
}

impl Element {
    /// The element this one has advantage over.
    pub const fn prey(self) -> Self {
        match self {
            Self::Wind => Self::Ash,
            Self::Ash => Self::Ice,
            Self::Ice => Self::Tide,
            Self::Tide => Self::Wind,
        }
    }

    /// Returns true if `self` attacking `defender` is elementally advantaged.
    pub fn beats(self, defender: Self) -> bool {
        self.prey() == defender
    }
}

/// How a combatant closes distance before striking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
}

/// Reach of a combatant's attacks; melee strikes place effects between the
/// caster and the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackRange {
    #[default]
    Melee,
    Ranged,
}

impl AttackRange {
    pub const fn is_melee(self) -> bool {
        matches!(self, Self::Melee)
    }
}
