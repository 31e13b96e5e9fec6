use crate::{
    BoardSpace, MonopolyBonus, PropertyOwnership, PropertyRent, RuleProfile, SpaceKind,
    StationRent, MAX_LEVEL,
};

/// Amount owed for landing on `space`. `group` holds the ownership of every
/// space in the same set, `space` included. Unowned or mortgaged spaces
/// charge nothing.
pub fn rent(
    profile: &RuleProfile,
    space: &BoardSpace,
    ownership: &PropertyOwnership,
    group: &[PropertyOwnership],
    dice_total: u32,
) -> i64 {
    let Some(owner) = ownership.owner else {
        return 0;
    };
    if ownership.mortgaged {
        return 0;
    }
    let held = group
        .iter()
        .filter(|other| other.owner == Some(owner))
        .count()
        .max(1);
    let full_set = !group.is_empty() && group.iter().all(|other| other.owner == Some(owner));
    match space.kind {
        SpaceKind::Utility => {
            let tiers = &profile.utility_rent.tiers;
            let index = if full_set {
                tiers.len().saturating_sub(1)
            } else {
                (held - 1).min(tiers.len().saturating_sub(1))
            };
            let tier = tiers.get(index).copied().unwrap_or(0);
            i64::from(dice_total) * tier
        }
        SpaceKind::Station => match profile.station_rent {
            StationRent::Table { fallback } => {
                space.rent.get(held - 1).copied().unwrap_or(fallback)
            }
            StationRent::Doubling { base } => base.saturating_mul(1i64 << (held - 1).min(30)),
        },
        SpaceKind::Property => {
            let base = property_base(profile, space, ownership.level);
            match profile.monopoly {
                MonopolyBonus::DoubleVacant if full_set && ownership.level == 0 => base * 2,
                MonopolyBonus::Surcharge { percent } if full_set => percent_of(base, percent),
                _ => base,
            }
        }
        _ => 0,
    }
}

fn property_base(profile: &RuleProfile, space: &BoardSpace, level: u8) -> i64 {
    let vacant = space.rent.first().copied().unwrap_or(0);
    match profile.property_rent {
        PropertyRent::Table => space
            .rent
            .get(level as usize)
            .or(space.rent.last())
            .copied()
            .unwrap_or(0),
        PropertyRent::Scaled {
            house_step_percent,
            top_level_percent,
        } => {
            if level >= MAX_LEVEL {
                percent_of(vacant, top_level_percent)
            } else {
                percent_of(vacant, 100 + house_step_percent * i64::from(level))
            }
        }
    }
}

/// `value * percent / 100`, halves rounded up.
pub(crate) fn percent_of(value: i64, percent: i64) -> i64 {
    (value * percent + 50).div_euclid(100)
}
