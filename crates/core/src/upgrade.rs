use crate::{BoardSpace, PlayerId, PropertyOwnership, SpaceKind, MAX_LEVEL};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeRejection {
    #[error("only regular properties can be developed")]
    NotBuildable,
    #[error("you do not own this property")]
    NotOwner,
    #[error("this property is fully developed")]
    MaxLevel,
    #[error("you must own the whole color group to build")]
    IncompleteSet,
    #[error("a property in this group is mortgaged")]
    Mortgaged,
    #[error("develop the other properties in this group first")]
    Uneven,
}

/// Checks, in order: kind, ownership, level cap, full set, mortgages and
/// even development across `group` (which includes `space`).
pub fn check_upgrade(
    player: PlayerId,
    space: &BoardSpace,
    ownership: &PropertyOwnership,
    group: &[PropertyOwnership],
) -> Result<(), UpgradeRejection> {
    if space.kind != SpaceKind::Property {
        return Err(UpgradeRejection::NotBuildable);
    }
    if ownership.owner != Some(player) {
        return Err(UpgradeRejection::NotOwner);
    }
    if ownership.level >= MAX_LEVEL {
        return Err(UpgradeRejection::MaxLevel);
    }
    if !group.iter().all(|other| other.owner == Some(player)) {
        return Err(UpgradeRejection::IncompleteSet);
    }
    if group.iter().any(|other| other.mortgaged) {
        return Err(UpgradeRejection::Mortgaged);
    }
    let lowest = group
        .iter()
        .map(|other| other.level)
        .min()
        .unwrap_or(ownership.level);
    if ownership.level > lowest {
        return Err(UpgradeRejection::Uneven);
    }
    Ok(())
}

pub fn can_upgrade(
    player: PlayerId,
    space: &BoardSpace,
    ownership: &PropertyOwnership,
    group: &[PropertyOwnership],
) -> bool {
    check_upgrade(player, space, ownership, group).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{property, station};

    fn owned(owner: usize, level: u8) -> PropertyOwnership {
        PropertyOwnership {
            owner: Some(owner),
            level,
            mortgaged: false,
        }
    }

    fn brown() -> BoardSpace {
        property(1, "brown", 60, [2, 10, 30, 90, 160, 250])
    }

    #[test]
    fn full_even_set_can_build() {
        let group = [owned(0, 1), owned(0, 1)];
        assert!(can_upgrade(0, &brown(), &group[0], &group));
    }

    #[test]
    fn rejects_other_owner() {
        let group = [owned(1, 0), owned(1, 0)];
        assert_eq!(
            check_upgrade(0, &brown(), &group[0], &group),
            Err(UpgradeRejection::NotOwner)
        );
    }

    #[test]
    fn rejects_incomplete_set() {
        let group = [owned(0, 0), PropertyOwnership::default()];
        assert_eq!(
            check_upgrade(0, &brown(), &group[0], &group),
            Err(UpgradeRejection::IncompleteSet)
        );
    }

    #[test]
    fn rejects_mortgaged_sibling() {
        let sibling = PropertyOwnership {
            mortgaged: true,
            ..owned(0, 0)
        };
        let group = [owned(0, 0), sibling];
        assert_eq!(
            check_upgrade(0, &brown(), &group[0], &group),
            Err(UpgradeRejection::Mortgaged)
        );
    }

    #[test]
    fn rejects_running_ahead_of_group() {
        let group = [owned(0, 2), owned(0, 1)];
        assert_eq!(
            check_upgrade(0, &brown(), &group[0], &group),
            Err(UpgradeRejection::Uneven)
        );
        assert!(can_upgrade(0, &brown(), &group[1], &group));
    }

    #[test]
    fn rejects_past_hotel() {
        let group = [owned(0, 5), owned(0, 5)];
        assert_eq!(
            check_upgrade(0, &brown(), &group[0], &group),
            Err(UpgradeRejection::MaxLevel)
        );
    }

    #[test]
    fn stations_are_not_buildable() {
        let group = [owned(0, 0)];
        assert_eq!(
            check_upgrade(0, &station(3), &group[0], &group),
            Err(UpgradeRejection::NotBuildable)
        );
    }
}
