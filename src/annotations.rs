use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Flags that are set on every frame emitted during a phase
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PhaseFlags: u32 {
        const NONE =        0b0000_0000;

        /// Transfer move to the point above the pickup or the dropoff area.
        const APPROACH =    0b0000_0001;

        /// Short vertical move between the area above and the item itself.
        const DESCEND =     0b0000_0010;

        /// The gripper closes when this phase completes.
        const GRASP =       0b0000_0100;

        /// The gripper opens when this phase completes.
        const RELEASE =     0b0000_1000;

        /// An item is held by the gripper during the whole phase.
        const CARRYING =    0b0001_0000;

        /// Final move back to the home pose.
        const HOME =        0b0010_0000;
    }
}

fn flag_representation(flags: &PhaseFlags) -> String {
    const FLAG_MAP: &[(PhaseFlags, &str)] = &[
        (PhaseFlags::APPROACH, "APPROACH"),
        (PhaseFlags::DESCEND, "DESCEND"),
        (PhaseFlags::GRASP, "GRASP"),
        (PhaseFlags::RELEASE, "RELEASE"),
        (PhaseFlags::CARRYING, "CARRYING"),
        (PhaseFlags::HOME, "HOME"),
    ];

    FLAG_MAP
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl fmt::Debug for PhaseFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", flag_representation(self))
    }
}

impl fmt::Display for PhaseFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", flag_representation(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation() {
        let flags = PhaseFlags::APPROACH | PhaseFlags::CARRYING;
        assert_eq!(format!("{:?}", flags), "APPROACH | CARRYING");
        assert_eq!(PhaseFlags::NONE.to_string(), "");
    }
}
