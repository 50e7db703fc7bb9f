use crate::foundation::error::ReelError;
use std::fmt;
use std::str::FromStr;

/// Named execution point of the render pipeline.
///
/// The set is fixed; only the operations bound to each phase are extensible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Once, before the frame loop.
    Init,
    FrameInit,
    Frame,
    FrameDeinit,
    Modifiers,
}

impl Phase {
    /// Every phase in execution order.
    pub const ALL: [Phase; 5] = [
        Phase::Init,
        Phase::FrameInit,
        Phase::Frame,
        Phase::FrameDeinit,
        Phase::Modifiers,
    ];

    /// Phases run once per frame, in order.
    pub const PER_FRAME: [Phase; 4] = [
        Phase::FrameInit,
        Phase::Frame,
        Phase::FrameDeinit,
        Phase::Modifiers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::FrameInit => "frame_init",
            Phase::Frame => "frame",
            Phase::FrameDeinit => "frame_deinit",
            Phase::Modifiers => "modifiers",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ReelError::config(format!("unknown phase '{s}'")))
    }
}
