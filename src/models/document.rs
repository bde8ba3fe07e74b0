use serde::{Deserialize, Serialize};

use super::{Motivation, Profile, Schedule, Settings, Task};

/// Shape version written into every saved document.
pub const DOCUMENT_VERSION: u32 = 1;

/// The whole persisted state: one JSON file holds all of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub schedules: Vec<Schedule>,
    pub tasks: Vec<Task>,
    pub profile: Profile,
    pub settings: Settings,
    pub motivation: Motivation,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            schedules: Vec::new(),
            tasks: Vec::new(),
            profile: Profile::default(),
            settings: Settings::default(),
            motivation: Motivation::default(),
        }
    }
}
