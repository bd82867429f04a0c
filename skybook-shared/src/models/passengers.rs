use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerKind {
    Adult,
    Child,
    Infant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

/// Passenger counts as picked on the booking form.
///
/// Invariants: `adults >= 1`, `infants <= adults`. Every mutation goes
/// through [`PassengerCounts::adjust`], which refuses any step that would
/// break them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassengerCounts {
    adults: u32,
    children: u32,
    infants: u32,
}

impl Default for PassengerCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

impl PassengerCounts {
    /// Builds counts from raw numbers, `None` when they break an invariant.
    pub fn new(adults: u32, children: u32, infants: u32) -> Option<Self> {
        let counts = Self {
            adults,
            children,
            infants,
        };
        counts.is_valid().then_some(counts)
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn infants(&self) -> u32 {
        self.infants
    }

    pub fn get(&self, kind: PassengerKind) -> u32 {
        match kind {
            PassengerKind::Adult => self.adults,
            PassengerKind::Child => self.children,
            PassengerKind::Infant => self.infants,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.adults >= 1 && self.infants <= self.adults
    }

    /// Apply one step to one count. Returns `false` and leaves the counts
    /// untouched when the step is refused.
    pub fn adjust(&mut self, kind: PassengerKind, step: Step) -> bool {
        let current = self.get(kind);
        let next = match step {
            Step::Increment => current.saturating_add(1),
            Step::Decrement => match current.checked_sub(1) {
                Some(n) => n,
                None => return false,
            },
        };

        let mut candidate = *self;
        match kind {
            PassengerKind::Adult => candidate.adults = next,
            PassengerKind::Child => candidate.children = next,
            PassengerKind::Infant => candidate.infants = next,
        }

        if !candidate.is_valid() {
            return false;
        }
        *self = candidate;
        true
    }

    pub fn increment(&mut self, kind: PassengerKind) -> bool {
        self.adjust(kind, Step::Increment)
    }

    pub fn decrement(&mut self, kind: PassengerKind) -> bool {
        self.adjust(kind, Step::Decrement)
    }

    /// Label shown on the collapsed passenger picker.
    pub fn summary(&self) -> String {
        format!(
            "{} Người lớn, {} Trẻ em, {} Em bé",
            self.adults, self.children, self.infants
        )
    }
}

/// Unchecked passenger numbers as they arrive on a results-page URL.
/// Missing or malformed input becomes all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerTally {
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
}

impl PassengerTally {
    pub fn get(&self, kind: PassengerKind) -> u32 {
        match kind {
            PassengerKind::Adult => self.adults,
            PassengerKind::Child => self.children,
            PassengerKind::Infant => self.infants,
        }
    }
}

impl From<PassengerCounts> for PassengerTally {
    fn from(counts: PassengerCounts) -> Self {
        Self {
            adults: counts.adults,
            children: counts.children,
            infants: counts.infants,
        }
    }
}
