use std::fmt;

/// Per-request progress through the delivery sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeliveryStage {
    #[default]
    Idle,
    Notifying,
    Resolving,
    Delivering,
    Cleaning,
    Done,
    Failed,
}

impl DeliveryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStage::Idle => "IDLE",
            DeliveryStage::Notifying => "NOTIFYING",
            DeliveryStage::Resolving => "RESOLVING",
            DeliveryStage::Delivering => "DELIVERING",
            DeliveryStage::Cleaning => "CLEANING",
            DeliveryStage::Done => "DONE",
            DeliveryStage::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStage::Done | DeliveryStage::Failed)
    }
}

impl fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
