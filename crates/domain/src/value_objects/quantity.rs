//! Stack quantity arithmetic for ammunition piles

use serde::{Deserialize, Serialize};

/// Result of removing units from a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackChange {
    /// Units left on the stack after removal
    Remaining(u32),
    /// Stack is exhausted (quantity reached zero)
    Exhausted,
}

impl StackChange {
    /// Remove `amount` units from a stack holding `current`
    pub fn take(current: u32, amount: u32) -> Self {
        if amount >= current {
            Self::Exhausted
        } else {
            Self::Remaining(current - amount)
        }
    }

    /// Check if the stack has nothing left
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Units left on the stack, zero when exhausted
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Remaining(qty) => *qty,
            Self::Exhausted => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_partial() {
        assert_eq!(StackChange::take(5, 3), StackChange::Remaining(2));
    }

    #[test]
    fn take_exact_exhausts() {
        assert_eq!(StackChange::take(5, 5), StackChange::Exhausted);
        assert_eq!(StackChange::take(5, 5).quantity(), 0);
    }

    #[test]
    fn take_more_than_available_exhausts() {
        assert!(StackChange::take(2, 7).is_exhausted());
    }
}
