//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan status codes (stored in loans.status)
///
/// `OnLoan`, `InUse` and `Issued` are open statuses; `Returned`, `Damaged`
/// and `Lost` are terminal and final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum LoanStatus {
    /// Borrowed, expected back
    OnLoan = 0,
    /// Borrowed and actively in use, expected back
    InUse = 1,
    /// Handed out permanently, never expected back
    Issued = 2,
    /// Resolved intact
    Returned = 3,
    /// Resolved with damage
    Damaged = 4,
    /// Resolved as lost
    Lost = 5,
}

/// How a status interacts with the equipment stock counter.
///
/// Consulted by the lifecycle engine instead of matching on status values
/// inline, so the stock conservation rules live in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockProfile {
    /// Opening a loan in this status reserves units from inventory
    pub consumes_on_open: bool,
    /// Resolving a loan to this status credits units back to inventory
    pub credits_on_resolve: bool,
}

impl LoanStatus {
    pub fn is_open(self) -> bool {
        matches!(self, LoanStatus::OnLoan | LoanStatus::InUse | LoanStatus::Issued)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }

    /// Stock capability table.
    ///
    /// Issued loans never hold reserved stock; lost units are not
    /// recoverable stock; damaged units physically return and are credited.
    pub fn stock(self) -> StockProfile {
        match self {
            LoanStatus::OnLoan | LoanStatus::InUse => StockProfile {
                consumes_on_open: true,
                credits_on_resolve: false,
            },
            LoanStatus::Issued => StockProfile {
                consumes_on_open: false,
                credits_on_resolve: false,
            },
            LoanStatus::Returned | LoanStatus::Damaged => StockProfile {
                consumes_on_open: false,
                credits_on_resolve: true,
            },
            LoanStatus::Lost => StockProfile {
                consumes_on_open: false,
                credits_on_resolve: false,
            },
        }
    }

    /// Whether an administrative status edit (no resolution) from `self` to
    /// `target` is admissible. Edits are only allowed between open statuses,
    /// and never out of `Issued`: issuing is terminal in effect, and a loan
    /// steered out of it could later credit stock it no longer backs.
    pub fn can_edit_to(self, target: LoanStatus) -> bool {
        self.is_open() && self != LoanStatus::Issued && target.is_open()
    }
}

impl From<i16> for LoanStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => LoanStatus::InUse,
            2 => LoanStatus::Issued,
            3 => LoanStatus::Returned,
            4 => LoanStatus::Damaged,
            5 => LoanStatus::Lost,
            _ => LoanStatus::OnLoan,
        }
    }
}

impl From<LoanStatus> for i16 {
    fn from(s: LoanStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::OnLoan => "On loan",
            LoanStatus::InUse => "In use",
            LoanStatus::Issued => "Issued",
            LoanStatus::Returned => "Returned",
            LoanStatus::Damaged => "Damaged",
            LoanStatus::Lost => "Lost",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_terminal_partition() {
        for status in [LoanStatus::OnLoan, LoanStatus::InUse, LoanStatus::Issued] {
            assert!(status.is_open());
            assert!(!status.is_terminal());
        }
        for status in [LoanStatus::Returned, LoanStatus::Damaged, LoanStatus::Lost] {
            assert!(status.is_terminal());
            assert!(!status.is_open());
        }
    }

    #[test]
    fn test_stock_profile() {
        assert!(LoanStatus::OnLoan.stock().consumes_on_open);
        assert!(LoanStatus::InUse.stock().consumes_on_open);
        assert!(!LoanStatus::Issued.stock().consumes_on_open);

        assert!(LoanStatus::Returned.stock().credits_on_resolve);
        assert!(LoanStatus::Damaged.stock().credits_on_resolve);
        assert!(!LoanStatus::Lost.stock().credits_on_resolve);
    }

    #[test]
    fn test_status_edit_rules() {
        assert!(LoanStatus::OnLoan.can_edit_to(LoanStatus::InUse));
        assert!(LoanStatus::InUse.can_edit_to(LoanStatus::OnLoan));
        assert!(LoanStatus::OnLoan.can_edit_to(LoanStatus::Issued));

        // edits never leave Issued or reach a terminal status
        assert!(!LoanStatus::Issued.can_edit_to(LoanStatus::OnLoan));
        assert!(!LoanStatus::OnLoan.can_edit_to(LoanStatus::Returned));
        assert!(!LoanStatus::Returned.can_edit_to(LoanStatus::OnLoan));
    }

    #[test]
    fn test_smallint_round_trip() {
        for status in [
            LoanStatus::OnLoan,
            LoanStatus::InUse,
            LoanStatus::Issued,
            LoanStatus::Returned,
            LoanStatus::Damaged,
            LoanStatus::Lost,
        ] {
            assert_eq!(LoanStatus::from(i16::from(status)), status);
        }
    }
}
