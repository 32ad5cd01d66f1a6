//! Mapping from generic trading actions to order parameters

use crate::common::types::{Side, TradeAction};

/// Side and reduce-only flag derived from a trading action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderIntent {
    pub side: Side,
    pub reduce_only: bool,
}

/// Translate a trading action into exchange-neutral order parameters.
///
/// The match is exhaustive over the closed action set; unrecognized action
/// strings never get this far (they are rejected when the instruction is
/// parsed).
pub fn map_action(action: TradeAction) -> OrderIntent {
    match action {
        TradeAction::Long => OrderIntent {
            side: Side::Buy,
            reduce_only: false,
        },
        TradeAction::Short => OrderIntent {
            side: Side::Sell,
            reduce_only: false,
        },
        TradeAction::CloseLong => OrderIntent {
            side: Side::Sell,
            reduce_only: true,
        },
        TradeAction::CloseShort => OrderIntent {
            side: Side::Buy,
            reduce_only: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_actions_never_reduce() {
        assert_eq!(
            map_action(TradeAction::Long),
            OrderIntent { side: Side::Buy, reduce_only: false }
        );
        assert_eq!(
            map_action(TradeAction::Short),
            OrderIntent { side: Side::Sell, reduce_only: false }
        );
    }

    #[test]
    fn test_close_actions_are_reduce_only_on_the_opposite_side() {
        assert_eq!(
            map_action(TradeAction::CloseLong),
            OrderIntent { side: Side::Sell, reduce_only: true }
        );
        assert_eq!(
            map_action(TradeAction::CloseShort),
            OrderIntent { side: Side::Buy, reduce_only: true }
        );
    }
}
