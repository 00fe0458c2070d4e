//! Trade ledger entries.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeAction {
    /// `spent` of cash converted into `quantity` units.
    Buy { quantity: f64, spent: f64 },
    /// Full liquidation of `quantity` units; `capital` is the cash afterwards.
    Sell { quantity: f64, capital: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub action: TradeAction,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        matches!(self.action, TradeAction::Buy { .. })
    }

    pub fn is_sell(&self) -> bool {
        matches!(self.action, TradeAction::Sell { .. })
    }

    pub fn quantity(&self) -> f64 {
        match self.action {
            TradeAction::Buy { quantity, .. } | TradeAction::Sell { quantity, .. } => quantity,
        }
    }

    /// Cash moved by the trade: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        match self.action {
            TradeAction::Buy { spent, .. } => -spent,
            TradeAction::Sell { quantity, .. } => quantity * self.price,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy { .. } => write!(f, "BUY"),
            TradeAction::Sell { .. } => write!(f, "SELL"),
        }
    }
}

/// Rebuild `(cash, holdings)` by replaying `trades` from `initial_capital`.
pub fn replay_ledger(initial_capital: f64, trades: &[Trade]) -> (f64, f64) {
    trades
        .iter()
        .fold((initial_capital, 0.0), |(cash, holdings), trade| {
            match trade.action {
                TradeAction::Buy { quantity, spent } => (cash - spent, holdings + quantity),
                TradeAction::Sell { quantity, .. } => {
                    (cash + quantity * trade.price, holdings - quantity)
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn buy(day: u32, price: f64, spent: f64) -> Trade {
        Trade {
            timestamp: ts(day),
            price,
            action: TradeAction::Buy {
                quantity: spent / price,
                spent,
            },
        }
    }

    #[test]
    fn buy_accessors() {
        let t = buy(1, 50.0, 500.0);
        assert!(t.is_buy());
        assert!(!t.is_sell());
        assert!((t.quantity() - 10.0).abs() < f64::EPSILON);
        assert!((t.cash_flow() + 500.0).abs() < f64::EPSILON);
        assert_eq!(t.action.to_string(), "BUY");
    }

    #[test]
    fn sell_cash_flow_is_proceeds() {
        let t = Trade {
            timestamp: ts(2),
            price: 60.0,
            action: TradeAction::Sell {
                quantity: 10.0,
                capital: 1100.0,
            },
        };
        assert!(t.is_sell());
        assert!((t.cash_flow() - 600.0).abs() < f64::EPSILON);
        assert_eq!(t.action.to_string(), "SELL");
    }

    #[test]
    fn replay_empty_ledger() {
        assert_eq!(replay_ledger(1000.0, &[]), (1000.0, 0.0));
    }

    #[test]
    fn replay_buys_and_sell() {
        let trades = vec![
            buy(1, 50.0, 500.0),
            buy(2, 25.0, 500.0),
            Trade {
                timestamp: ts(3),
                price: 40.0,
                action: TradeAction::Sell {
                    quantity: 30.0,
                    capital: 1200.0,
                },
            },
        ];
        let (cash, holdings) = replay_ledger(1000.0, &trades);
        assert!((cash - 1200.0).abs() < 1e-9);
        assert!(holdings.abs() < 1e-9);
    }
}
