//! Portfolio state and equity tracking.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Cash and units held during one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub holdings: f64,
}

impl PortfolioState {
    pub fn new(initial_capital: f64) -> Self {
        PortfolioState {
            cash: initial_capital,
            holdings: 0.0,
        }
    }

    pub fn has_holdings(&self) -> bool {
        self.holdings > 0.0
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.cash >= amount
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.holdings * price
    }

    pub fn total_equity(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    /// Convert `amount` of cash into units at `price`. Returns the units bought.
    pub fn buy(&mut self, amount: f64, price: f64) -> f64 {
        let quantity = amount / price;
        self.holdings += quantity;
        self.cash -= amount;
        quantity
    }

    /// Sell every unit at `price`. Returns the units sold.
    pub fn liquidate(&mut self, price: f64) -> f64 {
        let quantity = self.holdings;
        self.cash += quantity * price;
        self.holdings = 0.0;
        quantity
    }
}
