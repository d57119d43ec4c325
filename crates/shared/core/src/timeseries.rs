//! Per-step time series
//!
//! The engine knows the run length up front, so every column is allocated
//! once with `n_steps` slots and written by index. Unwritten slots hold a
//! sentinel (`NaN` / `usize::MAX`) so [`TimeSeries::validate`] can detect gaps.

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::values::{Price, Quantity, Step};

const UNWRITTEN: Step = Step::MAX;

/// One row of the time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub t: Step,
    pub mid: Price,
    pub bid: Price,
    pub ask: Price,
    pub inventory: Quantity,
    /// Mark-to-market P&L: cash + inventory·mid
    pub pnl: f64,
    /// Reservation price (risk-aware policy only)
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub reservation_price: Option<Price>,
    /// Half-spread (risk-aware policy only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_spread: Option<f64>,
}

/// Columnar time series with one slot per step
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    t: Vec<Step>,
    mid: Vec<Price>,
    bid: Vec<Price>,
    ask: Vec<Price>,
    inventory: Vec<Quantity>,
    pnl: Vec<f64>,
    reservation_price: Option<Vec<Price>>,
    half_spread: Option<Vec<f64>>,
}

impl TimeSeries {
    pub const BASE_COLUMNS: [&'static str; 6] = ["t", "mid", "bid", "ask", "inventory", "pnl"];
    pub const POLICY_COLUMNS: [&'static str; 2] = ["r", "half_spread"];

    /// Allocate `len` unwritten rows
    ///
    /// `with_policy_columns` adds the reservation-price and half-spread columns.
    pub fn with_len(len: usize, with_policy_columns: bool) -> Self {
        let column = || vec![f64::NAN; len];
        Self {
            t: vec![UNWRITTEN; len],
            mid: column(),
            bid: column(),
            ask: column(),
            inventory: column(),
            pnl: column(),
            reservation_price: with_policy_columns.then(column),
            half_spread: with_policy_columns.then(column),
        }
    }

    /// Rebuild a series from rows (e.g. after loading from disk)
    ///
    /// Policy columns are kept only if the first row carries them; the result
    /// is validated before being returned.
    pub fn from_rows(rows: &[TimeSeriesRow]) -> Result<Self, SeriesError> {
        let with_policy = rows
            .first()
            .is_some_and(|r| r.reservation_price.is_some() || r.half_spread.is_some());
        let mut series = Self::with_len(rows.len(), with_policy);
        for (step, row) in rows.iter().enumerate() {
            if row.t != step {
                return Err(SeriesError::OutOfOrder {
                    step,
                    found: row.t,
                });
            }
            series.set_row(step, row)?;
        }
        series.validate()?;
        Ok(series)
    }

    /// Write row `step`
    pub fn set_row(&mut self, step: Step, row: &TimeSeriesRow) -> Result<(), SeriesError> {
        let len = self.len();
        if step >= len {
            return Err(SeriesError::OutOfRange { step, len });
        }
        self.t[step] = row.t;
        self.mid[step] = row.mid;
        self.bid[step] = row.bid;
        self.ask[step] = row.ask;
        self.inventory[step] = row.inventory;
        self.pnl[step] = row.pnl;

        if let Some(column) = self.reservation_price.as_mut() {
            column[step] = row.reservation_price.ok_or(SeriesError::MissingColumn {
                column: "r",
                step,
            })?;
        }
        if let Some(column) = self.half_spread.as_mut() {
            column[step] = row.half_spread.ok_or(SeriesError::MissingColumn {
                column: "half_spread",
                step,
            })?;
        }
        Ok(())
    }

    /// Check the array-level invariants
    ///
    /// Every row written in order, no non-finite values, and `bid < ask`.
    pub fn validate(&self) -> Result<(), SeriesError> {
        for (step, &t) in self.t.iter().enumerate() {
            if t == UNWRITTEN {
                return Err(SeriesError::Gap { step });
            }
            if t != step {
                return Err(SeriesError::OutOfOrder { step, found: t });
            }
        }

        let mut columns: Vec<(&'static str, &[f64])> = vec![
            ("mid", self.mid.as_slice()),
            ("bid", self.bid.as_slice()),
            ("ask", self.ask.as_slice()),
            ("inventory", self.inventory.as_slice()),
            ("pnl", self.pnl.as_slice()),
        ];
        if let Some(column) = &self.reservation_price {
            columns.push(("r", column.as_slice()));
        }
        if let Some(column) = &self.half_spread {
            columns.push(("half_spread", column.as_slice()));
        }
        for (name, values) in columns {
            if let Some(step) = values.iter().position(|v| !v.is_finite()) {
                return Err(SeriesError::NotFinite { column: name, step });
            }
        }

        for step in 0..self.len() {
            let (bid, ask) = (self.bid[step], self.ask[step]);
            if bid >= ask {
                return Err(SeriesError::Crossed { step, bid, ask });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn has_policy_columns(&self) -> bool {
        self.reservation_price.is_some()
    }

    /// Column names in persisted order
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = Self::BASE_COLUMNS.to_vec();
        if self.has_policy_columns() {
            names.extend(Self::POLICY_COLUMNS);
        }
        names
    }

    pub fn t(&self) -> &[Step] {
        &self.t
    }

    pub fn mid(&self) -> &[Price] {
        &self.mid
    }

    pub fn bid(&self) -> &[Price] {
        &self.bid
    }

    pub fn ask(&self) -> &[Price] {
        &self.ask
    }

    pub fn inventory(&self) -> &[Quantity] {
        &self.inventory
    }

    pub fn pnl(&self) -> &[f64] {
        &self.pnl
    }

    pub fn reservation_price(&self) -> Option<&[Price]> {
        self.reservation_price.as_deref()
    }

    pub fn half_spread(&self) -> Option<&[f64]> {
        self.half_spread.as_deref()
    }

    /// Mid price of the last row
    pub fn last_mid(&self) -> Option<Price> {
        self.mid.last().copied()
    }

    /// Largest absolute inventory over the run
    pub fn max_abs_inventory(&self) -> Quantity {
        self.inventory.iter().fold(0.0, |acc, q| acc.max(q.abs()))
    }

    /// Materialize row `step`
    pub fn row(&self, step: Step) -> Option<TimeSeriesRow> {
        if step >= self.len() {
            return None;
        }
        Some(TimeSeriesRow {
            t: self.t[step],
            mid: self.mid[step],
            bid: self.bid[step],
            ask: self.ask[step],
            inventory: self.inventory[step],
            pnl: self.pnl[step],
            reservation_price: self.reservation_price.as_ref().map(|c| c[step]),
            half_spread: self.half_spread.as_ref().map(|c| c[step]),
        })
    }

    /// Iterate over all rows in step order
    pub fn rows(&self) -> impl Iterator<Item = TimeSeriesRow> + '_ {
        (0..self.len()).filter_map(|step| self.row(step))
    }
}
