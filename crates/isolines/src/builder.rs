//! Multi-level isoline construction.

use crate::collection::IsolineCollection;
use crate::config::{IsolineConfig, LevelFailurePolicy};
use crate::error::{IsolineError, Result};
use crate::field::{ScalarField, ValueRange};
use crate::tracer::{LevelTracer, TraceBuffers, TraceStats};
use rayon::prelude::*;

/// Evenly spaced levels inside a range, keeping `shift_percent` of the span
/// clear at both ends.
///
/// A degenerate range has no levels.
pub fn auto_levels(range: ValueRange, density: usize, shift_percent: f64) -> Vec<f64> {
    let span = range.span();
    if density == 0 || !(span > 0.0) {
        return vec![];
    }

    let lo = range.min + shift_percent * span;
    let hi = range.max - shift_percent * span;

    if density == 1 {
        return vec![(lo + hi) / 2.0];
    }

    let step = (hi - lo) / (density - 1) as f64;
    (0..density).map(|k| lo + k as f64 * step).collect()
}

/// Multiples of `interval` inside `[min_value, max_value]`.
pub fn interval_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if interval <= 0.0 || max_value <= min_value {
        return vec![];
    }

    // Start from first multiple of interval at or above min_value
    let first = (min_value / interval).ceil() as i64;
    let last = (max_value / interval).floor() as i64;
    (first..=last).map(|k| k as f64 * interval).collect()
}

/// Builds isoline collections from a scalar field.
pub struct IsolineBuilder<'a> {
    data_source: Option<&'a dyn ScalarField>,
    config: IsolineConfig,
}

impl<'a> Default for IsolineBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IsolineBuilder<'a> {
    /// A builder with default configuration and no data source.
    pub fn new() -> Self {
        Self {
            data_source: None,
            config: IsolineConfig::default(),
        }
    }

    pub fn with_data_source(mut self, field: &'a dyn ScalarField) -> Self {
        self.data_source = Some(field);
        self
    }

    pub fn with_config(mut self, config: IsolineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_data_source(&mut self, field: &'a dyn ScalarField) {
        self.data_source = Some(field);
    }

    pub fn config(&self) -> &IsolineConfig {
        &self.config
    }

    fn source(&self) -> Result<&'a dyn ScalarField> {
        self.data_source.ok_or(IsolineError::MissingDataSource)
    }

    fn prepare(&self) -> Result<(&'a dyn ScalarField, Option<ValueRange>)> {
        self.config.validate().map_err(IsolineError::Config)?;
        let field = self.source()?;
        Ok((field, field.value_range()))
    }

    /// Trace `density` automatically spaced levels across the field range.
    pub fn build_isoline(&self) -> Result<IsolineCollection> {
        let (field, range) = self.prepare()?;
        let Some(range) = range else {
            return Ok(IsolineCollection::default());
        };
        let levels = auto_levels(range, self.config.density, self.config.shift_percent);
        self.build_levels(field, range, &levels)
    }

    /// Trace a single explicit level.
    pub fn build_isoline_for_level(&self, level: f64) -> Result<IsolineCollection> {
        self.build_isolines_for_levels(&[level])
    }

    /// Trace every multiple of `interval` inside the field range.
    pub fn build_isolines_with_interval(&self, interval: f64) -> Result<IsolineCollection> {
        let (field, range) = self.prepare()?;
        let Some(range) = range else {
            return Ok(IsolineCollection::default());
        };
        let levels = interval_levels(range.min, range.max, interval);
        self.build_levels(field, range, &levels)
    }

    /// Trace each of `levels`, concatenating the results in the given order.
    pub fn build_isolines_for_levels(&self, levels: &[f64]) -> Result<IsolineCollection> {
        let (field, range) = self.prepare()?;
        let Some(range) = range else {
            return Ok(IsolineCollection::default());
        };
        self.build_levels(field, range, levels)
    }

    fn build_levels(
        &self,
        field: &dyn ScalarField,
        range: ValueRange,
        levels: &[f64],
    ) -> Result<IsolineCollection> {
        tracing::debug!(
            width = field.width(),
            height = field.height(),
            data_min = range.min,
            data_max = range.max,
            num_levels = levels.len(),
            first_level = levels.first().copied().unwrap_or(0.0),
            last_level = levels.last().copied().unwrap_or(0.0),
            parallel = self.config.parallel,
            "build_isolines input"
        );

        let traced: Vec<Result<(IsolineCollection, TraceStats)>> = if self.config.parallel {
            levels
                .par_iter()
                .map_init(
                    || TraceBuffers::new(field.width(), field.height()),
                    |buffers, &level| self.trace_level(field, range, level, buffers),
                )
                .collect()
        } else {
            let mut buffers = TraceBuffers::new(field.width(), field.height());
            levels
                .iter()
                .map(|&level| self.trace_level(field, range, level, &mut buffers))
                .collect()
        };

        let mut collection = IsolineCollection::new(range.min, range.max);
        let mut totals = TraceStats::default();
        for (result, &level) in traced.into_iter().zip(levels) {
            match result {
                Ok((lines, stats)) => {
                    totals.lines += stats.lines;
                    totals.points += stats.points;
                    totals.cells_visited += stats.cells_visited;
                    totals.saddle_cells += stats.saddle_cells;
                    collection.extend_from(lines);
                }
                Err(err) => match self.config.failure_policy {
                    LevelFailurePolicy::Abort => return Err(err),
                    LevelFailurePolicy::Skip => {
                        tracing::warn!(level = level, error = %err, "Skipping isoline level");
                    }
                },
            }
        }

        tracing::debug!(
            num_lines = collection.len(),
            total_points = collection.total_points(),
            cells_visited = totals.cells_visited,
            saddle_cells = totals.saddle_cells,
            "Generated isolines"
        );

        Ok(collection)
    }

    fn trace_level(
        &self,
        field: &dyn ScalarField,
        range: ValueRange,
        level: f64,
        buffers: &mut TraceBuffers,
    ) -> Result<(IsolineCollection, TraceStats)> {
        let (lines, stats) = LevelTracer::new(field, level, range)
            .with_near_zero(self.config.near_zero)
            .with_max_saddle_iterations(self.config.max_saddle_iterations)
            .trace(buffers)
            .map_err(|e| e.at_level(level))?;

        let mut collection = IsolineCollection::new(range.min, range.max);
        for line in lines {
            collection.push(line);
        }
        Ok((collection, stats))
    }
}
