//! The recursive-descent conversion driver.

use tracing::error;

use crate::error::{Error, Result};

/// Recursion ceiling for one top-level conversion.
///
/// The source type graph may be self-referential even though the output tree
/// cannot be; bounding depth turns a would-be infinite recursion into an
/// ordinary conversion error.
pub const MAX_CONVERSION_DEPTH: usize = 64;

/// One unit of conversion for a single source-value category.
///
/// A converter performs exactly one level of structural transformation and
/// defers nested values back to [`ConversionContext::convert`]. Converters
/// must not catch errors from those recursive calls; propagation and logging
/// belong to the context.
pub trait TypeConverter<V, T, S>: Send + Sync {
    /// Whether this converter claims `value` under the current run state.
    fn supports(&self, value: &V, state: &S) -> bool;

    /// Convert one level of `value`, recursing through `ctx` for children.
    fn convert(&self, value: &V, ctx: &mut ConversionContext<'_, V, T, S>) -> Result<T>;
}

/// Fixes one conversion domain: an ordered converter list, an initial-state
/// factory, and a diagnostic stringifier.
///
/// Declaration order of [`converters`](Self::converters) is a correctness
/// contract: when applicability sets overlap, the most specific converter must
/// come first — the driver always picks the first match and never
/// disambiguates ties.
pub trait ConverterStrategy<V, T, S>: Send + Sync {
    /// Identity used in diagnostics.
    fn name(&self) -> &'static str;

    /// The ordered converter list. Stateless; safe to share across contexts.
    fn converters(&self) -> &[Box<dyn TypeConverter<V, T, S>>];

    /// Fresh run state for one context.
    fn initial_state(&self) -> S;

    /// Human rendering of a value for error paths.
    fn render_value(&self, value: &V) -> String;
}

/// The recursive-descent driver for one logical conversion run.
///
/// A context owns its depth stack and run state and is not reentrant across
/// independent conversions; construct one context per top-level run when
/// isolation matters. The strategy behind it is read-only and shared.
pub struct ConversionContext<'a, V, T, S> {
    strategy: &'a dyn ConverterStrategy<V, T, S>,
    depth_stack: Vec<String>,
    error_path: Vec<String>,
    failure_report: Option<String>,
    state: S,
}

impl<'a, V, T, S> ConversionContext<'a, V, T, S> {
    pub fn new(strategy: &'a dyn ConverterStrategy<V, T, S>) -> Self {
        Self {
            strategy,
            depth_stack: Vec::new(),
            error_path: Vec::new(),
            failure_report: None,
            state: strategy.initial_state(),
        }
    }

    /// Convert one value, dispatching to the first converter whose `supports`
    /// predicate claims it.
    ///
    /// The depth stack is pushed on entry and popped on every exit path, so
    /// its length after any call equals its length before, success or failure.
    pub fn convert(&mut self, value: &V) -> Result<T> {
        self.depth_stack.push(self.strategy.render_value(value));
        let result = match self.dispatch(value) {
            Ok(target) => Ok(target),
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        };
        self.depth_stack.pop();
        result
    }

    fn dispatch(&mut self, value: &V) -> Result<T> {
        if self.depth_stack.len() > MAX_CONVERSION_DEPTH {
            return Err(Error::conversion(format!(
                "conversion depth limit ({MAX_CONVERSION_DEPTH}) exceeded; \
                 the source type graph is likely self-referential"
            )));
        }
        let strategy = self.strategy;
        let Some(converter) = strategy
            .converters()
            .iter()
            .find(|converter| converter.supports(value, &self.state))
        else {
            return Err(Error::UnsupportedType {
                rendered: strategy.render_value(value),
                strategy: strategy.name(),
            });
        };
        converter.convert(value, self)
    }

    /// Capture the error path on the first failure and emit one aggregated
    /// diagnostic when the failure unwinds back to the top-level frame.
    fn record_failure(&mut self, err: &Error) {
        // First failure observed during this run: the depth stack still holds
        // the full path, outermost first. Snapshot it before unwinding.
        if self.error_path.is_empty() {
            self.error_path.clone_from(&self.depth_stack);
        }
        if self.depth_stack.len() == 1 {
            let mut report = format!(
                "Error during conversion (strategy {}): {err}\n",
                self.strategy.name()
            );
            for (depth, frame) in self.error_path.iter().enumerate() {
                for _ in 0..=depth {
                    report.push('\t');
                }
                report.push_str("- ");
                report.push_str(frame);
                report.push('\n');
            }
            error!("{report}");
            self.failure_report = Some(report);
            self.error_path.clear();
        }
    }

    /// The aggregated diagnostic from the last top-level failure, if any.
    ///
    /// Each failure produces exactly one report; taking it resets the slot.
    pub fn take_failure_report(&mut self) -> Option<String> {
        self.failure_report.take()
    }

    /// Current recursion depth. Zero outside of a `convert` call.
    pub fn depth(&self) -> usize {
        self.depth_stack.len()
    }

    /// Shared run state, threaded through one top-level call and all its
    /// recursive descendants.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

impl<V, T, S> std::fmt::Debug for ConversionContext<'_, V, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionContext")
            .field("strategy", &self.strategy.name())
            .field("depth", &self.depth_stack.len())
            .finish_non_exhaustive()
    }
}
