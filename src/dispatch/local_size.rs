//! Greedy work-group size search.
//!
//! Local sizes are picked from a fixed descending table of "nice" values with
//! many small factors. Axes are visited in priority order and each one takes
//! the largest table entry that fits the remaining work-group budget and
//! evenly divides its global size.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchError, NoopObserver, PlanObserver};

/// Candidate local sizes, largest first. Kept bit-compatible with earlier
/// kernel selection decisions; do not reorder.
pub const OPTIMAL_LOCAL_SIZES: [usize; 33] = [
    1024, 960, 896, 832, 768, 704, 640, 576, 512, 480, 448, 416, 384, 352, 320, 288, 256, 227, 224,
    192, 160, 128, 96, 64, 32, 16, 8, 7, 6, 5, 4, 2, 1,
];

/// Descending table of candidate local sizes.
///
/// Serialized as a plain list; deserialization goes through
/// [`LocalSizeTable::new`], so every table in existence is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LocalSizeTable {
    values: Cow<'static, [usize]>,
}

impl Default for LocalSizeTable {
    fn default() -> Self {
        Self {
            values: Cow::Borrowed(&OPTIMAL_LOCAL_SIZES),
        }
    }
}

impl TryFrom<Vec<usize>> for LocalSizeTable {
    type Error = String;

    fn try_from(values: Vec<usize>) -> Result<Self, Self::Error> {
        LocalSizeTable::new(values)
    }
}

impl From<LocalSizeTable> for Vec<usize> {
    fn from(table: LocalSizeTable) -> Self {
        table.values.into_owned()
    }
}

impl LocalSizeTable {
    /// Build a custom table. Entries must be non-zero and strictly descending.
    pub fn new(values: Vec<usize>) -> Result<Self, String> {
        let table = Self {
            values: Cow::Owned(values),
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.values.is_empty() {
            return Err("local size table cannot be empty".to_string());
        }
        if self.values.contains(&0) {
            return Err("local size table cannot contain zero".to_string());
        }
        if let Some(pair) = self.values.windows(2).find(|pair| pair[0] <= pair[1]) {
            return Err(format!(
                "local size table must be strictly descending, found {} before {}",
                pair[0], pair[1]
            ));
        }
        Ok(())
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    pub fn largest(&self) -> usize {
        self.values.first().copied().unwrap_or(1)
    }

    /// Whether some entry other than the trivial 1 divides `global`.
    fn has_nontrivial_divisor(&self, global: usize) -> bool {
        self.values.iter().any(|&c| c > 1 && global % c == 0)
    }

    /// Pick the local size for one axis.
    ///
    /// A trailing 1 is only accepted while the axis still fits in a single
    /// work-group of the largest size or shares a factor with some entry.
    /// Otherwise (a large prime, for example) the search reports
    /// `NoDivisorFound` and leaves the fallback to the caller.
    pub fn pick(&self, axis: usize, global: usize, budget: usize) -> Result<usize, DispatchError> {
        let no_divisor = DispatchError::NoDivisorFound { axis, global, budget };
        let found = self
            .values
            .iter()
            .copied()
            .skip_while(|&candidate| candidate > budget)
            .find(|&candidate| global % candidate == 0)
            .ok_or_else(|| no_divisor.clone())?;

        if found == 1 && global > self.largest() && !self.has_nontrivial_divisor(global) {
            return Err(no_divisor);
        }
        Ok(found)
    }

    /// Greedy local sizes for `global`, visiting axes in `order`.
    ///
    /// An empty `order` means natural axis order.
    pub fn optimal_local_sizes(
        &self,
        global: &[usize],
        max_work_group_size: usize,
        order: &[usize],
    ) -> Result<Vec<usize>, DispatchError> {
        self.optimal_local_sizes_observed(global, max_work_group_size, order, &NoopObserver)
    }

    pub(crate) fn optimal_local_sizes_observed(
        &self,
        global: &[usize],
        max_work_group_size: usize,
        order: &[usize],
        observer: &dyn PlanObserver,
    ) -> Result<Vec<usize>, DispatchError> {
        check_axis_order(order, global.len())?;

        let mut local = vec![1; global.len()];
        let mut total = 1usize;
        for position in 0..global.len() {
            let axis = if order.is_empty() { position } else { order[position] };
            let budget = max_work_group_size / total;
            let size = self.pick(axis, global[axis], budget)?;
            observer.on_local_size(axis, global[axis], budget, size);
            local[axis] = size;
            total = total.saturating_mul(size);
        }
        Ok(local)
    }
}

/// An override must list every axis exactly once.
pub fn check_axis_order(order: &[usize], axes: usize) -> Result<(), DispatchError> {
    if order.is_empty() {
        return Ok(());
    }
    if order.len() != axes {
        return Err(DispatchError::LayoutOrderMismatch {
            expected: axes,
            actual: order.len(),
        });
    }
    let mut seen = vec![false; axes];
    for &axis in order {
        match seen.get_mut(axis) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(DispatchError::InvalidAxisOrder {
                    order: order.to_vec(),
                })
            }
        }
    }
    Ok(())
}
