//! Fixtures shared by the unit tests of this crate.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use devclass_sql::{SQLStore, SqliteStore};

use crate::model::DeviceSpec;
use crate::predictor::{PredictError, PricePredictor};
use crate::store::SqlDeviceStore;

/// A valid spec; `n` is folded into `battery_power` so devices are distinguishable.
pub(crate) fn sample_spec(n: i32) -> DeviceSpec {
    DeviceSpec {
        battery_power: 1000 + n,
        blue: true,
        clock_speed: 2.2,
        dual_sim: false,
        fc: 1,
        four_g: true,
        int_memory: 7,
        m_dep: 0.6,
        mobile_wt: 188,
        n_cores: 2,
        pc: 2,
        px_height: 20,
        px_width: 756,
        ram: 2549,
        sc_h: 9,
        sc_w: 7,
        talk_time: 19,
        three_g: false,
        touch_screen: false,
        wifi: true,
    }
}

pub(crate) fn memory_store() -> Arc<SqlDeviceStore> {
    let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    Arc::new(SqlDeviceStore::new(sql).unwrap())
}

/// Answers every request with the same class and counts calls.
pub(crate) struct FixedPredictor {
    class: i32,
    pub(crate) calls: AtomicUsize,
}

impl FixedPredictor {
    pub(crate) fn new(class: i32) -> Self {
        Self {
            class,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PricePredictor for FixedPredictor {
    async fn predict(&self, _spec: &DeviceSpec) -> Result<i32, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.class)
    }
}

/// Answers with a malformed body for the listed battery powers (or for
/// every request when no list is given), `class` otherwise.
pub(crate) struct FailingPredictor {
    class: i32,
    fail_on: Option<HashSet<i32>>,
    pub(crate) calls: AtomicUsize,
}

impl FailingPredictor {
    pub(crate) fn new(class: i32, fail_on: impl IntoIterator<Item = i32>) -> Self {
        Self {
            class,
            fail_on: Some(fail_on.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn always() -> Self {
        Self {
            class: 0,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PricePredictor for FailingPredictor {
    async fn predict(&self, spec: &DeviceSpec) -> Result<i32, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fails = match &self.fail_on {
            Some(set) => set.contains(&spec.battery_power),
            None => true,
        };
        if fails {
            return Err(PredictError::InvalidResponse {
                body: "<html>oops</html>".into(),
                reason: "expected value at line 1 column 1".into(),
            });
        }
        Ok(self.class)
    }
}
