use std::sync::Arc;

use devclass_core::now_rfc3339;
use devclass_sql::{Row, SQLStore, Value};

use super::DeviceStore;
use super::schema;
use crate::error::DeviceError;
use crate::model::{Device, DeviceSpec};

const SELECT_COLUMNS: &str = "SELECT id, data, predicted_price_range, create_at, update_at FROM devices";

/// DeviceStore on top of any [`SQLStore`].
pub struct SqlDeviceStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlDeviceStore {
    /// Wrap `sql`, creating the device table if needed.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, DeviceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }

    fn encode(spec: &DeviceSpec) -> Result<String, DeviceError> {
        serde_json::to_string(spec)
            .map_err(|e| DeviceError::Storage(format!("encode device: {e}")))
    }

    fn decode(row: &Row) -> Result<Device, DeviceError> {
        let id = row
            .get_i64("id")
            .ok_or_else(|| DeviceError::Storage("missing id column".into()))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| DeviceError::Storage(format!("device {id}: missing data column")))?;
        let spec: DeviceSpec = serde_json::from_str(data)
            .map_err(|e| DeviceError::Storage(format!("device {id}: corrupt data: {e}")))?;

        let predicted_price_range = match row.get_i64("predicted_price_range") {
            Some(v) => Some(i32::try_from(v).map_err(|_| {
                DeviceError::Storage(format!("device {id}: price range {v} out of range"))
            })?),
            None => None,
        };

        Ok(Device {
            id,
            spec,
            predicted_price_range,
            create_at: row.get_str("create_at").map(String::from),
            update_at: row.get_str("update_at").map(String::from),
        })
    }
}

impl DeviceStore for SqlDeviceStore {
    fn create(&self, spec: &DeviceSpec) -> Result<Device, DeviceError> {
        let now = now_rfc3339();
        let id = self.sql.insert(
            "INSERT INTO devices (data, predicted_price_range, create_at, update_at) \
             VALUES (?1, NULL, ?2, ?2)",
            &[Value::Text(Self::encode(spec)?), Value::Text(now.clone())],
        )?;

        Ok(Device {
            id,
            spec: spec.clone(),
            predicted_price_range: None,
            create_at: Some(now.clone()),
            update_at: Some(now),
        })
    }

    fn find(&self, id: i64) -> Result<Option<Device>, DeviceError> {
        let rows = self
            .sql
            .query(&format!("{SELECT_COLUMNS} WHERE id = ?1"), &[Value::Integer(id)])?;
        rows.first().map(Self::decode).transpose()
    }

    fn list(&self) -> Result<Vec<Device>, DeviceError> {
        let rows = self.sql.query(&format!("{SELECT_COLUMNS} ORDER BY id ASC"), &[])?;
        rows.iter().map(Self::decode).collect()
    }

    fn save(&self, mut device: Device) -> Result<Device, DeviceError> {
        let now = now_rfc3339();
        let affected = self.sql.exec(
            "UPDATE devices SET data = ?1, predicted_price_range = ?2, update_at = ?3 WHERE id = ?4",
            &[
                Value::Text(Self::encode(&device.spec)?),
                Value::from(device.predicted_price_range.map(i64::from)),
                Value::Text(now.clone()),
                Value::Integer(device.id),
            ],
        )?;
        if affected == 0 {
            return Err(DeviceError::NotFound(device.id));
        }

        device.update_at = Some(now);
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_store, sample_spec};

    #[test]
    fn create_assigns_increasing_ids() {
        let store = memory_store();
        let a = store.create(&sample_spec(1)).unwrap();
        let b = store.create(&sample_spec(2)).unwrap();
        assert!(b.id > a.id);
        assert!(a.predicted_price_range.is_none());
        assert!(a.create_at.is_some());
    }

    #[test]
    fn find_roundtrips_spec() {
        let store = memory_store();
        let created = store.create(&sample_spec(5)).unwrap();

        let found = store.find(created.id).unwrap().unwrap();
        assert_eq!(found, created);
        assert!(store.find(created.id + 100).unwrap().is_none());
    }

    #[test]
    fn find_keeps_float_features_exact() {
        let store = memory_store();
        let mut spec = sample_spec(1);
        spec.clock_speed = 2.5976397732906826;
        spec.m_dep = 0.1 + 0.2;
        let created = store.create(&spec).unwrap();

        let found = store.find(created.id).unwrap().unwrap();
        assert_eq!(found.spec.clock_speed.to_bits(), 2.5976397732906826_f64.to_bits());
        assert_eq!(found.spec.m_dep.to_bits(), (0.1_f64 + 0.2).to_bits());
        assert_eq!(store.list().unwrap()[0].spec, spec);
    }

    #[test]
    fn list_in_insertion_order() {
        let store = memory_store();
        for n in 0..5 {
            store.create(&sample_spec(n)).unwrap();
        }
        let powers: Vec<i32> = store
            .list()
            .unwrap()
            .iter()
            .map(|d| d.spec.battery_power)
            .collect();
        assert_eq!(powers, vec![1000, 1001, 1002, 1003, 1004]);
    }

    #[test]
    fn save_persists_prediction() {
        let store = memory_store();
        let mut device = store.create(&sample_spec(1)).unwrap();
        device.predicted_price_range = Some(3);

        let saved = store.save(device).unwrap();
        assert_eq!(saved.predicted_price_range, Some(3));

        let found = store.find(saved.id).unwrap().unwrap();
        assert_eq!(found.predicted_price_range, Some(3));
        assert_eq!(found.update_at, saved.update_at);
    }

    #[test]
    fn save_unknown_device() {
        let store = memory_store();
        let mut device = store.create(&sample_spec(1)).unwrap();
        device.id = 42;
        assert!(matches!(store.save(device), Err(DeviceError::NotFound(42))));
    }
}
