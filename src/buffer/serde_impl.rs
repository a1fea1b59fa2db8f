use super::RingBuffer;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized as `{ "capacity": N, "items": [oldest, .., newest] }`.
#[derive(Serialize)]
struct SnapshotRef<'a, T> {
    capacity: usize,
    items: Vec<&'a T>,
}

#[derive(Deserialize)]
struct Snapshot<T> {
    capacity: usize,
    items: Vec<T>,
}

impl<T: Serialize> Serialize for RingBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotRef {
            capacity: self.capacity(),
            items: self.iter().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RingBuffer<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<T>::deserialize(deserializer)?;
        if snapshot.items.len() > snapshot.capacity {
            return Err(D::Error::custom(format!(
                "{} items exceed capacity {}",
                snapshot.items.len(),
                snapshot.capacity
            )));
        }

        let mut buffer = RingBuffer::try_new(snapshot.capacity).map_err(D::Error::custom)?;
        buffer.extend(snapshot.items);
        Ok(buffer)
    }
}
