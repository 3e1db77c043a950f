use std::collections::VecDeque;

use agriguard_api::models::SensorReading;
use rand::Rng;
use time::{Duration, OffsetDateTime};

pub const DEFAULT_CAPACITY: usize = 7;

/// Fixed-capacity FIFO of the most recent sensor readings, oldest first.
#[derive(Debug, Clone)]
pub struct SensorWindow {
    readings: VecDeque<SensorReading>,
    capacity: usize,
}

impl SensorWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Fills the window with one plausible reading per day, ending today.
    pub fn seeded<R: Rng + ?Sized>(capacity: usize, today: OffsetDateTime, rng: &mut R) -> Self {
        let mut window = Self::new(capacity);

        for days_ago in (0..window.capacity as i64).rev() {
            let day = today - Duration::days(days_ago);

            window.push(SensorReading {
                timestamp: short_weekday(day),
                moisture: (35 + rng.random_range(0..30)) as f64,
                humidity: (50 + rng.random_range(0..20)) as f64,
                temperature: (24 + rng.random_range(0..10)) as f64,
                water_level: (60 + rng.random_range(0..30)) as f64,
            });
        }

        window
    }

    /// Appends a reading, returning the evicted oldest reading when full.
    pub fn push(&mut self, reading: SensorReading) -> Option<SensorReading> {
        let evicted = if self.readings.len() == self.capacity {
            self.readings.pop_front()
        } else {
            None
        };

        self.readings.push_back(reading);

        evicted
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.readings.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorReading> {
        self.readings.iter()
    }

    pub fn to_vec(&self) -> Vec<SensorReading> {
        self.readings.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn short_weekday(day: OffsetDateTime) -> String {
    day.weekday().to_string().chars().take(3).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::datetime;

    use super::*;

    fn reading(label: &str, moisture: f64) -> SensorReading {
        SensorReading {
            timestamp: label.to_string(),
            moisture,
            humidity: 60.0,
            temperature: 25.0,
            water_level: 80.0,
        }
    }

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut window = SensorWindow::new(3);

        assert!(window.push(reading("a", 1.0)).is_none());
        assert!(window.push(reading("b", 2.0)).is_none());
        assert!(window.push(reading("c", 3.0)).is_none());

        let evicted = window.push(reading("d", 4.0)).unwrap();
        assert_eq!(evicted.timestamp, "a");
        assert_eq!(window.len(), 3);

        let labels: Vec<_> = window.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "d"]);
        assert_eq!(window.latest().unwrap().timestamp, "d");
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut window = SensorWindow::new(0);
        window.push(reading("a", 1.0));
        window.push(reading("b", 2.0));

        assert_eq!(window.capacity(), 1);
        assert_eq!(window.to_vec(), vec![reading("b", 2.0)]);
    }

    #[test]
    fn test_seeded_window_covers_a_week() {
        let mut rng = StdRng::seed_from_u64(7);
        // 2024-06-09 is a Sunday
        let window = SensorWindow::seeded(DEFAULT_CAPACITY, datetime!(2024-06-09 12:00 UTC), &mut rng);

        let labels: Vec<_> = window.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

        for reading in window.iter() {
            assert!((35.0..65.0).contains(&reading.moisture));
            assert!((50.0..70.0).contains(&reading.humidity));
            assert!((24.0..34.0).contains(&reading.temperature));
            assert!((60.0..90.0).contains(&reading.water_level));
        }
    }
}
