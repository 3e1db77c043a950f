use agriguard_api::models::SensorReading;

pub const CSV_HEADER: &str =
    "Day, Soil Moisture (%), Air Humidity (%), Temperature (°C), Water Level (%)";

pub const CSV_FILE_NAME: &str = "agriguard_sensor_data.csv";

/// Renders readings as CSV, one row per reading in the given order.
pub fn readings_to_csv(readings: &[SensorReading]) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(64 * (readings.len() + 1));
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(buffer);

    for reading in readings {
        writer.write_record([
            reading.timestamp.clone(),
            reading.moisture.to_string(),
            reading.humidity.to_string(),
            reading.temperature.to_string(),
            reading.water_level.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e.error()))
}
