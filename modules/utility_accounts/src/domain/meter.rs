use chrono::Utc;

use crate::contract::model::{MeterReading, ServiceKind};

/// Sample consumption per registered user, used by the dashboard totals.
pub const SAMPLE_ELECTRICITY_KWH_PER_USER: u64 = 136;
pub const SAMPLE_WATER_LITERS_PER_USER: u64 = 566;

/// Fixed meter snapshot; there is no metering backend.
pub fn sample_reading(kind: ServiceKind, meter_no: &str, consumer_name: &str) -> MeterReading {
    let (current, last, consumption, bill, avg_daily, peak_hours, efficiency) = match kind {
        ServiceKind::Electricity => ("4,892", "4,756", "136", "₹1,632", "4.5", "6 PM - 10 PM", "87%"),
        ServiceKind::Water => ("12,450", "11,884", "566", "₹849", "18.9", "6 AM - 9 AM", "92%"),
    };

    MeterReading {
        kind,
        meter_no: meter_no.to_string(),
        consumer_name: consumer_name.to_string(),
        current_reading: current.to_string(),
        last_reading: last.to_string(),
        consumption: consumption.to_string(),
        bill: bill.to_string(),
        status: "Active".to_string(),
        avg_daily: avg_daily.to_string(),
        peak_hours: peak_hours.to_string(),
        efficiency: efficiency.to_string(),
        last_update: Utc::now(),
    }
}
