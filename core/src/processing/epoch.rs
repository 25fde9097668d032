use crate::interface::epoch::{EpochRecord, SensorKind, SensorReport, SensorStatus, VehiclePose};
use crate::interface::interchange::InterchangeRecord;
use crate::interface::measurement::{RangeBearingElevation, ServoSample};
use crate::prelude::{StageError, StageResult};
use crate::processing::measurement::ChannelOutput;

fn channel_for(channels: &[ChannelOutput], kind: SensorKind) -> StageResult<Option<&ChannelOutput>> {
    let mut matching = channels.iter().filter(|c| c.sensor == Some(kind));
    let first = matching.next();
    if let Some(second) = matching.next() {
        return Err(StageError::InvalidInput(format!(
            "channels '{}' and '{}' both claim sensor {:?}",
            first.map(|c| c.name.as_str()).unwrap_or_default(),
            second.name,
            kind
        )));
    }
    Ok(first)
}

fn report<T>(channel: Option<&ChannelOutput>, row: usize) -> SensorReport<T>
where
    T: for<'a> From<&'a RangeBearingElevation>,
{
    let Some(measurement) = channel.and_then(|c| c.measurements.get(row)) else {
        return SensorReport::not_available();
    };
    SensorReport {
        time: Some(measurement.time),
        status: if measurement.is_valid() {
            SensorStatus::Track
        } else {
            SensorStatus::NoTrack
        },
        reading: measurement.reading.as_ref().map(T::from),
    }
}

/// Combines per-channel outputs and the servo track into one record per
/// trajectory row. Each sensor slot takes only the fields that sensor
/// measures; slots without a configured channel are marked not available.
pub fn assemble_epochs(
    records: &[InterchangeRecord],
    channels: &[ChannelOutput],
    servo: &[ServoSample],
    vehicle: &VehiclePose,
) -> StageResult<Vec<EpochRecord>> {
    if servo.len() != records.len() {
        return Err(StageError::InvalidInput(format!(
            "servo track has {} rows, trajectory has {}",
            servo.len(),
            records.len()
        )));
    }
    if let Some(channel) = channels
        .iter()
        .find(|c| c.measurements.len() != records.len())
    {
        return Err(StageError::InvalidInput(format!(
            "channel '{}' has {} rows, trajectory has {}",
            channel.name,
            channel.measurements.len(),
            records.len()
        )));
    }

    let radar = channel_for(channels, SensorKind::TrackRadar)?;
    let camera = channel_for(channels, SensorKind::ThermalCamera)?;
    let laser = channel_for(channels, SensorKind::Laser)?;

    Ok(records
        .iter()
        .zip(servo)
        .enumerate()
        .map(|(row, (record, servo))| EpochRecord {
            system_time: record.time,
            track_radar: report(radar, row),
            thermal_camera: report(camera, row),
            laser: report(laser, row),
            servo: *servo,
            vehicle: *vehicle,
        })
        .collect())
}
